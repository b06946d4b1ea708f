//! Load-once shared state for the episode dataset.
//!
//! The dataset is fetched a single time and the outcome is broadcast to every
//! subscriber over a [`tokio::sync::watch`] channel. All consumers read the
//! same `Arc`, so there is never more than one copy of the data.

use crate::api::fetch_episodes;
use crate::error::Result;
use crate::types::Episode;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Outcome of the dataset load as seen by the UI.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// The fetch has not finished yet.
    Loading,
    /// The dataset, shared and immutable for the rest of the process.
    Loaded(Arc<[Episode]>),
    /// The fetch failed; carries a human-readable reason.
    Failed(String),
}

impl LoadState {
    /// The loaded episodes, if any.
    pub fn episodes(&self) -> Option<Arc<[Episode]>> {
        match self {
            LoadState::Loaded(episodes) => Some(Arc::clone(episodes)),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Publisher side of the dataset load.
#[derive(Clone)]
pub struct EpisodeStore {
    tx: Arc<watch::Sender<LoadState>>,
}

impl Default for EpisodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeStore {
    /// Create a store in the [`LoadState::Loading`] state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadState::Loading);
        Self { tx: Arc::new(tx) }
    }

    /// Get a receiver that observes the load outcome.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.tx.subscribe()
    }

    /// Current state without subscribing.
    pub fn current(&self) -> LoadState {
        self.tx.borrow().clone()
    }

    /// Record the outcome of a load.
    ///
    /// Only the first outcome is kept; later calls are ignored and return
    /// `false`.
    pub fn publish(&self, result: Result<Vec<Episode>>) -> bool {
        let next = match result {
            Ok(episodes) => LoadState::Loaded(Arc::from(episodes)),
            Err(e) => LoadState::Failed(e.to_string()),
        };

        let accepted = self.tx.send_if_modified(|state| {
            if state.is_loading() {
                *state = next;
                true
            } else {
                false
            }
        });

        if !accepted {
            warn!("Dataset already loaded; ignoring a second load result");
        }
        accepted
    }

    /// Fetch the dataset in the background and publish the outcome.
    pub fn spawn_load(&self, url: String, timeout: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            debug!("Starting dataset load");
            let result = fetch_episodes(&url, timeout).await;
            store.publish(result);
        })
    }
}
