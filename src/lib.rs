//! A terminal browser for a published Doctor Who episode dataset.
//!
//! episode-browser fetches the dataset once, then shows it as a table that
//! can be filtered by name, era, doctor and companion, and sorted by any
//! column.
//!
//! # Features
//!
//! - Case-insensitive name filter, updated on every keystroke
//! - Era, doctor and companion selectors built from the data itself
//! - Per-column ascending/descending sort toggles
//! - Detail pane with the full plot of the highlighted episode
//!
//! # Usage
//!
//! ```bash
//! # Run against the published dataset
//! cargo run
//!
//! # Use a local copy and sort within the filtered view
//! cargo run -- --url http://localhost:8000/episodes.json --compose
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod sort;
pub mod store;
pub mod table;
pub mod tui;
pub mod types;
