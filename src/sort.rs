//! Column sorting for the episode table.
//!
//! Each sortable column keeps its own ascending/descending toggle. Sorting
//! always produces a new vector and leaves its input untouched.

use crate::types::{Episode, Series};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rank,
    Name,
    Series,
    Era,
    Broadcast,
    Director,
    Writer,
    Doctor,
    Companion,
    Cast,
}

impl SortKey {
    /// Every sortable column, in table order.
    pub const ALL: [SortKey; 10] = [
        SortKey::Rank,
        SortKey::Name,
        SortKey::Series,
        SortKey::Era,
        SortKey::Broadcast,
        SortKey::Director,
        SortKey::Writer,
        SortKey::Doctor,
        SortKey::Companion,
        SortKey::Cast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rank => "rank",
            SortKey::Name => "name",
            SortKey::Series => "series",
            SortKey::Era => "era",
            SortKey::Broadcast => "broadcast",
            SortKey::Director => "director",
            SortKey::Writer => "writer",
            SortKey::Doctor => "doctor",
            SortKey::Companion => "companion",
            SortKey::Cast => "cast",
        }
    }

    /// Parse a column key name such as `"broadcast"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Header indicator.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Comparison value extracted from an episode for one column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Number(i64),
    Text(String),
}

/// Extract the value `key` compares on.
///
/// Era compares by ordinal (unknown eras first), cast by its length and
/// broadcast by year, with unreadable dates lowest. Every other column
/// compares the lowercased text of the field.
pub fn sort_value(episode: &Episode, key: SortKey) -> SortValue {
    match key {
        SortKey::Era => SortValue::Number(i64::from(episode.era.ordinal())),
        SortKey::Cast => SortValue::Number(episode.cast.len() as i64),
        SortKey::Broadcast => SortValue::Number(
            episode
                .broadcast_year()
                .map(i64::from)
                .unwrap_or(i64::MIN),
        ),
        SortKey::Doctor => SortValue::Text(episode.doctor.actor.to_lowercase()),
        SortKey::Name => SortValue::Text(episode.title.to_lowercase()),
        SortKey::Companion => {
            SortValue::Text(episode.companion_actor().unwrap_or_default().to_lowercase())
        }
        SortKey::Rank => SortValue::Text(episode.rank.to_string()),
        SortKey::Series => SortValue::Text(match &episode.series {
            Series::Number(n) => n.to_string(),
            Series::Label(label) => label.to_lowercase(),
        }),
        SortKey::Director => SortValue::Text(episode.director.to_lowercase()),
        SortKey::Writer => SortValue::Text(episode.writer.to_lowercase()),
    }
}

/// Return a copy of `episodes` ordered by `key`.
///
/// Equal keys keep their input order in both directions.
pub fn sort_episodes(episodes: &[Episode], key: SortKey, direction: SortDirection) -> Vec<Episode> {
    let mut sorted = episodes.to_vec();
    match direction {
        SortDirection::Ascending => sorted.sort_by_cached_key(|e| sort_value(e, key)),
        SortDirection::Descending => sorted.sort_by_cached_key(|e| Reverse(sort_value(e, key))),
    }
    sorted
}

/// Per-column toggle state.
#[derive(Debug, Clone, Default)]
pub struct SortController {
    orders: HashMap<SortKey, SortDirection>,
    active: Option<(SortKey, SortDirection)>,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction the next activation of `key` will sort in.
    pub fn next_direction(&self, key: SortKey) -> SortDirection {
        self.orders.get(&key).copied().unwrap_or_default()
    }

    /// Activate a column header.
    ///
    /// Returns the direction to sort in and flips the column's toggle for the
    /// next activation. Other columns keep their own state.
    pub fn activate(&mut self, key: SortKey) -> SortDirection {
        let direction = self.next_direction(key);
        self.orders.insert(key, direction.flipped());
        self.active = Some((key, direction));
        direction
    }

    /// The most recently applied sort.
    pub fn active(&self) -> Option<(SortKey, SortDirection)> {
        self.active
    }

    /// Forget the applied sort once the view is no longer in that order.
    /// Per-column toggles are kept.
    pub fn clear_active(&mut self) {
        self.active = None;
    }
}
