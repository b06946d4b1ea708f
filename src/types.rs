//! Type definitions for the episode-browser application.
//!
//! This module contains the episode record as it arrives in the dataset JSON,
//! plus the small display helpers every other module builds on.

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

static YEAR_RE: OnceLock<Regex> = OnceLock::new();

/// Treat an explicit JSON `null` the same as a missing key.
mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Top-level shape of the dataset document.
#[derive(Debug, Deserialize)]
pub struct Dataset {
    /// Every episode in the dataset, in source order.
    pub episodes: Vec<Episode>,
}

/// Coarse historical grouping of an episode.
///
/// Unrecognized labels are kept verbatim in [`Era::Other`] so they can still
/// be filtered on and displayed.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum Era {
    Classic,
    Modern,
    Recent,
    Other(String),
}

impl From<String> for Era {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Classic" => Era::Classic,
            "Modern" => Era::Modern,
            "Recent" => Era::Recent,
            _ => Era::Other(label),
        }
    }
}

impl Era {
    /// The label exactly as it appears in the dataset.
    pub fn label(&self) -> &str {
        match self {
            Era::Classic => "Classic",
            Era::Modern => "Modern",
            Era::Recent => "Recent",
            Era::Other(label) => label,
        }
    }

    /// Sort ordinal. Unknown eras rank 0, before Classic.
    pub fn ordinal(&self) -> u8 {
        match self {
            Era::Classic => 1,
            Era::Modern => 2,
            Era::Recent => 3,
            Era::Other(_) => 0,
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Series identifier: most entries are numbered, specials carry a label.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Series {
    Number(i64),
    Label(String),
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Number(n) => write!(f, "{}", n),
            Series::Label(label) => f.write_str(label),
        }
    }
}

/// The Doctor appearing in an episode. Always present.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Doctor {
    pub actor: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub incarnation: String,
}

/// The companion of an episode, when there is one.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Companion {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub actor: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub character: String,
}

/// One credited cast member.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CastMember {
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub actor: String,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub character: String,
}

/// A single episode record. Read-only once loaded.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Episode {
    /// Position in the source ranking.
    pub rank: i64,

    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub title: String,

    pub series: Series,

    pub era: Era,

    /// Raw broadcast date; only its year is ever shown or sorted on.
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub broadcast_date: String,

    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub director: String,

    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub writer: String,

    pub doctor: Doctor,

    /// Absent (or `null`) when the episode has no companion.
    #[serde(default)]
    pub companion: Option<Companion>,

    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub cast: Vec<CastMember>,

    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub plot: String,
}

impl Episode {
    /// Calendar year of the broadcast date, if it can be read.
    pub fn broadcast_year(&self) -> Option<i32> {
        extract_year(&self.broadcast_date)
    }

    /// Companion actor, treating a missing companion or blank actor as absent.
    pub fn companion_actor(&self) -> Option<&str> {
        self.companion
            .as_ref()
            .map(|c| c.actor.as_str())
            .filter(|actor| !actor.is_empty())
    }

    /// Format the doctor cell, e.g. `"David Tennant (Tenth Doctor)"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use episode_browser::types::Episode;
    ///
    /// let json = r#"{"rank": 1, "title": "Blink", "series": 3, "era": "Modern",
    ///     "doctor": {"actor": "David Tennant", "incarnation": "Tenth Doctor"}}"#;
    /// let episode: Episode = serde_json::from_str(json).unwrap();
    /// assert_eq!(episode.doctor_display(), "David Tennant (Tenth Doctor)");
    /// ```
    pub fn doctor_display(&self) -> String {
        format!("{} ({})", self.doctor.actor, self.doctor.incarnation)
    }

    /// Format the companion cell; empty when there is no companion actor.
    pub fn companion_display(&self) -> String {
        match (&self.companion, self.companion_actor()) {
            (Some(c), Some(actor)) => format!("{} ({})", actor, c.character),
            _ => String::new(),
        }
    }

    /// Comma-joined cast in credit order.
    pub fn cast_display(&self) -> String {
        self.cast
            .iter()
            .map(|m| format!("{} ({})", m.actor, m.character))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Extract the calendar year from a broadcast date string.
///
/// ISO dates and RFC 3339 timestamps are parsed properly; anything else falls
/// back to the first standalone four-digit run.
pub fn extract_year(date: &str) -> Option<i32> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(day.year());
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.year());
    }

    let re = YEAR_RE.get_or_init(|| Regex::new(r"\b(\d{4})\b").unwrap());
    re.captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
