//! Row derivation for the episode table.
//!
//! Turns episodes into plain display strings. Drawing lives in
//! [`crate::tui`]; everything here is pure so it can be tested directly.

use crate::sort::SortKey;
use crate::types::{Episode, Era};
use std::path::{Path, PathBuf};

/// Era indicator image. Unrecognized eras fall back to the classic image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraImage {
    Classic,
    Modern,
    Recent,
}

impl EraImage {
    pub fn for_era(era: &Era) -> Self {
        match era {
            Era::Modern => EraImage::Modern,
            Era::Recent => EraImage::Recent,
            Era::Classic | Era::Other(_) => EraImage::Classic,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            EraImage::Classic => "classic.jpg",
            EraImage::Modern => "modern.jpg",
            EraImage::Recent => "recent.jpg",
        }
    }

    /// Location of the image inside `assets_dir`.
    pub fn asset_path(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(self.file_name())
    }

    /// Short badge drawn in the era cell.
    pub fn badge(&self) -> &'static str {
        match self {
            EraImage::Classic => "[CLASSIC]",
            EraImage::Modern => "[MODERN]",
            EraImage::Recent => "[RECENT]",
        }
    }
}

/// A table column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    /// `None` for columns that cannot be sorted.
    pub sort_key: Option<SortKey>,
}

impl Column {
    const fn sortable(title: &'static str, key: SortKey) -> Self {
        Self {
            title,
            sort_key: Some(key),
        }
    }

    const fn unsortable(title: &'static str) -> Self {
        Self {
            title,
            sort_key: None,
        }
    }
}

/// Table columns in display order.
pub const COLUMNS: [Column; 11] = [
    Column::sortable("Rank", SortKey::Rank),
    Column::sortable("Name", SortKey::Name),
    Column::sortable("Series", SortKey::Series),
    Column::sortable("Era", SortKey::Era),
    Column::sortable("Broadcast", SortKey::Broadcast),
    Column::sortable("Director", SortKey::Director),
    Column::sortable("Writer", SortKey::Writer),
    Column::sortable("Doctor", SortKey::Doctor),
    Column::sortable("Companion", SortKey::Companion),
    Column::sortable("Cast", SortKey::Cast),
    Column::unsortable("Plot"),
];

/// Display values for one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub rank: String,
    pub title: String,
    pub series: String,
    pub era_label: String,
    pub era_image: EraImage,
    pub broadcast_year: String,
    pub director: String,
    pub writer: String,
    pub doctor: String,
    pub companion: String,
    pub cast: String,
    pub plot: String,
}

impl EpisodeRow {
    pub fn from_episode(episode: &Episode) -> Self {
        Self {
            rank: episode.rank.to_string(),
            title: episode.title.clone(),
            series: episode.series.to_string(),
            era_label: episode.era.label().to_string(),
            era_image: EraImage::for_era(&episode.era),
            broadcast_year: episode
                .broadcast_year()
                .map(|y| y.to_string())
                .unwrap_or_default(),
            director: episode.director.clone(),
            writer: episode.writer.clone(),
            doctor: episode.doctor_display(),
            companion: episode.companion_display(),
            cast: episode.cast_display(),
            plot: episode.plot.clone(),
        }
    }

    /// Cell text in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 11] {
        [
            self.rank.as_str(),
            self.title.as_str(),
            self.series.as_str(),
            self.era_image.badge(),
            self.broadcast_year.as_str(),
            self.director.as_str(),
            self.writer.as_str(),
            self.doctor.as_str(),
            self.companion.as_str(),
            self.cast.as_str(),
            self.plot.as_str(),
        ]
    }
}

/// Build one row per episode, in order.
pub fn episode_rows(episodes: &[Episode]) -> Vec<EpisodeRow> {
    episodes.iter().map(EpisodeRow::from_episode).collect()
}
