//! TUI type definitions for focus, actions and filter selectors.

use crate::sort::{SortDirection, SortKey};

/// Which control currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Episode name text input
    NameFilter,
    /// Era selector
    EraFilter,
    /// Doctor selector
    DoctorFilter,
    /// Companion selector
    CompanionFilter,
    /// Episode table and its column headers
    Table,
}

impl Focus {
    /// Tab order.
    const ORDER: [Focus; 5] = [
        Focus::NameFilter,
        Focus::EraFilter,
        Focus::DoctorFilter,
        Focus::CompanionFilter,
        Focus::Table,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Outcome of a key press, reported back to the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Nothing the event loop needs to know about
    None,
    /// Quit the application
    Quit,
    /// Filter inputs changed and the view was recomputed
    FiltersChanged,
    /// A column header was activated
    Sorted(SortKey, SortDirection),
}

/// A cycling selection control with an implicit "All" (no filter) entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Label drawn on the control's border
    pub label: &'static str,
    options: Vec<String>,
    selected: Option<usize>,
}

impl Selector {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            options: Vec::new(),
            selected: None,
        }
    }

    /// Replace the options and go back to "All".
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.selected = None;
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The chosen value, or `None` for "All".
    pub fn value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    /// Text shown in the control.
    pub fn display(&self) -> &str {
        self.value().unwrap_or("All")
    }

    /// Step forward; past the last option wraps back to "All".
    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    /// Step backward; before the first option wraps to "All".
    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn reset(&mut self) {
        self.selected = None;
    }
}
