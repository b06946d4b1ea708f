//! Application state management and input handling.

use crate::filter::{apply_filters, derive_options, FilterCriteria};
use crate::sort::{sort_episodes, SortController, SortKey};
use crate::store::LoadState;
use crate::table::{episode_rows, EpisodeRow, COLUMNS};
use crate::types::Episode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::widgets::TableState;
use std::path::PathBuf;
use std::sync::Arc;

use super::types::{Action, Focus, Selector};

/// Application state for the TUI.
pub struct App {
    /// Control receiving keyboard input
    pub focus: Focus,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Whether help modal is shown
    pub show_help: bool,
    /// Whether the dataset fetch is still running
    pub loading: bool,
    /// Error message to display
    pub error_message: Option<String>,
    /// Name filter text
    pub name_input: String,
    pub era_selector: Selector,
    pub doctor_selector: Selector,
    pub companion_selector: Selector,
    /// Per-column sort toggles
    pub sort: SortController,
    /// Header currently highlighted for sorting (index into COLUMNS)
    pub selected_column: usize,
    /// Row selection in the table
    pub table_state: TableState,
    /// Sort the filtered view rather than the full dataset
    pub compose_filter_and_sort: bool,
    /// Where the era images live
    pub assets_dir: PathBuf,
    dataset: Option<Arc<[Episode]>>,
    view: Vec<Episode>,
    /// Whether `view` had the filters applied
    filtered: bool,
    rows: Vec<EpisodeRow>,
}

impl App {
    /// Create a new App waiting for the dataset.
    pub fn new(compose_filter_and_sort: bool, assets_dir: PathBuf) -> Self {
        Self {
            focus: Focus::Table,
            should_quit: false,
            show_help: false,
            loading: true,
            error_message: None,
            name_input: String::new(),
            era_selector: Selector::new("Era"),
            doctor_selector: Selector::new("Doctor"),
            companion_selector: Selector::new("Companion"),
            sort: SortController::new(),
            selected_column: 0,
            table_state: TableState::default(),
            compose_filter_and_sort,
            assets_dir,
            dataset: None,
            view: Vec::new(),
            filtered: false,
            rows: Vec::new(),
        }
    }

    /// React to a new load outcome from the store.
    pub fn apply_load_state(&mut self, state: &LoadState) {
        match state {
            LoadState::Loading => self.loading = true,
            LoadState::Loaded(episodes) => self.set_dataset(Arc::clone(episodes)),
            LoadState::Failed(reason) => self.set_load_failed(reason),
        }
    }

    /// Install the dataset: populate the selectors and show every episode.
    pub fn set_dataset(&mut self, episodes: Arc<[Episode]>) {
        let options = derive_options(&episodes);
        self.era_selector.set_options(options.eras);
        self.doctor_selector.set_options(options.doctors);
        self.companion_selector.set_options(options.companions);

        self.loading = false;
        self.error_message = None;
        self.filtered = false;
        self.set_view(episodes.to_vec());
        self.dataset = Some(episodes);
    }

    /// Record a failed load. The table stays empty.
    pub fn set_load_failed(&mut self, reason: &str) {
        self.loading = false;
        self.set_error(&format!("Could not load episodes: {}", reason));
    }

    /// Set an error message.
    pub fn set_error(&mut self, message: &str) {
        self.error_message = Some(message.to_string());
    }

    /// Clear error message.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Episodes currently shown, in display order.
    pub fn view(&self) -> &[Episode] {
        &self.view
    }

    /// Whether the current view is a filtered subset. A non-composed sort
    /// shows the full dataset even while filter inputs are set.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Display rows for the current view.
    pub fn rows(&self) -> &[EpisodeRow] {
        &self.rows
    }

    /// Size of the full dataset (0 before it loads).
    pub fn total_count(&self) -> usize {
        self.dataset.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    /// Episode under the table cursor.
    pub fn selected_episode(&self) -> Option<&Episode> {
        self.table_state.selected().and_then(|i| self.view.get(i))
    }

    /// Current filter inputs.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            name_query: self.name_input.clone(),
            era: self.era_selector.value().map(str::to_string),
            doctor: self.doctor_selector.value().map(str::to_string),
            companion: self.companion_selector.value().map(str::to_string),
        }
    }

    /// Replace the view and rebuild every row.
    fn set_view(&mut self, view: Vec<Episode>) {
        self.rows = episode_rows(&view);
        self.table_state
            .select(if view.is_empty() { None } else { Some(0) });
        self.view = view;
    }

    /// Recompute the view from the full dataset and the current filters.
    pub fn refresh_filters(&mut self) -> Action {
        let Some(dataset) = self.dataset.clone() else {
            return Action::None;
        };

        let criteria = self.criteria();
        let mut view = apply_filters(&dataset, &criteria);
        if !self.compose_filter_and_sort {
            self.sort.clear_active();
        } else if let Some((key, direction)) = self.sort.active() {
            view = sort_episodes(&view, key, direction);
        }
        self.filtered = !criteria.is_default();

        debug!(
            "Filters {:?} matched {} of {} episodes",
            criteria,
            view.len(),
            dataset.len()
        );
        self.set_view(view);
        Action::FiltersChanged
    }

    /// Activate the header for `key`.
    ///
    /// Sorts the full dataset snapshot, ignoring the filters, unless
    /// `compose_filter_and_sort` is set.
    pub fn activate_sort(&mut self, key: SortKey) -> Action {
        let Some(dataset) = self.dataset.clone() else {
            return Action::None;
        };

        let direction = self.sort.activate(key);
        let criteria = self.criteria();
        let sorted = if self.compose_filter_and_sort {
            sort_episodes(&apply_filters(&dataset, &criteria), key, direction)
        } else {
            sort_episodes(&dataset, key, direction)
        };
        self.filtered = self.compose_filter_and_sort && !criteria.is_default();

        debug!("Sorted {} episodes by {} {}", sorted.len(), key, direction.as_str());
        self.set_view(sorted);
        Action::Sorted(key, direction)
    }

    /// Reset every filter input.
    pub fn clear_filters(&mut self) -> Action {
        self.name_input.clear();
        self.era_selector.reset();
        self.doctor_selector.reset();
        self.companion_selector.reset();
        self.refresh_filters()
    }

    /// Handle keyboard input and return an action.
    pub fn handle_input(&mut self, key: KeyEvent) -> Action {
        // Global quit with Ctrl+C or Ctrl+Q
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => {}
            }
        }

        // Handle help modal
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Action::None;
        }

        // Error popup swallows input until dismissed
        if self.error_message.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.clear_error();
                    Action::None
                }
                KeyCode::Char('q') => self.quit(),
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::NameFilter => self.handle_name_input(key),
            Focus::EraFilter | Focus::DoctorFilter | Focus::CompanionFilter => {
                self.handle_selector_input(key)
            }
            Focus::Table => self.handle_table_input(key),
        }
    }

    fn quit(&mut self) -> Action {
        self.should_quit = true;
        Action::Quit
    }

    fn handle_name_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char(c) => {
                self.name_input.push(c);
                self.refresh_filters()
            }
            KeyCode::Backspace => {
                if self.name_input.pop().is_some() {
                    self.refresh_filters()
                } else {
                    Action::None
                }
            }
            KeyCode::Esc => {
                if self.name_input.is_empty() {
                    self.focus = Focus::Table;
                    Action::None
                } else {
                    self.name_input.clear();
                    self.refresh_filters()
                }
            }
            KeyCode::Enter | KeyCode::Down => {
                self.focus = Focus::Table;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn focused_selector(&mut self) -> Option<&mut Selector> {
        match self.focus {
            Focus::EraFilter => Some(&mut self.era_selector),
            Focus::DoctorFilter => Some(&mut self.doctor_selector),
            Focus::CompanionFilter => Some(&mut self.companion_selector),
            Focus::NameFilter | Focus::Table => None,
        }
    }

    fn handle_selector_input(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(selector) = self.focused_selector() {
                    selector.select_next();
                }
                self.refresh_filters()
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(selector) = self.focused_selector() {
                    selector.select_previous();
                }
                self.refresh_filters()
            }
            KeyCode::Backspace | KeyCode::Delete => {
                if let Some(selector) = self.focused_selector() {
                    selector.reset();
                }
                self.refresh_filters()
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Esc => {
                self.focus = Focus::Table;
                Action::None
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                Action::None
            }
            KeyCode::Char('q') => self.quit(),
            _ => Action::None,
        }
    }

    fn handle_table_input(&mut self, key: KeyEvent) -> Action {
        let len = self.view.len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.table_state.selected().unwrap_or(0);
                if i > 0 {
                    self.table_state.select(Some(i - 1));
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.table_state.selected().unwrap_or(0);
                if i < len.saturating_sub(1) {
                    self.table_state.select(Some(i + 1));
                }
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                if len > 0 {
                    self.table_state.select(Some(0));
                }
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                Action::None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column + 1 < COLUMNS.len() {
                    self.selected_column += 1;
                }
                Action::None
            }
            KeyCode::Enter | KeyCode::Char('s') => match COLUMNS[self.selected_column].sort_key {
                Some(sort_key) => self.activate_sort(sort_key),
                None => Action::None,
            },
            KeyCode::Char('/') => {
                self.focus = Focus::NameFilter;
                Action::None
            }
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('?') => {
                self.show_help = true;
                Action::None
            }
            KeyCode::Char('q') => self.quit(),
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::parse_episodes;
    use crate::sort::SortDirection;

    fn dataset() -> Arc<[Episode]> {
        let episodes = parse_episodes(
            r#"{"episodes": [
            {"rank": 1, "title": "Rose", "series": 1, "era": "Modern",
             "broadcast_date": "2005-03-26",
             "doctor": {"actor": "Christopher Eccleston", "incarnation": "Ninth Doctor"},
             "companion": {"actor": "Billie Piper", "character": "Rose Tyler"}},
            {"rank": 2, "title": "Blink", "series": 3, "era": "Modern",
             "broadcast_date": "2007-06-09",
             "doctor": {"actor": "David Tennant", "incarnation": "Tenth Doctor"},
             "companion": {"actor": "Freema Agyeman", "character": "Martha Jones"}},
            {"rank": 3, "title": "Heaven Sent", "series": 9, "era": "Recent",
             "broadcast_date": "2015-11-28",
             "doctor": {"actor": "Peter Capaldi", "incarnation": "Twelfth Doctor"}}
        ]}"#,
        )
        .unwrap();
        Arc::from(episodes)
    }

    fn loaded_app() -> App {
        let mut app = App::new(false, PathBuf::from("images"));
        app.set_dataset(dataset());
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn titles(app: &App) -> Vec<&str> {
        app.view().iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new(false, PathBuf::from("images"));
        assert!(app.loading);
        assert!(app.view().is_empty());
        assert_eq!(app.total_count(), 0);
    }

    #[test]
    fn test_set_dataset_populates_everything() {
        let app = loaded_app();
        assert!(!app.loading);
        assert_eq!(titles(&app), vec!["Rose", "Blink", "Heaven Sent"]);
        assert_eq!(app.rows().len(), 3);
        assert_eq!(app.era_selector.options(), ["Modern", "Recent"]);
        assert_eq!(app.companion_selector.options().len(), 2);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_load_failure_shows_error() {
        let mut app = App::new(false, PathBuf::from("images"));
        app.apply_load_state(&LoadState::Failed("Network error: refused".to_string()));
        assert!(!app.loading);
        assert!(app.error_message.as_deref().unwrap().contains("refused"));
        assert!(app.view().is_empty());
    }

    #[test]
    fn test_input_without_dataset_is_noop() {
        let mut app = App::new(false, PathBuf::from("images"));
        assert_eq!(app.handle_input(key(KeyCode::Enter)), Action::None);
        app.focus = Focus::NameFilter;
        assert_eq!(app.handle_input(key(KeyCode::Char('x'))), Action::None);
        assert!(app.view().is_empty());
    }

    #[test]
    fn test_typing_filters_by_name() {
        let mut app = loaded_app();
        app.focus = Focus::NameFilter;
        app.handle_input(key(KeyCode::Char('B')));
        app.handle_input(key(KeyCode::Char('L')));
        assert_eq!(titles(&app), vec!["Blink"]);
        app.handle_input(key(KeyCode::Backspace));
        app.handle_input(key(KeyCode::Backspace));
        assert_eq!(titles(&app).len(), 3);
    }

    #[test]
    fn test_era_selector_filters() {
        let mut app = loaded_app();
        app.focus = Focus::EraFilter;
        // All -> Modern -> Recent
        app.handle_input(key(KeyCode::Right));
        app.handle_input(key(KeyCode::Right));
        assert_eq!(app.era_selector.value(), Some("Recent"));
        assert_eq!(titles(&app), vec!["Heaven Sent"]);
    }

    #[test]
    fn test_header_activation_toggles_direction() {
        let mut app = loaded_app();
        app.selected_column = 4; // Broadcast
        assert_eq!(
            app.handle_input(key(KeyCode::Enter)),
            Action::Sorted(SortKey::Broadcast, SortDirection::Ascending)
        );
        assert_eq!(titles(&app), vec!["Rose", "Blink", "Heaven Sent"]);
        assert_eq!(
            app.handle_input(key(KeyCode::Enter)),
            Action::Sorted(SortKey::Broadcast, SortDirection::Descending)
        );
        assert_eq!(titles(&app), vec!["Heaven Sent", "Blink", "Rose"]);
    }

    #[test]
    fn test_sort_ignores_filters_by_default() {
        let mut app = loaded_app();
        app.era_selector.select_next(); // Modern
        app.refresh_filters();
        assert_eq!(titles(&app).len(), 2);

        app.activate_sort(SortKey::Name);
        assert_eq!(titles(&app), vec!["Blink", "Heaven Sent", "Rose"]);
        assert!(!app.is_filtered());
    }

    #[test]
    fn test_filter_change_drops_stale_sort() {
        let mut app = loaded_app();
        app.activate_sort(SortKey::Name);
        assert_eq!(app.sort.active(), Some((SortKey::Name, SortDirection::Ascending)));

        app.focus = Focus::NameFilter;
        app.handle_input(key(KeyCode::Char('o')));
        app.handle_input(key(KeyCode::Backspace));

        assert_eq!(titles(&app), vec!["Rose", "Blink", "Heaven Sent"]);
        assert!(app.sort.active().is_none());
        assert!(!app.is_filtered());
        // The column toggle still remembers its next direction.
        assert_eq!(app.sort.next_direction(SortKey::Name), SortDirection::Descending);
    }

    #[test]
    fn test_composed_sort_keeps_filters() {
        let mut app = App::new(true, PathBuf::from("images"));
        app.set_dataset(dataset());
        app.era_selector.select_next(); // Modern
        app.refresh_filters();

        app.activate_sort(SortKey::Name);
        assert_eq!(titles(&app), vec!["Blink", "Rose"]);
        assert!(app.is_filtered());

        // Later filter changes keep the active sort.
        app.era_selector.reset();
        app.refresh_filters();
        assert_eq!(titles(&app), vec!["Blink", "Heaven Sent", "Rose"]);
        assert_eq!(app.sort.active(), Some((SortKey::Name, SortDirection::Ascending)));
    }

    #[test]
    fn test_plot_column_is_not_sortable() {
        let mut app = loaded_app();
        app.selected_column = COLUMNS.len() - 1;
        assert_eq!(app.handle_input(key(KeyCode::Char('s'))), Action::None);
        assert!(app.sort.active().is_none());
    }

    #[test]
    fn test_clear_filters() {
        let mut app = loaded_app();
        app.name_input = "zzz".to_string();
        app.refresh_filters();
        assert!(app.view().is_empty());
        assert_eq!(app.table_state.selected(), None);

        app.handle_input(key(KeyCode::Char('c')));
        assert_eq!(titles(&app).len(), 3);
        assert!(app.criteria().is_default());
    }

    #[test]
    fn test_error_popup_swallows_keys_until_dismissed() {
        let mut app = loaded_app();
        app.set_error("boom");
        assert_eq!(app.handle_input(key(KeyCode::Char('s'))), Action::None);
        assert!(app.sort.active().is_none());
        app.handle_input(key(KeyCode::Esc));
        assert!(app.error_message.is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = loaded_app();
        app.focus = Focus::NameFilter;
        let action = app.handle_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_is_text_in_name_filter() {
        let mut app = loaded_app();
        app.focus = Focus::NameFilter;
        app.handle_input(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.name_input, "q");
    }

    #[test]
    fn test_table_navigation_bounds() {
        let mut app = loaded_app();
        app.handle_input(key(KeyCode::Up));
        assert_eq!(app.table_state.selected(), Some(0));
        app.handle_input(key(KeyCode::Char('G')));
        assert_eq!(app.table_state.selected(), Some(2));
        app.handle_input(key(KeyCode::Down));
        assert_eq!(app.table_state.selected(), Some(2));
        assert_eq!(app.selected_episode().unwrap().title, "Heaven Sent");
    }
}
