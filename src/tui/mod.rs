//! Full-screen episode browser.
//!
//! A filter bar (name, era, doctor, companion) sits above the episode table;
//! the highlighted episode's plot fills the detail pane below it.

mod render;
mod state;
mod types;

pub use render::draw;
pub use state::App;
pub use types::{Action, Focus, Selector};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::io;
use std::time::Duration;

/// Wait up to `timeout` for a key press.
///
/// Releases, repeats and non-key events (resize, mouse) yield `None`; the
/// next draw picks up any resize on its own.
pub fn next_key_press(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}
