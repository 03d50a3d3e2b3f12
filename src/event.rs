use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Wait up to `timeout` for a key press.
///
/// Release and repeat events are dropped so every key acts once on all
/// platforms.
pub fn next_key_press(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}
