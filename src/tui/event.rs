//! Terminal event polling and translation.
//!
//! Raw crossterm events become `TuiEvent` values here. The variants name
//! keyboard chords, not intentions: the run loop decides what Enter means
//! based on which widget holds keyboard focus.
//!
//! Shift+Enter arrives as a distinct chord only under the Kitty keyboard
//! protocol (pushed by the terminal mode guard). Legacy terminals collapse
//! it into plain Enter, in which case the submit chord is unavailable and
//! Enter keeps its newline meaning.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Ctrl+C: quit unconditionally
    ForceQuit,
    /// Esc: release keyboard focus from the focused widget
    Escape,
    /// Tab: move keyboard focus to the next widget
    FocusNext,
    /// Terminal was resized; a redraw is enough
    Resize,
    /// Enter without modifiers: newline in the editor, press on the button
    Enter,
    /// Shift+Enter: the submit chord
    ShiftEnter,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    /// Alt+Left: jump to the previous word boundary
    WordLeft,
    /// Alt+Right: jump to the next word boundary
    WordRight,
    ScrollPageUp,
    ScrollPageDown,
}

/// Translate a crossterm key event into a `TuiEvent`.
///
/// REPORT_EVENT_TYPES makes the terminal deliver key releases too; only
/// presses and repeats produce events.
fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    // Debug: log all key events to see what the terminal sends
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );

    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::SHIFT, KeyCode::Enter) => Some(TuiEvent::ShiftEnter),
        (_, KeyCode::Enter) => Some(TuiEvent::Enter),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Tab) => Some(TuiEvent::FocusNext),
        (KeyModifiers::ALT, KeyCode::Left) => Some(TuiEvent::WordLeft),
        (KeyModifiers::ALT, KeyCode::Right) => Some(TuiEvent::WordRight),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
        (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        // Catch-all AFTER the chord arms so Shift+letter still inserts
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        _ => None,
    }
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if event::poll(timeout).unwrap() {
        match event::read().unwrap() {
            Event::Key(key_event) => translate_key(key_event),
            Event::Paste(data) => Some(TuiEvent::Paste(data)),
            Event::Resize(_, _) => Some(TuiEvent::Resize),
            _ => None,
        }
    } else {
        None
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}
