//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The intention is to swap this out for a different adapter in the
//! future if needed.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//! the event poll sleeps up to 250ms, and a frame is drawn only after
//! keyboard input, a backend action, or a terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
pub mod components;
pub mod event;
mod ui;

pub use component::{Component, EventHandler};

use std::collections::HashMap;
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, error, info, warn};
use serde_json::Value;

use crate::backend::{Backend, build_backend};
use crate::core::action::{Action, Effect, update};
use crate::core::common::LatentComponents;
use crate::core::config::ResolvedConfig;
use crate::core::diff::{self, DiffError};
use crate::core::state::App;
use crate::core::transcript;
use crate::protocol::{ComponentId, Inbound, MESSAGE_INPUT_ID, Outbound, SEND_BUTTON_ID};
use crate::tui::components::{
    IconButton, IconButtonDiff, MessageLogState, TextInput, TextInputDiff, TextInputEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which part of the screen owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Scrolling the traffic log. Typing auto-switches to the editor.
    Browse,
    /// Editing in the text widget.
    Editor,
    /// The send button.
    Button,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_log: MessageLogState,
    pub text_input: TextInput,
    pub send_button: IconButton,
    // Who owns the keyboard
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        let mut text_input = TextInput::new();
        // User expects to type immediately
        text_input.grab_keyboard_focus();
        Self {
            message_log: MessageLogState::new(),
            text_input,
            send_button: IconButton::new(),
            focus: Focus::Editor,
        }
    }

    /// Tab order: editor → button → browse → editor, skipping controls
    /// that refuse focus. Leaving the editor is a blur, so this returns
    /// the sync action when there is one.
    pub fn advance_focus(&mut self) -> Option<Action> {
        match self.focus {
            Focus::Editor => {
                let synced = self.text_input.release_keyboard_focus();
                if self.send_button.grab_keyboard_focus() {
                    self.focus = Focus::Button;
                } else {
                    self.focus = Focus::Browse;
                }
                synced.map(Action::EditorBlurred)
            }
            Focus::Button => {
                self.send_button.release_keyboard_focus();
                self.focus = Focus::Browse;
                None
            }
            Focus::Browse => {
                if self.text_input.grab_keyboard_focus() {
                    self.focus = Focus::Editor;
                } else if self.send_button.grab_keyboard_focus() {
                    self.focus = Focus::Button;
                }
                None
            }
        }
    }

    /// Esc: drop focus back to browsing. A blur out of the editor
    /// returns the sync action.
    pub fn blur_focused(&mut self) -> Option<Action> {
        match self.focus {
            Focus::Editor => {
                let synced = self.text_input.release_keyboard_focus();
                self.focus = Focus::Browse;
                synced.map(Action::EditorBlurred)
            }
            Focus::Button => {
                self.send_button.release_keyboard_focus();
                self.focus = Focus::Browse;
                None
            }
            Focus::Browse => None,
        }
    }

    /// A diff can withdraw sensitivity from the focused control, which
    /// drops its focus flag without going through the blur path. Fall
    /// back to browsing when that happens.
    fn ensure_focus_valid(&mut self) {
        let lost = match self.focus {
            Focus::Editor => !self.text_input.has_focus(),
            Focus::Button => !self.send_button.focused,
            Focus::Browse => false,
        };
        if lost {
            self.focus = Focus::Browse;
        }
    }
}

/// Applies one inbound batch to the form's widgets.
///
/// The whole batch decodes before any of it applies: a malformed entry
/// or an unknown component id rejects the batch with every widget
/// untouched.
pub fn apply_delta_states(
    tui: &mut TuiState,
    delta_states: &HashMap<ComponentId, Value>,
) -> Result<(), DiffError> {
    let mut input_diff: Option<TextInputDiff> = None;
    let mut button_diff: Option<IconButtonDiff> = None;

    for (&id, raw) in delta_states {
        match id {
            MESSAGE_INPUT_ID => input_diff = Some(diff::decode(id, raw.clone())?),
            SEND_BUTTON_ID => button_diff = Some(diff::decode(id, raw.clone())?),
            other => return Err(DiffError::UnknownComponent(other)),
        }
    }

    // Sibling components named by the batch but not attached yet. The
    // demo form is two leaf widgets, so the set stays empty; widgets
    // still receive it per the shared contract.
    let mut latent = LatentComponents::new();

    if let Some(diff) = input_diff {
        tui.text_input.update_element(&diff, &mut latent);
    }
    if let Some(diff) = button_diff {
        tui.send_button.update_element(&diff, &mut latent);
    }

    tui.ensure_focus_valid();
    Ok(())
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter detection)
        // Detection via supports_keyboard_enhancement() fails in WSL, but the protocol
        // is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Spawns the backend session plus the task that forwards its pushes
/// into the action channel. Returns the client's outbound sender.
fn spawn_backend(
    backend: Arc<dyn Backend>,
    tx: mpsc::Sender<Action>,
) -> tokio::sync::mpsc::UnboundedSender<Outbound> {
    let (outbound_tx, outbound_rx) = tokio::sync::mpsc::unbounded_channel::<Outbound>();
    let (push_tx, mut push_rx) = tokio::sync::mpsc::unbounded_channel::<Inbound>();

    tokio::spawn(async move {
        if let Err(e) = backend.serve(outbound_rx, push_tx).await {
            warn!("Backend stopped: {}", e);
        }
    });

    // Forward pushed batches to the event loop, then announce the close
    // so the session can be marked offline.
    tokio::spawn(async move {
        while let Some(message) = push_rx.recv().await {
            debug!("Forwarding inbound batch");
            if tx.send(Action::InboundReceived(message)).is_err() {
                warn!("Failed to forward inbound batch: receiver dropped");
                return;
            }
        }
        if tx.send(Action::BackendClosed).is_err() {
            warn!("Failed to report backend close: receiver dropped");
        }
    });

    outbound_tx
}

/// Performs the I/O an `update()` asked for.
fn dispatch_effect(
    tui: &mut TuiState,
    app: &mut App,
    effect: Effect,
    outbound: &tokio::sync::mpsc::UnboundedSender<Outbound>,
) {
    match effect {
        Effect::None => {}
        Effect::Send(message) => {
            // Fire and forget: a closed channel is logged, never waited on.
            if outbound.send(message).is_err() {
                warn!("Backend channel closed, outbound message dropped");
            }
        }
        Effect::ApplyDiffs(delta_states) => {
            if let Err(e) = apply_delta_states(tui, &delta_states) {
                error!("Dropping inbound batch: {}", e);
                let _ = update(app, Action::DiffRejected(e.to_string()));
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config);
    let mut app = App::new(backend.name().to_string(), config.save_transcript);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let outbound = spawn_backend(backend, tx.clone());

    let mut needs_redraw = true; // Force first frame

    loop {
        // Only draw when something changed
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Poll briefly so backend pushes surface without keyboard activity
        let first_event = poll_event_timeout(std::time::Duration::from_millis(250));

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits regardless of focus
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                continue;
            }

            // Tab cycles focus; leaving the editor syncs its draft
            if matches!(event, TuiEvent::FocusNext) {
                if let Some(action) = tui.advance_focus() {
                    let effect = update(&mut app, action);
                    dispatch_effect(&mut tui, &mut app, effect, &outbound);
                }
                continue;
            }

            // Esc blurs whatever holds focus
            if matches!(event, TuiEvent::Escape) {
                if let Some(action) = tui.blur_focused() {
                    let effect = update(&mut app, action);
                    dispatch_effect(&mut tui, &mut app, effect, &outbound);
                }
                continue;
            }

            // Page scrolling always reaches the traffic log
            if matches!(event, TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown) {
                tui.message_log.handle_event(&event);
                continue;
            }

            // Modal dispatch on focus
            match tui.focus {
                Focus::Editor => {
                    if let Some(input_event) = tui.text_input.handle_event(&event) {
                        match input_event {
                            TextInputEvent::Submitted(text) => {
                                let effect = update(&mut app, Action::EditorSubmitted(text));
                                dispatch_effect(&mut tui, &mut app, effect, &outbound);
                            }
                            TextInputEvent::Edited => {}
                        }
                    }
                }
                Focus::Button => match event {
                    TuiEvent::Enter | TuiEvent::InputChar(' ') => {
                        if tui.send_button.handle_event(&event).is_some() {
                            let effect = update(&mut app, Action::SendPressed);
                            dispatch_effect(&mut tui, &mut app, effect, &outbound);
                        }
                    }
                    // Typing hops back into the editor and forwards the event
                    TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                        tui.send_button.release_keyboard_focus();
                        if tui.text_input.grab_keyboard_focus() {
                            tui.focus = Focus::Editor;
                            tui.text_input.handle_event(&event);
                        }
                    }
                    _ => {}
                },
                Focus::Browse => match event {
                    TuiEvent::CursorUp | TuiEvent::CursorDown => {
                        tui.message_log.handle_event(&event);
                    }
                    // Typing auto-switches to the editor and forwards the event
                    TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                        if tui.text_input.grab_keyboard_focus() {
                            tui.focus = Focus::Editor;
                            tui.text_input.handle_event(&event);
                        }
                    }
                    TuiEvent::Enter => {
                        if tui.text_input.grab_keyboard_focus() {
                            tui.focus = Focus::Editor;
                        }
                    }
                    _ => {}
                },
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (backend pushes, closures)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            dispatch_effect(&mut tui, &mut app, effect, &outbound);
        }
    }

    // Save the wire traffic on exit when enabled
    if app.save_transcript {
        transcript::save_current(&app.transcript);
    }

    ratatui::restore();
    Ok(())
}
