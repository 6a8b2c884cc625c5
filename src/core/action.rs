//! # Actions
//!
//! Everything that can happen in tether becomes an `Action`.
//! Editor loses focus? That's `Action::EditorBlurred(text)`.
//! Backend pushes a diff batch? That's `Action::InboundReceived(msg)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O the
//! adapter layer must perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: apply an action, assert on the
//! state and the returned effect. And debuggable: log every action,
//! replay the exact run.

use std::collections::HashMap;

use serde_json::Value;

use crate::core::state::App;
use crate::protocol::{ComponentId, Inbound, Outbound, MESSAGE_INPUT_ID, SEND_BUTTON_ID};

/// Everything that can happen in the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The editor lost keyboard focus; carries the text it synced.
    EditorBlurred(String),
    /// The submit chord fired in the editor; carries the captured text.
    EditorSubmitted(String),
    /// The send button was pressed.
    SendPressed,
    /// A message arrived from the backend.
    InboundReceived(Inbound),
    /// An incoming batch failed to decode or addressed an unknown
    /// component; carries the reason.
    DiffRejected(String),
    /// The backend channel closed.
    BackendClosed,
}

/// I/O the adapter layer performs after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Deliver a message to the backend channel, fire and forget.
    Send(Outbound),
    /// Drive the batch into the form's widgets.
    ApplyDiffs(HashMap<ComponentId, Value>),
}

/// The reducer: applies `action` to `app` and names the follow-up I/O.
pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::EditorBlurred(text) => {
            let message = Outbound::text_sync(MESSAGE_INPUT_ID, &text);
            app.record_sent(&message);
            Effect::Send(message)
        }
        Action::EditorSubmitted(text) => {
            let message = Outbound::text_message(MESSAGE_INPUT_ID, &text);
            app.record_sent(&message);
            app.status_message = String::from("Message submitted");
            Effect::Send(message)
        }
        Action::SendPressed => {
            let message = Outbound::press_message(SEND_BUTTON_ID);
            app.record_sent(&message);
            app.status_message = String::from("Send pressed");
            Effect::Send(message)
        }
        Action::InboundReceived(message) => {
            app.record_received(&message);
            if !app.connected {
                app.connected = true;
                app.status_message = format!("Connected to {}", app.backend_name);
            }
            // A fresh batch supersedes any displayed rejection; if this
            // one is bad too, DiffRejected will put the error back.
            app.error = None;
            let Inbound::UpdateComponentStates { delta_states } = message;
            Effect::ApplyDiffs(delta_states)
        }
        Action::DiffRejected(reason) => {
            app.status_message = format!("Rejected incoming batch: {reason}");
            app.error = Some(reason);
            Effect::None
        }
        Action::BackendClosed => {
            app.connected = false;
            app.status_message = String::from("Backend disconnected");
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use serde_json::json;

    #[test]
    fn test_editor_blurred_sends_state_sync() {
        let mut app = test_app();
        let effect = update(&mut app, Action::EditorBlurred("draft".to_string()));
        assert_eq!(
            effect,
            Effect::Send(Outbound::text_sync(MESSAGE_INPUT_ID, "draft"))
        );
        assert_eq!(app.sent_count, 1);
        assert_eq!(app.transcript.entries.len(), 1);
    }

    #[test]
    fn test_editor_submitted_sends_component_message() {
        let mut app = test_app();
        let effect = update(&mut app, Action::EditorSubmitted("hello!".to_string()));
        assert_eq!(
            effect,
            Effect::Send(Outbound::text_message(MESSAGE_INPUT_ID, "hello!"))
        );
        assert_eq!(app.status_message, "Message submitted");
        assert_eq!(app.sent_count, 1);
    }

    #[test]
    fn test_send_pressed_sends_press_message() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SendPressed);
        assert_eq!(effect, Effect::Send(Outbound::press_message(SEND_BUTTON_ID)));
    }

    #[test]
    fn test_inbound_hands_batch_to_adapter() {
        let mut app = test_app();
        let batch = Inbound::single_delta(MESSAGE_INPUT_ID, json!({ "text": "hi" }));
        let effect = update(&mut app, Action::InboundReceived(batch));
        match effect {
            Effect::ApplyDiffs(delta_states) => {
                assert_eq!(delta_states.len(), 1);
                assert_eq!(
                    delta_states.get(&MESSAGE_INPUT_ID),
                    Some(&json!({ "text": "hi" }))
                );
            }
            other => panic!("Expected ApplyDiffs, got {:?}", other),
        }
        assert!(app.connected);
        assert_eq!(app.received_count, 1);
        assert_eq!(app.status_message, "Connected to test-backend");
    }

    #[test]
    fn test_second_inbound_keeps_status() {
        let mut app = test_app();
        let batch = Inbound::single_delta(MESSAGE_INPUT_ID, json!({ "is_valid": true }));
        update(&mut app, Action::InboundReceived(batch.clone()));
        app.status_message = String::from("Message submitted");
        update(&mut app, Action::InboundReceived(batch));
        // Connection status is only announced once.
        assert_eq!(app.status_message, "Message submitted");
        assert_eq!(app.received_count, 2);
    }

    #[test]
    fn test_inbound_clears_previous_rejection() {
        let mut app = test_app();
        app.error = Some("malformed diff for component #1".to_string());
        let batch = Inbound::single_delta(MESSAGE_INPUT_ID, json!({ "text": "" }));
        update(&mut app, Action::InboundReceived(batch));
        assert_eq!(app.error, None);
    }

    #[test]
    fn test_diff_rejected_surfaces_error() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::DiffRejected("malformed diff for component #1".to_string()),
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(
            app.error.as_deref(),
            Some("malformed diff for component #1")
        );
        assert!(app.status_message.contains("Rejected"));
    }

    #[test]
    fn test_backend_closed_disconnects() {
        let mut app = test_app();
        app.connected = true;
        let effect = update(&mut app, Action::BackendClosed);
        assert_eq!(effect, Effect::None);
        assert!(!app.connected);
        assert_eq!(app.status_message, "Backend disconnected");
    }
}
