//! # TextInput Component
//!
//! The form's text widget: an [`InputBox`](super::input_box::InputBox)
//! editor wrapped with component state, shared layout props, and the
//! diff/event contract the backend speaks.
//!
//! ## Two kinds of text
//!
//! - `text` is the committed state: the last value a backend diff set
//!   or a submit captured. This is what the rest of the form considers
//!   the widget's value.
//! - `input.buffer` is the live text: whatever the user has typed since.
//!
//! They deliberately drift apart while the user edits and reconverge at
//! two points only. Losing focus sets state from the live text and
//! syncs it to the backend (`release_keyboard_focus`). The submit chord
//! does the same and additionally reports a `Submitted` event. After
//! either one the committed text, the live buffer, and the last message
//! sent upstream all agree.
//!
//! ## Diff handling
//!
//! `update_element` consumes a [`TextInputDiff`]: a flat partial record
//! where an absent field means "leave it alone". Shared layout props
//! apply before the widget's own fields. A `text` field overwrites the
//! live buffer too; the user's draft loses to the backend.

use ratatui::Frame;
use ratatui::layout::Rect;
use serde::Deserialize;

use crate::core::common::{CommonDiff, CommonProps, LatentComponents};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use super::input_box::InputBox;

/// Partial state update for a [`TextInput`]. Every field is optional;
/// absent means unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextInputDiff {
    pub text: Option<String>,
    pub label: Option<String>,
    pub is_sensitive: Option<bool>,
    pub is_valid: Option<bool>,
    #[serde(flatten)]
    pub common: CommonDiff,
}

/// Events reported to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum TextInputEvent {
    /// The live buffer changed. State is NOT updated yet.
    Edited,
    /// The submit chord fired; carries the text captured into state.
    Submitted(String),
}

pub struct TextInput {
    /// Committed text state.
    text: String,
    /// Shared layout props.
    pub common: CommonProps,
    /// The wrapped editor control.
    pub input: InputBox,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            common: CommonProps::default(),
            input: InputBox::new(),
        }
    }

    /// The committed text state.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The live buffer (what the user sees right now).
    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn has_focus(&self) -> bool {
        self.input.focused
    }

    pub fn is_sensitive(&self) -> bool {
        self.input.is_sensitive
    }

    /// Applies the present fields of `diff`. Shared props go first so
    /// layout bookkeeping is settled before the widget's own fields.
    pub fn update_element(&mut self, diff: &TextInputDiff, latent: &mut LatentComponents) {
        self.common.apply(&diff.common, latent);

        if let Some(text) = &diff.text {
            self.text = text.clone();
            self.input.set_value(text);
        }
        if let Some(label) = &diff.label {
            self.input.label = label.clone();
        }
        if let Some(sensitive) = diff.is_sensitive {
            self.input.is_sensitive = sensitive;
            if !sensitive {
                // The backend withdrew interactivity. Dropping focus
                // directly, without the blur path, because this change
                // came from the backend; there is nothing to sync back.
                self.input.release_focus();
            }
        }
        if let Some(valid) = diff.is_valid {
            self.input.is_valid = valid;
        }
    }

    /// Hands keyboard focus to the wrapped editor. Refused while
    /// insensitive.
    pub fn grab_keyboard_focus(&mut self) -> bool {
        self.input.grab_focus()
    }

    /// Blur: reads the live text, sets state from it, and returns the
    /// value so the caller can notify the backend. `None` when the
    /// control did not hold focus, in which case there is nothing to
    /// sync.
    pub fn release_keyboard_focus(&mut self) -> Option<String> {
        if !self.input.focused {
            return None;
        }
        self.input.release_focus();
        self.text = self.input.value().to_string();
        Some(self.text.clone())
    }

    /// Height this widget wants for the given width, honoring the
    /// shared `min_height`.
    pub fn desired_height(&self, content_width: u16) -> u16 {
        self.input
            .calculate_height(content_width)
            .max(self.common.min_height)
    }
}

impl Component for TextInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.input.render(frame, area);
    }
}

impl EventHandler for TextInput {
    type Event = TextInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.input.is_sensitive {
            return None;
        }

        if *event == TuiEvent::ShiftEnter {
            // Submit chord. Capturing the live text into state here and
            // consuming the event is what keeps the newline out of the
            // buffer: the editor below never sees the keypress.
            self.text = self.input.value().to_string();
            return Some(TextInputEvent::Submitted(self.text.clone()));
        }

        self.input
            .handle_event(event)
            .map(|_| TextInputEvent::Edited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diff::decode;
    use crate::protocol::ComponentId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn type_str(widget: &mut TextInput, text: &str) {
        for c in text.chars() {
            widget.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_text_input_new() {
        let widget = TextInput::new();
        assert_eq!(widget.text(), "");
        assert_eq!(widget.value(), "");
        assert!(!widget.has_focus());
        assert!(widget.is_sensitive());
    }

    #[test]
    fn test_diff_decodes_from_flat_record() {
        let diff: TextInputDiff = decode(
            ComponentId(1),
            json!({ "text": "hi", "label": "Message", "min_height": 3 }),
        )
        .expect("decode");
        assert_eq!(diff.text.as_deref(), Some("hi"));
        assert_eq!(diff.label.as_deref(), Some("Message"));
        assert_eq!(diff.common.min_height, Some(3));
        assert_eq!(diff.is_valid, None);
    }

    #[test]
    fn test_malformed_diff_rejected() {
        let err = decode::<TextInputDiff>(ComponentId(1), json!({ "text": 5 }))
            .expect_err("wrong type must fail");
        assert!(err.to_string().contains("malformed diff"));
    }

    #[test]
    fn test_update_element_applies_only_present_fields() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();

        widget.update_element(
            &TextInputDiff {
                label: Some("Message".to_string()),
                is_valid: Some(true),
                ..Default::default()
            },
            &mut latent,
        );
        widget.update_element(
            &TextInputDiff {
                is_valid: Some(false),
                ..Default::default()
            },
            &mut latent,
        );

        // The second diff said nothing about the label.
        assert_eq!(widget.input.label, "Message");
        assert!(!widget.input.is_valid);
    }

    #[test]
    fn test_update_element_handles_shared_and_own_fields() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();

        widget.update_element(
            &TextInputDiff {
                text: Some("hello".to_string()),
                common: CommonDiff {
                    min_height: Some(5),
                    ..Default::default()
                },
                ..Default::default()
            },
            &mut latent,
        );

        assert_eq!(widget.text(), "hello");
        assert_eq!(widget.value(), "hello");
        assert_eq!(widget.common.min_height, 5);
    }

    #[test]
    fn test_update_element_leaves_latent_untouched() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::from([ComponentId(9)]);

        widget.update_element(
            &TextInputDiff {
                text: Some("x".to_string()),
                ..Default::default()
            },
            &mut latent,
        );

        assert_eq!(latent.len(), 1);
        assert!(latent.contains(&ComponentId(9)));
    }

    #[test]
    fn test_update_element_text_overwrites_draft() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();
        widget.grab_keyboard_focus();
        type_str(&mut widget, "my draft");

        widget.update_element(
            &TextInputDiff {
                text: Some("server text".to_string()),
                ..Default::default()
            },
            &mut latent,
        );

        assert_eq!(widget.value(), "server text");
        assert_eq!(widget.text(), "server text");
    }

    #[test]
    fn test_insensitive_diff_drops_focus_without_sync() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();
        assert!(widget.grab_keyboard_focus());

        widget.update_element(
            &TextInputDiff {
                is_sensitive: Some(false),
                ..Default::default()
            },
            &mut latent,
        );

        assert!(!widget.has_focus());
        // Focus is already gone, so a later blur has nothing to report.
        assert_eq!(widget.release_keyboard_focus(), None);
        // And focus cannot be grabbed back while insensitive.
        assert!(!widget.grab_keyboard_focus());
    }

    #[test]
    fn test_typing_edits_live_text_only() {
        let mut widget = TextInput::new();
        widget.grab_keyboard_focus();

        let res = widget.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(TextInputEvent::Edited));
        assert_eq!(widget.value(), "a");
        // Committed state waits for a blur or a submit.
        assert_eq!(widget.text(), "");
    }

    #[test]
    fn test_blur_sets_state_and_reports_text() {
        let mut widget = TextInput::new();
        widget.grab_keyboard_focus();
        type_str(&mut widget, "draft");

        assert_eq!(widget.release_keyboard_focus(), Some("draft".to_string()));
        assert_eq!(widget.text(), "draft");
        assert!(!widget.has_focus());

        // No focus, no second sync.
        assert_eq!(widget.release_keyboard_focus(), None);
    }

    #[test]
    fn test_submit_chord_captures_current_text() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();
        widget.update_element(
            &TextInputDiff {
                text: Some("hello".to_string()),
                ..Default::default()
            },
            &mut latent,
        );
        widget.grab_keyboard_focus();
        type_str(&mut widget, "!");

        let res = widget.handle_event(&TuiEvent::ShiftEnter);
        assert_eq!(res, Some(TextInputEvent::Submitted("hello!".to_string())));
        assert_eq!(widget.text(), "hello!");
        // The chord never reaches the editor, so no newline appears.
        assert_eq!(widget.value(), "hello!");
    }

    #[test]
    fn test_plain_enter_inserts_newline_without_submitting() {
        let mut widget = TextInput::new();
        widget.grab_keyboard_focus();
        type_str(&mut widget, "hello");

        let res = widget.handle_event(&TuiEvent::Enter);
        assert_eq!(res, Some(TextInputEvent::Edited));
        assert_eq!(widget.value(), "hello\n");
        assert_eq!(widget.text(), "");
    }

    #[test]
    fn test_insensitive_ignores_submit_chord() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();
        widget.update_element(
            &TextInputDiff {
                is_sensitive: Some(false),
                ..Default::default()
            },
            &mut latent,
        );

        assert_eq!(widget.handle_event(&TuiEvent::ShiftEnter), None);
        assert_eq!(widget.handle_event(&TuiEvent::InputChar('x')), None);
    }

    #[test]
    fn test_desired_height_honors_min_height() {
        let mut widget = TextInput::new();
        // One line of content plus borders.
        assert_eq!(widget.desired_height(40), 3);

        widget.common.min_height = 7;
        assert_eq!(widget.desired_height(40), 7);
    }

    #[test]
    fn test_render_shows_label_from_diff() {
        let mut widget = TextInput::new();
        let mut latent = LatentComponents::new();
        widget.update_element(
            &TextInputDiff {
                label: Some("Feedback".to_string()),
                ..Default::default()
            },
            &mut latent,
        );

        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| widget.render(f, f.area()))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Feedback"));
    }
}
