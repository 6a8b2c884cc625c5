//! # InputBox Component
//!
//! The multi-line editor control that [`TextInput`](super::text_input)
//! wraps. It owns the live buffer (what the user sees and edits) and the
//! cursor, and renders the label, sensitivity, and validity decoration.
//!
//! ## Responsibilities
//!
//! - Capture typed text, paste, and deletions
//! - Cursor movement by character, word, line, and wrapped row
//! - Internal scrolling once content exceeds the visible lines
//! - Refuse all input while insensitive
//!
//! Submission is deliberately NOT handled here: Enter inserts a newline
//! like any other character, and the submit chord belongs to the wrapping
//! widget. The buffer is the terminal analog of a DOM input's `value` —
//! the wrapper decides when that value becomes component state.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, next_word_boundary,
    prev_char_boundary, prev_word_boundary, wrap_line_count, wrap_options,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Buffer or cursor changed
    ContentChanged,
}

/// Multi-line editor control.
///
/// # Props
///
/// - `label`: Block title shown above the text
/// - `is_sensitive`: Whether the control accepts input and focus
/// - `is_valid`: Whether the current value passes backend validation
///
/// # State
///
/// - `buffer`: The live text (what the user is editing right now)
/// - `focused`: Whether this control holds keyboard focus
/// - `cursor`: Cursor position, scroll offset, and cached width
pub struct InputBox {
    /// Live text buffer (Internal State)
    pub buffer: String,
    /// Floating label (Prop)
    pub label: String,
    /// Accepts input and focus when true (Prop)
    pub is_sensitive: bool,
    /// Styled as an error when false (Prop)
    pub is_valid: bool,
    /// Whether the control holds keyboard focus
    pub focused: bool,
    /// Cursor and scroll tracking
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            label: String::new(),
            is_sensitive: true,
            is_valid: true,
            focused: false,
            cursor: CursorState::new(),
        }
    }

    /// The live buffer contents.
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer wholesale and park the cursor at the end.
    /// Used when a state diff overwrites the text out from under the user.
    pub fn set_value(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
        self.cursor.move_to_end(&self.buffer);
    }

    /// Take keyboard focus. Insensitive controls refuse it.
    pub fn grab_focus(&mut self) -> bool {
        if !self.is_sensitive {
            return false;
        }
        self.focused = true;
        true
    }

    /// Drop keyboard focus.
    pub fn release_focus(&mut self) {
        self.focused = false;
    }

    /// Required height for current buffer content, clamped to viewport limits.
    /// Returns a value in [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        let content_lines = wrap_line_count(&self.buffer, width);
        let visible_lines = content_lines.min(MAX_VISIBLE_LINES);
        visible_lines + VERTICAL_OVERHEAD
    }

    /// Visible text for the current scroll offset.
    /// When scroll_offset > 0, only returns the visible lines.
    fn get_visible_text(&self, content_width: u16) -> String {
        if self.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));

        let start = self.cursor.scroll_offset as usize;
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());

        lines[start..end].join("\n")
    }

    /// Render scrollbar when content exceeds visible area
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let width = inner_width(area.width);
        let total_lines = wrap_line_count(&self.buffer, width);

        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    /// Border and title styling from the sensitivity/validity/focus props.
    fn frame_style(&self) -> Style {
        if !self.is_sensitive {
            return Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM);
        }

        let mut style = if !self.is_valid {
            Style::default().fg(Color::Red)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        if !self.focused {
            style = style.add_modifier(Modifier::DIM);
        }

        style
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let visible_text = self.get_visible_text(area.width);
        let frame_style = self.frame_style();

        let mut block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(frame_style)
            .title_style(frame_style);
        if !self.label.is_empty() {
            block = block.title(self.label.as_str());
        }

        let text_style = if self.is_sensitive {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let input = Paragraph::new(visible_text).block(block).style(text_style);

        frame.render_widget(input, area);
        self.render_scrollbar(frame, area);

        if self.focused && self.is_sensitive {
            let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    /// Editing events. Focus routing is the run loop's job; the only
    /// guard here is sensitivity, which is a property of the control.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.is_sensitive {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            // Enter is just a newline here; submission belongs to the wrapper
            TuiEvent::Enter => {
                self.buffer.insert(self.cursor.pos, '\n');
                self.cursor.pos += 1;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor.pos, text);
                self.cursor.pos += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::WordLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_word_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::WordRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_word_boundary(&self.buffer, self.cursor.pos);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            _ => None,
        }
    }
}
