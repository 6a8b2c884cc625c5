//! # MessageLog Component
//!
//! Scrollable view of the wire traffic: every message sent to or
//! pushed by the backend, one line each, in arrival order. Stays
//! pinned to the newest entry until the user scrolls away, and
//! re-pins when they scroll back to the bottom.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Scroll state for the traffic log. Lives across frames; the
/// transcript itself is borrowed fresh each render.
pub struct MessageLogState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content.
    pub stick_to_bottom: bool,
    /// Last known viewport height, recorded during render.
    pub viewport_height: u16,
    /// Last known content height, recorded during render.
    pub last_total_height: u16,
}

impl Default for MessageLogState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLogState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            last_total_height: 0,
        }
    }

    fn max_scroll_offset(&self) -> u16 {
        self.last_total_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Re-engage auto-scroll when a downward scroll reaches the bottom.
    fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_scroll_offset() {
            self.stick_to_bottom = true;
            self.clamp_scroll();
        }
    }
}

impl EventHandler for MessageLogState {
    // Scrolling is handled internally; nothing bubbles up.
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                Some(())
            }
            TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                Some(())
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                Some(())
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                Some(())
            }
            _ => None,
        }
    }
}

pub struct MessageLog<'a> {
    pub state: &'a mut MessageLogState,
    pub transcript: &'a Transcript,
}

impl MessageLog<'_> {
    fn entry_lines(&self) -> Vec<Line<'static>> {
        self.transcript
            .entries
            .iter()
            .map(|entry| {
                let arrow = if entry.is_sent() {
                    Span::styled("→ ", Style::default().fg(Color::Cyan))
                } else {
                    Span::styled("← ", Style::default().fg(Color::Green))
                };
                Line::from(vec![
                    Span::styled(
                        entry.at().format("%H:%M:%S ").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    arrow,
                    Span::raw(entry.describe()),
                ])
            })
            .collect()
    }
}

impl Component for MessageLog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        let lines = if self.transcript.entries.is_empty() {
            vec![Line::from(Span::styled(
                "No traffic yet. The backend decorates the form when it connects.",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            self.entry_lines()
        };

        // Every entry is a single clipped line, so content height is
        // just the line count.
        let total_height = lines.len() as u16;

        self.state.viewport_height = area.height;
        self.state.last_total_height = total_height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, total_height),
        );

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ComponentId, Inbound, Outbound};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn sample_transcript() -> Transcript {
        let mut t = Transcript::new("local");
        t.record_sent(&Outbound::text_sync(ComponentId(1), "draft"));
        t.record_received(&Inbound::single_delta(ComponentId(1), json!({ "text": "" })));
        t
    }

    #[test]
    fn test_scroll_up_releases_bottom_pin() {
        let mut state = MessageLogState::new();
        assert!(state.stick_to_bottom);

        state.handle_event(&TuiEvent::CursorUp);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_repins_at_bottom() {
        let mut state = MessageLogState::new();
        state.viewport_height = 4;
        state.last_total_height = 10;
        state.stick_to_bottom = false;
        state.scroll_state.set_offset(Position { x: 0, y: 5 });

        state.handle_event(&TuiEvent::CursorDown);
        // 6 is the last reachable offset for 10 lines in a 4-line view.
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_midway_stays_unpinned() {
        let mut state = MessageLogState::new();
        state.viewport_height = 4;
        state.last_total_height = 10;
        state.stick_to_bottom = false;
        state.scroll_state.set_offset(Position { x: 0, y: 1 });

        state.handle_event(&TuiEvent::CursorDown);
        assert!(!state.stick_to_bottom);
    }

    #[test]
    fn test_clamp_scroll_limits_offset() {
        let mut state = MessageLogState::new();
        state.viewport_height = 4;
        state.last_total_height = 10;
        state.scroll_state.set_offset(Position { x: 0, y: 50 });

        state.clamp_scroll();
        assert_eq!(state.scroll_state.offset().y, 6);
    }

    #[test]
    fn test_render_lists_traffic() {
        let backend = TestBackend::new(70, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        let transcript = sample_transcript();
        let mut state = MessageLogState::new();

        terminal
            .draw(|f| {
                let mut log = MessageLog {
                    state: &mut state,
                    transcript: &transcript,
                };
                log.render(f, f.area());
            })
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("state_update"));
        assert!(text.contains("update_component_states"));
        assert!(text.contains("→"));
        assert!(text.contains("←"));
    }

    #[test]
    fn test_render_empty_shows_hint() {
        let backend = TestBackend::new(70, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        let transcript = Transcript::new("local");
        let mut state = MessageLogState::new();

        terminal
            .draw(|f| {
                let mut log = MessageLog {
                    state: &mut state,
                    transcript: &transcript,
                };
                log.render(f, f.area());
            })
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("No traffic yet"));
    }
}
