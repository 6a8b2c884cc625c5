//! # TitleBar Component
//!
//! Top status bar showing the backend in use and the latest status.
//!
//! ## Responsibilities
//!
//! - Display the backend name
//! - Display status messages (e.g., "Waiting for backend...", "Message submitted")
//! - Show an "offline" marker while no backend traffic has been seen
//!
//! TitleBar is purely presentational. It receives all data as props and
//! has no internal state, so a test can construct one from literals and
//! assert on the rendered text.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component.
///
/// # Props
///
/// - `backend_name`: Which backend serves this run (e.g., "local")
/// - `status_message`: Transient status from the app state
/// - `connected`: Whether backend traffic has been seen yet
pub struct TitleBar {
    pub backend_name: String,
    pub status_message: String,
    pub connected: bool,
}

impl TitleBar {
    pub fn new(backend_name: String, status_message: String, connected: bool) -> Self {
        Self {
            backend_name,
            status_message,
            connected,
        }
    }
}

impl Component for TitleBar {
    /// Render the title bar as a single line.
    ///
    /// The bar always leads with the backend name; the status and the
    /// offline marker append after it when present.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if !self.connected {
            format!(
                "Tether (backend: {}) | {} | offline",
                self.backend_name, self.status_message
            )
        } else if self.status_message.is_empty() {
            format!("Tether (backend: {})", self.backend_name)
        } else {
            format!(
                "Tether (backend: {}) | {}",
                self.backend_name, self.status_message
            )
        };

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_new() {
        let title_bar = TitleBar::new("local".to_string(), "Waiting...".to_string(), false);

        assert_eq!(title_bar.backend_name, "local");
        assert_eq!(title_bar.status_message, "Waiting...");
        assert!(!title_bar.connected);
    }

    #[test]
    fn test_offline_marker_before_first_traffic() {
        let mut title_bar = TitleBar::new(
            "local".to_string(),
            "Waiting for backend...".to_string(),
            false,
        );

        let text = rendered_text(&mut title_bar);
        assert!(text.contains("Tether (backend: local)"));
        assert!(text.contains("Waiting for backend..."));
        assert!(text.contains("offline"));
    }

    #[test]
    fn test_connected_shows_status_without_marker() {
        let mut title_bar = TitleBar::new(
            "local".to_string(),
            "Message submitted".to_string(),
            true,
        );

        let text = rendered_text(&mut title_bar);
        assert!(text.contains("Tether (backend: local) | Message submitted"));
        assert!(!text.contains("offline"));
    }

    #[test]
    fn test_empty_status_renders_bare_title() {
        let mut title_bar = TitleBar::new("local".to_string(), String::new(), true);

        let text = rendered_text(&mut title_bar);
        assert!(text.contains("Tether (backend: local)"));
        assert!(!text.contains('|'));
    }
}
