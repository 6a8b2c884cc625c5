//! # IconButton Component
//!
//! A focusable button the backend decorates with an icon name and a
//! visual style. The backend names an icon; the terminal face is just
//! the name, centered in a bordered box.
//!
//! Buttons carry no text state, so focus comes and goes without any
//! syncing. The only event is `Pressed`, reported when Enter or Space
//! lands on a focused, sensitive button.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use serde::Deserialize;

use crate::core::common::{CommonDiff, CommonProps, LatentComponents};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    /// Filled, for the form's primary action.
    #[default]
    Major,
    /// Outlined.
    Minor,
    /// Bare text.
    Plain,
}

/// Partial state update for an [`IconButton`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IconButtonDiff {
    pub icon: Option<String>,
    pub style: Option<ButtonStyle>,
    pub is_sensitive: Option<bool>,
    #[serde(flatten)]
    pub common: CommonDiff,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonEvent {
    Pressed,
}

pub struct IconButton {
    pub icon: String,
    pub style: ButtonStyle,
    pub is_sensitive: bool,
    pub focused: bool,
    pub common: CommonProps,
}

impl Default for IconButton {
    fn default() -> Self {
        Self::new()
    }
}

impl IconButton {
    pub fn new() -> Self {
        Self {
            icon: String::new(),
            style: ButtonStyle::default(),
            is_sensitive: true,
            focused: false,
            common: CommonProps::default(),
        }
    }

    /// Applies the present fields of `diff`, shared props first.
    pub fn update_element(&mut self, diff: &IconButtonDiff, latent: &mut LatentComponents) {
        self.common.apply(&diff.common, latent);

        if let Some(icon) = &diff.icon {
            self.icon = icon.clone();
        }
        if let Some(style) = diff.style {
            self.style = style;
        }
        if let Some(sensitive) = diff.is_sensitive {
            self.is_sensitive = sensitive;
            if !sensitive {
                self.focused = false;
            }
        }
    }

    pub fn grab_keyboard_focus(&mut self) -> bool {
        if !self.is_sensitive {
            return false;
        }
        self.focused = true;
        true
    }

    /// No state to sync; focus just goes away.
    pub fn release_keyboard_focus(&mut self) {
        self.focused = false;
    }

    /// Icon width plus borders and one cell of padding per side,
    /// honoring the shared `min_width`.
    pub fn desired_width(&self) -> u16 {
        let face = unicode_width::UnicodeWidthStr::width(self.icon.as_str()) as u16;
        (face + 4).max(self.common.min_width)
    }

    /// One line of face plus borders.
    pub fn desired_height(&self) -> u16 {
        3u16.max(self.common.min_height)
    }

    fn face_style(&self) -> Style {
        if !self.is_sensitive {
            return Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM);
        }
        match self.style {
            ButtonStyle::Major => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            ButtonStyle::Minor => Style::default().fg(Color::Cyan),
            ButtonStyle::Plain => Style::default(),
        }
    }

    fn border_style(&self) -> Style {
        if !self.is_sensitive {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }
}

impl Component for IconButton {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.border_style());

        let face = Paragraph::new(self.icon.as_str())
            .alignment(Alignment::Center)
            .style(self.face_style())
            .block(block);

        frame.render_widget(face, area);
    }
}

impl EventHandler for IconButton {
    type Event = ButtonEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.is_sensitive {
            return None;
        }
        match event {
            TuiEvent::Enter | TuiEvent::InputChar(' ') => Some(ButtonEvent::Pressed),
            _ => None,
        }
    }
}
