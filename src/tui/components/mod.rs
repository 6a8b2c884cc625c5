//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Top status bar showing backend name and status
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Multi-line editor with cursor and internal scrolling
//! - `TextInput`: The form widget wrapping `InputBox` with committed
//!   state and the backend diff/event contract
//! - `IconButton`: Focusable button decorated by the backend
//! - `MessageLog`: Scrollable view of the wire traffic
//!
//! Each component file contains everything related to that component:
//! state types, diff types, event types, rendering and tests. Reading
//! one file tells you how that component works.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── text_input.rs    (Text widget: state + diffs + events)
//! ├── icon_button.rs   (Send button)
//! ├── message_log.rs   (Wire traffic view)
//! └── input_box/       (The editor control TextInput wraps)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod text_input;
pub use text_input::{TextInput, TextInputDiff, TextInputEvent};
pub mod icon_button;
pub use icon_button::{ButtonEvent, ButtonStyle, IconButton, IconButtonDiff};
pub mod message_log;
pub use message_log::{MessageLog, MessageLogState};
