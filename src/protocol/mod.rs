//! Wire messages exchanged between the client and the backend.
//!
//! The backend pushes partial component-state diffs down; the client
//! sends state syncs and component messages up. Both directions are
//! serde types with a `type` tag so either end can be swapped for a
//! different transport without touching the widgets.

pub mod messages;

pub use messages::{ComponentId, Inbound, Outbound};

/// The demo form is a static component tree, so its ids are fixed
/// constants shared by the client and the backend.
pub const MESSAGE_INPUT_ID: ComponentId = ComponentId(1);
pub const SEND_BUTTON_ID: ComponentId = ComponentId(2);
