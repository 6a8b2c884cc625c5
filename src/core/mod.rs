//! # Core Application Logic
//!
//! This module contains tether's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Props + diffs        │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    Web     │      │  Backends  │
//!     │  Adapter   │      │  Adapter   │      │ (channel)  │
//!     │ (ratatui)  │      │  (future)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`action`]: The `Action` enum — everything that can happen in the app
//! - [`common`]: Layout props every form component shares
//! - [`diff`]: Typed decoding of incoming state-diff batches
//! - [`config`]: Layered settings from `~/.tether/config.toml`
//! - [`transcript`]: Wire-traffic persistence

pub mod action;
pub mod common;
pub mod config;
pub mod diff;
pub mod state;
pub mod transcript;
