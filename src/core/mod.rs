//! # Core Application Logic
//!
//! This module contains Ross's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (form data)    │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • execute() (request)  │
//!                    │  • format_response()    │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │  One-shot  │
//!             │  Adapter   │          │    CLI     │
//!             │ (ratatui)  │          │ (main.rs)  │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all form state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`controller`]: One request lifecycle, from token lookup to `Outcome`
//! - [`format`]: Response text → safe inline tree
//! - [`credentials`]: Bearer token storage
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod format;
pub mod state;
