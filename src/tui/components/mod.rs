//! # TUI Components
//!
//! All UI components for the terminal form.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: Top status bar showing endpoint and status
//! - `PromptChip`: Dismissible echo of the current prompt
//! - `LoginScreen`: Shown when the token is missing or rejected
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `TextField`: Prompt textarea and file path field
//! - `ResponsePanel`: Scrollable formatted response
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`, so dependencies stay explicit and testable.

pub mod login_screen;
pub mod prompt_chip;
pub mod response_panel;
pub mod text_field;
mod title_bar;

pub use login_screen::LoginScreen;
pub use prompt_chip::PromptChip;
pub use response_panel::{ResponsePanel, ResponsePanelState};
pub use text_field::{FieldEvent, TextField};
pub use title_bar::TitleBar;
