//! TUI rendering components.

mod chat_panel;
mod render;

pub use render::{centered_rect, draw};
