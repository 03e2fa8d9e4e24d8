//! TUI application state.

mod state;

pub use state::{
    App, ChatMessage, ChatState, DashboardMode, FormField, FormState, Screen,
};
