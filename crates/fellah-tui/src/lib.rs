//! Fellah TUI Library
//!
//! Terminal interface for the Fellah agricultural-financing demo: farmer
//! and banker dashboards, the scripted legal-advisor chat, and read-aloud.
//! Provides both TUI (ratatui) and headless modes.

pub mod app;
pub mod headless;
pub mod input;
pub mod services;
pub mod ui;
