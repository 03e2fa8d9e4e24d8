//! SQLite-backed persistence for application records, sessions, and
//! farmer profiles.

mod db;
mod models;
mod queries;

pub use db::Database;
pub use models::{ApplicationRow, FileRow, ProfileRow, SessionRow};
