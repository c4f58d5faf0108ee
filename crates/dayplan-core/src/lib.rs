//! # Dayplan Core
//!
//! Core library for Dayplan - a daily todo list organized into named
//! templates, synchronized against a remote authority when signed in and
//! a local snapshot file otherwise.
//!
//! This crate provides the domain model, the persistence strategies, and
//! the synchronization store independent of any presentation layer.
//!
//! ## Architecture
//!
//! - **model**: templates, todos, and patch types
//! - **backend**: persistence strategies (remote HTTP authority, local
//!   JSON snapshot)
//! - **store**: the synchronization store and date rollover
//! - **session**: authentication state and backend selection

pub mod backend;
pub mod error;
mod fs;
pub mod model;
pub mod session;
pub mod store;

pub use error::{DayplanError, Result};
pub use model::{Template, Todo, TodoPatch, DEFAULT_TEMPLATE_NAME};
pub use session::Session;
pub use store::{DateRollover, SyncStore, DATE_ROLLOVER_PERIOD};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
