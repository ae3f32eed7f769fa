//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP lookup client, environment configuration,
//! log setup, and file export.

pub mod config;
pub mod google_books;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use google_books::*;
pub use logging::*;
pub use persistence::*;
