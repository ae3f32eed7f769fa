//! bookswipe - Terminal Book Discovery Library
//!
//! Finds random books by probing a book metadata service with generated
//! ISBN-13 candidates, and keeps the ones you like for the session.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
