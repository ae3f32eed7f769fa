//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! owning the liked-books store and the background book search.

pub mod state;
pub mod worker;

pub use state::*;
pub use worker::*;
