pub mod cancel;
pub mod errors;
pub mod isbn;
pub mod models;
pub mod services;
pub mod store;

pub use cancel::*;
pub use errors::*;
pub use isbn::*;
pub use models::*;
pub use services::*;
pub use store::*;
