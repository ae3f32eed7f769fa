use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),
    #[error("Invalid ISBN prefix: {0} (expected 6 digits)")]
    InvalidPrefix(String),
}

/// Failure of a single lookup against the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Lookup service returned HTTP {0}")]
    Status(u16),
    #[error("Unreadable lookup response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("Book search was cancelled")]
    Cancelled,
    #[error("No book found after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

pub type DomainResult<T> = Result<T, DomainError>;
