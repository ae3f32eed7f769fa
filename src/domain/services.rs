//! Book discovery services.
//!
//! This module provides the retry loop that keeps generating candidate
//! identifiers and looking them up until one resolves to a real book.
//! Per-candidate failures are values, not errors: each attempt yields an
//! [`Attempt`] and the loop decides from it whether to stop or retry.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use super::cancel::CancelToken;
use super::errors::{DiscoveryError, LookupError};
use super::isbn::{Isbn13, IsbnGenerator};
use super::models::{Book, VolumeMetadata};

/// Default pause between failed attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A metadata service that can resolve an identifier to a volume.
///
/// `Ok(None)` means the service answered but knows no such book.
pub trait BookLookup {
    fn lookup(&self, isbn: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError>;
}

impl<L: BookLookup + ?Sized> BookLookup for &L {
    fn lookup(&self, isbn: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
        (**self).lookup(isbn)
    }
}

impl<L: BookLookup + ?Sized> BookLookup for std::sync::Arc<L> {
    fn lookup(&self, isbn: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
        (**self).lookup(isbn)
    }
}

/// Pacing and bounds of the discovery loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed wait after each failed attempt
    pub delay: Duration,
    /// Give up after this many attempts; `None` retries until cancelled
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_RETRY_DELAY,
            max_attempts: None,
        }
    }
}

/// Why a candidate did not produce a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// The service answered with no matching volume
    NotFound,
    /// The lookup itself failed
    Failed(LookupError),
}

/// Outcome of looking up a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Found(Book),
    Retry(RetryReason),
}

/// The generate, look up, validate loop.
///
/// # Examples
///
/// ```
/// use bookswipe::domain::{
///     BookDiscovery, BookLookup, CancelToken, Isbn13, IsbnGenerator, LookupError,
///     RetryPolicy, VolumeMetadata,
/// };
///
/// struct Always;
///
/// impl BookLookup for Always {
///     fn lookup(&self, _: &Isbn13) -> Result<Option<VolumeMetadata>, LookupError> {
///         Ok(Some(VolumeMetadata::default()))
///     }
/// }
///
/// let discovery = BookDiscovery::new(Always, IsbnGenerator::default(), RetryPolicy::default());
/// let book = discovery
///     .discover(&mut rand::rng(), &CancelToken::new(), |_, _| {})
///     .unwrap();
/// assert!(book.id.starts_with("978409"));
/// ```
#[derive(Debug, Clone)]
pub struct BookDiscovery<L> {
    lookup: L,
    generator: IsbnGenerator,
    policy: RetryPolicy,
}

impl<L: BookLookup> BookDiscovery<L> {
    pub fn new(lookup: L, generator: IsbnGenerator, policy: RetryPolicy) -> Self {
        Self {
            lookup,
            generator,
            policy,
        }
    }

    /// Looks up a single candidate and classifies the answer.
    ///
    /// The first returned volume is mapped into a [`Book`] whose id is the
    /// candidate identifier.
    pub fn attempt(&self, isbn: &Isbn13) -> Attempt {
        match self.lookup.lookup(isbn) {
            Ok(Some(metadata)) => Attempt::Found(Book::from_metadata(isbn.as_str(), &metadata)),
            Ok(None) => Attempt::Retry(RetryReason::NotFound),
            Err(err) => Attempt::Retry(RetryReason::Failed(err)),
        }
    }

    /// Runs attempts until a book is found, the token is cancelled, or the
    /// attempt ceiling is reached.
    ///
    /// The token is checked before every attempt and the inter-attempt delay
    /// is interrupted by cancellation. `on_attempt` is called with the
    /// 1-based attempt number and candidate before each lookup.
    ///
    /// # Errors
    ///
    /// * [`DiscoveryError::Cancelled`] if `cancel` fired
    /// * [`DiscoveryError::Exhausted`] if `max_attempts` candidates all failed
    pub fn discover<R, F>(
        &self,
        rng: &mut R,
        cancel: &CancelToken,
        mut on_attempt: F,
    ) -> Result<Book, DiscoveryError>
    where
        R: Rng,
        F: FnMut(u32, &Isbn13),
    {
        let mut attempts = 0u32;
        loop {
            if cancel.is_cancelled() {
                debug!(attempts, "discovery cancelled");
                return Err(DiscoveryError::Cancelled);
            }
            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                warn!(attempts, "giving up on discovery");
                return Err(DiscoveryError::Exhausted { attempts });
            }

            attempts += 1;
            let isbn = self.generator.generate(rng);
            on_attempt(attempts, &isbn);

            match self.attempt(&isbn) {
                Attempt::Found(book) => {
                    info!(%isbn, attempts, title = %book.title, "book found");
                    return Ok(book);
                }
                Attempt::Retry(RetryReason::NotFound) => {
                    debug!(%isbn, attempts, "no volume for candidate");
                }
                Attempt::Retry(RetryReason::Failed(err)) => {
                    warn!(%isbn, attempts, error = %err, "lookup failed");
                }
            }

            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                warn!(attempts, "giving up on discovery");
                return Err(DiscoveryError::Exhausted { attempts });
            }
            if cancel.sleep(self.policy.delay) {
                debug!(attempts, "discovery cancelled during retry delay");
                return Err(DiscoveryError::Cancelled);
            }
        }
    }
}
