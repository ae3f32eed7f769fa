//! ISBN-13 candidates: checksum arithmetic and random generation.

use std::fmt;

use rand::Rng;

use super::errors::{DomainError, DomainResult};

/// Namespace prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "978409";

const PREFIX_LEN: usize = 6;
const BODY_LEN: usize = 12;

/// Weighted sum over a digit string: even positions count once, odd positions three times.
///
/// Non-digit characters are rejected.
pub fn weighted_sum(digits: &str) -> DomainResult<u32> {
    digits
        .chars()
        .enumerate()
        .try_fold(0u32, |sum, (i, ch)| {
            let digit = ch
                .to_digit(10)
                .ok_or_else(|| DomainError::InvalidIsbn(digits.to_string()))?;
            Ok(sum + weight(i, digit))
        })
}

/// Check digit that brings the weighted sum of `digits` up to a multiple of ten.
pub fn check_digit(digits: &str) -> DomainResult<u8> {
    Ok(closing_digit(weighted_sum(digits)?))
}

fn weight(position: usize, digit: u32) -> u32 {
    if position % 2 == 0 { digit } else { digit * 3 }
}

fn closing_digit(sum: u32) -> u8 {
    ((10 - sum % 10) % 10) as u8
}

/// A structurally valid 13-digit book identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isbn13(String);

impl Isbn13 {
    /// Builds an identifier from its first 12 digits by appending the check digit.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookswipe::domain::Isbn13;
    ///
    /// let isbn = Isbn13::from_prefix("978409123456").unwrap();
    /// assert_eq!(isbn.as_str().len(), 13);
    /// ```
    pub fn from_prefix(body: &str) -> DomainResult<Self> {
        if body.len() != BODY_LEN {
            return Err(DomainError::InvalidIsbn(body.to_string()));
        }
        let check = check_digit(body)?;
        Ok(Self(format!("{body}{check}")))
    }

    /// Parses a full 13-digit identifier, verifying its check digit.
    pub fn parse(value: &str) -> DomainResult<Self> {
        if value.len() != BODY_LEN + 1 {
            return Err(DomainError::InvalidIsbn(value.to_string()));
        }
        if weighted_sum(value)? % 10 != 0 {
            return Err(DomainError::InvalidIsbn(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces random candidates inside a fixed 6-digit namespace.
#[derive(Debug, Clone)]
pub struct IsbnGenerator {
    prefix: String,
}

impl Default for IsbnGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl IsbnGenerator {
    pub fn new(prefix: &str) -> DomainResult<Self> {
        if prefix.len() != PREFIX_LEN || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Random 12-digit body: the namespace followed by six random digits.
    pub fn body<R: Rng>(&self, rng: &mut R) -> String {
        let mut body = String::with_capacity(BODY_LEN);
        body.push_str(&self.prefix);
        for _ in 0..BODY_LEN - PREFIX_LEN {
            let digit: u32 = rng.random_range(0..10);
            body.push(char::from(b'0' + digit as u8));
        }
        body
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Isbn13 {
        let body = self.body(rng);
        // Prefix and random digits are all ASCII digits.
        let sum = body
            .bytes()
            .enumerate()
            .map(|(i, b)| weight(i, u32::from(b - b'0')))
            .sum();
        let check = closing_digit(sum);
        Isbn13(format!("{body}{check}"))
    }
}
