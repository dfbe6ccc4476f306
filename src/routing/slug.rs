//! Organization slug rules.
//!
//! A slug is 3 to 63 characters drawn from `[a-z0-9-]` that neither starts
//! nor ends with a hyphen. The check is a single pass over the bytes; no
//! regex is compiled.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Minimum slug length in characters.
pub const MIN_SLUG_LEN: usize = 3;

/// Maximum slug length in characters (one DNS label).
pub const MAX_SLUG_LEN: usize = 63;

/// Why a candidate string is not an acceptable slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug must be at least 3 characters")]
    TooShort,

    #[error("slug must be at most 63 characters")]
    TooLong,

    #[error("slug contains invalid character {0:?}; only lowercase letters, numbers and hyphens are allowed")]
    InvalidCharacter(char),

    #[error("slug must start and end with a letter or number")]
    EdgeHyphen,

    #[error("slug {0:?} is reserved")]
    Reserved(String),
}

/// A validated organization slug.
///
/// Only constructible through [`OrgSlug::parse`], so holding one means the
/// shape has been checked. Whether the organization exists is not known here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrgSlug(String);

impl OrgSlug {
    /// Validate `candidate` and wrap it.
    pub fn parse(candidate: &str) -> Result<Self, SlugError> {
        check_shape(candidate)?;
        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrgSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrgSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `candidate` has the shape of an org slug.
pub fn is_valid_slug(candidate: &str) -> bool {
    check_shape(candidate).is_ok()
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn check_shape(candidate: &str) -> Result<(), SlugError> {
    if let Some(bad) = candidate.chars().find(|c| !is_slug_char(*c)) {
        return Err(SlugError::InvalidCharacter(bad));
    }
    // All characters are ASCII from here on, so byte length is char count.
    if candidate.len() < MIN_SLUG_LEN {
        return Err(SlugError::TooShort);
    }
    if candidate.len() > MAX_SLUG_LEN {
        return Err(SlugError::TooLong);
    }
    if candidate.starts_with('-') || candidate.ends_with('-') {
        return Err(SlugError::EdgeHyphen);
    }
    Ok(())
}

/// Derive a slug from a human-readable organization name.
///
/// Lowercases, drops everything outside `[a-z0-9]`, turns whitespace and
/// hyphen runs into a single `-`, and trims to [`MAX_SLUG_LEN`]. The result
/// may still be too short to be valid (e.g. for a one-letter name).
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len().min(MAX_SLUG_LEN));
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let trimmed = slug.trim_end_matches('-').len();
    slug.truncate(trimmed);
    slug
}
