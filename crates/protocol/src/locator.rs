//! `latch:///` object locators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BARE_ROOT, LOCATOR_PREFIX};

/// Error returned when a string is not a valid remote locator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a Latch URL (latch:///...): {0}")]
pub struct LocatorError(pub String);

/// Address of an object (or object prefix) in the remote namespace.
///
/// Always starts with `latch:///`. The path component, everything after the
/// `latch://` authority, is the object key with a leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteLocator(String);

impl RemoteLocator {
    /// Validates `raw` as an object locator.
    pub fn parse(raw: impl Into<String>) -> Result<Self, LocatorError> {
        let raw = raw.into();
        if !raw.starts_with(LOCATOR_PREFIX) {
            return Err(LocatorError(raw));
        }
        Ok(Self(raw))
    }

    /// Validates `raw` as a directory locator.
    ///
    /// Same as [`parse`](Self::parse) except that the bare root `latch://`
    /// is accepted and rewritten to `latch:///`.
    pub fn parse_directory(raw: impl Into<String>) -> Result<Self, LocatorError> {
        let raw = raw.into();
        if raw == BARE_ROOT {
            return Ok(Self(LOCATOR_PREFIX.to_string()));
        }
        Self::parse(raw)
    }

    /// The full locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path component, including its leading `/`.
    pub fn path(&self) -> &str {
        let rest = &self.0[BARE_ROOT.len()..];
        match rest.find(['?', '#']) {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    /// Key prefix shared by every object under this locator.
    ///
    /// The path without its leading `/`, ending with `/`. The root locator
    /// yields the empty key.
    pub fn directory_key(&self) -> String {
        let key = &self.path()[1..];
        if key.is_empty() || key.ends_with('/') {
            key.to_string()
        } else {
            format!("{key}/")
        }
    }

    /// Returns this locator with a trailing `/`.
    pub fn with_trailing_slash(&self) -> Self {
        if self.0.ends_with('/') {
            self.clone()
        } else {
            Self(format!("{}/", self.0))
        }
    }

    /// Appends a relative path by plain concatenation.
    ///
    /// Callers join onto a directory locator, so `self` normally ends with `/`.
    pub fn join(&self, relative: &str) -> Self {
        Self(format!("{}{relative}", self.0))
    }

    /// Last path segment, if the locator names an object rather than a prefix.
    pub fn file_name(&self) -> Option<&str> {
        self.path().rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl fmt::Display for RemoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RemoteLocator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RemoteLocator {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RemoteLocator> for String {
    fn from(locator: RemoteLocator) -> Self {
        locator.0
    }
}

impl AsRef<str> for RemoteLocator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
