//! Canonical map identifiers and the adapters that produce them.
//!
//! Two external formats name the same map:
//! - catalog keys, as yielded by the asset source (`./assets/delta.png`)
//! - rendered URLs, where the asset pipeline appended a content suffix
//!   (`http://host/images/delta-x7f2.png`)
//!
//! Both are parsed once at the boundary into a [`MapName`], and all
//! "is this the same map" decisions compare `MapName` values.

use std::fmt;
use thiserror::Error;

/// File extension shared by every map asset.
pub const MAP_EXTENSION: &str = ".png";

/// Failure to extract a canonical name from an external reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `/` in the reference, so there is no final path segment.
    #[error("'{0}' has no path separator")]
    MissingSeparator(String),
    /// The final segment does not end in `.png`.
    #[error("'{0}' does not end in {MAP_EXTENSION}")]
    MissingExtension(String),
    /// The name part of the final segment is empty.
    #[error("'{0}' has an empty map name")]
    EmptyName(String),
    /// A rendered URL without a `-<suffix>` before the extension.
    #[error("'{0}' has no rendered suffix")]
    MissingSuffix(String),
}

/// Canonical name of a map, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapName(String);

impl MapName {
    /// Build a name directly. Callers holding external references should use
    /// [`MapName::from_catalog_key`] or [`MapName::from_rendered_url`].
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Extract the name from a catalog key: the text between the last `/`
    /// and a trailing `.png`.
    ///
    /// ```
    /// use tacmap::resources::mapname::MapName;
    /// assert_eq!(MapName::from_catalog_key("./assets/delta.png").unwrap().as_str(), "delta");
    /// ```
    pub fn from_catalog_key(key: &str) -> Result<Self, ParseError> {
        let stem = png_stem(key)?;
        if stem.is_empty() {
            return Err(ParseError::EmptyName(key.to_string()));
        }
        Ok(Self(stem.to_string()))
    }

    /// Extract the name from a rendered URL: the text between the last `/`
    /// and a trailing `-<suffix>.png`. The suffix starts after the last `-`
    /// of the final segment and must be non-empty.
    ///
    /// ```
    /// use tacmap::resources::mapname::MapName;
    /// let name = MapName::from_rendered_url("http://127.0.0.1/assets/delta-x7f2.png").unwrap();
    /// assert_eq!(name.as_str(), "delta");
    /// ```
    pub fn from_rendered_url(url: &str) -> Result<Self, ParseError> {
        let stem = png_stem(url)?;
        let Some((name, suffix)) = stem.rsplit_once('-') else {
            return Err(ParseError::MissingSuffix(url.to_string()));
        };
        if suffix.is_empty() {
            return Err(ParseError::MissingSuffix(url.to_string()));
        }
        if name.is_empty() {
            return Err(ParseError::EmptyName(url.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MapName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Final path segment with the `.png` extension removed.
fn png_stem(reference: &str) -> Result<&str, ParseError> {
    let Some((_, segment)) = reference.rsplit_once('/') else {
        return Err(ParseError::MissingSeparator(reference.to_string()));
    };
    segment
        .strip_suffix(MAP_EXTENSION)
        .ok_or_else(|| ParseError::MissingExtension(reference.to_string()))
}
