//! Target language versions and rule gating.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty language version")]
    Empty,

    #[error("invalid component `{component}` in language version `{input}`")]
    InvalidComponent { input: String, component: String },

    #[error("language version `{input}` has more than three components")]
    TooManyComponents { input: String },
}

/// A `{major, minor, patch}` language release.
///
/// Ordering compares major first, then minor, then patch. Missing components
/// parse as zero, so `"1.7"` equals `"1.7.0"` and `"8"` is `8.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LanguageVersion {
    /// First release with inferred constructor type arguments.
    pub const JAVA_7: LanguageVersion = LanguageVersion::new(1, 7, 0);
    pub const JAVA_8: LanguageVersion = LanguageVersion::new(1, 8, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a target of `self` satisfies a rule requiring `required`.
    pub fn is_compatible_with(&self, required: &LanguageVersion) -> bool {
        self >= required
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        Self::JAVA_8
    }
}

impl FromStr for LanguageVersion {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut components = [0u32; 3];
        for (index, part) in trimmed.split('.').enumerate() {
            if index >= components.len() {
                return Err(VersionError::TooManyComponents {
                    input: input.to_string(),
                });
            }
            components[index] = part.parse().map_err(|_| VersionError::InvalidComponent {
                input: input.to_string(),
                component: part.to_string(),
            })?;
        }

        let [major, minor, patch] = components;
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for LanguageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LanguageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LanguageVersionVisitor)
    }
}

/// Accepts `"1.7.0"` and bare integers such as `11`.
///
/// Decimal numbers are rejected: `1.10` has already become `1.1` by the time
/// it arrives as a float.
struct LanguageVersionVisitor;

impl Visitor<'_> for LanguageVersionVisitor {
    type Value = LanguageVersion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a language version such as \"1.7\", \"1.8.0\" or 11")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        let major = u32::try_from(value).map_err(E::custom)?;
        Ok(LanguageVersion::new(major, 0, 0))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        let major = u32::try_from(value).map_err(E::custom)?;
        Ok(LanguageVersion::new(major, 0, 0))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Err(E::custom(format_args!(
            "language version {value} must be quoted, e.g. \"{value}\""
        )))
    }
}
