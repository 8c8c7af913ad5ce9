use std::fmt;

use thiserror::Error;

use crate::types::environment::Environment;

/// Error produced when a size specification cannot be parsed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size specification: {0:?}")]
pub struct InvalidSizeSpec(pub String);

/// A bounding box a derivative must fit inside, parsed from `WxH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    /// Maximum width in pixels
    pub width: u32,
    /// Maximum height in pixels
    pub height: u32,
}

impl SizeSpec {
    /// Parses a `WxH` specification into two positive integers
    ///
    /// # Errors
    ///
    /// Returns `InvalidSizeSpec` when either dimension is missing, not an
    /// integer, or zero.
    pub fn parse(raw: &str) -> Result<Self, InvalidSizeSpec> {
        let invalid = || InvalidSizeSpec(raw.to_string());

        let (width, height) = raw.split_once('x').ok_or_else(invalid)?;
        let width = width.parse::<u32>().ok().filter(|w| *w > 0).ok_or_else(invalid)?;
        let height = height.parse::<u32>().ok().filter(|h| *h > 0).ok_or_else(invalid)?;

        Ok(Self { width, height })
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for the derivative generator
///
/// Resolved once at process start and passed into the generator by value;
/// the generator never reads ambient state.
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    /// Global kill switch; when false every notification is a no-op
    pub enabled: bool,
    /// Configured size specifications, unparsed and in configured order
    ///
    /// Entries are parsed per use so a malformed entry is logged and skipped
    /// without affecting the others.
    pub size_specs: Vec<String>,
}

impl ResizeConfig {
    /// Creates a `ResizeConfig` from the given environment
    #[must_use]
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            enabled: env.resizing_enabled(),
            size_specs: env.size_specs(),
        }
    }
}
