//! Error types for the extractor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extractor operations
///
/// Structural mismatches (no article, no markdown body, no page title) are
/// not errors: such pages simply yield no records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A configured CSS selector failed to parse
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// The selector as configured
        selector: String,
        /// Parser message
        message: String,
    },

    /// A configured tag or attribute name is empty
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Version table could not be loaded
    #[error("Version table error: {0}")]
    VersionTable(String),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidSelector { .. } | ExtractError::InvalidConfig(_) => {
                CrateError::Config(err.to_string())
            }
            _ => CrateError::Extract(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_crate_error() {
        let selector = ExtractError::InvalidSelector {
            selector: "[[".to_string(),
            message: "unexpected token".to_string(),
        };
        let err = CrateError::from(selector);
        assert!(matches!(err, CrateError::Config(msg) if msg.contains("[[")));

        let config = ExtractError::InvalidConfig("heading tags must not be empty".to_string());
        assert!(matches!(CrateError::from(config), CrateError::Config(_)));

        let table = ExtractError::VersionTable("unable to parse v.json".to_string());
        let err = CrateError::from(table);
        assert!(matches!(err, CrateError::Extract(msg) if msg.contains("v.json")));
    }
}
