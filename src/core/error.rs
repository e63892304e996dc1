//! Error and diagnostic types.
//!
//! Uses thiserror for structured errors. Data-quality problems in the compared
//! trees are never errors: they degrade to an attention style plus a
//! [`Diagnostic`] attached to the affected result. Only contract violations
//! (such as invalid options) and I/O problems surface as `Err`.

use crate::core::types::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum CobieError {
    /// Validation could not be set up.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be read or written.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A TOML options file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Fatal validation errors (contract violations).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    /// An option value is out of range.
    #[error("Invalid option '{option}': {reason}")]
    InvalidOptions {
        /// Name of the option.
        option: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The dedicated worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl ValidationError {
    /// Shorthand for an [`ValidationError::InvalidOptions`] error.
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidOptions {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidationError::InvalidOptions { option, .. } => {
                Some(format!("Check the value of '{}' in the validation options", option))
            }
            _ => None,
        }
    }
}

/// Result type alias for crate operations.
pub type CobieResult<T> = Result<T, CobieError>;

/// Result type alias for validation setup.
pub type ValidationResult<T> = Result<T, ValidationError>;

// ============================================================================
// Diagnostics
// ============================================================================

/// Kind of a recoverable data-quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// No submission node matched the requirement.
    NoMatchFound,
    /// A node misses identity fields (name or categories).
    MalformedInput,
    /// An attribute is present on both sides with different value tags.
    ComparisonTypeMismatch,
    /// An attribute was matched through a configured alias.
    AliasMatch,
}

/// A recoverable issue attached to a match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Issue kind.
    pub kind: DiagnosticKind,
    /// Label of the requirement node concerned.
    pub subject: String,
    /// Attribute concerned, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Whether the issue concerns the submitted node rather than the
    /// requirement.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub submitted: bool,
}

impl Diagnostic {
    /// No candidate for a requirement node.
    pub fn no_match(subject: &str) -> Self {
        Self {
            kind: DiagnosticKind::NoMatchFound,
            subject: subject.to_string(),
            attribute: None,
            message: format!("No submitted object matches '{}'", subject),
            submitted: false,
        }
    }

    /// Node with missing identity fields.
    pub fn malformed(subject: &str, reason: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MalformedInput,
            subject: subject.to_string(),
            attribute: None,
            message: reason.into(),
            submitted: false,
        }
    }

    /// Attribute compared across different value tags.
    pub fn type_mismatch(subject: &str, attribute: &str, expected: ValueKind, got: ValueKind) -> Self {
        Self {
            kind: DiagnosticKind::ComparisonTypeMismatch,
            subject: subject.to_string(),
            attribute: Some(attribute.to_string()),
            message: format!(
                "Attribute '{}' expected {} value, submission has {}",
                attribute, expected, got
            ),
            submitted: false,
        }
    }

    /// Attribute found under an alias.
    pub fn alias(subject: &str, attribute: &str, alias: &str) -> Self {
        Self {
            kind: DiagnosticKind::AliasMatch,
            subject: subject.to_string(),
            attribute: Some(attribute.to_string()),
            message: format!("Attribute '{}' matched submitted '{}'", attribute, alias),
            submitted: false,
        }
    }

    /// Convert to a report warning, if this kind is surfaced as one.
    pub fn as_warning(&self) -> Option<ValidationWarning> {
        match self.kind {
            DiagnosticKind::MalformedInput => Some(ValidationWarning {
                message: self.message.clone(),
                subject: Some(self.subject.clone()),
                suggestion: Some("Give every object a name and at least one category".to_string()),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Non-fatal warning surfaced at facility level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Warning message.
    pub message: String,
    /// Object that triggered the warning, if applicable.
    pub subject: Option<String>,
    /// Suggestion for addressing the warning.
    pub suggestion: Option<String>,
}
