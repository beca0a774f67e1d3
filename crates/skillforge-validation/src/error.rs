//! Error and finding types for skill validation

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason attached to a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Required field absent or empty
    Required,
    /// Collection has too few entries
    MinItems,
    /// Identifier declared more than once
    Duplicate,
    /// Reference to something that does not exist
    UnknownReference,
    /// Numeric value outside its allowed range
    OutOfRange,
    /// Value present but not in the expected form
    InvalidFormat,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::Required => "required",
            ErrorCode::MinItems => "min_items",
            ErrorCode::Duplicate => "duplicate",
            ErrorCode::UnknownReference => "unknown_reference",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidFormat => "invalid_format",
        };
        f.write_str(code)
    }
}

/// Severity level for validation findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be fixed
    Warning,
}

/// Validation finding located by a dotted document path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path, e.g. `tools[0].security`
    pub path: String,
    /// Reason code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Finding severity
    #[serde(skip)]
    pub severity: Severity,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Error
    }
}

impl ValidationError {
    /// Create an error finding
    pub fn error(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Create a warning finding
    pub fn warning(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Same finding with its path nested under `prefix`
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.path = format!("{}.{}", prefix, self.path);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {} ({}): {}", self.severity, self.path, self.code, self.message)
    }
}

/// Section name outside the supported set
#[derive(Debug, Error)]
#[error("Unknown section '{0}'. Expected one of: problem, tools, guardrails, intents, role")]
pub struct UnknownSection(pub String);

/// Quality scoring failures. Never fatal to validation.
#[derive(Debug, Error)]
pub enum QualityError {
    /// No scorer configured
    #[error("Quality scorer is not configured")]
    NotConfigured,

    /// Scorer did not answer in time
    #[error("Quality scoring timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Transport failure
    #[error("Quality scoring request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Quality scorer returned HTTP {status}: {message}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// Scorer reply could not be understood
    #[error("Quality scorer returned an unreadable report: {0}")]
    InvalidReport(String),
}
