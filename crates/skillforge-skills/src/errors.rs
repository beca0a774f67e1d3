//! Skill-specific error types

use thiserror::Error;

/// Errors raised while reading skill documents
#[derive(Error, Debug)]
pub enum SkillError {
    /// Document could not be decoded into the skill shape
    #[error("Invalid skill document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// Document is not a JSON object
    #[error("Skill document must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was supplied instead
        found: &'static str,
    },
}

impl SkillError {
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { found }
    }
}

/// Result type alias for skill operations
pub type Result<T> = std::result::Result<T, SkillError>;
