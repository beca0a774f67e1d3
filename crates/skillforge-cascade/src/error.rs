//! Error types for the cascading issue engine

use thiserror::Error;

use crate::models::IssueStatus;

/// Errors raised by issue lifecycle operations and persistence
#[derive(Debug, Error)]
pub enum CascadeError {
    /// No issue with the given id
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    /// Lifecycle transition not allowed from the current status
    #[error("Issue {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Issue id
        id: String,
        /// Current status
        from: IssueStatus,
        /// Requested status
        to: IssueStatus,
    },

    /// `cascading_issues` could not be read or written
    #[error("Invalid stored issues: {0}")]
    InvalidIssues(#[from] serde_json::Error),

    /// Persistence callback failed
    #[error("Failed to persist issues: {0}")]
    Persistence(String),
}

/// Result type alias for cascade operations
pub type Result<T> = std::result::Result<T, CascadeError>;
