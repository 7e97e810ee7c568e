//! Error types for the ranking service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("This match has not started yet. Current status: (U) Upcoming")]
    NotStarted,

    #[error("This match has not ended yet. Current status: (L) Live")]
    InProgress,

    #[error("Invalid match status: {code:?}")]
    InvalidStatus { code: String },

    #[error("Invalid match outcome: {code:?}")]
    InvalidOutcome { code: String },

    #[error("Team {team_id} is not present in the current rankings")]
    MissingTeam { team_id: u32 },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Invalid rankings: {reason}")]
    InvalidRankings { reason: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl RankingError {
    /// Pending matches are reported at warning level; everything else is an error
    pub fn is_warning(&self) -> bool {
        matches!(self, RankingError::NotStarted | RankingError::InProgress)
    }
}
