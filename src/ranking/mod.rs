//! Rankings table management
//!
//! This module owns the rankings table: validating and scoring completed
//! matches, keeping the table ordered, and persisting every change.

pub mod processor;
pub mod store;

// Re-export commonly used types
pub use processor::{index_by_team, sort_rankings, MatchProcessor};
pub use store::{validate_rankings, RankingStore, SharedRankingStore};
