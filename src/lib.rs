//! Pulseball - margin-adjusted team rankings
//!
//! This crate maintains a table of teams ordered by points, applies completed
//! match results with a capped ranking-difference formula, persists the table
//! through a pluggable key-value store and renders it as an HTML table.

pub mod config;
pub mod error;
pub mod ranking;
pub mod rating;
pub mod render;
pub mod sample;
pub mod storage;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use ranking::{MatchProcessor, RankingStore, SharedRankingStore};
pub use rating::{MarginPointsCalculator, PointsCalculator};
pub use storage::StorageProvider;
pub use render::{HtmlTableRenderer, Renderer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
