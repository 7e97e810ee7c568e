//! Points calculation
//!
//! This module provides the margin-adjusted points formula applied to the two
//! teams of a completed match.

pub mod calculator;

// Re-export commonly used types
pub use calculator::{round_to_places, MarginPointsCalculator, PointsAdjustment, PointsCalculator};
