//! Rating system configuration

use crate::error::{RankingError, Result};
use serde::{Deserialize, Serialize};

/// How a drawn match moves points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// Both sides lose the modifier
    BothDeducted,
    /// Home side gives the modifier to the away side; points are conserved
    Transfer,
}

impl std::str::FromStr for DrawPolicy {
    type Err = RankingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transfer" => Ok(DrawPolicy::Transfer),
            "both_deducted" | "both-deducted" => Ok(DrawPolicy::BothDeducted),
            _ => Err(RankingError::ConfigurationError {
                message: format!("Unknown draw policy: {}. Use transfer or both_deducted.", s),
            }),
        }
    }
}

/// Parameters of the margin-adjusted points formula
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Points credited to the home (first listed) team before taking the gap
    pub home_advantage: f64,
    /// The ranking gap is clamped to [-max, max]
    pub max_rating_diff: f64,
    /// Divides the clamped gap to produce the modifier
    pub modifier_divisor: f64,
    /// Points are rounded to this many decimals after every update
    pub decimal_places: u32,
    pub draw_policy: DrawPolicy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            home_advantage: 3.0,
            max_rating_diff: 10.0,
            modifier_divisor: 10.0,
            decimal_places: 2,
            draw_policy: DrawPolicy::BothDeducted,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.home_advantage.is_finite() {
            return Err(RankingError::ConfigurationError {
                message: "Home advantage must be finite".to_string(),
            }
            .into());
        }

        if !self.max_rating_diff.is_finite() || self.max_rating_diff <= 0.0 {
            return Err(RankingError::ConfigurationError {
                message: "Max rating difference must be positive".to_string(),
            }
            .into());
        }

        if !self.modifier_divisor.is_finite() || self.modifier_divisor <= 0.0 {
            return Err(RankingError::ConfigurationError {
                message: "Modifier divisor must be positive".to_string(),
            }
            .into());
        }

        // 10^decimal_places must stay exact in an f64
        if self.decimal_places > 10 {
            return Err(RankingError::ConfigurationError {
                message: "Decimal places must be at most 10".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
