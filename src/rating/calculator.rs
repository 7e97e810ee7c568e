//! Points calculator trait and the margin-adjusted implementation
//!
//! The calculator only does arithmetic on point totals. Looking teams up,
//! writing the results back and re-sorting the table is the store's job.

use crate::config::rating::{DrawPolicy, RatingConfig};
use crate::types::MatchOutcome;
use serde::{Deserialize, Serialize};

/// Points exchanged by one completed match, before rounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsAdjustment {
    /// Clamped, home-adjusted gap between the two teams
    pub ranking_diff: f64,
    pub modifier: f64,
    pub team_a_delta: f64,
    pub team_b_delta: f64,
}

/// Trait for calculating point changes after a completed match
pub trait PointsCalculator: Send + Sync {
    /// Compute the point deltas for both teams
    ///
    /// # Arguments
    /// * `team_a_points` - Current points of the home (first listed) team
    /// * `team_b_points` - Current points of the away team
    /// * `outcome` - Result of the match
    ///
    /// # Returns
    /// `None` when the outcome does not move points
    fn adjustment(
        &self,
        team_a_points: f64,
        team_b_points: f64,
        outcome: MatchOutcome,
    ) -> Option<PointsAdjustment>;

    /// Round a point total to the precision the table stores
    fn round_points(&self, points: f64) -> f64;
}

/// Round half away from zero to `places` decimals
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Calculator implementing the ranking-difference formula
#[derive(Debug, Clone)]
pub struct MarginPointsCalculator {
    config: RatingConfig,
}

impl MarginPointsCalculator {
    /// Create a new calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Home-adjusted gap between the teams, capped to bound the swing
    pub fn ranking_diff(&self, team_a_points: f64, team_b_points: f64) -> f64 {
        let max = self.config.max_rating_diff;
        (team_a_points + self.config.home_advantage - team_b_points).clamp(-max, max)
    }
}

impl Default for MarginPointsCalculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl PointsCalculator for MarginPointsCalculator {
    fn adjustment(
        &self,
        team_a_points: f64,
        team_b_points: f64,
        outcome: MatchOutcome,
    ) -> Option<PointsAdjustment> {
        let ranking_diff = self.ranking_diff(team_a_points, team_b_points);
        let scaled = ranking_diff / self.config.modifier_divisor;

        let (modifier, team_a_delta, team_b_delta) = match outcome {
            MatchOutcome::TeamAWin => {
                let modifier = 1.0 - scaled;
                (modifier, modifier, -modifier)
            }
            MatchOutcome::TeamBWin => {
                let modifier = 1.0 + scaled;
                (modifier, -modifier, modifier)
            }
            MatchOutcome::Draw => {
                let modifier = scaled;
                match self.config.draw_policy {
                    DrawPolicy::Transfer => (modifier, -modifier, modifier),
                    DrawPolicy::BothDeducted => (modifier, -modifier, -modifier),
                }
            }
            MatchOutcome::NoResult => return None,
        };

        Some(PointsAdjustment {
            ranking_diff,
            modifier,
            team_a_delta,
            team_b_delta,
        })
    }

    fn round_points(&self, points: f64) -> f64 {
        round_to_places(points, self.config.decimal_places)
    }
}
