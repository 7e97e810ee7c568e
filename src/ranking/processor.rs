//! Match processing: status validation, scoring and re-ordering
//!
//! A processed match either leaves the table untouched and returns an error,
//! or updates both teams and re-sorts. There is no state in between.

use crate::error::{RankingError, Result};
use crate::rating::calculator::{MarginPointsCalculator, PointsCalculator};
use crate::types::{MatchApplication, MatchRecord, MatchStatus, StandingEntry, TeamId, TeamUpdate};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Map every team id in the table to its row index
pub fn index_by_team(rankings: &[StandingEntry]) -> HashMap<TeamId, usize> {
    rankings
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.team.id, index))
        .collect()
}

/// Stable sort by points descending, then renumber positions from 1
///
/// Teams on equal points keep the order they had before the sort.
pub fn sort_rankings(rankings: &mut [StandingEntry]) {
    rankings.sort_by(|a, b| b.points.total_cmp(&a.points));

    for (index, entry) in rankings.iter_mut().enumerate() {
        entry.position = index as u32 + 1;
    }
}

/// Validates matches and applies their result to a rankings table
#[derive(Clone)]
pub struct MatchProcessor {
    calculator: Arc<dyn PointsCalculator>,
}

impl MatchProcessor {
    pub fn new(calculator: Arc<dyn PointsCalculator>) -> Self {
        Self { calculator }
    }

    /// Apply a match to `rankings`
    ///
    /// On error `rankings` is left exactly as it was passed in.
    pub fn process(
        &self,
        rankings: &mut [StandingEntry],
        record: &MatchRecord,
    ) -> Result<MatchApplication> {
        match record.status()? {
            MatchStatus::Upcoming => return Err(RankingError::NotStarted.into()),
            MatchStatus::Live => return Err(RankingError::InProgress.into()),
            MatchStatus::Completed => {}
        }

        let team_a_id = record.team_a().id;
        let team_b_id = record.team_b().id;
        if team_a_id == team_b_id {
            return Err(RankingError::InvalidMatch {
                reason: format!("team {} cannot play itself", team_a_id),
            }
            .into());
        }

        let index = index_by_team(rankings);
        let a = *index
            .get(&team_a_id)
            .ok_or(RankingError::MissingTeam { team_id: team_a_id })?;
        let b = *index
            .get(&team_b_id)
            .ok_or(RankingError::MissingTeam { team_id: team_b_id })?;

        let outcome = record.outcome()?;

        let old_a = (rankings[a].points, rankings[a].position);
        let old_b = (rankings[b].points, rankings[b].position);

        let Some(adjustment) = self.calculator.adjustment(old_a.0, old_b.0, outcome) else {
            debug!("Match {} completed with no result", record.label());
            return Ok(MatchApplication::NoResult);
        };

        // Both totals are computed before either row is written
        let new_a = self.calculator.round_points(old_a.0 + adjustment.team_a_delta);
        let new_b = self.calculator.round_points(old_b.0 + adjustment.team_b_delta);
        rankings[a].points = new_a;
        rankings[b].points = new_b;

        debug!(
            "Match {}: diff {:.4}, modifier {:.4}, {} -> {}, {} -> {}",
            record.label(),
            adjustment.ranking_diff,
            adjustment.modifier,
            old_a.0,
            new_a,
            old_b.0,
            new_b
        );

        sort_rankings(rankings);

        let positions = index_by_team(rankings);
        let position_of = |id: TeamId| positions.get(&id).map(|i| *i as u32 + 1).unwrap_or(0);

        Ok(MatchApplication::Updated {
            outcome,
            ranking_diff: adjustment.ranking_diff,
            modifier: adjustment.modifier,
            team_a: TeamUpdate {
                team_id: team_a_id,
                old_points: old_a.0,
                new_points: new_a,
                old_position: old_a.1,
                new_position: position_of(team_a_id),
            },
            team_b: TeamUpdate {
                team_id: team_b_id,
                old_points: old_b.0,
                new_points: new_b,
                old_position: old_b.1,
                new_position: position_of(team_b_id),
            },
            applied_at: Utc::now(),
        })
    }
}

impl Default for MatchProcessor {
    fn default() -> Self {
        Self::new(Arc::new(MarginPointsCalculator::default()))
    }
}
