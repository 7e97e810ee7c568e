//! Common types used throughout the ranking service

use crate::error::RankingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for teams
pub type TeamId = u32;

/// Ordered standings, highest points first
pub type Rankings = Vec<StandingEntry>;

/// A team as it appears in standings and match records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Short code carried by match feeds (e.g. "FRA"); never persisted with standings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: None,
        }
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// One row of the rankings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub team: Team,
    #[serde(rename = "pos")]
    pub position: u32,
    #[serde(rename = "pts")]
    pub points: f64,
}

impl StandingEntry {
    pub fn new(team: Team, position: u32, points: f64) -> Self {
        Self {
            team,
            position,
            points,
        }
    }
}

/// Lifecycle status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    /// Parse a one-letter status code, case-insensitively
    pub fn from_code(code: &str) -> Result<Self, RankingError> {
        match code.trim().to_ascii_uppercase().as_str() {
            "U" => Ok(MatchStatus::Upcoming),
            "L" => Ok(MatchStatus::Live),
            "C" => Ok(MatchStatus::Completed),
            _ => Err(RankingError::InvalidStatus {
                code: code.to_string(),
            }),
        }
    }

    pub fn code(&self) -> char {
        match self {
            MatchStatus::Upcoming => 'U',
            MatchStatus::Live => 'L',
            MatchStatus::Completed => 'C',
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Upcoming => write!(f, "Upcoming"),
            MatchStatus::Live => write!(f, "Live"),
            MatchStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Result of a completed match, from the point of view of the first listed team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    TeamAWin,
    TeamBWin,
    Draw,
    NoResult,
}

impl MatchOutcome {
    /// Parse a one-letter outcome code, case-insensitively
    pub fn from_code(code: &str) -> Result<Self, RankingError> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(MatchOutcome::TeamAWin),
            "B" => Ok(MatchOutcome::TeamBWin),
            "D" => Ok(MatchOutcome::Draw),
            "N" => Ok(MatchOutcome::NoResult),
            _ => Err(RankingError::InvalidOutcome {
                code: code.to_string(),
            }),
        }
    }

    pub fn code(&self) -> char {
        match self {
            MatchOutcome::TeamAWin => 'A',
            MatchOutcome::TeamBWin => 'B',
            MatchOutcome::Draw => 'D',
            MatchOutcome::NoResult => 'N',
        }
    }
}

/// Where a match was played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A match as received from the fixture feed
///
/// `status` and `outcome` are kept as raw codes so that unrecognised values can be
/// reported instead of failing deserialization. The first team is the home side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    pub teams: [Team; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<[u32; 2]>,
    pub status: String,
    #[serde(default)]
    pub outcome: String,
}

impl MatchRecord {
    /// Create a bare match record from two teams and raw codes
    pub fn new(
        team_a: Team,
        team_b: Team,
        status: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            match_id: None,
            description: None,
            venue: None,
            teams: [team_a, team_b],
            scores: None,
            status: status.into(),
            outcome: outcome.into(),
        }
    }

    pub fn team_a(&self) -> &Team {
        &self.teams[0]
    }

    pub fn team_b(&self) -> &Team {
        &self.teams[1]
    }

    pub fn status(&self) -> Result<MatchStatus, RankingError> {
        MatchStatus::from_code(&self.status)
    }

    pub fn outcome(&self) -> Result<MatchOutcome, RankingError> {
        MatchOutcome::from_code(&self.outcome)
    }

    /// Human readable label for log lines
    pub fn label(&self) -> String {
        let fixture = format!("{} v {}", self.team_a().name, self.team_b().name);
        match (&self.match_id, &self.description) {
            (Some(id), Some(desc)) => format!("#{} {} ({})", id, desc, fixture),
            (Some(id), None) => format!("#{} ({})", id, fixture),
            (None, Some(desc)) => format!("{} ({})", desc, fixture),
            (None, None) => fixture,
        }
    }
}

/// Points and position change for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamUpdate {
    pub team_id: TeamId,
    pub old_points: f64,
    pub new_points: f64,
    pub old_position: u32,
    pub new_position: u32,
}

impl TeamUpdate {
    pub fn points_delta(&self) -> f64 {
        self.new_points - self.old_points
    }
}

/// What a successfully processed match did to the rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchApplication {
    /// Completed with no result; rankings untouched
    NoResult,
    Updated {
        outcome: MatchOutcome,
        ranking_diff: f64,
        modifier: f64,
        team_a: TeamUpdate,
        team_b: TeamUpdate,
        applied_at: DateTime<Utc>,
    },
}

impl MatchApplication {
    pub fn is_update(&self) -> bool {
        matches!(self, MatchApplication::Updated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_case_insensitive() {
        assert_eq!(MatchStatus::from_code("c").unwrap(), MatchStatus::Completed);
        assert_eq!(MatchStatus::from_code("U").unwrap(), MatchStatus::Upcoming);
        assert_eq!(MatchStatus::from_code("l").unwrap(), MatchStatus::Live);
        assert_eq!(
            MatchStatus::from_code("X"),
            Err(RankingError::InvalidStatus {
                code: "X".to_string()
            })
        );
    }

    #[test]
    fn test_outcome_codes_are_case_insensitive() {
        assert_eq!(MatchOutcome::from_code("a").unwrap(), MatchOutcome::TeamAWin);
        assert_eq!(MatchOutcome::from_code("B").unwrap(), MatchOutcome::TeamBWin);
        assert_eq!(MatchOutcome::from_code("d").unwrap(), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_code("n").unwrap(), MatchOutcome::NoResult);
        assert!(MatchOutcome::from_code("").is_err());
    }

    #[test]
    fn test_standing_entry_wire_shape() {
        let entry = StandingEntry::new(Team::new(2, "France"), 3, 52.95);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "team": { "id": 2, "name": "France" },
                "pos": 3,
                "pts": 52.95
            })
        );
    }

    #[test]
    fn test_match_record_accepts_full_feed_payload() {
        let payload = serde_json::json!({
            "matchId": 2524,
            "description": "Match 2",
            "venue": { "id": 900, "name": "Stadium", "city": "Paris", "country": "France" },
            "teams": [
                { "id": 2, "name": "France", "abbreviation": "FRA" },
                { "id": 1, "name": "England", "abbreviation": "ENG" }
            ],
            "scores": [19, 23],
            "status": "C",
            "outcome": "B"
        });

        let record: MatchRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.match_id, Some(2524));
        assert_eq!(record.team_a().abbreviation.as_deref(), Some("FRA"));
        assert_eq!(record.scores, Some([19, 23]));
        assert_eq!(record.status().unwrap(), MatchStatus::Completed);
        assert_eq!(record.outcome().unwrap(), MatchOutcome::TeamBWin);
        assert_eq!(record.label(), "#2524 Match 2 (France v England)");
    }

    #[test]
    fn test_match_record_minimal_payload() {
        let payload = r#"{"teams":[{"id":1,"name":"A"},{"id":2,"name":"B"}],"status":"u"}"#;
        let record: MatchRecord = serde_json::from_str(payload).unwrap();

        assert_eq!(record.status().unwrap(), MatchStatus::Upcoming);
        assert!(record.outcome().is_err());
        assert_eq!(record.label(), "A v B");
    }
}
