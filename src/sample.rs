//! Bundled sample data used by the `demo` command and the test suites

use crate::types::{MatchRecord, Rankings, StandingEntry, Team, Venue};

/// Five-team table: Australia, New Zealand, France, England, Romania
pub fn sample_rankings() -> Rankings {
    vec![
        StandingEntry::new(Team::new(32, "Australia"), 1, 54.23),
        StandingEntry::new(Team::new(62, "New Zealand"), 2, 54.00),
        StandingEntry::new(Team::new(2, "France"), 3, 52.95),
        StandingEntry::new(Team::new(1, "England"), 4, 52.32),
        StandingEntry::new(Team::new(24, "Romania"), 5, 43.50),
    ]
}

/// France (home) lose 19-23 to England in Paris
pub fn sample_match() -> MatchRecord {
    MatchRecord {
        match_id: Some(2524),
        description: Some("Match 2".to_string()),
        venue: Some(Venue {
            id: 900,
            name: "Stadium".to_string(),
            city: Some("Paris".to_string()),
            country: Some("France".to_string()),
        }),
        teams: [
            Team::new(2, "France").with_abbreviation("FRA"),
            Team::new(1, "England").with_abbreviation("ENG"),
        ],
        scores: Some([19, 23]),
        status: "C".to_string(),
        outcome: "B".to_string(),
    }
}
