//! Property tests for match application
//!
//! Random tables and matches are pushed through a real store and the table
//! invariants are checked after every application.

use proptest::prelude::*;
use proptest::sample::Index;
use pulseball::config::{DrawPolicy, RatingConfig};
use pulseball::storage::InMemoryStorage;
use pulseball::ranking::sort_rankings;
use pulseball::render::NullRenderer;
use pulseball::{
    MarginPointsCalculator, MatchApplication, MatchProcessor, MatchRecord, RankingStore, Rankings,
    StandingEntry, Team,
};
use std::sync::Arc;

/// Points are whole hundredths, so every table starts already rounded
fn rankings_strategy() -> impl Strategy<Value = Rankings> {
    prop::collection::vec(0u32..10_000, 2..10).prop_map(|cents| {
        let mut rankings: Rankings = cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let id = i as u32 + 1;
                StandingEntry::new(Team::new(id, format!("Team {}", id)), 0, c as f64 / 100.0)
            })
            .collect();
        sort_rankings(&mut rankings);
        rankings
    })
}

fn pick_pair(len: usize, first: Index, second: Index) -> (usize, usize) {
    let a = first.index(len);
    let mut b = second.index(len - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

fn store_with(rankings: Rankings) -> RankingStore {
    store_with_processor(rankings, MatchProcessor::default())
}

fn store_with_processor(rankings: Rankings, processor: MatchProcessor) -> RankingStore {
    let mut store =
        RankingStore::new(Arc::new(InMemoryStorage::new()), Arc::new(NullRenderer), processor)
            .unwrap();
    store.initialize(rankings).unwrap();
    store
}

fn transfer_processor() -> MatchProcessor {
    let calculator = MarginPointsCalculator::new(RatingConfig {
        draw_policy: DrawPolicy::Transfer,
        ..Default::default()
    })
    .unwrap();
    MatchProcessor::new(Arc::new(calculator))
}

fn completed(rankings: &[StandingEntry], a: usize, b: usize, outcome: &str) -> MatchRecord {
    MatchRecord::new(
        rankings[a].team.clone(),
        rankings[b].team.clone(),
        "C",
        outcome,
    )
}

fn points_of(rankings: &[StandingEntry], id: u32) -> f64 {
    rankings
        .iter()
        .find(|e| e.team.id == id)
        .map(|e| e.points)
        .unwrap()
}

proptest! {
    #[test]
    fn positions_are_contiguous_after_apply(
        rankings in rankings_strategy(),
        first in any::<Index>(),
        second in any::<Index>(),
        outcome in prop::sample::select(vec!["A", "B", "D", "N"]),
    ) {
        let (a, b) = pick_pair(rankings.len(), first, second);
        let record = completed(&rankings, a, b, outcome);
        let mut store = store_with(rankings);

        store.apply_match(&record).unwrap();

        for (i, entry) in store.rankings().iter().enumerate() {
            prop_assert_eq!(entry.position as usize, i + 1);
        }
        for pair in store.rankings().windows(2) {
            prop_assert!(pair[0].points >= pair[1].points);
        }
    }

    #[test]
    fn points_keep_two_decimals(
        rankings in rankings_strategy(),
        first in any::<Index>(),
        second in any::<Index>(),
        outcome in prop::sample::select(vec!["A", "B", "D"]),
    ) {
        let (a, b) = pick_pair(rankings.len(), first, second);
        let record = completed(&rankings, a, b, outcome);
        let mut store = store_with(rankings);

        store.apply_match(&record).unwrap();

        for entry in store.rankings() {
            let scaled = entry.points * 100.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6, "{} has extra decimals", entry.points);
        }
    }

    #[test]
    fn points_are_conserved(
        rankings in rankings_strategy(),
        first in any::<Index>(),
        second in any::<Index>(),
        outcome in prop::sample::select(vec!["A", "B", "D"]),
    ) {
        // Wins always conserve points; draws only under the transfer policy
        let (a, b) = pick_pair(rankings.len(), first, second);
        let record = completed(&rankings, a, b, outcome);
        let mut store = store_with_processor(rankings.clone(), transfer_processor());

        let application = store.apply_match(&record).unwrap();
        let MatchApplication::Updated { team_a, team_b, .. } = application else {
            panic!("completed match with a result must update the table");
        };

        // Rounding each side independently can leave at most one hundredth over
        prop_assert!((team_a.points_delta() + team_b.points_delta()).abs() <= 0.01 + 1e-9);

        // Nobody else moved
        for entry in &rankings {
            if entry.team.id != team_a.team_id && entry.team.id != team_b.team_id {
                prop_assert_eq!(points_of(store.rankings(), entry.team.id), entry.points);
            }
        }
    }

    #[test]
    fn default_draw_moves_both_teams_the_same_way(
        rankings in rankings_strategy(),
        first in any::<Index>(),
        second in any::<Index>(),
    ) {
        let (a, b) = pick_pair(rankings.len(), first, second);
        let record = completed(&rankings, a, b, "D");
        let mut store = store_with(rankings);

        let application = store.apply_match(&record).unwrap();
        let MatchApplication::Updated { modifier, team_a, team_b, .. } = application else {
            panic!("completed draw must update the table");
        };

        prop_assert!((team_a.points_delta() + modifier).abs() <= 0.005 + 1e-9);
        prop_assert!((team_b.points_delta() + modifier).abs() <= 0.005 + 1e-9);
    }

    #[test]
    fn no_result_changes_nothing(
        rankings in rankings_strategy(),
        first in any::<Index>(),
        second in any::<Index>(),
    ) {
        let (a, b) = pick_pair(rankings.len(), first, second);
        let record = completed(&rankings, a, b, "N");
        let mut store = store_with(rankings.clone());

        prop_assert_eq!(store.apply_match(&record).unwrap(), MatchApplication::NoResult);
        prop_assert_eq!(store.rankings(), rankings.as_slice());
    }

    #[test]
    fn gap_beyond_ten_is_capped(
        base in 0u32..5_000,
        gap in 701u32..5_000,
    ) {
        // Home side leads by more than 7, so the home-adjusted diff exceeds 10
        let home = (base + gap) as f64 / 100.0;
        let away = base as f64 / 100.0;
        let rankings = vec![
            StandingEntry::new(Team::new(1, "Home"), 1, home),
            StandingEntry::new(Team::new(2, "Away"), 2, away),
        ];

        let mut store = store_with(rankings.clone());
        let application = store.apply_match(&completed(&rankings, 0, 1, "A")).unwrap();
        let MatchApplication::Updated { ranking_diff, modifier, .. } = application else {
            panic!("expected update");
        };
        prop_assert_eq!(ranking_diff, 10.0);
        prop_assert_eq!(modifier, 0.0);
        prop_assert_eq!(points_of(store.rankings(), 1), home);

        let mut store = store_with(rankings.clone());
        store.apply_match(&completed(&rankings, 0, 1, "B")).unwrap();
        prop_assert!((points_of(store.rankings(), 1) - (home - 2.0)).abs() < 0.005 + 1e-9);
        prop_assert!((points_of(store.rankings(), 2) - (away + 2.0)).abs() < 0.005 + 1e-9);
    }

    #[test]
    fn away_side_gap_capped_at_minus_ten(
        base in 0u32..5_000,
        gap in 1_301u32..5_000,
    ) {
        // Away side leads by more than 13, so the home-adjusted diff is below -10
        let home = base as f64 / 100.0;
        let away = (base + gap) as f64 / 100.0;
        let rankings = vec![
            StandingEntry::new(Team::new(1, "Away"), 1, away),
            StandingEntry::new(Team::new(2, "Home"), 2, home),
        ];

        let mut store = store_with(rankings.clone());
        let application = store.apply_match(&completed(&rankings, 1, 0, "B")).unwrap();
        let MatchApplication::Updated { ranking_diff, modifier, .. } = application else {
            panic!("expected update");
        };
        prop_assert_eq!(ranking_diff, -10.0);
        prop_assert_eq!(modifier, 0.0);
    }
}
