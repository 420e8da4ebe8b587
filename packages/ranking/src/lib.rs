#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Officer ranking engine.
//!
//! Turns raw per-officer counters into rank-position percentiles, combines
//! them into a weighted composite score, and orders the population by that
//! score. Everything here is pure and synchronous: the caller fetches the
//! records, this crate only computes.

pub mod charts;
pub mod percentile;
pub mod tally;

use std::collections::BTreeMap;

use accountability_ranking_models::{RankedOfficer, RankingOptions};
use accountability_records_models::{Metric, Officer, OfficerCounters, RecordId};
use thiserror::Error;

pub use charts::{radar_for, score_histogram, top_officer_radar, validate_bucket_width};
pub use percentile::{percentile_sets, percentiles};
pub use tally::{current_year, tally_counters};

/// Errors that can occur while configuring or deriving a ranking.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Histogram bucket width outside `[0.01, 100]`.
    #[error("Invalid histogram bucket width {width}: expected 0.01 <= width <= 100")]
    InvalidBucketWidth {
        /// The rejected width.
        width: f64,
    },

    /// A composite weight is negative or not finite.
    #[error("Invalid weight {value} for {metric}")]
    InvalidWeight {
        /// Metric the weight belongs to.
        metric: Metric,
        /// The rejected value.
        value: f64,
    },
}

/// Checks that every composite weight is finite and non-negative.
///
/// Weights that do not sum to 1 are allowed but logged, since scores then
/// leave the `0..=100` axis.
///
/// # Errors
///
/// Returns [`RankingError::InvalidWeight`] for the first offending weight.
pub fn validate_options(options: &RankingOptions) -> Result<(), RankingError> {
    for &metric in Metric::all() {
        let value = options.weights.get(metric);
        if !value.is_finite() || value < 0.0 {
            return Err(RankingError::InvalidWeight { metric, value });
        }
    }

    let total = options.weights.total();
    if (total - 1.0).abs() > 1e-9 {
        log::warn!("Composite weights sum to {total}, scores will not span 0-100");
    }

    Ok(())
}

/// Ranks `officers` by composite score, most concerning first.
///
/// `counters` are matched to officers by id; an officer without an entry is
/// ranked with zeroed counters. Percentiles are computed against the whole
/// population passed in. The sort is stable, so officers with equal scores
/// keep their input order and the same input always yields the same order.
/// An empty population yields an empty ranking.
#[must_use]
pub fn rank_officers(
    officers: &[Officer],
    counters: &[OfficerCounters],
    options: &RankingOptions,
) -> Vec<RankedOfficer> {
    if officers.is_empty() {
        return Vec::new();
    }

    let mut by_id: BTreeMap<&RecordId, &OfficerCounters> = BTreeMap::new();
    for entry in counters {
        by_id.entry(&entry.officer_id).or_insert(entry);
    }

    let aligned: Vec<OfficerCounters> = officers
        .iter()
        .map(|officer| {
            by_id
                .get(&officer.id)
                .map_or_else(|| OfficerCounters::empty(officer.id.clone()), |c| (*c).clone())
        })
        .collect();

    let sets = percentile_sets(&aligned, options.tie_strategy);

    let mut ranking: Vec<RankedOfficer> = officers
        .iter()
        .zip(aligned)
        .zip(sets)
        .map(|((officer, counters), percentiles)| RankedOfficer {
            rank: 0,
            officer: officer.clone(),
            counters,
            composite_score: options.weights.composite(&percentiles),
            percentiles,
        })
        .collect();

    ranking.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

    for (i, entry) in ranking.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    log::debug!("Ranked {} officers", ranking.len());

    ranking
}

/// Percentiles and composite score of a single officer, measured against
/// the whole population.
///
/// Returns `None` if `officer_id` is not in `officers`.
#[must_use]
pub fn officer_percentiles(
    officers: &[Officer],
    counters: &[OfficerCounters],
    officer_id: &RecordId,
    options: &RankingOptions,
) -> Option<RankedOfficer> {
    if !officers.iter().any(|o| &o.id == officer_id) {
        return None;
    }

    rank_officers(officers, counters, options)
        .into_iter()
        .find(|r| &r.officer.id == officer_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountability_ranking_models::{ScoreWeights, TieStrategy};

    fn officer(id: &str) -> Officer {
        Officer {
            id: RecordId::new(id),
            name: format!("Officer {id}"),
            badge_number: None,
            rank: None,
            unit: None,
            appointment_date: None,
        }
    }

    fn counters(id: &str, allegations: u32, force: u32, awards: u32, years: u32) -> OfficerCounters {
        OfficerCounters {
            officer_allegations: allegations,
            use_of_force: force,
            awards,
            service_years: years,
            appointment_known: true,
            ..OfficerCounters::empty(RecordId::new(id))
        }
    }

    fn population() -> (Vec<Officer>, Vec<OfficerCounters>) {
        let officers = ["a", "b", "c", "d", "e"].map(officer).to_vec();
        let counters = vec![
            counters("a", 0, 1, 4, 20),
            counters("b", 10, 8, 0, 2),
            counters("c", 2, 3, 1, 10),
            counters("d", 5, 0, 2, 15),
            counters("e", 0, 2, 3, 5),
        ];
        (officers, counters)
    }

    #[test]
    fn empty_population_ranks_empty() {
        assert!(rank_officers(&[], &[], &RankingOptions::default()).is_empty());
    }

    #[test]
    fn single_officer_is_fifty_everywhere() {
        let officers = vec![officer("solo")];
        let ranking = rank_officers(
            &officers,
            &[counters("solo", 7, 3, 1, 12)],
            &RankingOptions::default(),
        );

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].rank, 1);
        for &metric in Metric::all() {
            assert_eq!(ranking[0].percentiles.get(metric), 50);
        }
        assert!((ranking[0].composite_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn most_concerning_officer_ranks_first() {
        let (officers, counters) = population();
        let ranking = rank_officers(&officers, &counters, &RankingOptions::default());

        assert_eq!(ranking.len(), 5);
        assert_eq!(ranking[0].officer.id.as_str(), "b");
        assert_eq!(ranking[0].percentiles.officer_allegations, 100);
        assert_eq!(ranking[0].percentiles.use_of_force, 100);
        assert_eq!(ranking[0].percentiles.awards, 100);
        assert_eq!(ranking[0].percentiles.service_years, 100);
        assert!((ranking[0].composite_score - 100.0).abs() < 1e-9);

        let ranks: Vec<usize> = ranking.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(
            ranking
                .windows(2)
                .all(|w| w[0].composite_score >= w[1].composite_score)
        );
    }

    #[test]
    fn ranking_is_reproducible() {
        let (officers, counters) = population();
        let options = RankingOptions::default();
        let first = rank_officers(&officers, &counters, &options);
        let second = rank_officers(&officers, &counters, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let officers = ["x", "y", "z"].map(officer).to_vec();
        let counters = vec![
            counters("x", 1, 1, 1, 1),
            counters("y", 1, 1, 1, 1),
            counters("z", 1, 1, 1, 1),
        ];
        let ranking = rank_officers(&officers, &counters, &RankingOptions::default());
        let ids: Vec<&str> = ranking.iter().map(|r| r.officer.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn officers_without_counters_are_zeroed() {
        let officers = vec![officer("known"), officer("missing")];
        let ranking = rank_officers(
            &officers,
            &[counters("known", 3, 3, 0, 0)],
            &RankingOptions::default(),
        );
        let missing = ranking
            .iter()
            .find(|r| r.officer.id.as_str() == "missing")
            .unwrap();
        assert_eq!(missing.counters, OfficerCounters::empty(RecordId::new("missing")));
    }

    #[test]
    fn duplicate_counter_ids_use_first_entry() {
        let officers = vec![officer("a"), officer("b")];
        let ranking = rank_officers(
            &officers,
            &[
                counters("a", 9, 0, 0, 0),
                counters("a", 0, 0, 0, 0),
                counters("b", 1, 0, 0, 0),
            ],
            &RankingOptions::default(),
        );

        assert_eq!(ranking[0].officer.id.as_str(), "a");
        assert_eq!(ranking[0].counters.officer_allegations, 9);
    }

    #[test]
    fn tie_strategy_changes_duplicate_percentiles() {
        let officers = ["a", "b", "c", "d", "e"].map(officer).to_vec();
        let counters: Vec<OfficerCounters> = [("a", 0), ("b", 0), ("c", 2), ("d", 5), ("e", 10)]
            .iter()
            .map(|&(id, n)| counters(id, n, 0, 0, 0))
            .collect();

        let first = rank_officers(
            &officers,
            &counters,
            &RankingOptions {
                tie_strategy: TieStrategy::FirstOccurrence,
                ..RankingOptions::default()
            },
        );
        let last = rank_officers(&officers, &counters, &RankingOptions::default());
        let mid = rank_officers(
            &officers,
            &counters,
            &RankingOptions {
                tie_strategy: TieStrategy::Midrank,
                ..RankingOptions::default()
            },
        );

        let pct = |ranking: &[RankedOfficer], id: &str| {
            ranking
                .iter()
                .find(|r| r.officer.id.as_str() == id)
                .unwrap()
                .percentiles
                .officer_allegations
        };
        assert_eq!(pct(&first, "a"), 0);
        assert_eq!(pct(&first, "b"), 0);
        assert_eq!(pct(&last, "a"), 25);
        assert_eq!(pct(&last, "b"), 25);
        assert_eq!(pct(&last, "c"), 50);
        assert_eq!(pct(&mid, "a"), 13);
        assert_eq!(pct(&mid, "b"), 13);
        assert_eq!(pct(&mid, "e"), 100);
    }

    #[test]
    fn single_officer_lookup_matches_population_ranking() {
        let (officers, counters) = population();
        let options = RankingOptions::default();
        let found = officer_percentiles(&officers, &counters, &RecordId::new("c"), &options).unwrap();
        let full = rank_officers(&officers, &counters, &options);
        assert_eq!(Some(&found), full.iter().find(|r| r.officer.id.as_str() == "c"));

        assert!(officer_percentiles(&officers, &counters, &RecordId::new("nope"), &options).is_none());
    }

    #[test]
    fn rejects_negative_weights() {
        let options = RankingOptions {
            weights: ScoreWeights {
                awards: -0.1,
                ..ScoreWeights::default()
            },
            ..RankingOptions::default()
        };
        assert!(matches!(
            validate_options(&options),
            Err(RankingError::InvalidWeight {
                metric: Metric::Awards,
                ..
            })
        ));
        assert!(validate_options(&RankingOptions::default()).is_ok());
    }
}
