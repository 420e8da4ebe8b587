//! Rank-position percentiles.
//!
//! A percentile here is an officer's position in the sorted column of all
//! officers' values, scaled to `0..=100`. It says nothing about the shape
//! of the distribution, only about order.

use accountability_ranking_models::{PercentileSet, TieStrategy};
use accountability_records_models::{Metric, OfficerCounters};

/// Percentile assigned to every officer when a column has no spread.
pub const UNIFORM_PERCENTILE: u8 = 50;

/// Computes the rank-position percentile of every value in `values`.
///
/// The output is parallel to the input. A column where every value is
/// identical (including a single-officer population) maps to
/// [`UNIFORM_PERCENTILE`] everywhere. Otherwise each value is placed in the
/// ascending sort, its position chosen by `tie_strategy`, and scaled by
/// `round(position / (N - 1) * 100)`. When `inverted` is set the result is
/// flipped to `100 - p`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentiles(values: &[u32], tie_strategy: TieStrategy, inverted: bool) -> Vec<u8> {
    let Some(&head) = values.first() else {
        return Vec::new();
    };

    if values.iter().all(|&v| v == head) {
        return vec![UNIFORM_PERCENTILE; values.len()];
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let span = (sorted.len() - 1) as f64;

    values
        .iter()
        .map(|&value| {
            let first = sorted.partition_point(|&x| x < value);
            let last = sorted.partition_point(|&x| x <= value) - 1;
            let position = match tie_strategy {
                TieStrategy::LastOccurrence => last as f64,
                TieStrategy::FirstOccurrence => first as f64,
                TieStrategy::Midrank => (first + last) as f64 / 2.0,
            };

            let raw = (position / span * 100.0).round();
            let pct = if inverted { (100.0 - raw).max(0.0) } else { raw };
            pct.clamp(0.0, 100.0) as u8
        })
        .collect()
}

/// Computes a [`PercentileSet`] for every entry in `counters`, each metric
/// ranked against the whole slice.
#[must_use]
pub fn percentile_sets(
    counters: &[OfficerCounters],
    tie_strategy: TieStrategy,
) -> Vec<PercentileSet> {
    let mut sets = vec![PercentileSet::default(); counters.len()];

    for &metric in Metric::all() {
        let column: Vec<u32> = counters.iter().map(|c| c.get(metric)).collect();
        let ranked = percentiles(&column, tie_strategy, metric.is_inverted());
        for (set, value) in sets.iter_mut().zip(ranked) {
            set.set(metric, value);
        }
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountability_records_models::RecordId;

    #[test]
    fn empty_column_yields_nothing() {
        assert!(percentiles(&[], TieStrategy::Midrank, false).is_empty());
    }

    #[test]
    fn identical_values_are_all_fifty() {
        for tie in [
            TieStrategy::LastOccurrence,
            TieStrategy::FirstOccurrence,
            TieStrategy::Midrank,
        ] {
            for inverted in [false, true] {
                assert_eq!(percentiles(&[3, 3, 3, 3], tie, inverted), vec![50; 4]);
            }
        }
        assert_eq!(percentiles(&[9], TieStrategy::Midrank, false), vec![50]);
    }

    #[test]
    fn distinct_values_spread_evenly() {
        let values = [40, 10, 30, 0, 20];
        let result = percentiles(&values, TieStrategy::Midrank, false);
        assert_eq!(result, vec![100, 25, 75, 0, 50]);

        let mut sorted = result.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn distinct_values_round_to_nearest() {
        // N = 4 gives steps of 33.33..
        let result = percentiles(&[1, 2, 3, 4], TieStrategy::FirstOccurrence, false);
        assert_eq!(result, vec![0, 33, 67, 100]);
    }

    #[test]
    fn duplicates_share_first_position() {
        let result = percentiles(&[0, 0, 2, 5, 10], TieStrategy::FirstOccurrence, false);
        assert_eq!(result, vec![0, 0, 50, 75, 100]);
    }

    #[test]
    fn duplicates_share_last_position_by_default() {
        let result = percentiles(&[0, 0, 2, 5, 10], TieStrategy::default(), false);
        assert_eq!(result, vec![25, 25, 50, 75, 100]);
    }

    #[test]
    fn duplicates_share_midrank_position() {
        let result = percentiles(&[0, 0, 2, 5, 10], TieStrategy::Midrank, false);
        assert_eq!(result, vec![13, 13, 50, 75, 100]);
    }

    #[test]
    fn inverted_duplicates_share_one_percentile() {
        let result = percentiles(&[3, 0, 3, 9], TieStrategy::default(), true);
        assert_eq!(result[0], result[2]);
        assert_eq!(result, vec![33, 100, 33, 0]);
    }

    #[test]
    fn inverted_metric_decreases_with_raw_value() {
        let values = [0, 5, 10, 20, 40];
        let result = percentiles(&values, TieStrategy::Midrank, true);
        assert_eq!(result, vec![100, 75, 50, 25, 0]);
        assert!(result.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn sets_rank_each_metric_independently() {
        let counters = vec![
            OfficerCounters {
                officer_allegations: 10,
                use_of_force: 0,
                awards: 0,
                service_years: 2,
                ..OfficerCounters::empty(RecordId::new("a"))
            },
            OfficerCounters {
                officer_allegations: 0,
                use_of_force: 4,
                awards: 3,
                service_years: 20,
                ..OfficerCounters::empty(RecordId::new("b"))
            },
        ];

        let sets = percentile_sets(&counters, TieStrategy::Midrank);

        assert_eq!(sets[0].officer_allegations, 100);
        assert_eq!(sets[1].officer_allegations, 0);
        assert_eq!(sets[0].use_of_force, 0);
        assert_eq!(sets[1].use_of_force, 100);
        // Inverted: fewer awards and less service is more concerning.
        assert_eq!(sets[0].awards, 100);
        assert_eq!(sets[1].awards, 0);
        assert_eq!(sets[0].service_years, 100);
        assert_eq!(sets[1].service_years, 0);
        // No civilian allegations anywhere: no spread.
        assert_eq!(sets[0].civilian_allegations, 50);
        assert_eq!(sets[1].civilian_allegations, 50);
    }
}
