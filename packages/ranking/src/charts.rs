//! Chart data derived from a ranking: the top-officer radar and the
//! composite score histogram.

use accountability_ranking_models::{RadarPoint, RankedOfficer, ScoreBucket};
use accountability_records_models::Metric;

use crate::RankingError;

/// Upper end of the score axis.
pub const MAX_SCORE: f64 = 100.0;

/// Narrowest accepted bucket width. Caps a histogram at 10,000 buckets.
pub const MIN_BUCKET_WIDTH: f64 = 0.01;

/// Checks that `bucket_width` is finite and within
/// `MIN_BUCKET_WIDTH..=MAX_SCORE`.
///
/// # Errors
///
/// Returns [`RankingError::InvalidBucketWidth`] otherwise.
pub fn validate_bucket_width(bucket_width: f64) -> Result<(), RankingError> {
    if !bucket_width.is_finite() || !(MIN_BUCKET_WIDTH..=MAX_SCORE).contains(&bucket_width) {
        return Err(RankingError::InvalidBucketWidth {
            width: bucket_width,
        });
    }
    Ok(())
}

/// Radar axes for one officer, one per metric.
#[must_use]
pub fn radar_for(officer: &RankedOfficer) -> Vec<RadarPoint> {
    Metric::all()
        .iter()
        .map(|&metric| RadarPoint {
            metric,
            label: metric.label().to_string(),
            value: officer.percentiles.get(metric),
        })
        .collect()
}

/// Radar axes for the first officer of `ranking`, if any.
#[must_use]
pub fn top_officer_radar(ranking: &[RankedOfficer]) -> Option<Vec<RadarPoint>> {
    ranking.first().map(radar_for)
}

/// Buckets composite scores into bins of `bucket_width` over `0..=100`.
///
/// Bins are half-open except the last, which also takes a score of exactly
/// 100. Scores outside the axis (possible with custom weights that sum past
/// 1) are clamped into the edge bins.
///
/// # Errors
///
/// Returns [`RankingError::InvalidBucketWidth`] if
/// [`validate_bucket_width`] rejects `bucket_width`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn score_histogram(
    ranking: &[RankedOfficer],
    bucket_width: f64,
) -> Result<Vec<ScoreBucket>, RankingError> {
    validate_bucket_width(bucket_width)?;

    let bucket_count = (MAX_SCORE / bucket_width).ceil() as usize;
    let mut buckets: Vec<ScoreBucket> = (0..bucket_count)
        .map(|i| {
            let lower = i as f64 * bucket_width;
            ScoreBucket {
                lower,
                upper: (lower + bucket_width).min(MAX_SCORE),
                count: 0,
            }
        })
        .collect();

    for officer in ranking {
        let score = officer.composite_score.clamp(0.0, MAX_SCORE);
        let i = ((score / bucket_width).floor() as usize).min(bucket_count - 1);
        buckets[i].count += 1;
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accountability_ranking_models::PercentileSet;
    use accountability_records_models::{Officer, OfficerCounters, RecordId};

    fn ranked(rank: usize, score: f64) -> RankedOfficer {
        let id = RecordId::new(rank.to_string());
        RankedOfficer {
            rank,
            officer: Officer {
                id: id.clone(),
                name: format!("Officer {rank}"),
                badge_number: None,
                rank: None,
                unit: None,
                appointment_date: None,
            },
            counters: OfficerCounters::empty(id),
            percentiles: PercentileSet {
                officer_allegations: 90,
                civilian_allegations: 50,
                use_of_force: 80,
                awards: 100,
                service_years: 70,
            },
            composite_score: score,
        }
    }

    #[test]
    fn radar_has_one_axis_per_metric() {
        let radar = radar_for(&ranked(1, 85.0));
        assert_eq!(radar.len(), Metric::all().len());
        assert_eq!(radar[0].metric, Metric::OfficerAllegations);
        assert_eq!(radar[0].value, 90);
        assert_eq!(radar[3].label, "Awards");
    }

    #[test]
    fn top_radar_of_empty_ranking_is_none() {
        assert!(top_officer_radar(&[]).is_none());
        assert!(top_officer_radar(&[ranked(1, 10.0)]).is_some());
    }

    #[test]
    fn histogram_counts_edges() {
        let ranking = vec![
            ranked(1, 100.0),
            ranked(2, 95.0),
            ranked(3, 50.0),
            ranked(4, 0.0),
            ranked(5, 9.99),
        ];
        let buckets = score_histogram(&ranking, 10.0).unwrap();

        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[9].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 5);
    }

    #[test]
    fn histogram_uneven_width_caps_last_bucket() {
        let buckets = score_histogram(&[], 30.0).unwrap();
        assert_eq!(buckets.len(), 4);
        assert!((buckets[3].upper - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn histogram_narrowest_width_is_bounded() {
        let buckets = score_histogram(&[ranked(1, 100.0)], MIN_BUCKET_WIDTH).unwrap();
        assert_eq!(buckets.len(), 10_000);
        assert_eq!(buckets[9_999].count, 1);
    }

    #[test]
    fn histogram_rejects_bad_width() {
        for width in [0.0, -5.0, f64::NAN, f64::INFINITY, 150.0, 1e-300, 1e-9, 0.009] {
            assert!(matches!(
                score_histogram(&[], width),
                Err(RankingError::InvalidBucketWidth { .. })
            ));
        }
    }
}
