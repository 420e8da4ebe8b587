#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the officer ranking.
//!
//! A ranking is ephemeral: [`RankedOfficer`] values exist only for the
//! duration of one ranking request and are rebuilt from current records
//! every time.

use accountability_records_models::{Metric, Officer, OfficerCounters};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Percentile assigned to an officer on every metric, each in `0..=100`.
///
/// Inverted metrics (awards, service years) are stored already flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileSet {
    /// All allegations.
    pub officer_allegations: u8,
    /// Civilian-filed allegations.
    pub civilian_allegations: u8,
    /// Use-of-force reports.
    pub use_of_force: u8,
    /// Awards (inverted).
    pub awards: u8,
    /// Years of service (inverted).
    pub service_years: u8,
}

impl PercentileSet {
    /// Returns the percentile for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> u8 {
        match metric {
            Metric::OfficerAllegations => self.officer_allegations,
            Metric::CivilianAllegations => self.civilian_allegations,
            Metric::UseOfForce => self.use_of_force,
            Metric::Awards => self.awards,
            Metric::ServiceYears => self.service_years,
        }
    }

    /// Sets the percentile for `metric`.
    pub const fn set(&mut self, metric: Metric, value: u8) {
        match metric {
            Metric::OfficerAllegations => self.officer_allegations = value,
            Metric::CivilianAllegations => self.civilian_allegations = value,
            Metric::UseOfForce => self.use_of_force = value,
            Metric::Awards => self.awards = value,
            Metric::ServiceYears => self.service_years = value,
        }
    }
}

/// Linear weights of the composite score.
///
/// The defaults leave civilian allegations out of the score; they are
/// already counted inside `officer_allegations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoreWeights {
    /// Weight of the allegations percentile.
    pub officer_allegations: f64,
    /// Weight of the civilian allegations percentile.
    pub civilian_allegations: f64,
    /// Weight of the use-of-force percentile.
    pub use_of_force: f64,
    /// Weight of the inverted awards percentile.
    pub awards: f64,
    /// Weight of the inverted service-years percentile.
    pub service_years: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            officer_allegations: 0.4,
            civilian_allegations: 0.0,
            use_of_force: 0.4,
            awards: 0.1,
            service_years: 0.1,
        }
    }
}

impl ScoreWeights {
    /// Returns the weight for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::OfficerAllegations => self.officer_allegations,
            Metric::CivilianAllegations => self.civilian_allegations,
            Metric::UseOfForce => self.use_of_force,
            Metric::Awards => self.awards,
            Metric::ServiceYears => self.service_years,
        }
    }

    /// Weighted sum of `percentiles`. Higher means more concerning.
    #[must_use]
    pub fn composite(&self, percentiles: &PercentileSet) -> f64 {
        Metric::all()
            .iter()
            .map(|&m| self.get(m) * f64::from(percentiles.get(m)))
            .sum()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        Metric::all().iter().map(|&m| self.get(m)).sum()
    }
}

/// Position assigned to values that occur more than once.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TieStrategy {
    /// Last sorted position. Tied officers share the highest percentile of
    /// their block, so a crowd of identical counts is not pushed toward 0.
    #[default]
    LastOccurrence,
    /// First sorted position. Tied officers share the lowest percentile of
    /// their block.
    FirstOccurrence,
    /// Mean of the first and last sorted position, centered on the tied
    /// block.
    Midrank,
}

/// Knobs for one ranking request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RankingOptions {
    /// Composite weights.
    pub weights: ScoreWeights,
    /// Duplicate-value handling.
    pub tie_strategy: TieStrategy,
}

/// One officer's row in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedOfficer {
    /// 1-based position by descending composite score.
    pub rank: usize,
    /// Officer identity.
    pub officer: Officer,
    /// Raw counts the percentiles were computed from.
    pub counters: OfficerCounters,
    /// Per-metric percentiles.
    pub percentiles: PercentileSet,
    /// Weighted composite score.
    pub composite_score: f64,
}

/// One axis of the radar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    /// Metric on this axis.
    pub metric: Metric,
    /// Axis label.
    pub label: String,
    /// Percentile value (0-100).
    pub value: u8,
}

/// One bar of the composite score histogram, `[lower, upper)`.
///
/// The last bucket is closed so that a score of exactly 100 is counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Officers in this bucket.
    pub count: u64,
}
