//! Daily→monthly reduction: per-month means, coverage against the calendar,
//! rain-day counting and the proxy estimation path.

use crate::types::daily::DailyRecord;
use crate::types::metric::Metric;
use crate::types::monthly::MetricValue;
use crate::types::period::{days_in_month, Period};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Aggregation settings, validated once per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Minimum daily coverage (0..=1) a month needs to escape flagging.
    pub min_coverage: f64,
    /// Daily precipitation at or above which a day counts as a rain day, mm.
    pub rain_day_threshold_mm: f64,
    /// Divisor turning a month's precipitation total into an estimated
    /// rain-day count on the proxy path. Required; there is no default.
    pub mm_per_rain_day_proxy: f64,
}

#[derive(Debug, Error)]
pub enum AggregateError {
    /// No daily records exist for the metric in this month; a mean over zero
    /// samples is never invented.
    #[error("no daily {metric} records for month {month}; cannot aggregate")]
    EmptyMonth { metric: Metric, month: u32 },

    #[error("invalid aggregation config: {0}")]
    InvalidConfig(String),
}

impl AggregateConfig {
    pub fn validate(&self) -> Result<(), AggregateError> {
        if !self.min_coverage.is_finite() || !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(AggregateError::InvalidConfig(
                "min_coverage must be within 0..=1".into(),
            ));
        }
        if !self.rain_day_threshold_mm.is_finite() || self.rain_day_threshold_mm <= 0.0 {
            return Err(AggregateError::InvalidConfig(
                "rain_day_threshold_mm must be a positive number".into(),
            ));
        }
        if !self.mm_per_rain_day_proxy.is_finite() || self.mm_per_rain_day_proxy <= 0.0 {
            return Err(AggregateError::InvalidConfig(
                "mm_per_rain_day_proxy must be a positive number; it has no default".into(),
            ));
        }
        Ok(())
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Reduces one metric's daily records to its monthly value for `month`.
///
/// Coverage is the mean over the period's years of `days present / calendar
/// days`, so a 31-day month over three years expects 93 records for full
/// coverage. Low coverage flags the value but never discards it; only a month
/// with zero records refuses to produce a value at all.
pub fn monthly_field(
    records: &[DailyRecord],
    metric: Metric,
    month: u32,
    period: Period,
    config: &AggregateConfig,
) -> Result<MetricValue, AggregateError> {
    debug_assert!((1..=12).contains(&month));

    // Bucket this month's records by year, ignoring anything outside the
    // period (a provider may return a little more than asked).
    let mut by_year: BTreeMap<i32, Vec<&DailyRecord>> = BTreeMap::new();
    for record in records {
        if record.date.month() == month && period.contains(record.date) {
            by_year.entry(record.date.year()).or_default().push(record);
        }
    }

    if by_year.is_empty() {
        return Err(AggregateError::EmptyMonth { metric, month });
    }

    let year_count = period.years().count() as f64;
    let coverage = period
        .years()
        .map(|year| {
            let present = by_year.get(&year).map_or(0, |days| days.len()) as f64;
            present / f64::from(days_in_month(year, month))
        })
        .sum::<f64>()
        / year_count;

    let is_proxy = by_year
        .values()
        .flatten()
        .any(|record| record.is_proxy);

    // Mean metrics average per-year monthly means so a sparsely covered year
    // does not outweigh a complete one. Rain counts (or estimates) per year,
    // then averages the counts.
    let value = match metric {
        Metric::Rain => {
            let per_year: Vec<f64> = by_year
                .values()
                .filter(|days| !days.is_empty())
                .map(|days| {
                    if is_proxy {
                        let total: f64 = days.iter().map(|r| r.value).sum();
                        total / config.mm_per_rain_day_proxy
                    } else {
                        days.iter()
                            .filter(|r| r.value >= config.rain_day_threshold_mm)
                            .count() as f64
                    }
                })
                .collect();
            (per_year.iter().sum::<f64>() / per_year.len() as f64).round()
        }
        _ => {
            let per_year: Vec<f64> = by_year
                .values()
                .filter(|days| !days.is_empty())
                .map(|days| days.iter().map(|r| r.value).sum::<f64>() / days.len() as f64)
                .collect();
            round_tenth(per_year.iter().sum::<f64>() / per_year.len() as f64)
        }
    };

    Ok(MetricValue {
        value,
        is_proxy,
        coverage,
        flagged: coverage < config.min_coverage,
    })
}
