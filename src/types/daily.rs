use crate::types::metric::Metric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One normalized daily observation as committed by the source resolver.
///
/// `value` is always in the metric's SI unit (°C, mm, m/s, m) — records never
/// carry provider-native units. `is_proxy` marks values derived from a proxy
/// measure (daily-mean temperature standing in for the daily maximum, smeared
/// precipitation totals, a configured last-resort estimate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub metric: Metric,
    pub value: f64,
    pub source_id: String,
    pub is_proxy: bool,
}
