//! Monthly normals: one row per calendar month with per-metric values,
//! coverage and quality flags.

use crate::types::metric::Metric;
use serde::{Deserialize, Serialize};

/// One metric's committed monthly value plus its quality annotations.
///
/// The numeric `value` is always a plain float; `flagged` and `is_proxy` are
/// separate booleans so presentation layers can render a mark without the
/// number itself being polluted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    /// The committed monthly number (mean, or rain-day count).
    pub value: f64,
    /// True when the value was derived through a proxy measure.
    pub is_proxy: bool,
    /// Fraction of expected calendar days that had a daily record, 0..=1.
    pub coverage: f64,
    /// True when coverage fell below the configured minimum.
    pub flagged: bool,
}

/// Climate normals for one location and one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub location_id: String,
    /// Calendar month, 1..=12.
    pub month: u32,
    /// Mean daily-maximum air temperature, °C.
    pub air_temp_c: MetricValue,
    /// Mean sea surface temperature, °C.
    pub sea_temp_c: MetricValue,
    /// Days with ≥ 1 mm precipitation (integer stored as f64).
    pub rain_days: MetricValue,
    /// Mean 10 m wind speed, m/s.
    pub wind_ms: MetricValue,
    /// Mean significant wave height, m.
    pub wave_hs_m: MetricValue,
}

impl MonthlyRow {
    /// The field for a given metric.
    pub fn metric(&self, metric: Metric) -> &MetricValue {
        match metric {
            Metric::AirTemp => &self.air_temp_c,
            Metric::Rain => &self.rain_days,
            Metric::SeaTemp => &self.sea_temp_c,
            Metric::Wind => &self.wind_ms,
            Metric::Wave => &self.wave_hs_m,
        }
    }
}
