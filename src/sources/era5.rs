//! ERA5 reanalysis gateway catalog: the second-tier fallback that can serve
//! every metric, at the cost of proxy measures and reanalysis units.

use crate::sources::provider::{EndpointKind, ProviderSpec};
use crate::sources::units::{HeightUnit, TemperatureUnit, UnitSchema, WindUnit};
use crate::types::metric::Metric;
use crate::types::period::Period;

pub(crate) fn variables(metric: Metric) -> Option<&'static [&'static str]> {
    match metric {
        // Daily-mean 2 m temperature in Kelvin; a proxy for the daily max.
        Metric::AirTemp => Some(&["t2m_mean"]),
        // Reanalysis precipitation is smoothed; day counts derived from it
        // are estimates, so the metric is declared a proxy.
        Metric::Rain => Some(&["tp_sum"]),
        Metric::SeaTemp => Some(&["sst_mean"]),
        Metric::Wind => Some(&["u10_mean", "v10_mean"]),
        Metric::Wave => Some(&["swh_mean"]),
    }
}

/// Second-priority spec covering all five metrics.
pub fn reanalysis_spec(base_url: impl Into<String>, max_period: Period) -> ProviderSpec {
    ProviderSpec {
        source_id: "era5_reanalysis".into(),
        source_version: "v1".into(),
        priority: 1,
        endpoint: EndpointKind::Era5Reanalysis,
        base_url: base_url.into(),
        supported_metrics: vec![
            Metric::AirTemp,
            Metric::Rain,
            Metric::SeaTemp,
            Metric::Wind,
            Metric::Wave,
        ],
        proxy_metrics: vec![Metric::AirTemp, Metric::Rain],
        unit_schema: UnitSchema {
            temperature: TemperatureUnit::Kelvin,
            wind: WindUnit::VectorComponentsMs,
            wave_height: HeightUnit::Meters,
        },
        max_supported_period: max_period,
    }
}
