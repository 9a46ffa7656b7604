//! Provider specifications and the HTTP client that turns one provider call
//! into a raw daily series.
//!
//! Providers are configuration: a [`ProviderSpec`] names the endpoint kind,
//! base URL, priority, supported metrics, native units and available period.
//! The [`SourceRegistry`] holds the validated, immutable set for a session
//! and hands the resolver each metric's chain in priority order.

use crate::sources::era5;
use crate::sources::error::SourceError;
use crate::sources::open_meteo;
use crate::sources::units::{vector_magnitude, UnitSchema, WindUnit};
use crate::types::location::LatLon;
use crate::types::metric::Metric;
use crate::types::period::Period;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Which wire protocol/variable catalog a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Open-Meteo historical archive (air, rain, wind).
    OpenMeteoArchive,
    /// Open-Meteo marine grid (sea surface temperature, waves).
    OpenMeteoMarine,
    /// ERA5 reanalysis gateway (all five metrics, Kelvin + wind components).
    Era5Reanalysis,
}

impl EndpointKind {
    /// The daily variables this endpoint serves for a metric, in the order
    /// they are requested. `None` when the endpoint cannot serve the metric.
    pub(crate) fn variables_for(&self, metric: Metric) -> Option<&'static [&'static str]> {
        match self {
            EndpointKind::OpenMeteoArchive => open_meteo::archive_variables(metric),
            EndpointKind::OpenMeteoMarine => open_meteo::marine_variables(metric),
            EndpointKind::Era5Reanalysis => era5::variables(metric),
        }
    }
}

/// Immutable description of one data source, loaded once per run and shared
/// read-only across all resolutions in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub source_id: String,
    pub source_version: String,
    /// Ascending: lower numbers are tried first.
    pub priority: u32,
    pub endpoint: EndpointKind,
    pub base_url: String,
    pub supported_metrics: Vec<Metric>,
    /// Metrics this provider only serves through a derivable proxy measure
    /// (daily-mean temperature for the daily max, smeared rain totals).
    pub proxy_metrics: Vec<Metric>,
    pub unit_schema: UnitSchema,
    pub max_supported_period: Period,
}

impl ProviderSpec {
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.source_id.is_empty() {
            return Err(SourceError::InvalidSpec {
                source_id: "<unnamed>".into(),
                message: "source_id must not be empty".into(),
            });
        }
        if self.base_url.is_empty() {
            return Err(SourceError::InvalidSpec {
                source_id: self.source_id.clone(),
                message: "base_url must not be empty".into(),
            });
        }
        if self.supported_metrics.is_empty() {
            return Err(SourceError::InvalidSpec {
                source_id: self.source_id.clone(),
                message: "provider supports no metrics".into(),
            });
        }
        for metric in &self.supported_metrics {
            if self.endpoint.variables_for(*metric).is_none() {
                return Err(SourceError::InvalidSpec {
                    source_id: self.source_id.clone(),
                    message: format!("endpoint has no '{metric}' variables"),
                });
            }
        }
        for metric in &self.proxy_metrics {
            if !self.supported_metrics.contains(metric) {
                return Err(SourceError::InvalidSpec {
                    source_id: self.source_id.clone(),
                    message: format!("proxy metric '{metric}' is not a supported metric"),
                });
            }
        }
        Ok(())
    }

    pub fn supports(&self, metric: Metric) -> bool {
        self.supported_metrics.contains(&metric)
    }

    pub fn is_proxy_for(&self, metric: Metric) -> bool {
        self.proxy_metrics.contains(&metric)
    }

    /// Comma-joined daily variable list, as requested and as cache-keyed.
    pub(crate) fn variables_string(&self, metric: Metric) -> String {
        self.endpoint
            .variables_for(metric)
            .map(|vars| vars.join(","))
            .unwrap_or_default()
    }
}

/// One day of provider-native data before unit normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSample {
    Scalar(f64),
    /// Eastward/northward wind components.
    Vector { u: f64, v: f64 },
}

/// A provider payload reduced to dated samples, still in native units.
pub type RawSeries = Vec<(NaiveDate, RawSample)>;

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Option<f64>>>,
}

/// A provider spec bound to the session's HTTP client.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    spec: Arc<ProviderSpec>,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    /// Calls the provider for one metric over one (already clipped) period
    /// and reduces the payload to dated native-unit samples.
    ///
    /// Days where any required variable is missing are skipped; they surface
    /// later as reduced coverage, never as invented values.
    pub async fn fetch_raw(
        &self,
        coordinate: LatLon,
        period: Period,
        metric: Metric,
    ) -> Result<RawSeries, SourceError> {
        let variables = self
            .spec
            .endpoint
            .variables_for(metric)
            .ok_or_else(|| SourceError::SchemaMismatch {
                source_id: self.spec.source_id.clone(),
                message: format!("endpoint has no '{metric}' variables"),
            })?;

        let url = &self.spec.base_url;
        let response = self
            .http
            .get(url)
            .query(&[
                ("latitude", coordinate.0.to_string()),
                ("longitude", coordinate.1.to_string()),
                ("start_date", period.start_date().to_string()),
                ("end_date", period.end_date().to_string()),
                ("daily", variables.join(",")),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    SourceError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    SourceError::NetworkRequest(url.clone(), e)
                });
            }
        };

        let payload: DailyResponse =
            response
                .json()
                .await
                .map_err(|e| SourceError::SchemaMismatch {
                    source_id: self.spec.source_id.clone(),
                    message: format!("undecodable daily payload: {e}"),
                })?;

        self.samples_from_payload(payload, variables, metric)
    }

    fn samples_from_payload(
        &self,
        payload: DailyResponse,
        variables: &[&str],
        metric: Metric,
    ) -> Result<RawSeries, SourceError> {
        let mismatch = |message: String| SourceError::SchemaMismatch {
            source_id: self.spec.source_id.clone(),
            message,
        };

        let columns: Vec<&Vec<Option<f64>>> = variables
            .iter()
            .map(|name| {
                payload
                    .daily
                    .series
                    .get(*name)
                    .ok_or_else(|| mismatch(format!("daily block lacks '{name}'")))
            })
            .collect::<Result<_, _>>()?;

        for (name, column) in variables.iter().zip(&columns) {
            if column.len() != payload.daily.time.len() {
                return Err(mismatch(format!(
                    "column '{name}' has {} values for {} dates",
                    column.len(),
                    payload.daily.time.len()
                )));
            }
        }

        let wants_vector =
            metric == Metric::Wind && self.spec.unit_schema.wind == WindUnit::VectorComponentsMs;
        if wants_vector && variables.len() != 2 {
            return Err(mismatch(
                "vector wind schema needs exactly two component variables".into(),
            ));
        }

        let mut series = RawSeries::with_capacity(payload.daily.time.len());
        for (i, date_str) in payload.daily.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| mismatch(format!("bad date '{date_str}': {e}")))?;
            let sample = if wants_vector {
                match (columns[0][i], columns[1][i]) {
                    (Some(u), Some(v)) => RawSample::Vector { u, v },
                    _ => continue,
                }
            } else {
                match columns[0][i] {
                    Some(value) => RawSample::Scalar(value),
                    None => continue,
                }
            };
            series.push((date, sample));
        }
        Ok(series)
    }
}

/// Normalizes one native-unit sample into the metric's SI unit.
pub fn normalize_sample(
    spec: &ProviderSpec,
    metric: Metric,
    sample: RawSample,
) -> Result<f64, SourceError> {
    let value = match (metric, sample) {
        (Metric::AirTemp | Metric::SeaTemp, RawSample::Scalar(v)) => {
            spec.unit_schema.temperature_to_celsius(v)
        }
        // Precipitation is always reported in millimetres.
        (Metric::Rain, RawSample::Scalar(v)) => v,
        (Metric::Wind, RawSample::Scalar(v)) => spec.unit_schema.wind_to_ms(v),
        (Metric::Wind, RawSample::Vector { u, v }) => vector_magnitude(u, v),
        (Metric::Wave, RawSample::Scalar(v)) => spec.unit_schema.wave_height_to_m(v),
        (_, RawSample::Vector { .. }) => {
            return Err(SourceError::SchemaMismatch {
                source_id: spec.source_id.clone(),
                message: format!("vector sample for scalar metric '{metric}'"),
            })
        }
    };
    Ok(value)
}

/// The session's validated provider set.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    providers: Vec<ProviderClient>,
}

impl SourceRegistry {
    /// Builds the registry, validating every spec and sharing one bounded
    /// HTTP client across providers. `timeout` caps every provider call so
    /// no resolution blocks indefinitely.
    pub fn from_specs(specs: Vec<ProviderSpec>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::HttpClient)?;

        let mut providers = Vec::with_capacity(specs.len());
        for spec in specs {
            spec.validate()?;
            providers.push(ProviderClient {
                spec: Arc::new(spec),
                http: http.clone(),
            });
        }
        Ok(Self { providers })
    }

    /// The providers serving `metric`, in ascending priority order.
    pub fn chain(&self, metric: Metric) -> Vec<&ProviderClient> {
        let mut chain: Vec<&ProviderClient> = self
            .providers
            .iter()
            .filter(|p| p.spec.supports(metric))
            .collect();
        chain.sort_by_key(|p| p.spec.priority);
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::units::TemperatureUnit;

    fn era5_spec() -> ProviderSpec {
        era5::reanalysis_spec("https://example.invalid/era5", Period::new(1950, 2024).unwrap())
    }

    #[test]
    fn default_specs_validate() {
        let period = Period::new(1995, 2024).unwrap();
        for spec in [
            open_meteo::archive_spec("https://example.invalid/archive", period),
            open_meteo::marine_spec("https://example.invalid/marine", period),
            era5_spec(),
        ] {
            spec.validate().unwrap();
        }
    }

    #[test]
    fn validation_rejects_unservable_metric() {
        let mut spec = open_meteo::marine_spec(
            "https://example.invalid/marine",
            Period::new(2020, 2024).unwrap(),
        );
        spec.supported_metrics.push(Metric::AirTemp);
        assert!(matches!(
            spec.validate(),
            Err(SourceError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn validation_rejects_proxy_outside_supported() {
        let mut spec = era5_spec();
        spec.proxy_metrics.push(Metric::Wave);
        spec.supported_metrics.retain(|m| *m != Metric::Wave);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn chain_orders_by_priority() {
        let period = Period::new(1995, 2024).unwrap();
        let registry = SourceRegistry::from_specs(
            vec![
                era5_spec(),
                open_meteo::archive_spec("https://example.invalid/archive", period),
            ],
            Duration::from_secs(5),
        )
        .unwrap();

        let air = registry.chain(Metric::AirTemp);
        assert_eq!(air.len(), 2);
        assert_eq!(air[0].spec().source_id, "open_meteo_archive");
        assert_eq!(air[1].spec().source_id, "era5_reanalysis");

        // Marine metrics are not in this registry at all.
        assert_eq!(registry.chain(Metric::Wave).len(), 1);
    }

    #[test]
    fn normalization_is_schema_driven() {
        let spec = era5_spec();
        assert_eq!(spec.unit_schema.temperature, TemperatureUnit::Kelvin);
        let celsius =
            normalize_sample(&spec, Metric::AirTemp, RawSample::Scalar(300.15)).unwrap();
        assert!((celsius - 27.0).abs() < 1e-9);

        let speed =
            normalize_sample(&spec, Metric::Wind, RawSample::Vector { u: 3.0, v: 4.0 }).unwrap();
        assert!((speed - 5.0).abs() < 1e-12);

        // A vector sample for a scalar metric is a schema violation.
        assert!(normalize_sample(
            &spec,
            Metric::SeaTemp,
            RawSample::Vector { u: 1.0, v: 1.0 }
        )
        .is_err());
    }
}
