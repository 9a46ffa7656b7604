//! Per-metric source resolution: cache-first, then the provider chain in
//! priority order, then usable-stale cache, then a configured last-resort
//! estimate — every tier leaving a provenance entry behind.

use crate::cache::key::CacheKey;
use crate::cache::store::CacheStore;
use crate::sources::error::SourceError;
use crate::sources::provider::{normalize_sample, ProviderSpec, SourceRegistry};
use crate::types::daily::DailyRecord;
use crate::types::location::Location;
use crate::types::metric::Metric;
use crate::types::period::Period;
use crate::types::provenance::{AttemptOutcome, ProvenanceEntry};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Source ID recorded for synthesized last-resort values.
const ESTIMATOR_SOURCE_ID: &str = "estimator";

/// Per-call resolution knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Skip the fresh-cache fast path and re-fetch top to bottom.
    pub force_refresh: bool,
    /// Permit synthesizing a configured estimate once everything else failed.
    pub allow_last_resort: bool,
}

/// Configured per-metric daily estimates for the last-resort tier.
///
/// Absent values mean the tier is simply not available for that metric; no
/// default is ever guessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LastResortConfig {
    pub air_temp_c: Option<f64>,
    pub sea_temp_c: Option<f64>,
    pub rain_mm_per_day: Option<f64>,
    pub wind_ms: Option<f64>,
    pub wave_hs_m: Option<f64>,
}

impl LastResortConfig {
    fn value_for(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AirTemp => self.air_temp_c,
            Metric::Rain => self.rain_mm_per_day,
            Metric::SeaTemp => self.sea_temp_c,
            Metric::Wind => self.wind_ms,
            Metric::Wave => self.wave_hs_m,
        }
    }
}

/// Which tier ultimately committed the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTier {
    /// A fresh cache entry; no provider was called.
    FreshCache,
    /// A live provider fetch.
    Live,
    /// A stale cache entry after every provider failed.
    StaleCache,
    /// A synthesized estimate after providers and cache were exhausted.
    LastResort,
}

/// A committed daily-record sequence plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub records: Vec<DailyRecord>,
    pub tier: ResolvedTier,
    /// The source that committed the records.
    pub source_id: String,
    /// Every attempt made on the way, in order.
    pub provenance: Vec<ProvenanceEntry>,
}

/// Builds the deterministic cache key for one (provider, location, metric,
/// clipped period) request.
pub(crate) fn cache_key_for(
    spec: &ProviderSpec,
    location: &Location,
    metric: Metric,
    period: Period,
) -> CacheKey {
    CacheKey::new(
        &spec.source_id,
        &spec.source_version,
        &location.location_id,
        location.coordinate_for(metric),
        period,
        &spec.variables_string(metric),
        &spec.unit_schema.cache_token(),
    )
}

/// Orchestrates the fallback tiers for every (location, metric) pair.
///
/// One resolver per session; it serializes nothing itself — callers resolve
/// each metric/location pair at most once concurrently, and distinct pairs
/// write to distinct cache keys.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    cache: CacheStore,
    registry: SourceRegistry,
    last_resort: LastResortConfig,
    cache_ttl_seconds: u64,
}

impl SourceResolver {
    pub fn new(
        cache: CacheStore,
        registry: SourceRegistry,
        last_resort: LastResortConfig,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            cache,
            registry,
            last_resort,
            cache_ttl_seconds,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Resolves one metric for one location over the requested period.
    ///
    /// Tier order: fresh cache (unless `force_refresh`), providers by
    /// priority, usable-stale cache, configured last-resort estimate. Only
    /// exhaustion of all four surfaces as [`SourceError::DataUnavailable`];
    /// no synthetic zero-fill is ever substituted.
    pub async fn resolve(
        &self,
        location: &Location,
        metric: Metric,
        period: Period,
        policy: &ResolvePolicy,
    ) -> Result<Resolution, SourceError> {
        let chain = self.registry.chain(metric);
        if chain.is_empty() {
            return Err(SourceError::NoProviderForMetric { metric });
        }

        let mut provenance: Vec<ProvenanceEntry> = Vec::new();

        if !policy.force_refresh {
            for provider in &chain {
                let spec = provider.spec();
                let Some(attempt_period) = period.clip_to(&spec.max_supported_period) else {
                    continue;
                };
                let key = cache_key_for(spec, location, metric, attempt_period);
                if let Some(entry) = self.cache.get(metric.cache_namespace(), &key).await {
                    if self.cache.is_fresh(&entry) {
                        info!(
                            "cache hit for {metric} at '{}' from {}",
                            location.location_id, spec.source_id
                        );
                        provenance.push(ProvenanceEntry {
                            source_id: spec.source_id.clone(),
                            attempted_period: Some(attempt_period),
                            outcome: AttemptOutcome::CacheHit,
                            is_proxy: entry.payload.iter().any(|r| r.is_proxy),
                            period_clipped: attempt_period != period,
                            reason: None,
                        });
                        return Ok(Resolution {
                            records: entry.payload,
                            tier: ResolvedTier::FreshCache,
                            source_id: spec.source_id.clone(),
                            provenance,
                        });
                    }
                }
            }
        }

        let mut last_error: Option<SourceError> = None;
        let mut attempts = 0usize;

        for provider in &chain {
            let spec = provider.spec();
            let Some(attempt_period) = period.clip_to(&spec.max_supported_period) else {
                provenance.push(ProvenanceEntry {
                    source_id: spec.source_id.clone(),
                    attempted_period: None,
                    outcome: AttemptOutcome::PeriodUnsupported,
                    is_proxy: false,
                    period_clipped: false,
                    reason: Some(format!(
                        "requested {period} is outside supported {}",
                        spec.max_supported_period
                    )),
                });
                continue;
            };
            let period_clipped = attempt_period != period;
            attempts += 1;

            let coordinate = location.coordinate_for(metric);
            match provider.fetch_raw(coordinate, attempt_period, metric).await {
                Ok(raw) => {
                    let is_proxy = spec.is_proxy_for(metric);
                    let mut records = Vec::with_capacity(raw.len());
                    let mut normalize_error = None;
                    for (date, sample) in raw {
                        match normalize_sample(spec, metric, sample) {
                            Ok(value) => records.push(DailyRecord {
                                date,
                                metric,
                                value,
                                source_id: spec.source_id.clone(),
                                is_proxy,
                            }),
                            Err(e) => {
                                normalize_error = Some(e);
                                break;
                            }
                        }
                    }
                    if let Some(e) = normalize_error {
                        warn!("{} payload rejected for {metric}: {e}", spec.source_id);
                        provenance.push(ProvenanceEntry {
                            source_id: spec.source_id.clone(),
                            attempted_period: Some(attempt_period),
                            outcome: AttemptOutcome::SchemaMismatch,
                            is_proxy: false,
                            period_clipped,
                            reason: Some(e.to_string()),
                        });
                        last_error = Some(e);
                        continue;
                    }

                    let key = cache_key_for(spec, location, metric, attempt_period);
                    self.cache
                        .put(
                            metric.cache_namespace(),
                            &key,
                            records.clone(),
                            Utc::now(),
                            self.cache_ttl_seconds,
                        )
                        .await?;

                    provenance.push(ProvenanceEntry {
                        source_id: spec.source_id.clone(),
                        attempted_period: Some(attempt_period),
                        outcome: AttemptOutcome::Fetched,
                        is_proxy,
                        period_clipped,
                        reason: None,
                    });
                    return Ok(Resolution {
                        records,
                        tier: ResolvedTier::Live,
                        source_id: spec.source_id.clone(),
                        provenance,
                    });
                }
                Err(e) => {
                    let outcome = match &e {
                        SourceError::SchemaMismatch { .. } => AttemptOutcome::SchemaMismatch,
                        _ => AttemptOutcome::TransportFailure,
                    };
                    warn!(
                        "{} failed for {metric} at '{}': {e}",
                        spec.source_id, location.location_id
                    );
                    provenance.push(ProvenanceEntry {
                        source_id: spec.source_id.clone(),
                        attempted_period: Some(attempt_period),
                        outcome,
                        is_proxy: false,
                        period_clipped,
                        reason: Some(e.to_string()),
                    });
                    last_error = Some(e);
                }
            }
        }

        // Providers are gone; any readable entry is better than nothing.
        for provider in &chain {
            let spec = provider.spec();
            let Some(attempt_period) = period.clip_to(&spec.max_supported_period) else {
                continue;
            };
            let key = cache_key_for(spec, location, metric, attempt_period);
            if let Some(entry) = self.cache.get(metric.cache_namespace(), &key).await {
                warn!(
                    "all providers failed for {metric} at '{}'; using stale cache from {}",
                    location.location_id, spec.source_id
                );
                provenance.push(ProvenanceEntry {
                    source_id: spec.source_id.clone(),
                    attempted_period: Some(attempt_period),
                    outcome: AttemptOutcome::CacheFallback,
                    is_proxy: entry.payload.iter().any(|r| r.is_proxy),
                    period_clipped: attempt_period != period,
                    reason: None,
                });
                return Ok(Resolution {
                    records: entry.payload,
                    tier: ResolvedTier::StaleCache,
                    source_id: spec.source_id.clone(),
                    provenance,
                });
            }
        }

        if policy.allow_last_resort {
            if let Some(daily_value) = self.last_resort.value_for(metric) {
                let reason = format!("configured climatology estimate ({daily_value} per day)");
                warn!(
                    "synthesizing last-resort {metric} for '{}': {reason}",
                    location.location_id
                );
                let records: Vec<DailyRecord> = period
                    .start_date()
                    .iter_days()
                    .take_while(|d| *d <= period.end_date())
                    .map(|date| DailyRecord {
                        date,
                        metric,
                        value: daily_value,
                        source_id: ESTIMATOR_SOURCE_ID.to_string(),
                        is_proxy: true,
                    })
                    .collect();
                provenance.push(ProvenanceEntry {
                    source_id: ESTIMATOR_SOURCE_ID.to_string(),
                    attempted_period: Some(period),
                    outcome: AttemptOutcome::LastResort,
                    is_proxy: true,
                    period_clipped: false,
                    reason: Some(reason),
                });
                return Ok(Resolution {
                    records,
                    tier: ResolvedTier::LastResort,
                    source_id: ESTIMATOR_SOURCE_ID.to_string(),
                    provenance,
                });
            }
        }

        Err(SourceError::DataUnavailable {
            location_id: location.location_id.clone(),
            metric,
            attempts,
            last_error: last_error.map(Box::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::provider::SourceRegistry;
    use crate::sources::{era5, open_meteo};
    use crate::types::location::{WavePoint, WavePointMode};
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use std::time::Duration;

    /// Connection-refused base URL: any live fetch fails fast.
    const DEAD_URL: &str = "http://127.0.0.1:9";

    fn location() -> Location {
        Location {
            location_id: "fue-south".into(),
            country: "Spain".into(),
            resort: "Costa Calma".into(),
            area: "Fuerteventura".into(),
            lat: 28.16,
            lon: -14.23,
            wave_point: WavePoint {
                mode: WavePointMode::Offshore,
                lat: 28.10,
                lon: -14.35,
            },
            timezone: "UTC".into(),
            tags: vec![],
            notes: None,
        }
    }

    fn dead_registry(max_period: Period) -> SourceRegistry {
        SourceRegistry::from_specs(
            vec![
                open_meteo::archive_spec(DEAD_URL, max_period),
                open_meteo::marine_spec(DEAD_URL, max_period),
                era5::reanalysis_spec(DEAD_URL, max_period),
            ],
            Duration::from_millis(500),
        )
        .unwrap()
    }

    fn resolver(cache_dir: &std::path::Path, registry: SourceRegistry) -> SourceResolver {
        SourceResolver::new(
            CacheStore::new(cache_dir),
            registry,
            LastResortConfig::default(),
            30 * 86400,
        )
    }

    fn payload(period: Period, metric: Metric, source_id: &str) -> Vec<DailyRecord> {
        vec![DailyRecord {
            date: NaiveDate::from_ymd_opt(period.start_year(), 6, 15).unwrap(),
            metric,
            value: 23.0,
            source_id: source_id.into(),
            is_proxy: false,
        }]
    }

    #[tokio::test]
    async fn fresh_cache_needs_no_provider() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2020, 2023).unwrap();
        let registry = dead_registry(period);
        let resolver = resolver(dir.path(), registry);
        let loc = location();

        // Seed a fresh entry under the archive provider's key; the dead
        // provider URL proves no live call is attempted.
        let spec = open_meteo::archive_spec(DEAD_URL, period);
        let key = cache_key_for(&spec, &loc, Metric::AirTemp, period);
        resolver
            .cache()
            .put(
                Metric::AirTemp.cache_namespace(),
                &key,
                payload(period, Metric::AirTemp, &spec.source_id),
                Utc::now(),
                30 * 86400,
            )
            .await
            .unwrap();

        let resolution = resolver
            .resolve(&loc, Metric::AirTemp, period, &ResolvePolicy::default())
            .await
            .unwrap();

        assert_eq!(resolution.tier, ResolvedTier::FreshCache);
        assert_eq!(resolution.source_id, "open_meteo_archive");
        assert_eq!(resolution.provenance.len(), 1);
        assert_eq!(resolution.provenance[0].outcome, AttemptOutcome::CacheHit);
    }

    #[tokio::test]
    async fn forced_refresh_falls_back_to_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2020, 2023).unwrap();
        let registry = dead_registry(period);
        let resolver = resolver(dir.path(), registry);
        let loc = location();

        let spec = open_meteo::marine_spec(DEAD_URL, period);
        let key = cache_key_for(&spec, &loc, Metric::SeaTemp, period);
        let stale = Utc::now() - ChronoDuration::days(400);
        resolver
            .cache()
            .put(
                Metric::SeaTemp.cache_namespace(),
                &key,
                payload(period, Metric::SeaTemp, &spec.source_id),
                stale,
                86400,
            )
            .await
            .unwrap();

        let policy = ResolvePolicy {
            force_refresh: true,
            allow_last_resort: false,
        };
        let resolution = resolver
            .resolve(&loc, Metric::SeaTemp, period, &policy)
            .await
            .unwrap();

        assert_eq!(resolution.tier, ResolvedTier::StaleCache);
        let outcomes: Vec<_> = resolution
            .provenance
            .iter()
            .map(|p| p.outcome.clone())
            .collect();
        assert!(outcomes.contains(&AttemptOutcome::TransportFailure));
        assert_eq!(
            resolution.provenance.last().unwrap().outcome,
            AttemptOutcome::CacheFallback
        );
    }

    #[tokio::test]
    async fn exhaustion_without_cache_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2020, 2023).unwrap();
        let registry = dead_registry(period);
        let resolver = resolver(dir.path(), registry);

        let err = resolver
            .resolve(&location(), Metric::Wind, period, &ResolvePolicy::default())
            .await
            .unwrap_err();

        match err {
            SourceError::DataUnavailable {
                location_id,
                metric,
                attempts,
                last_error,
            } => {
                assert_eq!(location_id, "fue-south");
                assert_eq!(metric, Metric::Wind);
                assert_eq!(attempts, 2);
                assert!(last_error.is_some());
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn last_resort_synthesizes_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2023, 2023).unwrap();
        let registry = dead_registry(period);
        let mut resolver = resolver(dir.path(), registry);
        resolver.last_resort = LastResortConfig {
            wave_hs_m: Some(0.8),
            ..LastResortConfig::default()
        };

        let policy = ResolvePolicy {
            force_refresh: false,
            allow_last_resort: true,
        };
        let resolution = resolver
            .resolve(&location(), Metric::Wave, period, &policy)
            .await
            .unwrap();

        assert_eq!(resolution.tier, ResolvedTier::LastResort);
        assert_eq!(resolution.records.len(), 365);
        assert!(resolution.records.iter().all(|r| r.is_proxy));
        assert!(resolution.records.iter().all(|r| r.value == 0.8));
        let last = resolution.provenance.last().unwrap();
        assert_eq!(last.outcome, AttemptOutcome::LastResort);
        assert!(last.reason.is_some());
    }

    #[tokio::test]
    async fn last_resort_requires_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let period = Period::new(2023, 2023).unwrap();
        let registry = dead_registry(period);
        let resolver = resolver(dir.path(), registry);

        let policy = ResolvePolicy {
            force_refresh: false,
            allow_last_resort: true,
        };
        // allow_last_resort without a configured estimate still fails hard.
        let err = resolver
            .resolve(&location(), Metric::Wave, period, &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn clipped_period_is_recorded_in_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let supported = Period::new(2020, 2022).unwrap();
        let requested = Period::new(2015, 2024).unwrap();
        let registry = dead_registry(supported);
        let mut resolver = resolver(dir.path(), registry);
        resolver.last_resort = LastResortConfig {
            air_temp_c: Some(21.0),
            ..LastResortConfig::default()
        };

        let policy = ResolvePolicy {
            force_refresh: false,
            allow_last_resort: true,
        };
        let resolution = resolver
            .resolve(&location(), Metric::AirTemp, requested, &policy)
            .await
            .unwrap();

        let attempt = &resolution.provenance[0];
        assert_eq!(attempt.outcome, AttemptOutcome::TransportFailure);
        assert!(attempt.period_clipped);
        assert_eq!(attempt.attempted_period, Some(supported));
    }

    #[tokio::test]
    async fn disjoint_period_skips_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let supported = Period::new(1950, 1960).unwrap();
        let requested = Period::new(2020, 2024).unwrap();
        let registry = dead_registry(supported);
        let resolver = resolver(dir.path(), registry);

        let err = resolver
            .resolve(
                &location(),
                Metric::AirTemp,
                requested,
                &ResolvePolicy::default(),
            )
            .await
            .unwrap_err();

        // No provider could even be attempted.
        match err {
            SourceError::DataUnavailable { attempts, .. } => assert_eq!(attempts, 0),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }
}
