//! This module provides the main entry point for building monthly coastal
//! climate normals. It wires the disk cache, the per-metric source resolver,
//! the monthly aggregator and the comfort-score engine into one client.

use crate::cache::store::CacheStore;
use crate::compute::aggregate::{monthly_field, AggregateConfig};
use crate::error::LittoralError;
use crate::score::comfort::{score_month, Params, ScoreResult};
use crate::sources::provider::{ProviderSpec, SourceRegistry};
use crate::sources::resolver::{LastResortConfig, ResolvePolicy, SourceResolver};
use crate::types::location::Location;
use crate::types::metric::Metric;
use crate::types::monthly::{MetricValue, MonthlyRow};
use crate::types::period::Period;
use crate::types::provenance::ProvenanceEntry;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CACHE_TTL_SECONDS: u64 = 30 * 86400;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Already-parsed session configuration.
///
/// Loading provider specs, scoring parameters and aggregation settings from
/// files is the caller's concern; this struct is the validated boundary the
/// core accepts. Everything in it is immutable for the session.
#[derive(Debug, Clone)]
pub struct LittoralConfig {
    pub provider_specs: Vec<ProviderSpec>,
    pub params: Params,
    pub aggregate: AggregateConfig,
    pub last_resort: LastResortConfig,
    pub cache_ttl_seconds: u64,
    pub request_timeout: Duration,
}

#[bon]
impl LittoralConfig {
    /// Builder for a session configuration.
    ///
    /// `provider_specs`, `params` and `aggregate` are required; the
    /// last-resort estimator table defaults to empty (the tier stays
    /// unavailable unless values are configured), cache TTL to 30 days and
    /// the per-call HTTP timeout to 60 seconds.
    #[builder]
    pub fn new(
        provider_specs: Vec<ProviderSpec>,
        params: Params,
        aggregate: AggregateConfig,
        last_resort: Option<LastResortConfig>,
        cache_ttl_seconds: Option<u64>,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            provider_specs,
            params,
            aggregate,
            last_resort: last_resort.unwrap_or_default(),
            cache_ttl_seconds: cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            request_timeout: request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

/// Everything one Build/Refresh produces for a location: twelve monthly
/// rows, a score per month, and the full resolution history per metric.
///
/// Export formatting (CSV, Markdown, JSON) is the consumer's concern; this
/// struct is the finalized data handed across that boundary.
#[derive(Debug, Clone)]
pub struct ClimateAssessment {
    pub location_id: String,
    pub period: Period,
    /// Exactly twelve rows, months 1..=12 in order.
    pub rows: Vec<MonthlyRow>,
    /// One score per row, same order.
    pub scores: Vec<ScoreResult>,
    /// Resolution history per metric, in attempt order.
    pub provenance: BTreeMap<Metric, Vec<ProvenanceEntry>>,
}

/// Scores a set of monthly rows under a parameter set, without refetching.
///
/// This is the "what-if" path: rerun the pure scoring over rows already in
/// hand with overridden [`Params`].
pub fn score_rows(rows: &[MonthlyRow], params: &Params) -> Vec<ScoreResult> {
    rows.iter()
        .map(|row| {
            score_month(
                row.month,
                row.air_temp_c.value,
                row.sea_temp_c.value,
                row.rain_days.value,
                row.wind_ms.value,
                row.wave_hs_m.value,
                params,
            )
        })
        .collect()
}

/// The main client for building monthly climate normals.
///
/// Holds the session's cache store, provider registry and parameter set.
/// Create one with [`Littoral::new`] (default cache directory) or
/// [`Littoral::with_cache_folder`], then call [`Littoral::build`] per
/// location.
///
/// # Examples
///
/// ```no_run
/// # use littoral::{Littoral, LittoralConfig, LittoralError};
/// # async fn run(config: LittoralConfig) -> Result<(), LittoralError> {
/// let client = Littoral::new(config).await?;
/// // ... build assessments ...
/// # Ok(())
/// # }
/// ```
pub struct Littoral {
    resolver: SourceResolver,
    params: Params,
    aggregate: AggregateConfig,
}

#[bon]
impl Littoral {
    /// Creates a client with an explicit cache directory.
    ///
    /// The directory is created if missing. All configuration is validated
    /// here, once, so resolution and scoring never meet an invalid setting.
    ///
    /// # Errors
    ///
    /// Returns [`LittoralError::CacheDirCreation`] when the directory cannot
    /// be created, [`LittoralError::InvalidParams`] /
    /// [`LittoralError::InvalidAggregateConfig`] on validation failures, and
    /// [`LittoralError::Source`] when a provider spec is invalid or the HTTP
    /// client cannot be constructed.
    pub async fn with_cache_folder(
        config: LittoralConfig,
        cache_folder: PathBuf,
    ) -> Result<Self, LittoralError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| LittoralError::CacheDirCreation(cache_folder.clone(), e))?;
        config.params.validate()?;
        config
            .aggregate
            .validate()
            .map_err(LittoralError::InvalidAggregateConfig)?;
        let registry = SourceRegistry::from_specs(config.provider_specs, config.request_timeout)?;
        Ok(Self {
            resolver: SourceResolver::new(
                CacheStore::new(cache_folder),
                registry,
                config.last_resort,
                config.cache_ttl_seconds,
            ),
            params: config.params,
            aggregate: config.aggregate,
        })
    }

    /// Creates a client using the default per-user cache directory
    /// (resolved with the `dirs` crate, e.g. `~/.cache/littoral_cache`).
    pub async fn new(config: LittoralConfig) -> Result<Self, LittoralError> {
        let cache_folder = get_cache_dir().map_err(LittoralError::CacheDirResolution)?;
        Self::with_cache_folder(config, cache_folder).await
    }

    /// The session's scoring parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Builds the twelve-month climate table and scores for one location.
    ///
    /// The five metrics resolve concurrently; aggregation waits for all of
    /// them, then produces exactly twelve rows or fails for the whole
    /// location — there are no partial or placeholder rows.
    ///
    /// # Arguments
    ///
    /// * `.location(&Location)`: **Required.** The location to assess.
    /// * `.period(Period)`: **Required.** Inclusive year range of daily data.
    /// * `.force_refresh(bool)`: Optional. Skip fresh cache entries and
    ///   re-fetch top to bottom. Defaults to `false`.
    /// * `.allow_last_resort(bool)`: Optional. Permit configured estimator
    ///   values when providers and cache are exhausted. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// [`LittoralError::Source`] with
    /// [`SourceError::DataUnavailable`](crate::SourceError::DataUnavailable)
    /// when a metric cannot be established at all, and
    /// [`LittoralError::Aggregation`] when a resolved metric has a month
    /// with zero daily records. Both name the location and metric.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use littoral::{Littoral, Location, Period, LittoralError};
    /// # async fn run(client: Littoral, location: Location) -> Result<(), LittoralError> {
    /// let assessment = client
    ///     .build()
    ///     .location(&location)
    ///     .period(Period::new(2015, 2024).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// for (row, score) in assessment.rows.iter().zip(&assessment.scores) {
    ///     println!("month {:>2}: {:>5.1} -> {}", row.month, row.sea_temp_c.value, score.score);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn build(
        &self,
        location: &Location,
        period: Period,
        force_refresh: Option<bool>,
        allow_last_resort: Option<bool>,
    ) -> Result<ClimateAssessment, LittoralError> {
        let policy = ResolvePolicy {
            force_refresh: force_refresh.unwrap_or(false),
            allow_last_resort: allow_last_resort.unwrap_or(false),
        };
        self.build_one(location, period, policy).await
    }

    /// Builds assessments for several locations concurrently.
    ///
    /// Locations are independent; each resolves its five metrics in
    /// parallel and the first hard failure aborts the batch.
    #[builder]
    pub async fn build_many(
        &self,
        locations: &[Location],
        period: Period,
        force_refresh: Option<bool>,
        allow_last_resort: Option<bool>,
    ) -> Result<Vec<ClimateAssessment>, LittoralError> {
        let policy = ResolvePolicy {
            force_refresh: force_refresh.unwrap_or(false),
            allow_last_resort: allow_last_resort.unwrap_or(false),
        };
        try_join_all(
            locations
                .iter()
                .map(|location| self.build_one(location, period, policy)),
        )
        .await
    }

    async fn build_one(
        &self,
        location: &Location,
        period: Period,
        policy: ResolvePolicy,
    ) -> Result<ClimateAssessment, LittoralError> {
        let (air, rain, sea, wind, wave) = tokio::try_join!(
            self.resolver.resolve(location, Metric::AirTemp, period, &policy),
            self.resolver.resolve(location, Metric::Rain, period, &policy),
            self.resolver.resolve(location, Metric::SeaTemp, period, &policy),
            self.resolver.resolve(location, Metric::Wind, period, &policy),
            self.resolver.resolve(location, Metric::Wave, period, &policy),
        )?;

        let mut rows = Vec::with_capacity(12);
        let mut scores = Vec::with_capacity(12);
        for month in 1..=12u32 {
            let row = MonthlyRow {
                location_id: location.location_id.clone(),
                month,
                air_temp_c: self.field(location, &air.records, Metric::AirTemp, month, period)?,
                sea_temp_c: self.field(location, &sea.records, Metric::SeaTemp, month, period)?,
                rain_days: self.field(location, &rain.records, Metric::Rain, month, period)?,
                wind_ms: self.field(location, &wind.records, Metric::Wind, month, period)?,
                wave_hs_m: self.field(location, &wave.records, Metric::Wave, month, period)?,
            };
            scores.push(score_month(
                month,
                row.air_temp_c.value,
                row.sea_temp_c.value,
                row.rain_days.value,
                row.wind_ms.value,
                row.wave_hs_m.value,
                &self.params,
            ));
            rows.push(row);
        }

        let provenance = BTreeMap::from([
            (Metric::AirTemp, air.provenance),
            (Metric::Rain, rain.provenance),
            (Metric::SeaTemp, sea.provenance),
            (Metric::Wind, wind.provenance),
            (Metric::Wave, wave.provenance),
        ]);

        Ok(ClimateAssessment {
            location_id: location.location_id.clone(),
            period,
            rows,
            scores,
            provenance,
        })
    }

    fn field(
        &self,
        location: &Location,
        records: &[crate::types::daily::DailyRecord],
        metric: Metric,
        month: u32,
        period: Period,
    ) -> Result<MetricValue, LittoralError> {
        monthly_field(records, metric, month, period, &self.aggregate).map_err(|e| {
            LittoralError::Aggregation {
                location_id: location.location_id.clone(),
                source: e,
            }
        })
    }
}
