mod cache;
mod compute;
mod error;
mod littoral;
mod score;
mod sources;
mod types;
mod utils;

pub use error::LittoralError;
pub use littoral::*;

pub use cache::key::CacheKey;
pub use cache::store::{CacheEntry, CacheError, CacheStore};

pub use compute::aggregate::{monthly_field, AggregateConfig, AggregateError};
pub use compute::quality::{display_mark, format_with_mark};

pub use score::comfort::{
    compute_score, score_month, Component, ComponentBreakdown, Params, ParamsError, Rounding,
    ScoreResult,
};

pub use sources::error::SourceError;
pub use sources::provider::{
    EndpointKind, ProviderClient, ProviderSpec, RawSample, RawSeries, SourceRegistry,
};
pub use sources::resolver::{
    LastResortConfig, ResolvePolicy, ResolvedTier, Resolution, SourceResolver,
};
pub use sources::units::{
    ft_to_m, kelvin_to_celsius, kmh_to_ms, mph_to_ms, vector_magnitude, HeightUnit,
    TemperatureUnit, UnitSchema, WindUnit,
};
pub use sources::{era5, open_meteo};

pub use types::daily::DailyRecord;
pub use types::location::{LatLon, Location, WavePoint, WavePointMode};
pub use types::metric::Metric;
pub use types::monthly::{MetricValue, MonthlyRow};
pub use types::period::{days_in_month, Period};
pub use types::provenance::{AttemptOutcome, ProvenanceEntry};
