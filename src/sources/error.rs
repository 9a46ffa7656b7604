use crate::cache::store::CacheError;
use crate::types::metric::Metric;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to construct HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("payload from '{source_id}' could not be normalized: {message}")]
    SchemaMismatch { source_id: String, message: String },

    #[error("no provider is configured for metric '{metric}'")]
    NoProviderForMetric { metric: Metric },

    #[error("invalid provider spec '{source_id}': {message}")]
    InvalidSpec { source_id: String, message: String },

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Every tier — providers, stale cache, last-resort estimation — was
    /// exhausted for this metric at this location.
    #[error(
        "no {metric} data could be established for '{location_id}' \
         ({attempts} provider attempt(s) failed, no usable cache, no estimator)"
    )]
    DataUnavailable {
        location_id: String,
        metric: Metric,
        attempts: usize,
        #[source]
        last_error: Option<Box<SourceError>>,
    },
}
