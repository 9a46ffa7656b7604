use crate::cache::store::CacheError;
use crate::compute::aggregate::AggregateError;
use crate::score::comfort::ParamsError;
use crate::sources::error::SourceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LittoralError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    /// Aggregation failed for a specific location; the source names the
    /// metric and month so the failure is never a blank row.
    #[error("could not build monthly normals for '{location_id}'")]
    Aggregation {
        location_id: String,
        #[source]
        source: AggregateError,
    },

    #[error(transparent)]
    InvalidAggregateConfig(AggregateError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
