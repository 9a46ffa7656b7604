//! Per-attempt provenance records kept by the source resolver.
//!
//! Every provider attempt, cache decision and estimation leaves an entry, so
//! the full resolution history for a (location, metric) pair can be exported
//! next to the numbers it produced.

use crate::types::period::Period;
use serde::{Deserialize, Serialize};

/// What a single resolution attempt ended in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// A fresh cache entry satisfied the request; no provider was called.
    CacheHit,
    /// The provider was called and its payload normalized successfully.
    Fetched,
    /// The provider was unreachable or timed out.
    TransportFailure,
    /// The provider answered but its payload could not be normalized.
    SchemaMismatch,
    /// The provider's available period does not overlap the request at all.
    PeriodUnsupported,
    /// All providers failed; a stale cache entry was returned instead.
    CacheFallback,
    /// A configured last-resort estimate was synthesized.
    LastResort,
}

impl AttemptOutcome {
    /// Whether this outcome committed records (as opposed to recording a
    /// failed tier).
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::CacheHit
                | AttemptOutcome::Fetched
                | AttemptOutcome::CacheFallback
                | AttemptOutcome::LastResort
        )
    }
}

/// One line of resolution history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEntry {
    /// Provider that was attempted, or `"estimator"` for last-resort values.
    pub source_id: String,
    /// The (possibly clipped) period the attempt covered, when one applies.
    pub attempted_period: Option<Period>,
    pub outcome: AttemptOutcome,
    /// True when the committed records are proxy-derived.
    pub is_proxy: bool,
    /// True when the requested period had to be clipped to the provider's
    /// supported range.
    pub period_clipped: bool,
    /// Error text or estimation reason, when there is one.
    pub reason: Option<String>,
}
