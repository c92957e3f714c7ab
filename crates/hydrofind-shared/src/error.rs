//! # Error Taxonomy
//!
//! Unified error handling for the hydrofind pipeline. Each variant maps to
//! exactly one effect at the call site (ack-and-drop, retry, terminal write,
//! HTTP status); see `HydroError::kind`.

use thiserror::Error;

/// Pipeline-wide result type.
pub type HydroResult<T> = Result<T, HydroError>;

/// Machine-readable error kind, stored alongside terminal task errors
/// ("Terminal error states include... a machine-readable `kind`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    ClassificationUnknown,
    ExtractionEmpty,
    TransientUpstream,
    CatalogFailure,
    PersistenceFailure,
    TimeoutReclaim,
    Canceled,
    /// Catch-all for failures that reach a task's terminal state but don't
    /// fit a more specific kind (malformed oracle envelope, messaging/db
    /// plumbing failures surfaced mid-task).
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::ClassificationUnknown => "classification_unknown",
            ErrorKind::ExtractionEmpty => "extraction_empty",
            ErrorKind::TransientUpstream => "transient_upstream",
            ErrorKind::CatalogFailure => "catalog_failure",
            ErrorKind::PersistenceFailure => "persistence_failure",
            ErrorKind::TimeoutReclaim => "timeout_reclaim",
            ErrorKind::Canceled => "canceled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Top-level error type for hydrofind components.
#[derive(Debug, Error)]
pub enum HydroError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("component type could not be determined")]
    ClassificationUnknown,

    #[error("parameter extraction returned no data")]
    ExtractionEmpty,

    #[error("transient upstream failure: {0}")]
    TransientUpstream(String),

    #[error("catalog lookup failed: {0}")]
    CatalogFailure(String),

    #[error("task-store write failed: {0}")]
    PersistenceFailure(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("redis error: {0}")]
    Redis(String),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HydroError {
    /// Map this error onto the terminal error taxonomy, where applicable.
    ///
    /// `Config` is init-time only and never reaches a task's terminal state.
    /// `Redis` is deliberately unclassified here: the TaskStore surfaces a
    /// single opaque variant for both a transient read/write timeout
    /// (`transient_upstream`) and the PERSIST-stage commit failure
    /// (`persistence_failure`, nack-requeue rather than counted retry) —
    /// callers that can tell which stage they're in pick the right
    /// `ErrorKind` explicitly instead of inferring it from the variant.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            HydroError::Validation(_) => Some(ErrorKind::Validation),
            HydroError::ClassificationUnknown => Some(ErrorKind::ClassificationUnknown),
            HydroError::ExtractionEmpty => Some(ErrorKind::ExtractionEmpty),
            HydroError::TransientUpstream(_) => Some(ErrorKind::TransientUpstream),
            HydroError::CatalogFailure(_) => Some(ErrorKind::CatalogFailure),
            HydroError::PersistenceFailure(_) => Some(ErrorKind::PersistenceFailure),
            HydroError::Http(e) if e.is_timeout() || e.is_connect() => {
                Some(ErrorKind::TransientUpstream)
            }
            HydroError::Http(_)
            | HydroError::Json(_)
            | HydroError::Messaging(_)
            | HydroError::Database(_)
            | HydroError::Internal(_) => Some(ErrorKind::Internal),
            HydroError::Redis(_) | HydroError::Config(_) => None,
        }
    }

    /// Whether this failure is worth retrying under the retry policy
    /// (network/timeout/connection errors only; never validation or
    /// classification failures).
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), Some(ErrorKind::TransientUpstream))
    }

    pub fn transient_upstream(msg: impl Into<String>) -> Self {
        HydroError::TransientUpstream(msg.into())
    }

    pub fn catalog_failure(msg: impl Into<String>) -> Self {
        HydroError::CatalogFailure(msg.into())
    }

    pub fn persistence_failure(msg: impl Into<String>) -> Self {
        HydroError::PersistenceFailure(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_upstream_is_transient() {
        let err = HydroError::transient_upstream("connection reset");
        assert!(err.is_transient());
        assert_eq!(err.kind(), Some(ErrorKind::TransientUpstream));
    }

    #[test]
    fn validation_is_not_transient() {
        let err = HydroError::Validation("empty query".into());
        assert!(!err.is_transient());
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
    }

    #[test]
    fn classification_unknown_is_not_transient() {
        assert!(!HydroError::ClassificationUnknown.is_transient());
    }

    #[test]
    fn config_error_has_no_kind() {
        let err = HydroError::Config("missing BROKER_HOST".into());
        assert_eq!(err.kind(), None);
        assert!(!err.is_transient());
    }

    #[test]
    fn error_kind_display_matches_spec_names() {
        assert_eq!(ErrorKind::ClassificationUnknown.to_string(), "classification_unknown");
        assert_eq!(ErrorKind::TransientUpstream.to_string(), "transient_upstream");
    }
}
