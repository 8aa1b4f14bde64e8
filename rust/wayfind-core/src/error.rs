use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WayfindError {
    /// Rejected at the public API boundary before any computation ran.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The layout cannot produce a queryable waypoint graph.
    #[error("layout configuration error: {0}")]
    Configuration(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Failure reported by a beacon repository backend.
    #[error("repository error: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, WayfindError>;

/// Reject non-finite coordinates; `what` names the offending argument.
pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(WayfindError::InvalidInput(format!("{what} has non-finite coordinates")))
    }
}
