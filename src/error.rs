//! Error types: edit-boundary validation and snapshot persistence.

/// Errors returned by validated setters on the domain records.
///
/// Calculators never see invalid numbers: edits are rejected here first.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    /// Amount that must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    /// Percentage outside `[0, 100]`.
    #[error("{field} must be within 0..=100, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Check that `value` is finite.
pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

/// Check that `value` is a finite percentage in `[0, 100]`.
pub(crate) fn percent(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

/// Errors from a [`crate::persistence::SnapshotStore`].
#[cfg(feature = "persistence")]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    #[error("malformed snapshot payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
