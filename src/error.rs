//! Error type shared by every stage of a lattice run.

use thiserror::Error;

/// Failures that abort a run. Rejected Metropolis proposals and
/// non-positive correlator averages are not errors.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// A parameter is outside its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A potential or action key that the engine does not know.
    #[error("unknown {kind} selection `{key}`")]
    UnknownSelection { kind: &'static str, key: String },

    /// The requested tables would not fit the allocation budget.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// The stop flag was raised between two samples.
    #[error("run aborted after {completed} of {requested} samples")]
    Aborted { completed: usize, requested: usize },

    #[error("failed to access `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LatticeError>;

/// Upper bound on the number of `f64` entries a single table may hold.
pub const MAX_TABLE_ENTRIES: usize = 1 << 28;

/// Returns `rows * cols`, or a resource error when the product overflows or
/// exceeds [`MAX_TABLE_ENTRIES`].
pub fn checked_table_size(rows: usize, cols: usize, what: &str) -> Result<usize> {
    match rows.checked_mul(cols) {
        Some(n) if n <= MAX_TABLE_ENTRIES => Ok(n),
        _ => Err(LatticeError::ResourceLimit(format!(
            "{what} of {rows} x {cols} exceeds {MAX_TABLE_ENTRIES} entries"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size_within_budget() {
        assert_eq!(checked_table_size(1000, 20, "ensemble").unwrap(), 20_000);
    }

    #[test]
    fn test_table_size_overflow_is_rejected() {
        let err = checked_table_size(usize::MAX, 2, "ensemble").unwrap_err();
        assert!(matches!(err, LatticeError::ResourceLimit(_)));
        assert!(checked_table_size(MAX_TABLE_ENTRIES, 2, "bootstrap").is_err());
    }

    #[test]
    fn test_display_messages() {
        let err = LatticeError::UnknownSelection { kind: "potential", key: "cubic".into() };
        assert_eq!(err.to_string(), "unknown potential selection `cubic`");
        let err = LatticeError::Aborted { completed: 3, requested: 10 };
        assert_eq!(err.to_string(), "run aborted after 3 of 10 samples");
    }
}
