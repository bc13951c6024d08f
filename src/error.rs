//! Error type shared by the cells and the sequence layer.

/// Errors raised while building or running the recurrent modules.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LegoError {
    /// The configuration cannot produce a usable module.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A tensor or carried state disagrees with the configured sizes.
    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Which argument was rejected.
        what: &'static str,
        /// Shape implied by the configuration and the other arguments.
        expected: Vec<usize>,
        /// Shape actually received.
        actual: Vec<usize>,
    },

    /// The sequence layer was asked to run over zero timesteps.
    #[error("input sequence has no timesteps")]
    EmptySequence,
}

impl LegoError {
    pub(crate) fn shape(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Returns `Ok(())` when `actual == expected`, a [`LegoError::ShapeMismatch`] otherwise.
    pub(crate) fn check(what: &'static str, expected: &[usize], actual: &[usize]) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::shape(what, expected, actual))
        }
    }
}
