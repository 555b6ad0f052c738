use thiserror::Error;

/// Errors shared by the Hamiltonian model, the energy surrogate and the
/// optimizers built on top of them.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-domain input, detected before any computation.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A computation produced a non-finite value.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building [`Error::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`Error::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns `true` for [`Error::NumericalInstability`].
    pub fn is_numerical_instability(&self) -> bool {
        matches!(self, Self::NumericalInstability(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
