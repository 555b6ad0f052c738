//! Bond-length dependent H2 Hamiltonian and the closed-form energy surrogate
//! scored by the variational loop.

pub mod energy;
pub mod error;
pub mod hamiltonian;
pub mod params;

pub use energy::{energy, evaluate, Expectations};
pub use error::{Error, Result};
pub use hamiltonian::{
    coefficients, HamiltonianCoefficients, HamiltonianModel, PauliTerm, EQUILIBRIUM_BOND_LENGTH,
};
pub use params::{ParameterVector, NUM_PARAMETERS};
