//! Reference analysis engine.
//!
//! A DC engine that speaks the call contract in [`crate::engine::abi`]. It is
//! exported from the `cdylib` build as `phyengine_analyze`, so the crate's
//! own shared library can be loaded by [`crate::engine::LibraryResolver`],
//! and it can be wrapped in-process with
//! [`crate::engine::NativeEngine::from_entry`].
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains node voltages and branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C connect voltage branches to nodes
//! - D holds series resistances of voltage branches
//! - v is the vector of node voltages
//! - j is the vector of branch currents
//! - i is the sum of current sources into each node
//! - e is the vector of branch voltages

mod dc;
mod export;
mod mna;

pub use dc::{solve_dc, DcElement};
pub use export::phyengine_analyze;
pub use mna::MnaMatrix;

use thiserror::Error;

use crate::engine::abi;

/// Shunt conductance from every node to the reference.
pub const GMIN: f64 = 1e-12;

/// Reasons the engine refuses or fails an analysis.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFault {
    #[error("malformed call arguments")]
    InvalidArgument,
    #[error("unknown analysis tag")]
    UnknownAnalysis,
    #[error("element tag {0} is not modelled")]
    UnsupportedElement(u32),
    #[error("circuit has no ground reference")]
    NoGround,
    #[error("singular circuit matrix")]
    Singular,
}

impl EngineFault {
    /// Status code returned across the call boundary.
    pub fn code(self) -> i32 {
        match self {
            EngineFault::InvalidArgument => abi::STATUS_INVALID_ARGUMENT,
            EngineFault::UnknownAnalysis => abi::STATUS_UNKNOWN_ANALYSIS,
            EngineFault::UnsupportedElement(_) => abi::STATUS_UNSUPPORTED_ELEMENT,
            EngineFault::NoGround => abi::STATUS_NO_GROUND,
            EngineFault::Singular => abi::STATUS_SINGULAR,
        }
    }
}
