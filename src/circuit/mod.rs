//! Circuit graph representation and validation.
//!
//! This module provides the pin/wire model of a circuit. Components are
//! registered with a [`CircuitBuilder`], wired pin to pin, and finalized into
//! a [`CircuitGraph`] whose electrical nodes are the equivalence classes of
//! wired pins.

mod graph;
mod types;
mod validate;

pub use graph::{CircuitBuilder, CircuitGraph};
pub(crate) use graph::UnionFind;
pub use types::*;
pub use validate::check_capability;
