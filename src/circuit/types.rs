//! Core types for circuit representation.

use std::fmt;

/// An electrical node: the equivalence class of pins joined by wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Raw index into per-node arrays (the engine's voltage buffer).
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A unique identifier for a component in the circuit.
///
/// Identifiers are assigned in insertion order by the builder and stay
/// stable for the lifetime of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A pin, identified by its owning component and its declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub component: ComponentId,
    pub index: usize,
}

impl PinRef {
    /// Create a new pin reference.
    pub fn new(component: ComponentId, index: usize) -> Self {
        Self { component, index }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.index)
    }
}

/// An ohmic connection between two distinct pins.
///
/// Wires are unordered: `Wire::new(a, b) == Wire::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wire {
    a: PinRef,
    b: PinRef,
}

impl Wire {
    /// Create a wire, normalizing the pin order.
    pub fn new(a: PinRef, b: PinRef) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// The two pins joined by this wire.
    pub fn pins(&self) -> (PinRef, PinRef) {
        (self.a, self.b)
    }
}
