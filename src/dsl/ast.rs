//! Abstract Syntax Tree types for the netlist DSL.

use std::collections::HashMap;
use std::fmt;

use crate::components::ElementKind;

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default)]
pub struct CircuitAst {
    /// Component instances in declaration order
    pub components: Vec<ComponentDef>,
    /// Wires in declaration order
    pub wires: Vec<WireDef>,
    /// Analysis requested by an `.analysis` directive
    pub analysis: Option<String>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A component definition from the DSL.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    /// Element kind
    pub kind: ElementKind,
    /// Unique component name
    pub name: String,
    /// `param=value` pairs, names lowercased
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// A `<component>:<pin>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSpec {
    pub component: String,
    pub pin: String,
}

impl fmt::Display for PinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.pin)
    }
}

/// A wire definition from the DSL.
#[derive(Debug, Clone)]
pub struct WireDef {
    pub a: PinSpec,
    pub b: PinSpec,
    /// Source line number
    pub line: usize,
}
