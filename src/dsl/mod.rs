//! Netlist DSL for describing circuits as text.
//!
//! The DSL is line-oriented and human-editable. It mirrors the pin/wire model
//! directly: components are declared by kind and name, and wires join named
//! pins.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | wire | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".analysis" identifier
//! wire        = "wire" pin pin
//! component   = keyword name { param '=' value }
//! pin         = name ':' pin_name
//!
//! value       = number [unit_suffix] | "on" | "off" | "true" | "false"
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Element Keywords
//!
//! | Keyword | Pins | Parameters |
//! |---------|------|------------|
//! | `ground`, `gnd` | `i` | |
//! | `battery` | `red`, `black` | `voltage`, `internal_resistance` |
//! | `isource` | `red`, `black` | `current` |
//! | `resistor` | `red`, `black` | `resistance` |
//! | `switch` | `red`, `black` | `closed` |
//! | `push_switch` | `red`, `black` | `pressed` |
//! | `rheostat` | `a`, `b`, `wiper` | `resistance`, `position` |
//! | `ammeter`, `voltmeter` | `red`, `black` | |
//! | `capacitor` | `red`, `black` | `capacitance` |
//! | `inductor` | `red`, `black` | `inductance` |
//!
//! The remaining catalogue kinds (`diode`, `led`, `transistor`, `opamp`,
//! `lamp`, `buzzer`, `bell`, `logic_input`, `logic_output`, `and`) parse too,
//! but DC analysis rejects them.
//!
//! # Example
//!
//! ```text
//! # 5 V across 1 kOhm
//! .analysis dc
//!
//! battery  V1 voltage=5
//! resistor R1 resistance=1k
//! ground   G1
//!
//! wire V1:red   R1:red
//! wire V1:black R1:black
//! wire V1:black G1:i
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use crate::circuit::{CircuitBuilder, CircuitGraph, PinRef};
use crate::components::Element;
use crate::error::{PhyError, Result};

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a netlist file.
pub fn parse_file(path: &Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| PhyError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// Build a finalized circuit graph from a parsed netlist.
pub fn build_circuit(ast: &CircuitAst) -> Result<CircuitGraph> {
    let mut builder = CircuitBuilder::new();

    for def in &ast.components {
        let element = Element::from_def(def)?;
        builder.add(def.name.clone(), element)?;
    }

    for wire in &ast.wires {
        let a = resolve_pin(&builder, &wire.a, wire.line)?;
        let b = resolve_pin(&builder, &wire.b, wire.line)?;
        builder.connect(a, b)?;
    }

    Ok(builder.build())
}

fn resolve_pin(builder: &CircuitBuilder, end: &PinSpec, line: usize) -> Result<PinRef> {
    let id = builder.find_component(&end.component).ok_or_else(|| {
        PhyError::parse(line, format!("wire references undeclared component '{}'", end.component))
    })?;
    builder.pin(id, &end.pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVIDER: &str = "
        battery  V1 voltage=5
        resistor R1 resistance=1k
        ground   G1
        wire V1:red   R1:red
        wire V1:black R1:black
        wire V1:black G1:i
    ";

    #[test]
    fn test_build_divider() {
        let graph = build_circuit(&parse(DIVIDER).unwrap()).unwrap();
        assert_eq!(graph.components().len(), 3);
        assert_eq!(graph.node_count(), 2);
        let g = graph.find_component("G1").unwrap();
        let v = graph.find_component("V1").unwrap();
        assert_eq!(graph.node_of(PinRef::new(g, 0)), graph.node_of(PinRef::new(v, 1)));
    }

    #[test]
    fn test_undeclared_component_in_wire() {
        let ast = parse("resistor R1\nwire R1:red R9:red").unwrap();
        assert!(matches!(build_circuit(&ast), Err(PhyError::ParseError { line: 2, .. })));
    }

    #[test]
    fn test_unknown_pin_in_wire() {
        let ast = parse("resistor R1\nground G\nwire R1:anode G:i").unwrap();
        assert!(matches!(build_circuit(&ast), Err(PhyError::UnknownPin { .. })));
    }

    #[test]
    fn test_self_wire() {
        let ast = parse("resistor R1\nwire R1:red R1:red").unwrap();
        assert!(matches!(build_circuit(&ast), Err(PhyError::InvalidWire { .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_file(Path::new("/no/such/netlist.phy")),
            Err(PhyError::FileReadError { .. })
        ));
    }
}
