//! Capability filter.
//!
//! Rejects circuits containing elements the native engine cannot model for
//! the requested analysis. Runs before any native call.

use crate::engine::AnalysisKind;
use crate::error::{PhyError, Result};

use super::CircuitGraph;

/// Check every component of a finalized circuit against the analysis'
/// supported element set.
///
/// Components are checked in insertion order; the first unsupported one is
/// reported with its kind, identity and name. Nothing is dropped or
/// partially analysed.
pub fn check_capability(graph: &CircuitGraph, analysis: AnalysisKind) -> Result<()> {
    for component in graph.components() {
        let kind = component.kind();
        if !analysis.supports(kind) {
            return Err(PhyError::UnsupportedElement {
                kind,
                component: component.id(),
                name: component.name().to_string(),
                analysis: analysis.to_string(),
            });
        }
    }
    Ok(())
}
