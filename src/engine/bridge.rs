//! Marshalling between the circuit model and the engine's flat records.

use std::collections::BTreeMap;

use log::debug;

use super::abi::{RawElement, STATUS_OK};
use super::{AnalysisKind, NativeEngine};
use crate::circuit::{CircuitGraph, ComponentId};
use crate::error::{PhyError, Result};
use crate::session::AnalysisResult;

/// Bridge configuration.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConfig {
    /// Hold the engine's call lock for the duration of each native call.
    /// Leave enabled unless the engine is known to be reentrant.
    pub serialize_calls: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { serialize_calls: true }
    }
}

impl BridgeConfig {
    /// Set whether native calls are serialized.
    pub fn with_serialize_calls(mut self, serialize: bool) -> Self {
        self.serialize_calls = serialize;
        self
    }
}

/// Owned backing storage for one element record.
struct Marshalled {
    kind: u32,
    params: Vec<f64>,
    nodes: Vec<usize>,
}

impl Marshalled {
    fn raw(&self) -> RawElement {
        RawElement {
            kind: self.kind,
            params: self.params.as_ptr(),
            param_count: self.params.len(),
            nodes: self.nodes.as_ptr(),
            pin_count: self.nodes.len(),
        }
    }
}

/// Invokes the engine on a finalized circuit.
pub struct NativeBridge<'a> {
    engine: &'a NativeEngine,
    config: BridgeConfig,
}

impl<'a> NativeBridge<'a> {
    /// Create a bridge over a loaded engine.
    pub fn new(engine: &'a NativeEngine, config: BridgeConfig) -> Self {
        Self { engine, config }
    }

    /// Run one analysis.
    ///
    /// The caller is expected to have run the capability filter; the engine
    /// reports unsupported kinds with its own status code otherwise.
    pub fn analyze(&self, graph: &CircuitGraph, analysis: AnalysisKind) -> Result<AnalysisResult> {
        let backing: Vec<Marshalled> = graph
            .components()
            .iter()
            .map(|c| Marshalled {
                kind: c.kind().tag(),
                params: c.element().params(),
                nodes: graph
                    .pin_nodes(c.id())
                    .unwrap_or(&[])
                    .iter()
                    .map(|n| n.index())
                    .collect(),
            })
            .collect();
        // `records` borrows into `backing`; both outlive the call below.
        let records: Vec<RawElement> = backing.iter().map(Marshalled::raw).collect();

        let mut voltages = vec![f64::NAN; graph.node_count()];

        debug!(
            "invoking engine: analysis={}, elements={}, nodes={}",
            analysis,
            records.len(),
            voltages.len()
        );
        let code = self.engine.invoke(analysis, &records, &mut voltages, self.config.serialize_calls);
        if code != STATUS_OK {
            debug!("engine returned status {}", code);
            return Err(PhyError::NativeAnalysis { code });
        }

        let pin_voltages: BTreeMap<ComponentId, Vec<f64>> = graph
            .components()
            .iter()
            .map(|c| {
                let values = graph
                    .pin_nodes(c.id())
                    .unwrap_or(&[])
                    .iter()
                    .map(|n| voltages[n.index()])
                    .collect();
                (c.id(), values)
            })
            .collect();

        Ok(AnalysisResult::new(analysis, pin_voltages, voltages))
    }
}
