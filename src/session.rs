//! Analysis sessions.
//!
//! A session ties the steps of one request together: the analysis kind is
//! parsed, the capability filter runs, the engine is obtained from an
//! [`EngineSource`] and the bridge performs the call. Sessions hold no state
//! between requests; the only shared state is the engine cache inside the
//! source.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::circuit::{check_capability, CircuitGraph, ComponentId};
use crate::engine::{AnalysisKind, BridgeConfig, EngineSource, NativeBridge};
use crate::error::Result;

/// Pin voltages produced by one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    analysis: AnalysisKind,
    pin_voltages: BTreeMap<ComponentId, Vec<f64>>,
    node_voltages: Vec<f64>,
}

impl AnalysisResult {
    pub(crate) fn new(
        analysis: AnalysisKind,
        pin_voltages: BTreeMap<ComponentId, Vec<f64>>,
        node_voltages: Vec<f64>,
    ) -> Self {
        Self {
            analysis,
            pin_voltages,
            node_voltages,
        }
    }

    /// The analysis that produced these values.
    pub fn analysis(&self) -> AnalysisKind {
        self.analysis
    }

    /// Voltages of a component's pins, in pin declaration order.
    pub fn get(&self, id: ComponentId) -> Option<&[f64]> {
        self.pin_voltages.get(&id).map(Vec::as_slice)
    }

    /// Voltage of a single pin.
    pub fn pin_voltage(&self, id: ComponentId, pin: usize) -> Option<f64> {
        self.get(id)?.get(pin).copied()
    }

    /// All components in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &[f64])> {
        self.pin_voltages.iter().map(|(id, v)| (*id, v.as_slice()))
    }

    /// Number of components with results.
    pub fn len(&self) -> usize {
        self.pin_voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pin_voltages.is_empty()
    }

    /// Raw per-node voltages as returned by the engine.
    pub fn node_voltages(&self) -> &[f64] {
        &self.node_voltages
    }
}

/// Runs analyses against engines handed out by a source.
pub struct AnalysisSession<'s, S: EngineSource + ?Sized> {
    source: &'s S,
    bridge: BridgeConfig,
}

impl<'s, S: EngineSource + ?Sized> AnalysisSession<'s, S> {
    /// Create a session with the default bridge configuration.
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            bridge: BridgeConfig::default(),
        }
    }

    /// Replace the bridge configuration.
    pub fn with_bridge_config(mut self, config: BridgeConfig) -> Self {
        self.bridge = config;
        self
    }

    /// Analyse a finalized circuit.
    ///
    /// `analysis` is parsed case-insensitively. `library` overrides the
    /// engine location for sources that honour it.
    pub fn analyze(&self, graph: &CircuitGraph, analysis: &str, library: Option<&Path>) -> Result<AnalysisResult> {
        let kind: AnalysisKind = analysis.parse()?;
        self.analyze_kind(graph, kind, library)
    }

    /// Analyse a finalized circuit with an already parsed analysis kind.
    pub fn analyze_kind(
        &self,
        graph: &CircuitGraph,
        analysis: AnalysisKind,
        library: Option<&Path>,
    ) -> Result<AnalysisResult> {
        // Rejected circuits never reach library resolution.
        check_capability(graph, analysis)?;

        let engine = self.source.engine(library)?;
        debug!(
            "{} analysis of {} components on {:?}",
            analysis,
            graph.components().len(),
            engine
        );
        NativeBridge::new(&engine, self.bridge).analyze(graph, analysis)
    }
}

/// One-shot analysis with the default bridge configuration.
pub fn analyze<S: EngineSource + ?Sized>(
    source: &S,
    graph: &CircuitGraph,
    analysis: &str,
    library: Option<&Path>,
) -> Result<AnalysisResult> {
    AnalysisSession::new(source).analyze(graph, analysis, library)
}
