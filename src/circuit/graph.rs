//! Circuit graph structure.
//!
//! [`CircuitBuilder`] accumulates components and wires. [`CircuitBuilder::build`]
//! collapses pins joined by wires into electrical nodes and returns an
//! immutable [`CircuitGraph`] snapshot, which is what the capability filter and
//! the native bridge consume.

use std::collections::HashMap;

use super::types::{ComponentId, NodeId, PinRef, Wire};
use crate::components::{Component, Element};
use crate::error::{PhyError, Result};

/// Union-find over flat indices, used to group connected pins into nodes.
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub(crate) fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Mutable accumulator for components and wires.
///
/// The builder is consumed by [`CircuitBuilder::build`].
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    components: Vec<Component>,
    names: HashMap<String, ComponentId>,
    wires: Vec<Wire>,
}

impl CircuitBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component and return its identity.
    pub fn add(&mut self, name: impl Into<String>, element: impl Into<Element>) -> Result<ComponentId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(PhyError::DuplicateComponent { name });
        }
        let id = ComponentId(self.components.len());
        self.names.insert(name.clone(), id);
        self.components.push(Component::new(id, name, element.into()));
        Ok(id)
    }

    /// Look up a registered component by name.
    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Get a registered component.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Resolve a pin of a registered component by name.
    pub fn pin(&self, id: ComponentId, name: &str) -> Result<PinRef> {
        let component = self.components.get(id.0).ok_or_else(|| {
            let pin = PinRef::new(id, 0);
            PhyError::invalid_wire(pin, pin, format!("component {} is not registered", id))
        })?;
        let index = component.kind().pin_index(name).ok_or_else(|| PhyError::UnknownPin {
            component: id,
            kind: component.kind(),
            pin: name.to_string(),
        })?;
        Ok(PinRef::new(id, index))
    }

    /// Add a wire between two pins.
    ///
    /// Fails with [`PhyError::InvalidWire`] when both ends are the same pin or
    /// either pin does not belong to a registered component.
    pub fn connect(&mut self, a: PinRef, b: PinRef) -> Result<()> {
        if a == b {
            return Err(PhyError::invalid_wire(a, b, "a pin cannot be wired to itself"));
        }
        for pin in [a, b] {
            self.check_pin(a, b, pin)?;
        }
        self.wires.push(Wire::new(a, b));
        Ok(())
    }

    /// Add a wire between two pins named by component and pin name.
    pub fn wire(&mut self, a: ComponentId, pin_a: &str, b: ComponentId, pin_b: &str) -> Result<()> {
        let a = self.pin(a, pin_a)?;
        let b = self.pin(b, pin_b)?;
        self.connect(a, b)
    }

    fn check_pin(&self, a: PinRef, b: PinRef, pin: PinRef) -> Result<()> {
        match self.components.get(pin.component.0) {
            None => Err(PhyError::invalid_wire(
                a,
                b,
                format!("component {} is not registered", pin.component),
            )),
            Some(c) if pin.index >= c.pins().len() => Err(PhyError::invalid_wire(
                a,
                b,
                format!("{} ({}) has only {} pins", c.name(), c.kind(), c.pins().len()),
            )),
            Some(_) => Ok(()),
        }
    }

    /// Finalize the circuit: collapse wired pins into electrical nodes.
    ///
    /// Node numbering walks pins in component insertion order and pin
    /// declaration order, so it depends only on the partition, never on the
    /// order in which wires were added. Unwired pins become singleton nodes.
    pub fn build(self) -> CircuitGraph {
        let mut offsets = Vec::with_capacity(self.components.len());
        let mut total = 0usize;
        for c in &self.components {
            offsets.push(total);
            total += c.pins().len();
        }
        let flat = |p: PinRef| offsets[p.component.0] + p.index;

        let mut uf = UnionFind::new(total);
        for wire in &self.wires {
            let (a, b) = wire.pins();
            uf.union(flat(a), flat(b));
        }

        let mut root_to_node: HashMap<usize, NodeId> = HashMap::new();
        let mut nodes: Vec<Vec<PinRef>> = Vec::new();
        let mut pin_nodes: Vec<Vec<NodeId>> = Vec::with_capacity(self.components.len());

        for c in &self.components {
            let mut mapping = Vec::with_capacity(c.pins().len());
            for index in 0..c.pins().len() {
                let pin = PinRef::new(c.id(), index);
                let root = uf.find(flat(pin));
                let node = *root_to_node.entry(root).or_insert_with(|| {
                    nodes.push(Vec::new());
                    NodeId(nodes.len() - 1)
                });
                nodes[node.0].push(pin);
                mapping.push(node);
            }
            pin_nodes.push(mapping);
        }

        log::debug!(
            "built circuit graph: {} components, {} wires, {} pins, {} nodes",
            self.components.len(),
            self.wires.len(),
            total,
            nodes.len()
        );

        CircuitGraph {
            components: self.components,
            names: self.names,
            wires: self.wires,
            nodes,
            pin_nodes,
        }
    }
}

/// An immutable, finalized circuit.
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    components: Vec<Component>,
    names: HashMap<String, ComponentId>,
    wires: Vec<Wire>,
    /// Member pins of each electrical node
    nodes: Vec<Vec<PinRef>>,
    /// Per component, the node of each pin in declaration order
    pin_nodes: Vec<Vec<NodeId>>,
}

impl CircuitGraph {
    /// All components in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Get a component by ID.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    /// Find a component ID by name.
    pub fn find_component(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Wires as declared.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Number of electrical nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Pins belonging to a node.
    pub fn node_members(&self, node: NodeId) -> &[PinRef] {
        self.nodes.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node of each pin of a component, in pin declaration order.
    pub fn pin_nodes(&self, id: ComponentId) -> Option<&[NodeId]> {
        self.pin_nodes.get(id.0).map(Vec::as_slice)
    }

    /// Node a single pin belongs to.
    pub fn node_of(&self, pin: PinRef) -> Option<NodeId> {
        self.pin_nodes.get(pin.component.0)?.get(pin.index).copied()
    }
}
