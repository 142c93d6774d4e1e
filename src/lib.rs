//! # PhyEngine Bridge
//!
//! Circuit graph model and bridge to a native DC analysis engine.
//!
//! This library provides:
//! - A typed component/pin/wire model of a circuit
//! - Collapsing of wired pins into electrical nodes
//! - Rejection of components the engine cannot model
//! - Discovery and loading of the native analysis library
//! - Marshalling of the graph into the engine's flat call contract, and of the
//!   resulting node voltages back onto component pins
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`components`] - The closed element catalogue and parameter records
//! - [`circuit`] - Wire builder, finalized graph and capability filter
//! - [`engine`] - Call contract, library resolver, loaded engine and bridge
//! - [`session`] - One analysis request from graph to pin voltages
//! - [`solver`] - Reference DC engine exported as `phyengine_analyze`
//! - [`dsl`] - Parser for the netlist language used by the CLI
//!
//! ## Usage
//!
//! ```no_run
//! use phyengine_bridge::circuit::CircuitBuilder;
//! use phyengine_bridge::components::{BatterySource, Ground, Resistor};
//! use phyengine_bridge::{analyze, LibraryResolver};
//!
//! # fn main() -> phyengine_bridge::Result<()> {
//! let mut b = CircuitBuilder::new();
//! let v = b.add("V1", BatterySource::new(5.0))?;
//! let r = b.add("R1", Resistor::new(1000.0))?;
//! let g = b.add("G1", Ground)?;
//! b.wire(v, "red", r, "red")?;
//! b.wire(v, "black", r, "black")?;
//! b.wire(v, "black", g, "i")?;
//! let graph = b.build();
//!
//! let resolver = LibraryResolver::new();
//! let result = analyze(&resolver, &graph, "DC", None)?;
//! println!("R1: {:?}", result.get(r));
//! # Ok(())
//! # }
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! phyengine analyze divider.phy --library ./target/release/libphyengine_bridge.so
//! ```
//!
//! ## Library Resolution
//!
//! The engine is looked up once per [`LibraryResolver`]: an explicit path
//! first, then the `PHYENGINE_LIB` environment variable (or its older name
//! `PHYSICSLAB_PHYENGINE_LIB`), then the platform search directories. The loaded engine is cached and shared by every
//! session that uses the resolver.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod session;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{CircuitBuilder, CircuitGraph};
pub use engine::{AnalysisKind, BridgeConfig, EngineSource, LibraryResolver, NativeEngine, ResolverConfig};
pub use error::{PhyError, Result};
pub use session::{analyze, AnalysisResult, AnalysisSession};
