//! End-to-end analysis scenarios: netlist or builder in, pin voltages out.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use approx::assert_abs_diff_eq;
use phyengine_bridge::circuit::{CircuitBuilder, CircuitGraph, ComponentId};
use phyengine_bridge::components::{BatterySource, Buzzer, ElementKind, Ground, Resistor, SlideRheostat};
use phyengine_bridge::engine::{LibraryResolver, NativeEngine, ResolverConfig};
use phyengine_bridge::error::Unavailable;
use phyengine_bridge::solver::phyengine_analyze;
use phyengine_bridge::{analyze, dsl, AnalysisSession, PhyError};

fn in_process() -> Arc<NativeEngine> {
    Arc::new(NativeEngine::from_entry(phyengine_analyze))
}

/// A resolver that only sees what a test points it at.
fn isolated_resolver(var: &str) -> LibraryResolver {
    LibraryResolver::with_config(ResolverConfig::new().with_env_var(var).with_search_paths(Vec::new()))
}

/// The crate's own cdylib.
///
/// Cargo writes it next to the test binary in `target/<profile>/deps`, and
/// copies it one level up for plain builds.
fn built_engine() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PHYENGINE_LIB").map(PathBuf::from) {
        return path.is_file().then_some(path);
    }
    let file = libloading::library_filename("phyengine_bridge");
    let mut dirs = Vec::new();
    if let Some(deps) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
        dirs.push(deps.to_path_buf());
        if let Some(profile) = deps.parent() {
            dirs.push(profile.to_path_buf());
        }
    }
    let target = Path::new(env!("CARGO_MANIFEST_DIR")).join("target");
    for profile in ["debug", "release"] {
        dirs.push(target.join(profile).join("deps"));
        dirs.push(target.join(profile));
    }
    dirs.into_iter().map(|dir| dir.join(&file)).find(|p| p.is_file())
}

fn require_built_engine() -> PathBuf {
    let file = libloading::library_filename("phyengine_bridge");
    built_engine().unwrap_or_else(|| panic!("cdylib {:?} not found beside the test binary", file))
}

fn divider() -> (CircuitGraph, ComponentId) {
    let mut b = CircuitBuilder::new();
    let v = b.add("V1", BatterySource::new(5.0)).unwrap();
    let r = b.add("R1", Resistor::new(1000.0)).unwrap();
    let g = b.add("G1", Ground).unwrap();
    b.wire(v, "red", r, "red").unwrap();
    b.wire(v, "black", r, "black").unwrap();
    b.wire(v, "black", g, "i").unwrap();
    (b.build(), r)
}

#[test]
fn battery_and_resistor() {
    let mut b = CircuitBuilder::new();
    let v = b.add("V1", BatterySource::new(5.0)).unwrap();
    let r = b.add("R1", Resistor::new(1000.0)).unwrap();
    let g = b.add("G1", Ground).unwrap();
    b.wire(v, "red", r, "red").unwrap();
    b.wire(v, "black", r, "black").unwrap();
    b.wire(v, "black", g, "i").unwrap();
    let graph = b.build();

    let result = analyze(&in_process(), &graph, "DC", None).unwrap();
    let pins = result.get(r).unwrap();
    assert_eq!(pins.len(), 2);
    assert_abs_diff_eq!(pins[0], 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(pins[1], 0.0, epsilon = 1e-6);
}

#[test]
fn unsupported_element_without_library() {
    let mut b = CircuitBuilder::new();
    let bz = b.add("BZ1", Buzzer).unwrap();
    b.add("G1", Ground).unwrap();
    let graph = b.build();

    // Nothing resolvable: the capability check must fail first.
    let resolver = isolated_resolver("PHYENGINE_TEST_E2E_UNSUPPORTED");
    match analyze(&resolver, &graph, "DC", Some(Path::new("/missing/libphyengine.so"))).unwrap_err() {
        PhyError::UnsupportedElement { kind, component, name, .. } => {
            assert_eq!(kind, ElementKind::Buzzer);
            assert_eq!(component, bz);
            assert_eq!(name, "BZ1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!resolver.is_resolved());
}

#[test]
fn missing_override_is_not_available() {
    let mut b = CircuitBuilder::new();
    b.add("G1", Ground).unwrap();
    let graph = b.build();

    let resolver = isolated_resolver("PHYENGINE_TEST_E2E_MISSING");
    let err = AnalysisSession::new(&resolver)
        .analyze(&graph, "DC", Some(Path::new("/missing/libphyengine.so")))
        .unwrap_err();
    assert!(matches!(
        err,
        PhyError::LibraryNotAvailable {
            reason: Unavailable::NotFound { .. }
        }
    ));
}

#[test]
fn two_resistors_in_series() {
    let mut b = CircuitBuilder::new();
    let v = b.add("V1", BatterySource::new(10.0)).unwrap();
    let r1 = b.add("R1", Resistor::new(1000.0)).unwrap();
    let r2 = b.add("R2", Resistor::new(1000.0)).unwrap();
    let g = b.add("G1", Ground).unwrap();
    b.wire(v, "red", r1, "red").unwrap();
    b.wire(r1, "black", r2, "red").unwrap();
    b.wire(r2, "black", v, "black").unwrap();
    b.wire(v, "black", g, "i").unwrap();
    let graph = b.build();

    let result = analyze(&in_process(), &graph, "DC", None).unwrap();
    assert_abs_diff_eq!(result.pin_voltage(r1, 1).unwrap(), 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.pin_voltage(r2, 0).unwrap(), 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.pin_voltage(r2, 1).unwrap(), 0.0, epsilon = 1e-6);
}

#[test]
fn missing_ground_surfaces_engine_code() {
    let mut b = CircuitBuilder::new();
    let v = b.add("V1", BatterySource::new(5.0)).unwrap();
    let r = b.add("R1", Resistor::new(1000.0)).unwrap();
    b.wire(v, "red", r, "red").unwrap();
    b.wire(v, "black", r, "black").unwrap();
    let graph = b.build();

    match analyze(&in_process(), &graph, "DC", None).unwrap_err() {
        PhyError::NativeAnalysis { code } => assert_eq!(code, 4),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_component_is_analysed() {
    let mut b = CircuitBuilder::new();
    let g = b.add("G1", Ground).unwrap();
    let graph = b.build();

    let result = analyze(&in_process(), &graph, "dc", None).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.get(g).unwrap(), &[0.0]);
}

#[test]
fn netlist_rheostat() {
    let netlist = "
        .analysis dc
        battery  V1 voltage=12
        rheostat RH resistance=1k position=0.25
        gnd      G1
        wire V1:red   RH:a
        wire V1:black RH:b
        wire V1:black G1:i
    ";
    let ast = dsl::parse(netlist).unwrap();
    let graph = dsl::build_circuit(&ast).unwrap();
    assert_eq!(graph.component(ComponentId(1)).unwrap().kind(), ElementKind::SlideRheostat);

    let analysis = ast.analysis.as_deref().unwrap_or("DC");
    let result = analyze(&in_process(), &graph, analysis, None).unwrap();
    let rh = graph.find_component("RH").unwrap();
    let pins = result.get(rh).unwrap();
    assert_abs_diff_eq!(pins[0], 12.0, epsilon = 1e-6);
    assert_abs_diff_eq!(pins[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(pins[2], 9.0, epsilon = 1e-6);
}

#[test]
fn rheostat_builder_matches_netlist() {
    let mut b = CircuitBuilder::new();
    let v = b.add("V1", BatterySource::new(12.0)).unwrap();
    let rh = b.add("RH", SlideRheostat::new(1000.0, 0.25)).unwrap();
    let g = b.add("G1", Ground).unwrap();
    b.wire(v, "red", rh, "a").unwrap();
    b.wire(v, "black", rh, "b").unwrap();
    b.wire(g, "i", v, "black").unwrap();

    let result = analyze(&in_process(), &b.build(), "DC", None).unwrap();
    assert_abs_diff_eq!(result.pin_voltage(rh, 2).unwrap(), 9.0, epsilon = 1e-6);
}

#[test]
fn loaded_library_end_to_end() {
    let path = require_built_engine();
    let (graph, r) = divider();

    let resolver = isolated_resolver("PHYENGINE_TEST_E2E_LOADED");
    let result = analyze(&resolver, &graph, "DC", Some(&path)).unwrap();
    assert_eq!(resolver.resolved_path().as_deref(), Some(path.as_path()));
    assert_abs_diff_eq!(result.pin_voltage(r, 0).unwrap(), 5.0, epsilon = 1e-6);

    // Cached: a different override is ignored.
    let again = analyze(&resolver, &graph, "DC", Some(Path::new("/elsewhere/libphyengine.so"))).unwrap();
    assert_eq!(again, result);

    resolver.reset();
    assert!(!resolver.is_resolved());
}

#[test]
fn concurrent_first_resolution_loads_once() {
    let path = require_built_engine();
    let resolver = Arc::new(isolated_resolver("PHYENGINE_TEST_E2E_CONCURRENT"));
    let start = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let start = Arc::clone(&start);
            let path = path.clone();
            thread::spawn(move || {
                start.wait();
                resolver.resolve(Some(&path)).unwrap()
            })
        })
        .collect();
    let engines: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(engines.iter().all(|e| Arc::ptr_eq(e, &engines[0])));
    assert_eq!(resolver.resolved_path().as_deref(), Some(path.as_path()));

    let (graph, r) = divider();
    let result = analyze(&*resolver, &graph, "DC", None).unwrap();
    assert_abs_diff_eq!(result.pin_voltage(r, 0).unwrap(), 5.0, epsilon = 1e-6);
}
