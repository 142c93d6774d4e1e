//! DC operating point.

use log::trace;

use super::mna::MnaMatrix;
use super::{EngineFault, GMIN};
use crate::circuit::UnionFind;
use crate::components::{ElementKind, Resistor, SlideRheostat};

/// One element as the engine sees it: a kind, its parameter record and the
/// node of each pin.
#[derive(Debug, Clone, Copy)]
pub struct DcElement<'a> {
    pub kind: ElementKind,
    pub params: &'a [f64],
    pub nodes: &'a [usize],
}

impl<'a> DcElement<'a> {
    fn param(&self, index: usize) -> f64 {
        self.params[index]
    }
}

/// How an element enters the system.
enum Stamp {
    Open,
    Conductance(usize, usize, f64),
    /// Two conductances sharing a middle node.
    Divider(usize, usize, usize, f64, f64),
    Current(usize, usize, f64),
    /// Voltage branch with series resistance.
    Branch(usize, usize, f64, f64),
}

impl Stamp {
    /// Nodes the element conducts between.
    fn terminals(&self) -> Vec<usize> {
        match *self {
            Stamp::Open => Vec::new(),
            Stamp::Conductance(a, b, _) | Stamp::Current(a, b, _) | Stamp::Branch(a, b, ..) => vec![a, b],
            Stamp::Divider(a, mid, b, ..) => vec![a, mid, b],
        }
    }
}

fn stamp_of(e: &DcElement<'_>) -> Result<Stamp, EngineFault> {
    let n = e.nodes;
    let stamp = match e.kind {
        ElementKind::Ground => Stamp::Open,
        ElementKind::BatterySource => Stamp::Branch(n[0], n[1], e.param(0), e.param(1).max(0.0)),
        ElementKind::CurrentSource => Stamp::Current(n[0], n[1], e.param(0)),
        ElementKind::Resistor => Stamp::Conductance(n[0], n[1], Resistor::new(e.param(0)).conductance()),
        ElementKind::SimpleSwitch | ElementKind::PushSwitch => {
            if e.param(0) != 0.0 {
                Stamp::Branch(n[0], n[1], 0.0, 0.0)
            } else {
                Stamp::Open
            }
        }
        ElementKind::SlideRheostat => {
            let rheostat = SlideRheostat::new(e.param(0), e.param(1));
            Stamp::Divider(n[0], n[2], n[1], 1.0 / rheostat.r1(), 1.0 / rheostat.r2())
        }
        ElementKind::SimpleAmmeter | ElementKind::BasicInductor => Stamp::Branch(n[0], n[1], 0.0, 0.0),
        ElementKind::SimpleVoltmeter | ElementKind::BasicCapacitor => Stamp::Open,
        other => return Err(EngineFault::UnsupportedElement(other.tag())),
    };
    Ok(stamp)
}

/// Solve the DC operating point.
///
/// Every node carrying a ground pin is the 0 V reference. Each other node
/// gets a [`GMIN`] shunt to the reference, so pins that are only touched by
/// open elements settle at 0 V instead of making the system singular.
/// Every island of conducting elements must reach a ground of its own;
/// a floating island fails with [`EngineFault::NoGround`].
/// Returns one voltage per node.
pub fn solve_dc(node_count: usize, elements: &[DcElement<'_>]) -> Result<Vec<f64>, EngineFault> {
    let mut grounded = vec![false; node_count];
    let mut branches = 0usize;
    let mut stamps = Vec::with_capacity(elements.len());

    for e in elements {
        if e.nodes.len() != e.kind.pin_count() || e.params.len() != e.kind.param_names().len() {
            return Err(EngineFault::InvalidArgument);
        }
        if e.nodes.iter().any(|&n| n >= node_count) {
            return Err(EngineFault::InvalidArgument);
        }
        let stamp = stamp_of(e)?;
        if e.kind == ElementKind::Ground {
            grounded[e.nodes[0]] = true;
        }
        if matches!(stamp, Stamp::Branch(..)) {
            branches += 1;
        }
        stamps.push(stamp);
    }

    if node_count == 0 {
        return Ok(Vec::new());
    }
    if !grounded.iter().any(|&g| g) {
        return Err(EngineFault::NoGround);
    }
    check_islands(&grounded, &stamps)?;

    // Matrix rows for non-reference nodes, then one per branch.
    let mut index = vec![None; node_count];
    let mut unknowns = 0usize;
    for (node, slot) in index.iter_mut().enumerate() {
        if !grounded[node] {
            *slot = Some(unknowns);
            unknowns += 1;
        }
    }

    let mut matrix = MnaMatrix::new(unknowns + branches);
    for row in 0..unknowns {
        matrix.add(row, row, GMIN);
    }

    let mut br = unknowns;
    for stamp in &stamps {
        match *stamp {
            Stamp::Open => {}
            Stamp::Conductance(a, b, g) => matrix.stamp_conductance(index[a], index[b], g),
            Stamp::Divider(a, mid, b, g1, g2) => {
                matrix.stamp_conductance(index[a], index[mid], g1);
                matrix.stamp_conductance(index[mid], index[b], g2);
            }
            Stamp::Current(a, b, i) => matrix.stamp_current_source(index[a], index[b], i),
            Stamp::Branch(a, b, v, r) => {
                matrix.stamp_voltage_source(index[a], index[b], br, v);
                if r != 0.0 {
                    matrix.add(br, br, -r);
                }
                br += 1;
            }
        }
    }

    trace!(
        "dc system: {} nodes, {} unknowns, {} branches",
        node_count,
        unknowns,
        branches
    );

    matrix.factor()?;
    matrix.solve()?;

    Ok(index.iter().map(|&slot| matrix.voltage(slot)).collect())
}

fn check_islands(grounded: &[bool], stamps: &[Stamp]) -> Result<(), EngineFault> {
    let mut islands = UnionFind::new(grounded.len());
    let mut driven = vec![false; grounded.len()];
    for stamp in stamps {
        let terminals = stamp.terminals();
        for pair in terminals.windows(2) {
            islands.union(pair[0], pair[1]);
        }
        for &node in &terminals {
            driven[node] = true;
        }
    }

    let mut referenced = vec![false; grounded.len()];
    for node in (0..grounded.len()).filter(|&n| grounded[n]) {
        let root = islands.find(node);
        referenced[root] = true;
    }
    for node in (0..grounded.len()).filter(|&n| driven[n]) {
        if !referenced[islands.find(node)] {
            return Err(EngineFault::NoGround);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn el<'a>(kind: ElementKind, params: &'a [f64], nodes: &'a [usize]) -> DcElement<'a> {
        DcElement { kind, params, nodes }
    }

    #[test]
    fn test_battery_across_resistor() {
        // battery red=0 black=1, resistor 0-1, ground on 1
        let v = solve_dc(
            2,
            &[
                el(ElementKind::BatterySource, &[5.0, 0.0], &[0, 1]),
                el(ElementKind::Resistor, &[1000.0], &[0, 1]),
                el(ElementKind::Ground, &[], &[1]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[0], 5.0, epsilon = 1e-6);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn test_internal_resistance_sags() {
        let v = solve_dc(
            2,
            &[
                el(ElementKind::BatterySource, &[10.0, 1.0], &[0, 1]),
                el(ElementKind::Resistor, &[9.0], &[0, 1]),
                el(ElementKind::Ground, &[], &[1]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[0], 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rheostat_divides() {
        // battery 0-2, rheostat a=0 b=2 wiper=1, ground on 2
        let v = solve_dc(
            3,
            &[
                el(ElementKind::BatterySource, &[10.0, 0.0], &[0, 2]),
                el(ElementKind::SlideRheostat, &[100.0, 0.25], &[0, 2, 1]),
                el(ElementKind::Ground, &[], &[2]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[1], 7.5, epsilon = 1e-6);
    }

    #[test]
    fn test_open_switch_isolates() {
        let v = solve_dc(
            3,
            &[
                el(ElementKind::BatterySource, &[5.0, 0.0], &[0, 2]),
                el(ElementKind::SimpleSwitch, &[0.0], &[0, 1]),
                el(ElementKind::Resistor, &[100.0], &[1, 2]),
                el(ElementKind::Ground, &[], &[2]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[0], 5.0, epsilon = 1e-6);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_current_source_into_resistor() {
        // 10 mA pushed from node 1 through the source into node 0
        let v = solve_dc(
            2,
            &[
                el(ElementKind::CurrentSource, &[0.01], &[1, 0]),
                el(ElementKind::Resistor, &[100.0], &[0, 1]),
                el(ElementKind::Ground, &[], &[1]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_ground() {
        let err = solve_dc(2, &[el(ElementKind::Resistor, &[10.0], &[0, 1])]).unwrap_err();
        assert_eq!(err, EngineFault::NoGround);
    }

    #[test]
    fn test_floating_loop_beside_ground() {
        // battery and resistor on nodes 0-1, a lone ground on node 2
        let err = solve_dc(
            3,
            &[
                el(ElementKind::BatterySource, &[5.0, 0.0], &[0, 1]),
                el(ElementKind::Resistor, &[1000.0], &[0, 1]),
                el(ElementKind::Ground, &[], &[2]),
            ],
        )
        .unwrap_err();
        assert_eq!(err, EngineFault::NoGround);
    }

    #[test]
    fn test_unwired_open_pins_read_zero() {
        let v = solve_dc(
            4,
            &[
                el(ElementKind::BatterySource, &[5.0, 0.0], &[0, 1]),
                el(ElementKind::Ground, &[], &[1]),
                el(ElementKind::SimpleVoltmeter, &[], &[2, 3]),
            ],
        )
        .unwrap();
        assert_relative_eq!(v[0], 5.0, epsilon = 1e-6);
        assert_eq!(v[2], 0.0);
        assert_eq!(v[3], 0.0);
    }

    #[test]
    fn test_unsupported_kind() {
        let err = solve_dc(2, &[el(ElementKind::Buzzer, &[], &[0, 1])]).unwrap_err();
        assert_eq!(err, EngineFault::UnsupportedElement(ElementKind::Buzzer.tag()));
    }

    #[test]
    fn test_malformed_record() {
        let err = solve_dc(2, &[el(ElementKind::Resistor, &[10.0], &[0, 7])]).unwrap_err();
        assert_eq!(err, EngineFault::InvalidArgument);
        let err = solve_dc(2, &[el(ElementKind::Resistor, &[], &[0, 1])]).unwrap_err();
        assert_eq!(err, EngineFault::InvalidArgument);
    }

    #[test]
    fn test_shorted_source_is_singular() {
        let err = solve_dc(
            2,
            &[
                el(ElementKind::BatterySource, &[5.0, 0.0], &[0, 1]),
                el(ElementKind::SimpleAmmeter, &[], &[0, 1]),
                el(ElementKind::Ground, &[], &[1]),
            ],
        )
        .unwrap_err();
        assert_eq!(err, EngineFault::Singular);
    }
}
