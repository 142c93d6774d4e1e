//! Component models for circuit description.
//!
//! This module provides the closed catalogue of circuit elements:
//! - Sources: Battery, Current Source, Ground
//! - Linear: Resistor, Capacitor, Inductor
//! - Controls: Switches, Slide Rheostat
//! - Instruments: Ammeter, Voltmeter
//! - Semiconductors: Diode, LED, Transistor, Op-Amp
//! - Appliances: Lamp, Buzzer, Bell
//! - Logic: Logic Input/Output, AND gate
//!
//! Components are plain data. Each kind declares a fixed, ordered list of
//! pins and a flat numeric parameter record; the graph and bridge layers
//! only ever look at the kind tag, the pin arity and that record.

mod appliances;
mod controls;
mod instruments;
mod linear;
mod logic;
mod semiconductors;
mod sources;

pub use appliances::{Buzzer, ElectricBell, IncandescentLamp};
pub use controls::{PushSwitch, SimpleSwitch, SlideRheostat};
pub use instruments::{SimpleAmmeter, SimpleVoltmeter};
pub use linear::{BasicCapacitor, BasicInductor, Resistor, MIN_RESISTANCE};
pub use logic::{AndGate, LogicInput, LogicOutput};
pub use semiconductors::{BasicDiode, LightEmittingDiode, OperationalAmplifier, Transistor, TransistorType};
pub use sources::{BatterySource, CurrentSource, Ground};

use std::collections::HashMap;
use std::fmt;

use crate::circuit::ComponentId;
use crate::dsl::ComponentDef;
use crate::error::{PhyError, Result};

const TWO_TERMINAL: &[&str] = &["red", "black"];

/// The kind tag of an element. The discriminant is the engine's kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ElementKind {
    Ground = 0,
    BatterySource = 1,
    CurrentSource = 2,
    Resistor = 3,
    SimpleSwitch = 4,
    PushSwitch = 5,
    SlideRheostat = 6,
    SimpleAmmeter = 7,
    SimpleVoltmeter = 8,
    BasicCapacitor = 9,
    BasicInductor = 10,
    BasicDiode = 11,
    LightEmittingDiode = 12,
    Transistor = 13,
    OperationalAmplifier = 14,
    IncandescentLamp = 15,
    Buzzer = 16,
    ElectricBell = 17,
    LogicInput = 18,
    LogicOutput = 19,
    AndGate = 20,
}

impl ElementKind {
    /// Every kind in the catalogue, in tag order.
    pub const ALL: [ElementKind; 21] = [
        Self::Ground,
        Self::BatterySource,
        Self::CurrentSource,
        Self::Resistor,
        Self::SimpleSwitch,
        Self::PushSwitch,
        Self::SlideRheostat,
        Self::SimpleAmmeter,
        Self::SimpleVoltmeter,
        Self::BasicCapacitor,
        Self::BasicInductor,
        Self::BasicDiode,
        Self::LightEmittingDiode,
        Self::Transistor,
        Self::OperationalAmplifier,
        Self::IncandescentLamp,
        Self::Buzzer,
        Self::ElectricBell,
        Self::LogicInput,
        Self::LogicOutput,
        Self::AndGate,
    ];

    /// The tag passed across the native call boundary.
    pub fn tag(self) -> u32 {
        self as u32
    }

    /// Look up a kind by its tag.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Pin names in declaration order.
    pub fn pins(self) -> &'static [&'static str] {
        match self {
            Self::Ground | Self::LogicOutput => &["i"],
            Self::LogicInput => &["o"],
            Self::SlideRheostat => &["a", "b", "wiper"],
            Self::Transistor => &["b", "c", "e"],
            Self::OperationalAmplifier => &["plus", "minus", "out"],
            Self::AndGate => &["i_up", "i_low", "o"],
            _ => TWO_TERMINAL,
        }
    }

    /// Number of pins.
    pub fn pin_count(self) -> usize {
        self.pins().len()
    }

    /// Index of the pin with the given name.
    pub fn pin_index(self, name: &str) -> Option<usize> {
        self.pins().iter().position(|p| *p == name)
    }

    /// Parameter names in native record order.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::BatterySource => &["voltage", "internal_resistance"],
            Self::CurrentSource => &["current"],
            Self::Resistor => &["resistance"],
            Self::SimpleSwitch => &["closed"],
            Self::PushSwitch => &["pressed"],
            Self::SlideRheostat => &["resistance", "position"],
            Self::BasicCapacitor => &["capacitance"],
            Self::BasicInductor => &["inductance"],
            Self::Transistor => &["is_pnp"],
            Self::OperationalAmplifier => &["gain"],
            Self::IncandescentLamp => &["rated_voltage", "rated_power"],
            Self::LogicInput => &["high_level", "output_status"],
            Self::AndGate => &["high_level", "low_level"],
            Self::Ground
            | Self::SimpleAmmeter
            | Self::SimpleVoltmeter
            | Self::BasicDiode
            | Self::LightEmittingDiode
            | Self::Buzzer
            | Self::ElectricBell
            | Self::LogicOutput => &[],
        }
    }

    /// Parse a kind from its netlist keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "ground" | "gnd" => Some(Self::Ground),
            "battery" => Some(Self::BatterySource),
            "isource" | "current_source" => Some(Self::CurrentSource),
            "resistor" => Some(Self::Resistor),
            "switch" => Some(Self::SimpleSwitch),
            "push_switch" => Some(Self::PushSwitch),
            "rheostat" => Some(Self::SlideRheostat),
            "ammeter" => Some(Self::SimpleAmmeter),
            "voltmeter" => Some(Self::SimpleVoltmeter),
            "capacitor" => Some(Self::BasicCapacitor),
            "inductor" => Some(Self::BasicInductor),
            "diode" => Some(Self::BasicDiode),
            "led" => Some(Self::LightEmittingDiode),
            "transistor" => Some(Self::Transistor),
            "opamp" => Some(Self::OperationalAmplifier),
            "lamp" => Some(Self::IncandescentLamp),
            "buzzer" => Some(Self::Buzzer),
            "bell" => Some(Self::ElectricBell),
            "logic_input" => Some(Self::LogicInput),
            "logic_output" => Some(Self::LogicOutput),
            "and" => Some(Self::AndGate),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A circuit element with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Ground(Ground),
    BatterySource(BatterySource),
    CurrentSource(CurrentSource),
    Resistor(Resistor),
    SimpleSwitch(SimpleSwitch),
    PushSwitch(PushSwitch),
    SlideRheostat(SlideRheostat),
    SimpleAmmeter(SimpleAmmeter),
    SimpleVoltmeter(SimpleVoltmeter),
    BasicCapacitor(BasicCapacitor),
    BasicInductor(BasicInductor),
    BasicDiode(BasicDiode),
    LightEmittingDiode(LightEmittingDiode),
    Transistor(Transistor),
    OperationalAmplifier(OperationalAmplifier),
    IncandescentLamp(IncandescentLamp),
    Buzzer(Buzzer),
    ElectricBell(ElectricBell),
    LogicInput(LogicInput),
    LogicOutput(LogicOutput),
    AndGate(AndGate),
}

impl Element {
    /// Get the kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Ground(_) => ElementKind::Ground,
            Element::BatterySource(_) => ElementKind::BatterySource,
            Element::CurrentSource(_) => ElementKind::CurrentSource,
            Element::Resistor(_) => ElementKind::Resistor,
            Element::SimpleSwitch(_) => ElementKind::SimpleSwitch,
            Element::PushSwitch(_) => ElementKind::PushSwitch,
            Element::SlideRheostat(_) => ElementKind::SlideRheostat,
            Element::SimpleAmmeter(_) => ElementKind::SimpleAmmeter,
            Element::SimpleVoltmeter(_) => ElementKind::SimpleVoltmeter,
            Element::BasicCapacitor(_) => ElementKind::BasicCapacitor,
            Element::BasicInductor(_) => ElementKind::BasicInductor,
            Element::BasicDiode(_) => ElementKind::BasicDiode,
            Element::LightEmittingDiode(_) => ElementKind::LightEmittingDiode,
            Element::Transistor(_) => ElementKind::Transistor,
            Element::OperationalAmplifier(_) => ElementKind::OperationalAmplifier,
            Element::IncandescentLamp(_) => ElementKind::IncandescentLamp,
            Element::Buzzer(_) => ElementKind::Buzzer,
            Element::ElectricBell(_) => ElementKind::ElectricBell,
            Element::LogicInput(_) => ElementKind::LogicInput,
            Element::LogicOutput(_) => ElementKind::LogicOutput,
            Element::AndGate(_) => ElementKind::AndGate,
        }
    }

    /// Pin names in declaration order.
    pub fn pins(&self) -> &'static [&'static str] {
        self.kind().pins()
    }

    /// Number of pins.
    pub fn pin_count(&self) -> usize {
        self.kind().pin_count()
    }

    /// Flat parameter record, ordered as [`ElementKind::param_names`].
    pub fn params(&self) -> Vec<f64> {
        fn flag(b: bool) -> f64 {
            if b {
                1.0
            } else {
                0.0
            }
        }

        match self {
            Element::BatterySource(b) => vec![b.voltage, b.internal_resistance],
            Element::CurrentSource(i) => vec![i.current],
            Element::Resistor(r) => vec![r.resistance],
            Element::SimpleSwitch(s) => vec![flag(s.closed)],
            Element::PushSwitch(s) => vec![flag(s.pressed)],
            Element::SlideRheostat(r) => vec![r.resistance, r.position],
            Element::BasicCapacitor(c) => vec![c.capacitance],
            Element::BasicInductor(l) => vec![l.inductance],
            Element::Transistor(q) => vec![flag(q.is_pnp())],
            Element::OperationalAmplifier(o) => vec![o.gain],
            Element::IncandescentLamp(l) => vec![l.rated_voltage, l.rated_power],
            Element::LogicInput(l) => vec![l.high_level, flag(l.output_status)],
            Element::AndGate(g) => vec![g.high_level, g.low_level],
            Element::Ground(_)
            | Element::SimpleAmmeter(_)
            | Element::SimpleVoltmeter(_)
            | Element::BasicDiode(_)
            | Element::LightEmittingDiode(_)
            | Element::Buzzer(_)
            | Element::ElectricBell(_)
            | Element::LogicOutput(_) => Vec::new(),
        }
    }

    /// Create an element from a netlist definition.
    ///
    /// Parameters not given in the definition keep the kind's default.
    pub fn from_def(def: &ComponentDef) -> Result<Self> {
        let allowed = def.kind.param_names();
        if let Some(unknown) = def.params.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(PhyError::InvalidParameter {
                component: def.name.clone(),
                param: unknown.clone(),
                message: format!("{} accepts {:?}", def.kind, allowed),
            });
        }

        let p = &def.params;
        let get = |name: &str, default: f64| p.get(name).copied().unwrap_or(default);
        let on = |name: &str| get(name, 0.0) > 0.5;

        let element = match def.kind {
            ElementKind::Ground => Element::Ground(Ground),
            ElementKind::BatterySource => Element::BatterySource(
                BatterySource::new(get("voltage", BatterySource::DEFAULT_VOLTAGE))
                    .with_internal_resistance(get("internal_resistance", 0.0)),
            ),
            ElementKind::CurrentSource => {
                Element::CurrentSource(CurrentSource::new(get("current", CurrentSource::default().current)))
            }
            ElementKind::Resistor => {
                let resistance = positive(def, p, "resistance", Resistor::default().resistance)?;
                Element::Resistor(Resistor::new(resistance))
            }
            ElementKind::SimpleSwitch => Element::SimpleSwitch(SimpleSwitch::new(on("closed"))),
            ElementKind::PushSwitch => Element::PushSwitch(PushSwitch::new(on("pressed"))),
            ElementKind::SlideRheostat => {
                let resistance = positive(def, p, "resistance", SlideRheostat::default().resistance)?;
                Element::SlideRheostat(SlideRheostat::new(resistance, get("position", 0.5)))
            }
            ElementKind::SimpleAmmeter => Element::SimpleAmmeter(SimpleAmmeter),
            ElementKind::SimpleVoltmeter => Element::SimpleVoltmeter(SimpleVoltmeter),
            ElementKind::BasicCapacitor => Element::BasicCapacitor(BasicCapacitor::new(positive(
                def,
                p,
                "capacitance",
                BasicCapacitor::default().capacitance,
            )?)),
            ElementKind::BasicInductor => Element::BasicInductor(BasicInductor::new(positive(
                def,
                p,
                "inductance",
                BasicInductor::default().inductance,
            )?)),
            ElementKind::BasicDiode => Element::BasicDiode(BasicDiode),
            ElementKind::LightEmittingDiode => Element::LightEmittingDiode(LightEmittingDiode),
            ElementKind::Transistor => Element::Transistor(Transistor::new(if on("is_pnp") {
                TransistorType::Pnp
            } else {
                TransistorType::Npn
            })),
            ElementKind::OperationalAmplifier => Element::OperationalAmplifier(OperationalAmplifier::new(
                get("gain", OperationalAmplifier::default().gain),
            )),
            ElementKind::IncandescentLamp => {
                let lamp = IncandescentLamp::default();
                Element::IncandescentLamp(IncandescentLamp::new(
                    get("rated_voltage", lamp.rated_voltage),
                    positive(def, p, "rated_power", lamp.rated_power)?,
                ))
            }
            ElementKind::Buzzer => Element::Buzzer(Buzzer),
            ElementKind::ElectricBell => Element::ElectricBell(ElectricBell),
            ElementKind::LogicInput => {
                let mut input = LogicInput::new(on("output_status"));
                input.high_level = get("high_level", input.high_level);
                Element::LogicInput(input)
            }
            ElementKind::LogicOutput => Element::LogicOutput(LogicOutput),
            ElementKind::AndGate => {
                let gate = AndGate::default();
                Element::AndGate(AndGate::new(
                    get("high_level", gate.high_level),
                    get("low_level", gate.low_level),
                ))
            }
        };

        Ok(element)
    }
}

fn positive(def: &ComponentDef, params: &HashMap<String, f64>, name: &str, default: f64) -> Result<f64> {
    let value = params.get(name).copied().unwrap_or(default);
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PhyError::InvalidParameter {
            component: def.name.clone(),
            param: name.to_string(),
            message: format!("must be a positive number, got {}", value),
        })
    }
}

macro_rules! impl_from_element {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::$ty(value)
                }
            }
        )*
    };
}

impl_from_element!(
    Ground,
    BatterySource,
    CurrentSource,
    Resistor,
    SimpleSwitch,
    PushSwitch,
    SlideRheostat,
    SimpleAmmeter,
    SimpleVoltmeter,
    BasicCapacitor,
    BasicInductor,
    BasicDiode,
    LightEmittingDiode,
    Transistor,
    OperationalAmplifier,
    IncandescentLamp,
    Buzzer,
    ElectricBell,
    LogicInput,
    LogicOutput,
    AndGate,
);

/// A component placed in a circuit.
///
/// Immutable once registered with a [`crate::circuit::CircuitBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    id: ComponentId,
    name: String,
    element: Element,
}

impl Component {
    pub(crate) fn new(id: ComponentId, name: String, element: Element) -> Self {
        Self { id, name, element }
    }

    /// Get the component ID.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the element and its parameters.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Get the kind tag.
    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }

    /// Pin names in declaration order.
    pub fn pins(&self) -> &'static [&'static str] {
        self.element.pins()
    }
}
