//! Semiconductor devices.
//!
//! These carry no DC model in the bridge; the capability filter rejects
//! them before any native call.

/// A junction diode (`red` = anode, `black` = cathode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicDiode;

/// A light emitting diode (`red` = anode, `black` = cathode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightEmittingDiode;

/// Bipolar transistor polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransistorType {
    #[default]
    Npn,
    Pnp,
}

/// A bipolar junction transistor with pins base, collector, emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transistor {
    pub polarity: TransistorType,
}

impl Transistor {
    /// Create a transistor of the given polarity.
    pub fn new(polarity: TransistorType) -> Self {
        Self { polarity }
    }

    /// Whether this is a PNP device.
    pub fn is_pnp(&self) -> bool {
        self.polarity == TransistorType::Pnp
    }
}

/// An operational amplifier with pins plus, minus, out.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationalAmplifier {
    /// Open-loop gain
    pub gain: f64,
}

impl OperationalAmplifier {
    /// Create an op-amp with the given open-loop gain.
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }
}

impl Default for OperationalAmplifier {
    fn default() -> Self {
        Self::new(1e5)
    }
}
