//! Sources and the ground reference.

/// An ideal voltage source with optional internal resistance.
///
/// The `red` pin is the positive terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySource {
    /// Open-circuit voltage in volts
    pub voltage: f64,
    /// Series resistance in ohms (0 for an ideal source)
    pub internal_resistance: f64,
}

impl BatterySource {
    /// Default voltage of a fresh battery in the catalogue.
    pub const DEFAULT_VOLTAGE: f64 = 1.5;

    /// Create an ideal battery.
    pub fn new(voltage: f64) -> Self {
        Self {
            voltage,
            internal_resistance: 0.0,
        }
    }

    /// Set the internal resistance (negative values are clamped to 0).
    pub fn with_internal_resistance(mut self, resistance: f64) -> Self {
        self.internal_resistance = resistance.max(0.0);
        self
    }
}

impl Default for BatterySource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VOLTAGE)
    }
}

/// An ideal current source.
///
/// Current flows from `red` to `black` through the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSource {
    /// Source current in amperes
    pub current: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(current: f64) -> Self {
        Self { current }
    }
}

impl Default for CurrentSource {
    fn default() -> Self {
        Self::new(0.01)
    }
}

/// A ground connection. Its single pin is the 0 V reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ground;
