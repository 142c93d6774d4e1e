//! Loads with behaviour outside a linear DC model.

/// An incandescent lamp rated at a nominal voltage and power.
#[derive(Debug, Clone, PartialEq)]
pub struct IncandescentLamp {
    /// Rated voltage in volts
    pub rated_voltage: f64,
    /// Rated power in watts
    pub rated_power: f64,
}

impl IncandescentLamp {
    /// Create a new lamp.
    pub fn new(rated_voltage: f64, rated_power: f64) -> Self {
        Self {
            rated_voltage,
            rated_power,
        }
    }

    /// Filament resistance at the rated operating point.
    pub fn rated_resistance(&self) -> f64 {
        self.rated_voltage * self.rated_voltage / self.rated_power
    }
}

impl Default for IncandescentLamp {
    fn default() -> Self {
        Self::new(3.0, 0.85)
    }
}

/// A piezo buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buzzer;

/// An electric bell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElectricBell;
