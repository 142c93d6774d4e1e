//! Linear passive components: Resistor, Capacitor, Inductor.

/// Smallest resistance a resistor may carry, to keep the system regular.
pub const MIN_RESISTANCE: f64 = 1e-12;

/// A fixed resistor.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    /// Resistance in ohms
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(resistance: f64) -> Self {
        Self {
            resistance: resistance.max(MIN_RESISTANCE),
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}

impl Default for Resistor {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// A capacitor. Open circuit at DC.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCapacitor {
    /// Capacitance in farads
    pub capacitance: f64,
}

impl BasicCapacitor {
    /// Create a new capacitor.
    pub fn new(capacitance: f64) -> Self {
        Self { capacitance }
    }
}

impl Default for BasicCapacitor {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

/// An inductor. Short circuit at DC.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicInductor {
    /// Inductance in henries
    pub inductance: f64,
}

impl BasicInductor {
    /// Create a new inductor.
    pub fn new(inductance: f64) -> Self {
        Self { inductance }
    }
}

impl Default for BasicInductor {
    fn default() -> Self {
        Self::new(1e-3)
    }
}
