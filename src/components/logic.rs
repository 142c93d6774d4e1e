//! Digital logic elements.

/// Default logic-high level in volts.
pub const DEFAULT_HIGH_LEVEL: f64 = 5.0;

/// A logic level source with a single output pin.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicInput {
    pub high_level: f64,
    pub output_status: bool,
}

impl LogicInput {
    /// Create a logic input driving the given state.
    pub fn new(output_status: bool) -> Self {
        Self {
            high_level: DEFAULT_HIGH_LEVEL,
            output_status,
        }
    }
}

impl Default for LogicInput {
    fn default() -> Self {
        Self::new(false)
    }
}

/// A logic level indicator with a single input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicOutput;

/// A two-input AND gate.
#[derive(Debug, Clone, PartialEq)]
pub struct AndGate {
    pub high_level: f64,
    pub low_level: f64,
}

impl AndGate {
    /// Create a gate with the given output levels.
    pub fn new(high_level: f64, low_level: f64) -> Self {
        Self {
            high_level,
            low_level,
        }
    }
}

impl Default for AndGate {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_LEVEL, 0.0)
    }
}
