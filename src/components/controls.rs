//! Control components: switches and the slide rheostat.

use super::linear::MIN_RESISTANCE;

/// A single-pole switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleSwitch {
    pub closed: bool,
}

impl SimpleSwitch {
    /// Create a new switch.
    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

/// A momentary push button. Conducts only while pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushSwitch {
    pub pressed: bool,
}

impl PushSwitch {
    /// Create a new push switch.
    pub fn new(pressed: bool) -> Self {
        Self { pressed }
    }
}

/// A slide rheostat.
///
/// Modeled as two resistors in series with a wiper tap:
///   a ----[R1]---- wiper ----[R2]---- b
///
/// where R1 = position * resistance
/// and   R2 = (1 - position) * resistance
#[derive(Debug, Clone, PartialEq)]
pub struct SlideRheostat {
    /// End-to-end resistance in ohms
    pub resistance: f64,
    /// Wiper position from 0.0 (at `a`) to 1.0 (at `b`)
    pub position: f64,
}

impl SlideRheostat {
    /// Create a new rheostat.
    pub fn new(resistance: f64, position: f64) -> Self {
        Self {
            resistance: resistance.max(MIN_RESISTANCE),
            position: position.clamp(0.0, 1.0),
        }
    }

    /// Set the wiper position.
    pub fn set_position(&mut self, position: f64) {
        self.position = position.clamp(0.0, 1.0);
    }

    /// Get the resistance from `a` to the wiper.
    pub fn r1(&self) -> f64 {
        (self.position * self.resistance).max(MIN_RESISTANCE)
    }

    /// Get the resistance from the wiper to `b`.
    pub fn r2(&self) -> f64 {
        ((1.0 - self.position) * self.resistance).max(MIN_RESISTANCE)
    }
}

impl Default for SlideRheostat {
    fn default() -> Self {
        Self::new(10.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rheostat_split() {
        let r = SlideRheostat::new(100.0, 0.25);
        assert!((r.r1() - 25.0).abs() < 1e-12);
        assert!((r.r2() - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_rheostat_position_clamped() {
        let mut r = SlideRheostat::new(100.0, 1.7);
        assert_eq!(r.position, 1.0);
        r.set_position(-0.5);
        assert_eq!(r.position, 0.0);
        assert!(r.r1() > 0.0);
    }

    #[test]
    fn test_switch_toggle() {
        let mut s = SimpleSwitch::new(false);
        s.toggle();
        assert!(s.closed);
    }
}
