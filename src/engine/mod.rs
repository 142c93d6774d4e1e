//! Native analysis engine access.
//!
//! This module owns everything on the far side of the circuit model:
//!
//! - [`abi`] - the C call contract shared with the engine
//! - [`LibraryResolver`] - locates and loads the engine once per resolver
//! - [`NativeEngine`] - a loaded entry point, shareable across threads
//! - [`NativeBridge`] - marshals a [`crate::circuit::CircuitGraph`] into the
//!   engine's flat records and maps node voltages back onto pins

pub mod abi;
mod bridge;
mod library;
mod resolver;

pub use bridge::{BridgeConfig, NativeBridge};
pub use library::NativeEngine;
pub use resolver::{default_search_dirs, EngineSource, LibraryResolver, ResolverConfig, DEFAULT_ENV_VAR, DEFAULT_LIBRARY_NAME, LEGACY_ENV_VAR};

use std::ffi::CStr;
use std::fmt;
use std::str::FromStr;

use crate::components::ElementKind;
use crate::error::PhyError;

/// Element kinds the engine models in DC analysis.
const DC_SUPPORTED: &[ElementKind] = &[
    ElementKind::Ground,
    ElementKind::BatterySource,
    ElementKind::CurrentSource,
    ElementKind::Resistor,
    ElementKind::SimpleSwitch,
    ElementKind::PushSwitch,
    ElementKind::SlideRheostat,
    ElementKind::SimpleAmmeter,
    ElementKind::SimpleVoltmeter,
    ElementKind::BasicCapacitor,
    ElementKind::BasicInductor,
];

/// The solving mode requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    /// DC operating point
    Dc,
}

impl AnalysisKind {
    /// Tag passed to the engine entry point.
    pub fn wire_tag(self) -> &'static CStr {
        match self {
            AnalysisKind::Dc => c"DC",
        }
    }

    /// Human-readable tag.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Dc => "DC",
        }
    }

    /// Element kinds the engine can model for this analysis.
    pub fn supported_elements(self) -> &'static [ElementKind] {
        match self {
            AnalysisKind::Dc => DC_SUPPORTED,
        }
    }

    /// Check a single kind against the supported set.
    pub fn supports(self, kind: ElementKind) -> bool {
        self.supported_elements().contains(&kind)
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = PhyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("dc") {
            Ok(AnalysisKind::Dc)
        } else {
            Err(PhyError::UnsupportedAnalysis { kind: s.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_kind() {
        assert_eq!("DC".parse::<AnalysisKind>().unwrap(), AnalysisKind::Dc);
        assert_eq!("dc".parse::<AnalysisKind>().unwrap(), AnalysisKind::Dc);
        assert!(matches!(
            "TRAN".parse::<AnalysisKind>(),
            Err(PhyError::UnsupportedAnalysis { .. })
        ));
    }

    #[test]
    fn test_dc_support() {
        assert!(AnalysisKind::Dc.supports(ElementKind::Resistor));
        assert!(AnalysisKind::Dc.supports(ElementKind::Ground));
        assert!(!AnalysisKind::Dc.supports(ElementKind::Buzzer));
        assert!(!AnalysisKind::Dc.supports(ElementKind::BasicDiode));
    }

    #[test]
    fn test_wire_tag() {
        assert_eq!(AnalysisKind::Dc.wire_tag().to_str().unwrap(), "DC");
    }
}
