//! The native call contract.
//!
//! ```c
//! typedef struct {
//!     uint32_t      kind;
//!     const double *params;
//!     size_t        param_count;
//!     const size_t *nodes;
//!     size_t        pin_count;
//! } PeElement;
//!
//! int32_t phyengine_analyze(const char *analysis, size_t node_count,
//!                           const PeElement *elements, size_t element_count,
//!                           double *voltages_out);
//! ```
//!
//! All buffers belong to the caller. The engine reads the inputs, writes
//! `node_count` voltages into `voltages_out`, and keeps no pointer after it
//! returns. A zero return is success; anything else is an engine-defined
//! error code that the bridge passes upward untouched.

use std::os::raw::c_char;

/// Name of the analysis entry point exported by the engine.
pub const ENTRY_SYMBOL: &str = "phyengine_analyze";

/// One component record as laid out for the engine.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawElement {
    /// Element kind tag
    pub kind: u32,
    /// Kind-specific parameters
    pub params: *const f64,
    pub param_count: usize,
    /// Node index of each pin, in pin declaration order
    pub nodes: *const usize,
    pub pin_count: usize,
}

/// Signature of the analysis entry point.
pub type AnalyzeFn = unsafe extern "C" fn(
    analysis: *const c_char,
    node_count: usize,
    elements: *const RawElement,
    element_count: usize,
    voltages_out: *mut f64,
) -> i32;

/// Success.
pub const STATUS_OK: i32 = 0;
/// A required pointer was null or a record is malformed.
pub const STATUS_INVALID_ARGUMENT: i32 = 1;
/// The analysis tag is not recognised.
pub const STATUS_UNKNOWN_ANALYSIS: i32 = 2;
/// A record carries a kind the engine cannot model.
pub const STATUS_UNSUPPORTED_ELEMENT: i32 = 3;
/// No ground element fixes the voltage reference, or a group of elements
/// connected to each other reaches no ground.
pub const STATUS_NO_GROUND: i32 = 4;
/// The circuit equations have no unique solution.
pub const STATUS_SINGULAR: i32 = 5;
/// The engine panicked.
pub const STATUS_INTERNAL: i32 = 6;
