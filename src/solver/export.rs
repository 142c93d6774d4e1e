//! The exported entry point.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use log::debug;

use super::dc::{solve_dc, DcElement};
use super::EngineFault;
use crate::components::ElementKind;
use crate::engine::abi::{RawElement, STATUS_INTERNAL, STATUS_OK};

/// Slice from a pointer that may be null or dangling when `len` is zero.
unsafe fn view<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T], EngineFault> {
    if len == 0 {
        Ok(&[])
    } else if ptr.is_null() {
        Err(EngineFault::InvalidArgument)
    } else {
        Ok(slice::from_raw_parts(ptr, len))
    }
}

unsafe fn run(
    analysis: *const c_char,
    node_count: usize,
    elements: *const RawElement,
    element_count: usize,
    voltages_out: *mut f64,
) -> Result<(), EngineFault> {
    if analysis.is_null() || (node_count > 0 && voltages_out.is_null()) {
        return Err(EngineFault::InvalidArgument);
    }
    if !CStr::from_ptr(analysis).to_bytes().eq_ignore_ascii_case(b"DC") {
        return Err(EngineFault::UnknownAnalysis);
    }

    let records = view(elements, element_count)?;
    let mut decoded = Vec::with_capacity(records.len());
    for record in records {
        let kind = ElementKind::from_tag(record.kind).ok_or(EngineFault::UnsupportedElement(record.kind))?;
        decoded.push(DcElement {
            kind,
            params: view(record.params, record.param_count)?,
            nodes: view(record.nodes, record.pin_count)?,
        });
    }

    let voltages = solve_dc(node_count, &decoded)?;
    if node_count > 0 {
        slice::from_raw_parts_mut(voltages_out, node_count).copy_from_slice(&voltages);
    }
    Ok(())
}

/// Analyse a circuit; see [`crate::engine::abi`] for the contract.
///
/// # Safety
///
/// Every non-null pointer must be valid for the length given next to it,
/// and `analysis` must be NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn phyengine_analyze(
    analysis: *const c_char,
    node_count: usize,
    elements: *const RawElement,
    element_count: usize,
    voltages_out: *mut f64,
) -> i32 {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run(analysis, node_count, elements, element_count, voltages_out)
    }));
    match outcome {
        Ok(Ok(())) => STATUS_OK,
        Ok(Err(fault)) => {
            debug!("reference engine: {}", fault);
            fault.code()
        }
        Err(_) => STATUS_INTERNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::abi::{STATUS_INVALID_ARGUMENT, STATUS_UNKNOWN_ANALYSIS};
    use std::ptr;

    #[test]
    fn test_null_analysis_tag() {
        let mut out = [0.0; 1];
        let code = unsafe { phyengine_analyze(ptr::null(), 1, ptr::null(), 0, out.as_mut_ptr()) };
        assert_eq!(code, STATUS_INVALID_ARGUMENT);
    }

    #[test]
    fn test_unknown_analysis_tag() {
        let code = unsafe { phyengine_analyze(c"TRAN".as_ptr(), 0, ptr::null(), 0, ptr::null_mut()) };
        assert_eq!(code, STATUS_UNKNOWN_ANALYSIS);
    }

    #[test]
    fn test_empty_circuit() {
        let code = unsafe { phyengine_analyze(c"DC".as_ptr(), 0, ptr::null(), 0, ptr::null_mut()) };
        assert_eq!(code, STATUS_OK);
    }

    #[test]
    fn test_raw_divider() {
        let battery = [5.0, 0.0];
        let resistor = [1000.0];
        let nodes_a = [0usize, 1];
        let nodes_g = [1usize];
        let records = [
            RawElement {
                kind: ElementKind::BatterySource.tag(),
                params: battery.as_ptr(),
                param_count: battery.len(),
                nodes: nodes_a.as_ptr(),
                pin_count: 2,
            },
            RawElement {
                kind: ElementKind::Resistor.tag(),
                params: resistor.as_ptr(),
                param_count: 1,
                nodes: nodes_a.as_ptr(),
                pin_count: 2,
            },
            RawElement {
                kind: ElementKind::Ground.tag(),
                params: ptr::null(),
                param_count: 0,
                nodes: nodes_g.as_ptr(),
                pin_count: 1,
            },
        ];
        let mut out = [f64::NAN; 2];
        let code = unsafe {
            phyengine_analyze(c"DC".as_ptr(), 2, records.as_ptr(), records.len(), out.as_mut_ptr())
        };
        assert_eq!(code, STATUS_OK);
        assert!((out[0] - 5.0).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
    }
}
