//! Measuring instruments.
//!
//! Both meters are ideal: the ammeter is a zero-volt branch and the
//! voltmeter draws no current.

/// An ideal ammeter between `red` and `black`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleAmmeter;

/// An ideal voltmeter between `red` and `black`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleVoltmeter;
