//! Error types for the PhyEngine bridge.
//!
//! This module provides a unified error type [`PhyError`] that covers
//! every way an analysis request can fail: netlist parsing, graph
//! construction, capability checks, library discovery and the native call.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::circuit::{ComponentId, PinRef};
use crate::components::ElementKind;

/// Result type alias using [`PhyError`].
pub type Result<T> = std::result::Result<T, PhyError>;

/// Why the native analysis library could not be made available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// No candidate location held a library file.
    NotFound {
        /// Every location that was checked, in precedence order.
        searched: Vec<PathBuf>,
    },
    /// A file was found but could not be loaded as the engine.
    LoadFailed { path: PathBuf, message: String },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NotFound { searched } => {
                write!(f, "library not found (searched: ")?;
                for (i, path) in searched.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                write!(f, ")")
            }
            Unavailable::LoadFailed { path, message } => {
                write!(f, "failed to load '{}': {}", path.display(), message)
            }
        }
    }
}

/// Unified error type for all bridge operations.
#[derive(Error, Debug)]
pub enum PhyError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown element keyword
    #[error("Unknown element type '{element_type}' at line {line}")]
    UnknownElementType { element_type: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Circuit Model Errors ============
    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Pin name not declared by the component's kind
    #[error("Component {component} ({kind}) has no pin named '{pin}'")]
    UnknownPin {
        component: ComponentId,
        kind: ElementKind,
        pin: String,
    },

    /// Malformed wire (self-connection or dangling pin)
    #[error("Invalid wire {a} -- {b}: {reason}")]
    InvalidWire {
        a: PinRef,
        b: PinRef,
        reason: String,
    },

    // ============ Capability Errors ============
    /// Component kind the engine cannot model for the requested analysis
    #[error("Element {kind} of component {component} ('{name}') is not supported by {analysis} analysis")]
    UnsupportedElement {
        kind: ElementKind,
        component: ComponentId,
        name: String,
        analysis: String,
    },

    /// Analysis kind the bridge does not know how to request
    #[error("Unsupported analysis kind '{kind}'")]
    UnsupportedAnalysis { kind: String },

    // ============ Availability Errors ============
    /// Native library missing or unloadable
    #[error("Native analysis library not available: {reason}")]
    LibraryNotAvailable { reason: Unavailable },

    // ============ Engine Errors ============
    /// The engine returned a non-zero status code
    #[error("Native analysis failed with engine code {code}")]
    NativeAnalysis { code: i32 },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PhyError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid wire error
    pub fn invalid_wire(a: PinRef, b: PinRef, reason: impl Into<String>) -> Self {
        Self::InvalidWire {
            a,
            b,
            reason: reason.into(),
        }
    }

    /// Create a "library not found" error
    pub fn library_not_found(searched: Vec<PathBuf>) -> Self {
        Self::LibraryNotAvailable {
            reason: Unavailable::NotFound { searched },
        }
    }

    /// Create a "library failed to load" error
    pub fn library_load_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::LibraryNotAvailable {
            reason: Unavailable::LoadFailed {
                path: path.into(),
                message: message.into(),
            },
        }
    }
}
