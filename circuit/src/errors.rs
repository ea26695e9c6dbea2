// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use core::fmt;

use miette::Diagnostic;

use crate::Bits;

/// The kind of a named circuit port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    Input,
    Output,
    Latch,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
            Self::Latch => f.write_str("latch"),
        }
    }
}

// CIRCUIT ERROR
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum CircuitError {
    #[error("{kind} '{name}' is declared more than once")]
    #[diagnostic(help(
        "port names must be unique per kind; rename one side before composing circuits"
    ))]
    DuplicatePort { kind: PortKind, name: String },
    #[error("circuit has no {kind} named '{name}'")]
    UnknownPort { kind: PortKind, name: String },
    #[error("{kind} '{name}' has width {expected}, but a value of width {got} was supplied")]
    WidthMismatch {
        kind: PortKind,
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("latch '{0}' was declared but never driven")]
    #[diagnostic(help("call `drive_latch` with the next-state word before finishing the builder"))]
    UndrivenLatch(String),
    #[error("operands of {op} have different widths ({lhs} and {rhs})")]
    OperandWidthMismatch { op: &'static str, lhs: usize, rhs: usize },
    #[error("no value supplied for input '{0}'")]
    MissingInput(String),
    #[error("lookup table already maps {key} (to {existing})")]
    DuplicateTableKey { key: Bits, existing: Bits },
    #[error("lookup table entry {key} -> {value} does not fit a {in_width}-bit to {out_width}-bit table")]
    TableWidthMismatch {
        key: Bits,
        value: Bits,
        in_width: usize,
        out_width: usize,
    },
}
