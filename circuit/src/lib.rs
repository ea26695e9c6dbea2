//! Synchronous boolean circuits over an and-inverter graph.
//!
//! A [`Circuit`] has named bit-vector inputs, outputs and latches. Circuits are built with a
//! [`CircuitBuilder`] or derived from existing circuits by composition, and can be evaluated
//! once or simulated step by step.
//!
//! Module map:
//! - `aig`: structurally hashed AND/NOT graph, the only gate representation.
//! - `builder`: named ports plus word-level operations lowered to the graph.
//! - `lookup`: explicit tables and their sum-of-products lowering.
//! - `compose`: parallel/sequential composition, renaming and feedback loops.
//! - `sim`: single evaluation and a stepping simulator.
//! - `temporal`: small sequential building blocks.
//!
//! Bit vectors are LSB first. Concatenation places its first operand in the low-order bits.

extern crate alloc;

pub mod aig;
mod bits;
mod builder;
mod circuit;
mod compose;
mod errors;
mod lookup;
pub mod sim;
pub mod temporal;

pub use bits::Bits;
pub use builder::CircuitBuilder;
pub use circuit::{Circuit, Latch, Port, Word};
pub use compose::Loopback;
pub use errors::{CircuitError, PortKind};
pub use lookup::{LookupTable, MatchMode};
pub use sim::{Assignment, Evaluation, Simulator, assignment};
