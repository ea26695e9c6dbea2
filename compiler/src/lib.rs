//! Compiles deterministic labeling automata into lookup-table circuits and reads such circuits
//! back as automata.
//!
//! Compilation flattens the reachable part of an [`Automaton`](automaton::Automaton) into a
//! transition relation, encodes its alphabets as bit vectors, and wires a label table and a
//! transition table around a single state latch. The resulting circuit has one input (the
//! action), one output (the label of the current state) and one latch (the state). A separate
//! validity monitor flags the first illegal action code and stays low afterwards.
//!
//! Decompilation goes the other way: any circuit of that shape is viewed as an automaton whose
//! label and transition functions evaluate the circuit with the state latch pinned.
//!
//! Module map:
//! - `options`: encodings, table strategy, port names and decompile settings.
//! - `encoding`: symbol-to-code bijections and the relabeling bundle.
//! - `tables`: label and transition tables of a relation.
//! - `assemble`: wiring of tables, latch and monitor into a circuit.
//! - `monitor`: the sticky validity monitor over action codes.
//! - `delayed`: the automaton whose label lags by one step.
//! - `adapter`: circuit-backed automata and symbol codecs.
//! - `pipeline`: the end-to-end entry points.

extern crate alloc;

mod adapter;
mod assemble;
mod delayed;
mod encoding;
mod errors;
mod monitor;
mod options;
mod pipeline;
mod tables;

pub use adapter::{CircuitAutomaton, RawCodes, SymbolCodec, to_automaton};
pub use aigdfa_automaton as automaton;
pub use aigdfa_circuit as circuit;
pub use assemble::assemble;
pub use delayed::{Delayed, DelayedState, Observation};
pub use encoding::{Encoding, Relabeling};
pub use errors::{AlphabetKind, CompileError, OptionsError};
pub use monitor::validity_monitor;
pub use options::{
    CompileOptions, DecompileOptions, EncodingScheme, OutputSelection, PortNames, TableStrategy,
};
pub use pipeline::{
    Compiled, compile, compile_delayed, compile_relation, decompile, decompile_raw,
};
pub use tables::{Tables, synthesize};
