use core::{fmt::Debug, hash::Hash};

use aigdfa_circuit::{Circuit, Loopback, MatchMode};
use tracing::instrument;

use crate::{
    CompileError, CompileOptions, Compiled, Relabeling, TableStrategy, Tables,
    monitor::validity_monitor,
};

/// Wires the label and transition tables and a state latch into one circuit.
///
/// The resulting circuit has:
/// - one input, the action, with the width of the input encoding;
/// - the output port, driven by the label table from the current state;
/// - the state latch, initialized to the code of `start` and driven by the transition table
///   addressed with `state ‖ action`;
/// - optionally the `next_state` output, when exposed in the options.
///
/// The validity monitor is built as a separate circuit over the same action port.
///
/// # Errors
/// Returns an error if `start` has no code in the state encoding.
#[instrument(skip_all, fields(states = relabeling.states().len()))]
pub fn assemble<I, O, S>(
    tables: &Tables,
    relabeling: Relabeling<I, O, S>,
    start: &S,
    options: &CompileOptions,
) -> Result<Compiled<I, O, S>, CompileError>
where
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    let names = options.port_names();
    let init = relabeling
        .states()
        .encode(start)
        .ok_or_else(|| CompileError::UnknownStartState(format!("{start:?}")))?;
    let mode = match options.table_strategy() {
        TableStrategy::Lookup => MatchMode::Exact,
        TableStrategy::OneHotMasks => MatchMode::SetBits,
    };

    let state_width = relabeling.states().width();
    let action_width = relabeling.inputs().width();
    let address = format!("{}#{}", names.state(), names.action());

    let label = Circuit::lookup(names.state(), names.output(), tables.label(), mode)?;
    let transition = Circuit::concat(
        (names.state(), state_width),
        (names.action(), action_width),
        &address,
    )?
    .seq(&Circuit::lookup(&address, names.next_state(), tables.transition(), mode)?)?;

    let feedback = Loopback::new(names.state(), names.next_state())
        .with_init(init)
        .with_keep_output(options.expose_next_state());
    let circuit = label.par(&transition)?.loopback(feedback)?;

    let monitor = validity_monitor(
        names.action(),
        action_width,
        relabeling.inputs().scheme(),
        names.valid(),
    )?;

    tracing::debug!(
        ands = circuit.num_ands(),
        monitor_ands = monitor.num_ands(),
        state_width,
        action_width,
        "assembled circuit"
    );
    Ok(Compiled::new(circuit, relabeling, monitor))
}
