//! Flattening of a transition relation into label and transition lookup tables.

use core::{fmt::Debug, hash::Hash};

use aigdfa_automaton::TransitionRelation;
use aigdfa_circuit::LookupTable;
use tracing::instrument;

use crate::{CompileError, Encoding};

/// The two tables realizing an automaton.
///
/// - `label` maps a state code to the code of its label.
/// - `transition` maps `state code ‖ input code` (state bits low-order) to the next state code.
///
/// Codes absent from a table map to the all-zero code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    label: LookupTable,
    transition: LookupTable,
}

impl Tables {
    pub fn label(&self) -> &LookupTable {
        &self.label
    }

    pub fn transition(&self) -> &LookupTable {
        &self.transition
    }
}

/// Builds the label and transition tables of `relation` under the given encodings.
///
/// # Errors
/// Returns an error if:
/// - a state, label or input of the relation has no code in its encoding;
/// - a state lists more than one edge for the same input.
#[instrument(skip_all, fields(states = relation.len()))]
pub fn synthesize<S, I, O>(
    relation: &TransitionRelation<S, I, O>,
    states: &Encoding<S>,
    inputs: &Encoding<I>,
    outputs: &Encoding<O>,
) -> Result<Tables, CompileError>
where
    S: Clone + Eq + Hash + Debug,
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
{
    let mut label = LookupTable::new(states.width(), outputs.width());
    let mut transition = LookupTable::new(states.width() + inputs.width(), states.width());

    for entry in relation {
        let state = states.try_encode(entry.state())?;
        label.insert(state.clone(), outputs.try_encode(entry.label())?)?;

        for (input, next) in entry.successors() {
            let address = state.concat(&inputs.try_encode(input)?);
            if transition.get(&address).is_some() {
                return Err(CompileError::AmbiguousTransition {
                    state: format!("{:?}", entry.state()),
                    input: format!("{input:?}"),
                });
            }
            transition.insert(address, states.try_encode(next)?)?;
        }
    }

    tracing::debug!(
        label_entries = label.len(),
        transition_entries = transition.len(),
        address_width = transition.in_width(),
        "synthesized lookup tables"
    );
    Ok(Tables { label, transition })
}
