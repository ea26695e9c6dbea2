//! Deterministic labeling automata.
//!
//! An [`Automaton`] has a start state, ordered input and output alphabets, a labeling function
//! and a transition function. Two implementations are provided: [`Dfa`], backed by closures,
//! and [`ExplicitDfa`], backed by tables. Any automaton can be flattened into a
//! [`TransitionRelation`] over its reachable states.

extern crate alloc;

use core::{error::Error, fmt::Debug, hash::Hash};
use std::collections::{HashSet, VecDeque};

mod dfa;
mod errors;
mod explicit;
mod relation;

pub use dfa::Dfa;
pub use errors::AutomatonError;
pub use explicit::ExplicitDfa;
pub use relation::{StateEntry, TransitionRelation};

// AUTOMATON TRAIT
// ================================================================================================

/// A deterministic automaton whose states carry an output label.
///
/// `label` and `transition` are expected to be total over reachable states. Implementations
/// that can fail (e.g. table-backed or circuit-backed automata) report failures through
/// [`Automaton::Error`].
pub trait Automaton {
    type State: Clone + Eq + Hash + Debug;
    type Input: Clone + Eq + Hash + Debug;
    type Output: Clone + Eq + Hash + Debug;
    type Error: Error + Send + Sync + 'static;

    fn start(&self) -> Self::State;

    /// Input alphabet. The order is significant: it fixes code assignment and exploration order.
    fn inputs(&self) -> &[Self::Input];

    /// Output alphabet.
    fn outputs(&self) -> &[Self::Output];

    fn label(&self, state: &Self::State) -> Result<Self::Output, Self::Error>;

    fn transition(
        &self,
        state: &Self::State,
        input: &Self::Input,
    ) -> Result<Self::State, Self::Error>;

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns the state reached from the start state after reading `word`.
    fn run(&self, word: &[Self::Input]) -> Result<Self::State, Self::Error> {
        word.iter().try_fold(self.start(), |state, input| self.transition(&state, input))
    }

    /// Returns every state visited while reading `word`, starting with the start state.
    fn trace(&self, word: &[Self::Input]) -> Result<Vec<Self::State>, Self::Error> {
        let mut states = Vec::with_capacity(word.len() + 1);
        let mut state = self.start();
        states.push(state.clone());
        for input in word {
            state = self.transition(&state, input)?;
            states.push(state.clone());
        }
        Ok(states)
    }

    /// Returns the label of the state reached after reading `word`.
    fn label_word(&self, word: &[Self::Input]) -> Result<Self::Output, Self::Error> {
        self.label(&self.run(word)?)
    }

    /// Returns the states reachable from the start state in breadth-first discovery order.
    fn reachable_states(&self) -> Result<Vec<Self::State>, Self::Error> {
        let mut visited = HashSet::from([self.start()]);
        let mut queue = VecDeque::from([self.start()]);
        let mut order = Vec::new();
        while let Some(state) = queue.pop_front() {
            for input in self.inputs() {
                let next = self.transition(&state, input)?;
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
            order.push(state);
        }
        Ok(order)
    }

    /// Flattens the reachable part of the automaton into an explicit relation.
    ///
    /// States appear in breadth-first discovery order; the edges of each state follow the
    /// order of [`Automaton::inputs`]. An input listed more than once contributes one edge per
    /// state, at its first position.
    fn to_relation(
        &self,
    ) -> Result<TransitionRelation<Self::State, Self::Input, Self::Output>, Self::Error> {
        let mut seen = HashSet::new();
        let inputs: Vec<&Self::Input> =
            self.inputs().iter().filter(|input| seen.insert(*input)).collect();

        let start = self.start();
        let mut relation = TransitionRelation::new(start.clone());
        let mut visited = HashSet::from([start.clone()]);
        let mut queue = VecDeque::from([start]);
        while let Some(state) = queue.pop_front() {
            let label = self.label(&state)?;
            let mut successors = Vec::with_capacity(inputs.len());
            for &input in &inputs {
                let next = self.transition(&state, input)?;
                if visited.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
                successors.push((input.clone(), next));
            }
            relation.push_discovered(state, label, successors);
        }
        tracing::debug!(
            states = relation.len(),
            edges = relation.num_edges(),
            "flattened automaton into transition relation"
        );
        Ok(relation)
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{Automaton, Dfa};

    fn counter_mod4() -> Dfa<u8, u8, bool> {
        Dfa::boolean(0u8, vec![0, 1], |s, c| (s + c) % 4, |s| *s == 3)
    }

    #[test]
    fn run_and_trace_follow_transitions() {
        let dfa = counter_mod4();
        assert_eq!(dfa.run(&[1, 1, 0, 1]), Ok(3));
        assert_eq!(dfa.trace(&[1, 0, 1]), Ok(vec![0, 1, 1, 2]));
        assert_eq!(dfa.label_word(&[1, 1, 1]), Ok(true));
        assert_eq!(dfa.label_word(&[]), Ok(false));
    }

    #[test]
    fn relation_lists_states_in_discovery_order() {
        let relation = counter_mod4().to_relation().unwrap();
        assert_eq!(relation.start(), &0);
        assert_eq!(relation.states().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(relation.num_edges(), 8);

        let last = relation.get(&3).unwrap();
        assert!(*last.label());
        assert_eq!(last.successors(), &[(0, 3), (1, 0)]);
        assert_eq!(last.successor(&1), Some(&0));
    }

    #[test]
    fn repeated_inputs_contribute_one_edge() {
        let dfa = Dfa::boolean(0u8, vec![1, 0, 1], |s, c| (s + c) % 4, |s| *s == 3);
        let relation = dfa.to_relation().unwrap();
        assert_eq!(relation.len(), 4);
        assert_eq!(relation.num_edges(), 8);
        assert_eq!(relation.get(&0).unwrap().successors(), &[(1, 1), (0, 0)]);
    }

    #[test]
    fn reachable_states_ignore_unreachable_part() {
        // states 0..8, but only even states are reachable when stepping by 2
        let dfa = Dfa::boolean(0u8, vec![()], |s, _| (s + 2) % 8, |s| *s == 0);
        assert_eq!(dfa.reachable_states(), Ok(vec![0, 2, 4, 6]));
    }

    proptest! {
        #[test]
        fn label_word_counts_ones(word in proptest::collection::vec(0u8..2, 0..32)) {
            let ones = word.iter().filter(|c| **c == 1).count();
            prop_assert_eq!(counter_mod4().label_word(&word), Ok(ones % 4 == 3));
        }
    }
}
