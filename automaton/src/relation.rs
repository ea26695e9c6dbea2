use std::{collections::HashMap, hash::Hash};

use crate::AutomatonError;

/// One state of a [`TransitionRelation`]: its label and its outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry<S, I, O> {
    state: S,
    label: O,
    successors: Vec<(I, S)>,
}

impl<S, I, O> StateEntry<S, I, O> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn label(&self) -> &O {
        &self.label
    }

    /// Outgoing edges as `(input, next state)` pairs, in insertion order.
    pub fn successors(&self) -> &[(I, S)] {
        &self.successors
    }
}

impl<S, I: PartialEq, O> StateEntry<S, I, O> {
    /// Returns the target of the first edge labeled `input`.
    pub fn successor(&self, input: &I) -> Option<&S> {
        self.successors.iter().find(|(edge, _)| edge == input).map(|(_, next)| next)
    }
}

/// An explicit enumeration of the states of an automaton.
///
/// Maps every listed state to its label and its outgoing edges. States are kept in insertion
/// order, which for relations built by [`crate::Automaton::to_relation`] is breadth-first
/// discovery order starting from the start state.
#[derive(Debug, Clone)]
pub struct TransitionRelation<S, I, O> {
    start: S,
    entries: Vec<StateEntry<S, I, O>>,
    index: HashMap<S, usize>,
}

impl<S, I, O> TransitionRelation<S, I, O>
where
    S: Clone + Eq + Hash + core::fmt::Debug,
    I: PartialEq,
{
    /// Returns an empty relation with the given start state.
    pub fn new(start: S) -> Self {
        Self {
            start,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a state with its label and outgoing edges.
    ///
    /// # Errors
    /// Returns an error if the state is already listed.
    pub fn insert(
        &mut self,
        state: S,
        label: O,
        successors: Vec<(I, S)>,
    ) -> Result<(), AutomatonError> {
        if self.index.contains_key(&state) {
            return Err(AutomatonError::duplicate_state(&state));
        }
        self.index.insert(state.clone(), self.entries.len());
        self.entries.push(StateEntry { state, label, successors });
        Ok(())
    }

    /// Appends a state known not to be listed yet.
    pub(crate) fn push_discovered(&mut self, state: S, label: O, successors: Vec<(I, S)>) {
        debug_assert!(!self.index.contains_key(&state));
        self.index.insert(state.clone(), self.entries.len());
        self.entries.push(StateEntry { state, label, successors });
    }

    pub fn start(&self) -> &S {
        &self.start
    }

    pub fn get(&self, state: &S) -> Option<&StateEntry<S, I, O>> {
        self.index.get(state).map(|pos| &self.entries[*pos])
    }

    pub fn contains(&self, state: &S) -> bool {
        self.index.contains_key(state)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StateEntry<S, I, O>> {
        self.entries.iter()
    }

    /// Listed states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.iter().map(StateEntry::state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of edges over all states.
    pub fn num_edges(&self) -> usize {
        self.entries.iter().map(|entry| entry.successors.len()).sum()
    }
}

impl<S: PartialEq, I: PartialEq, O: PartialEq> PartialEq for TransitionRelation<S, I, O> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.entries == other.entries
    }
}

impl<S: Eq, I: Eq, O: Eq> Eq for TransitionRelation<S, I, O> {}

impl<'a, S, I, O> IntoIterator for &'a TransitionRelation<S, I, O> {
    type Item = &'a StateEntry<S, I, O>;
    type IntoIter = core::slice::Iter<'a, StateEntry<S, I, O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
