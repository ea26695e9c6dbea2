use core::{fmt::Debug, hash::Hash};
use std::collections::HashMap;

use crate::{Automaton, AutomatonError, TransitionRelation};

/// A deterministic automaton stored as explicit label and edge tables.
#[derive(Debug, Clone)]
pub struct ExplicitDfa<S, I, O> {
    start: S,
    inputs: Vec<I>,
    outputs: Vec<O>,
    labels: HashMap<S, O>,
    edges: HashMap<S, HashMap<I, S>>,
}

impl<S, I, O> ExplicitDfa<S, I, O>
where
    S: Clone + Eq + Hash + Debug,
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
{
    /// Returns an automaton with no labels and no edges.
    pub fn new(start: S, inputs: Vec<I>, outputs: Vec<O>) -> Self {
        Self {
            start,
            inputs,
            outputs,
            labels: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Builds an automaton from `(state, label)` pairs and `(from, input, to)` edges.
    ///
    /// Later entries for the same state or the same `(state, input)` pair replace earlier ones.
    pub fn from_edges(
        start: S,
        inputs: Vec<I>,
        outputs: Vec<O>,
        labels: impl IntoIterator<Item = (S, O)>,
        edges: impl IntoIterator<Item = (S, I, S)>,
    ) -> Self {
        let mut dfa = Self::new(start, inputs, outputs);
        for (state, label) in labels {
            dfa.set_label(state, label);
        }
        for (from, input, to) in edges {
            dfa.add_edge(from, input, to);
        }
        dfa
    }

    /// Builds an automaton from a flattened relation.
    pub fn from_relation(
        relation: &TransitionRelation<S, I, O>,
        inputs: Vec<I>,
        outputs: Vec<O>,
    ) -> Self {
        let mut dfa = Self::new(relation.start().clone(), inputs, outputs);
        for entry in relation {
            dfa.set_label(entry.state().clone(), entry.label().clone());
            for (input, next) in entry.successors() {
                dfa.add_edge(entry.state().clone(), input.clone(), next.clone());
            }
        }
        dfa
    }

    pub fn set_label(&mut self, state: S, label: O) {
        self.labels.insert(state, label);
    }

    pub fn add_edge(&mut self, from: S, input: I, to: S) {
        self.edges.entry(from).or_default().insert(input, to);
    }

    fn is_known(&self, state: &S) -> bool {
        self.labels.contains_key(state) || self.edges.contains_key(state)
    }
}

impl<S, I, O> Automaton for ExplicitDfa<S, I, O>
where
    S: Clone + Eq + Hash + Debug,
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
{
    type State = S;
    type Input = I;
    type Output = O;
    type Error = AutomatonError;

    fn start(&self) -> S {
        self.start.clone()
    }

    fn inputs(&self) -> &[I] {
        &self.inputs
    }

    fn outputs(&self) -> &[O] {
        &self.outputs
    }

    fn label(&self, state: &S) -> Result<O, AutomatonError> {
        match self.labels.get(state) {
            Some(label) => Ok(label.clone()),
            None if self.is_known(state) => Err(AutomatonError::missing_label(state)),
            None => Err(AutomatonError::unknown_state(state)),
        }
    }

    fn transition(&self, state: &S, input: &I) -> Result<S, AutomatonError> {
        match self.edges.get(state).and_then(|edges| edges.get(input)) {
            Some(next) => Ok(next.clone()),
            None if self.is_known(state) => Err(AutomatonError::missing_transition(state, input)),
            None => Err(AutomatonError::unknown_state(state)),
        }
    }
}
