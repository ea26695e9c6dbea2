use core::{convert::Infallible, fmt, hash::Hash};
use std::sync::Arc;

use crate::Automaton;

type TransitionFn<S, I> = Arc<dyn Fn(&S, &I) -> S + Send + Sync>;
type LabelFn<S, O> = Arc<dyn Fn(&S) -> O + Send + Sync>;

/// A deterministic automaton defined by a transition closure and a labeling closure.
///
/// The closures are shared, so cloning a [`Dfa`] is cheap.
pub struct Dfa<S, I, O> {
    start: S,
    inputs: Vec<I>,
    outputs: Vec<O>,
    transition: TransitionFn<S, I>,
    label: LabelFn<S, O>,
}

impl<S, I, O> Dfa<S, I, O> {
    pub fn new(
        start: S,
        inputs: Vec<I>,
        outputs: Vec<O>,
        transition: impl Fn(&S, &I) -> S + Send + Sync + 'static,
        label: impl Fn(&S) -> O + Send + Sync + 'static,
    ) -> Self {
        Self {
            start,
            inputs,
            outputs,
            transition: Arc::new(transition),
            label: Arc::new(label),
        }
    }
}

impl<S, I> Dfa<S, I, bool> {
    /// Returns an automaton with the output alphabet `[false, true]`.
    pub fn boolean(
        start: S,
        inputs: Vec<I>,
        transition: impl Fn(&S, &I) -> S + Send + Sync + 'static,
        label: impl Fn(&S) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(start, inputs, vec![false, true], transition, label)
    }
}

impl<S, I, O> Automaton for Dfa<S, I, O>
where
    S: Clone + Eq + Hash + fmt::Debug,
    I: Clone + Eq + Hash + fmt::Debug,
    O: Clone + Eq + Hash + fmt::Debug,
{
    type State = S;
    type Input = I;
    type Output = O;
    type Error = Infallible;

    fn start(&self) -> S {
        self.start.clone()
    }

    fn inputs(&self) -> &[I] {
        &self.inputs
    }

    fn outputs(&self) -> &[O] {
        &self.outputs
    }

    fn label(&self, state: &S) -> Result<O, Infallible> {
        Ok((self.label)(state))
    }

    fn transition(&self, state: &S, input: &I) -> Result<S, Infallible> {
        Ok((self.transition)(state, input))
    }
}

impl<S: Clone, I: Clone, O: Clone> Clone for Dfa<S, I, O> {
    fn clone(&self) -> Self {
        Self {
            start: self.start.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            transition: Arc::clone(&self.transition),
            label: Arc::clone(&self.label),
        }
    }
}

impl<S: fmt::Debug, I: fmt::Debug, O: fmt::Debug> fmt::Debug for Dfa<S, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dfa")
            .field("start", &self.start)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}
