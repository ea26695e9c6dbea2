//! Delayed-output view of an automaton.
//!
//! [`Delayed`] wraps an automaton `A` into the automaton whose label is the label `A` had one
//! step earlier. Its states pair the current state of `A` with the previously observed output,
//! so `Delayed(A).label(w · a) == Observed(A.label(w))` and the empty word is labeled
//! [`Observation::NotYetObserved`].

use aigdfa_automaton::Automaton;

/// An output that may not have been produced yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Observation<O> {
    /// No step has been taken.
    NotYetObserved,
    Observed(O),
}

impl<O> Observation<O> {
    pub fn observed(&self) -> Option<&O> {
        match self {
            Self::NotYetObserved => None,
            Self::Observed(output) => Some(output),
        }
    }
}

/// State of a [`Delayed`] automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelayedState<S, O> {
    current: S,
    previous_output: Observation<O>,
}

impl<S, O> DelayedState<S, O> {
    pub fn new(current: S, previous_output: Observation<O>) -> Self {
        Self { current, previous_output }
    }

    /// State of the wrapped automaton.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Label of the wrapped automaton before the last step.
    pub fn previous_output(&self) -> &Observation<O> {
        &self.previous_output
    }
}

/// Delayed-output view of an automaton; see the module documentation.
#[derive(Debug, Clone)]
pub struct Delayed<'a, A: Automaton> {
    inner: &'a A,
    outputs: Vec<Observation<A::Output>>,
}

impl<'a, A: Automaton> Delayed<'a, A> {
    /// The output alphabet is the alphabet of `inner` followed by
    /// [`Observation::NotYetObserved`].
    pub fn new(inner: &'a A) -> Self {
        let outputs = inner
            .outputs()
            .iter()
            .cloned()
            .map(Observation::Observed)
            .chain([Observation::NotYetObserved])
            .collect();
        Self { inner, outputs }
    }

    pub fn inner(&self) -> &A {
        self.inner
    }
}

impl<A: Automaton> Automaton for Delayed<'_, A> {
    type State = DelayedState<A::State, A::Output>;
    type Input = A::Input;
    type Output = Observation<A::Output>;
    type Error = A::Error;

    fn start(&self) -> Self::State {
        DelayedState::new(self.inner.start(), Observation::NotYetObserved)
    }

    fn inputs(&self) -> &[A::Input] {
        self.inner.inputs()
    }

    fn outputs(&self) -> &[Self::Output] {
        &self.outputs
    }

    fn label(&self, state: &Self::State) -> Result<Self::Output, A::Error> {
        Ok(state.previous_output.clone())
    }

    fn transition(&self, state: &Self::State, input: &A::Input) -> Result<Self::State, A::Error> {
        Ok(DelayedState {
            current: self.inner.transition(&state.current, input)?,
            previous_output: Observation::Observed(self.inner.label(&state.current)?),
        })
    }
}
