//! Fixture automata and word generators shared by the aigdfa test suites.

use core::fmt::Debug;

pub use aigdfa_automaton::{Automaton, Dfa};
use itertools::Itertools;
pub use pretty_assertions;
pub use proptest;
use proptest::{collection::vec, sample::select, strategy::Strategy};

// FIXTURES
// ================================================================================================

/// Counts the ones read so far modulo 4; the label is true in state 3.
pub fn counter_mod4() -> Dfa<u8, u8, bool> {
    Dfa::boolean(0, vec![0, 1], |state, input| (state + input) % 4, |state| *state == 3)
}

/// Two-state machine over `{a, b}`: `b` moves from `foo` to `bar`, everything else leads back to
/// `foo`. Only `bar` is labeled true.
pub fn foo_bar() -> Dfa<&'static str, char, bool> {
    Dfa::boolean(
        "foo",
        vec!['a', 'b'],
        |state, input| match (*state, *input) {
            ("foo", 'b') => "bar",
            _ => "foo",
        },
        |state| *state == "bar",
    )
}

/// A cycle of `len` states; `advance` moves one step, `stay` keeps the state. The label is the
/// state index modulo 3, so the output alphabet has three symbols.
pub fn cycle(len: u16) -> Dfa<u16, &'static str, u8> {
    let len = len.max(1);
    Dfa::new(
        0,
        vec!["stay", "advance"],
        vec![0, 1, 2],
        move |state, input| if *input == "advance" { (state + 1) % len } else { *state },
        |state| (state % 3) as u8,
    )
}

// WORDS
// ================================================================================================

/// Every word over `alphabet` of length at most `max_len`, shortest first.
pub fn words<T: Clone>(alphabet: &[T], max_len: usize) -> Vec<Vec<T>> {
    let mut all = vec![Vec::new()];
    for len in 1..=max_len {
        all.extend((0..len).map(|_| alphabet.iter().cloned()).multi_cartesian_product());
    }
    all
}

/// A proptest strategy producing words over `alphabet` of length below `max_len`.
pub fn word_strategy<T: Clone + Debug + 'static>(
    alphabet: Vec<T>,
    max_len: usize,
) -> impl Strategy<Value = Vec<T>> {
    vec(select(alphabet), 0..max_len)
}
