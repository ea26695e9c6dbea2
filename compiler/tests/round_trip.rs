use aigdfa::{
    AlphabetKind, CompileError, CompileOptions, DecompileOptions, EncodingScheme, Observation,
    OptionsError, OutputSelection, TableStrategy, compile, compile_delayed, compile_relation,
    decompile, decompile_raw,
};
use aigdfa_automaton::TransitionRelation;
use aigdfa_circuit::{Bits, sim::assignment};
use aigdfa_test_utils::{Automaton, Dfa, counter_mod4, cycle, foo_bar, word_strategy, words};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn options(
    inputs: EncodingScheme,
    outputs: EncodingScheme,
    states: EncodingScheme,
    strategy: TableStrategy,
) -> CompileOptions {
    CompileOptions::new(inputs, outputs, states, strategy).unwrap()
}

// SIMULATION
// ================================================================================================

#[test]
fn counter_labels_follow_the_input_stream() {
    let dfa = counter_mod4();
    let compiled = compile(&dfa, &CompileOptions::default()).unwrap();
    let circuit = compiled.circuit();
    assert_eq!(circuit.inputs().len(), 1);
    assert_eq!(circuit.outputs().len(), 1);
    assert_eq!(circuit.latches().len(), 1);

    let relabeling = compiled.relabeling();
    let one = relabeling.inputs().encode(&1).unwrap();
    let zero = relabeling.inputs().encode(&0).unwrap();

    let mut sim = circuit.simulator();
    let mut labels = Vec::new();
    for action in [&one, &one, &one, &one, &zero, &zero] {
        let eval = sim.step(&assignment([("action", action.clone())])).unwrap();
        let code = eval.output("output").unwrap();
        labels.push(*relabeling.outputs().decode(code).unwrap());
    }
    // the output shows the label of the state before each step
    assert_eq!(labels, vec![false, false, false, true, false, false]);

    let state = sim.latches().get("state").unwrap();
    assert_eq!(relabeling.states().decode(state), Some(&0));
    assert_eq!(sim.steps(), 6);
}

#[test]
fn illegal_action_clears_validity_for_good() {
    let compiled = compile(&counter_mod4(), &CompileOptions::default()).unwrap();
    let monitored = compiled.monitored().unwrap();
    assert_eq!(monitored.latches().len(), 2);

    let mut sim = monitored.simulator();
    let valid: Vec<bool> = [0b01, 0b10, 0b11, 0b01, 0b10, 0b01]
        .into_iter()
        .map(|code| {
            let eval = sim.step(&assignment([("action", Bits::from_u64(code, 2))])).unwrap();
            eval.output("valid").and_then(|bits| bits.get(0)).unwrap()
        })
        .collect();
    assert_eq!(valid, vec![true, true, false, false, false, false]);
}

#[test]
fn foo_bar_over_a_fixed_word() {
    let dfa = foo_bar();
    let compiled = compile(&dfa, &CompileOptions::default()).unwrap();
    let relabeling = compiled.relabeling();

    let mut sim = compiled.circuit().simulator();
    let mut labels = Vec::new();
    for input in ['a', 'b', 'a', 'a', 'b'] {
        let action = relabeling.inputs().encode(&input).unwrap();
        let eval = sim.step(&assignment([("action", action)])).unwrap();
        labels.push(*relabeling.outputs().decode(eval.output("output").unwrap()).unwrap());
    }
    assert_eq!(labels, vec![false, false, true, false, false]);

    let state = sim.latches().get("state").unwrap();
    assert_eq!(relabeling.states().decode(state), Some(&"bar"));

    let back = decompile(compiled.circuit(), relabeling, &DecompileOptions::default()).unwrap();
    assert_eq!(back.outputs(), dfa.outputs());
    let word = ['a', 'b', 'a', 'a', 'b'];
    for len in 0..=word.len() {
        assert_eq!(back.label_word(&word[..len]).unwrap(), dfa.label_word(&word[..len]).unwrap());
    }
    assert!(back.label_word(&word).unwrap());
}

// ROUND TRIPS
// ================================================================================================

#[rstest]
#[case::one_hot_lookup(EncodingScheme::OneHot, EncodingScheme::OneHot, TableStrategy::Lookup)]
#[case::binary_lookup(EncodingScheme::Binary, EncodingScheme::Binary, TableStrategy::Lookup)]
#[case::one_hot_masks(EncodingScheme::OneHot, EncodingScheme::OneHot, TableStrategy::OneHotMasks)]
#[case::masks_with_binary_labels(
    EncodingScheme::OneHot,
    EncodingScheme::Binary,
    TableStrategy::OneHotMasks
)]
fn decompiled_circuit_agrees_on_every_short_word(
    #[case] symbols: EncodingScheme,
    #[case] outputs: EncodingScheme,
    #[case] strategy: TableStrategy,
) {
    let opts = options(symbols, outputs, symbols, strategy);

    let dfa = counter_mod4();
    let compiled = compile(&dfa, &opts).unwrap();
    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    for word in words(dfa.inputs(), 6) {
        assert_eq!(back.label_word(&word).unwrap(), dfa.label_word(&word).unwrap());
    }

    let dfa = cycle(5);
    let compiled = compile(&dfa, &opts).unwrap();
    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    assert_eq!(back.outputs(), dfa.outputs());
    for word in words(dfa.inputs(), 7) {
        assert_eq!(back.label_word(&word).unwrap(), dfa.label_word(&word).unwrap());
    }
}

#[test]
fn decompiled_states_are_the_reachable_ones() {
    let dfa = counter_mod4();
    let compiled = compile(&dfa, &CompileOptions::default()).unwrap();
    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    assert_eq!(back.start(), 0);
    assert_eq!(back.reachable_states().unwrap(), dfa.reachable_states().unwrap());
    assert_eq!(back.to_relation().unwrap(), dfa.to_relation().unwrap());
}

#[test]
fn delayed_circuit_lags_one_step() {
    let dfa = foo_bar();
    let compiled = compile_delayed(&dfa, &CompileOptions::default()).unwrap();
    assert_eq!(
        compiled.relabeling().outputs().symbols(),
        &[Observation::Observed(false), Observation::Observed(true), Observation::NotYetObserved]
    );

    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    assert_eq!(back.label_word(&[]).unwrap(), Observation::NotYetObserved);
    for word in words(dfa.inputs(), 4) {
        for input in dfa.inputs() {
            let mut extended = word.clone();
            extended.push(*input);
            assert_eq!(
                back.label_word(&extended).unwrap(),
                Observation::Observed(dfa.label_word(&word).unwrap())
            );
        }
    }
}

#[test]
fn raw_decompile_reads_codes() {
    let compiled = compile(&counter_mod4(), &CompileOptions::default()).unwrap();
    let raw = decompile_raw(compiled.circuit(), &DecompileOptions::default()).unwrap();

    assert_eq!(raw.start(), Bits::one_hot(0, 4));
    assert_eq!(raw.inputs(), &[Bits::one_hot(0, 2), Bits::one_hot(1, 2)]);
    assert_eq!(raw.dummy_action(), &Bits::one_hot(0, 2));

    let one = Bits::one_hot(1, 2);
    let word = [one.clone(), one.clone(), one];
    assert_eq!(raw.run(&word).unwrap(), Bits::one_hot(3, 4));
    assert_eq!(raw.label_word(&word).unwrap(), Bits::one_hot(1, 2));

    let err = raw.transition(&raw.start(), &Bits::from_u64(0b11, 2)).unwrap_err();
    assert!(matches!(err, CompileError::InvalidInputEncoding(_)));
}

#[test]
fn raw_decompile_of_binary_circuit_mirrors_source() {
    let dfa = cycle(6);
    let compiled =
        compile(&dfa, &CompileOptions::default().with_encoding(EncodingScheme::Binary)).unwrap();
    let relabeling = compiled.relabeling();
    let opts = DecompileOptions::default()
        .with_raw_encoding(EncodingScheme::Binary, EncodingScheme::Binary);
    let raw = decompile_raw(compiled.circuit(), &opts).unwrap();

    assert_eq!(raw.inputs(), &[Bits::from_u64(0, 1), Bits::from_u64(1, 1)]);
    assert_eq!(raw.outputs().len(), 4);
    assert_eq!(raw.start(), Bits::zeros(3));

    let source = dfa.to_relation().unwrap();
    let decoded = raw.to_relation().unwrap();
    assert_eq!(decoded.len(), source.len());
    assert_eq!(decoded.num_edges(), source.num_edges());
    for entry in &decoded {
        assert!(raw.outputs().contains(entry.label()));
        let state = relabeling.states().decode(entry.state()).unwrap();
        let label = relabeling.outputs().decode(entry.label()).unwrap();
        assert_eq!(source.get(state).unwrap().label(), label);
    }

    for word in words(dfa.inputs(), 6) {
        let codes: Vec<Bits> =
            word.iter().map(|input| relabeling.inputs().encode(input).unwrap()).collect();
        let label = raw.label_word(&codes).unwrap();
        assert_eq!(relabeling.outputs().decode(&label), Some(&dfa.label_word(&word).unwrap()));
    }
}

#[test]
fn exposed_next_state_is_an_extra_output() {
    let dfa = counter_mod4();
    let opts = CompileOptions::default().with_exposed_next_state(true);
    let compiled = compile(&dfa, &opts).unwrap();
    let circuit = compiled.circuit();
    assert_eq!(circuit.outputs().len(), 2);
    assert_eq!(circuit.latches().len(), 1);

    // the latch keeps the pre-update value; next_state shows the value after the step
    let one = compiled.relabeling().inputs().encode(&1).unwrap();
    let eval = circuit.eval(&assignment([("action", one)]), None).unwrap();
    assert_eq!(eval.output("next_state"), Some(&Bits::one_hot(1, 4)));
    assert_eq!(eval.latch("state"), Some(&Bits::one_hot(1, 4)));

    let back = decompile(circuit, compiled.relabeling(), &DecompileOptions::default()).unwrap();
    assert_eq!(back.output_port(), "output");
    for word in words(dfa.inputs(), 5) {
        assert_eq!(back.label_word(&word).unwrap(), dfa.label_word(&word).unwrap());
    }

    let named = DecompileOptions::default()
        .with_output_selection(OutputSelection::Named("next_state".to_string()));
    let back = decompile_raw(circuit, &named).unwrap();
    assert_eq!(back.output_port(), "next_state");
}

// ERRORS
// ================================================================================================

#[test]
fn several_outputs_are_ambiguous_when_a_sole_output_is_required() {
    let opts = CompileOptions::default().with_exposed_next_state(true);
    let compiled = compile(&counter_mod4(), &opts).unwrap();
    let sole = DecompileOptions::default().with_output_selection(OutputSelection::Sole);

    let mut candidates = match decompile(compiled.circuit(), compiled.relabeling(), &sole) {
        Err(CompileError::AmbiguousOutput { candidates }) => candidates,
        other => panic!("expected an ambiguous output, got {other:?}"),
    };
    candidates.sort();
    assert_eq!(candidates, vec!["next_state".to_string(), "output".to_string()]);
}

#[test]
fn default_selection_fails_without_a_conventional_output() {
    let names = aigdfa::PortNames::default().with_output("out");
    let opts = CompileOptions::default().with_port_names(names).with_exposed_next_state(true);
    let compiled = compile(&counter_mod4(), &opts).unwrap();

    let mut candidates =
        match decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default()) {
            Err(CompileError::AmbiguousOutput { candidates }) => candidates,
            other => panic!("expected an ambiguous output, got {other:?}"),
        };
    candidates.sort();
    assert_eq!(candidates, vec!["next_state".to_string(), "out".to_string()]);
}

#[test]
fn monitored_circuit_is_not_a_machine() {
    let compiled = compile(&counter_mod4(), &CompileOptions::default()).unwrap();
    let monitored = compiled.monitored().unwrap();
    let err = decompile(&monitored, compiled.relabeling(), &DecompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::MalformedCircuitShape(_)));
}

#[test]
fn renamed_ports_must_be_configured_on_both_sides() {
    let names = aigdfa::PortNames::default().with_action("act").with_state("q");
    let opts = CompileOptions::default().with_port_names(names.clone());
    let compiled = compile(&foo_bar(), &opts).unwrap();
    assert!(compiled.circuit().input("act").is_some());
    assert!(compiled.circuit().latch("q").is_some());

    let err = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::MalformedCircuitShape(_)));

    let back = decompile(
        compiled.circuit(),
        compiled.relabeling(),
        &DecompileOptions::default().with_port_names(names),
    )
    .unwrap();
    assert!(back.label_word(&['b']).unwrap());
}

#[test]
fn unknown_input_symbol_is_rejected() {
    let compiled = compile(&counter_mod4(), &CompileOptions::default()).unwrap();
    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    let err = back.transition(&0, &7).unwrap_err();
    assert!(matches!(err, CompileError::InvalidInputEncoding(_)));
}

#[test]
fn dummy_action_must_fit_the_action_port() {
    let compiled = compile(&counter_mod4(), &CompileOptions::default()).unwrap();
    let opts = DecompileOptions::default().with_dummy_action(Bits::one_hot(0, 3));
    let err = decompile(compiled.circuit(), compiled.relabeling(), &opts).unwrap_err();
    assert!(matches!(err, CompileError::Options(OptionsError::DummyActionWidth { .. })));
}

#[test]
fn repeated_input_symbols_compile_once() {
    let dfa = Dfa::boolean(0u8, vec![1, 0, 1], |s, c| (s + c) % 4, |s| *s == 3);
    let compiled = compile(&dfa, &CompileOptions::default()).unwrap();
    assert_eq!(compiled.relabeling().inputs().symbols(), &[1, 0]);

    let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
        .unwrap();
    for word in words(&[0, 1], 5) {
        assert_eq!(back.label_word(&word).unwrap(), dfa.label_word(&word).unwrap());
    }
}

#[test]
fn start_state_must_be_listed() {
    let mut relation = TransitionRelation::new("start");
    relation.insert("other", true, vec![('a', "other")]).unwrap();
    let err = compile_relation(&relation, ['a'], [false, true], &CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownStartState(_)));
}

#[test]
fn empty_alphabets_are_rejected() {
    let mut relation = TransitionRelation::new(0u8);
    relation.insert(0, false, vec![]).unwrap();

    let err = compile_relation(&relation, Vec::<char>::new(), [false], &CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::EmptyAlphabet(AlphabetKind::Inputs)));

    let err = compile_relation(&relation, ['a'], Vec::<bool>::new(), &CompileOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::EmptyAlphabet(AlphabetKind::Outputs)));
}

#[test]
fn masks_need_one_hot_codes() {
    let err = CompileOptions::new(
        EncodingScheme::Binary,
        EncodingScheme::OneHot,
        EncodingScheme::OneHot,
        TableStrategy::OneHotMasks,
    )
    .unwrap_err();
    assert_eq!(err, OptionsError::MasksRequireOneHot(AlphabetKind::Inputs));
}

// PROPERTIES
// ================================================================================================

proptest! {
    #[test]
    fn binary_round_trip_matches_source(word in word_strategy(vec!["stay", "advance"], 16)) {
        let dfa = cycle(6);
        let opts = CompileOptions::default().with_encoding(EncodingScheme::Binary);
        let compiled = compile(&dfa, &opts).unwrap();
        let back = decompile(compiled.circuit(), compiled.relabeling(), &DecompileOptions::default())
            .unwrap();
        prop_assert_eq!(back.label_word(&word).unwrap(), dfa.label_word(&word).unwrap());
        prop_assert_eq!(back.run(&word).unwrap(), dfa.run(&word).unwrap());
    }
}
