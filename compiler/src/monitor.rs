use aigdfa_circuit::{Circuit, CircuitBuilder, aig::Lit, temporal::historically};

use crate::{CompileError, EncodingScheme};

/// Builds the validity monitor for an action port of the given width.
///
/// The monitor has one input, `action`, and one output, `valid`, which is true while every
/// action read so far was a legal code. For one-hot actions a code `x` is legal iff
/// `x != 0 && (x & (x - 1)) == 0`. Binary codes are always considered legal.
pub fn validity_monitor(
    action: &str,
    width: usize,
    scheme: EncodingScheme,
    valid: &str,
) -> Result<Circuit, CompileError> {
    let mut builder = CircuitBuilder::new();
    let x = builder.input(action, width)?;
    let legal = match scheme {
        EncodingScheme::OneHot => {
            let nonzero = builder.any(&x);
            let below = builder.decrement(&x);
            let overlap = builder.and(&x, &below)?;
            let single = builder.is_zero(&overlap);
            builder.aig_mut().and(nonzero, single)
        },
        EncodingScheme::Binary => Lit::TRUE,
    };
    builder.output(valid, &[legal].into_iter().collect())?;
    let step_check = builder.finish()?;
    Ok(step_check.seq(&historically(valid, valid)?)?)
}

#[cfg(test)]
mod tests {
    use aigdfa_circuit::{Bits, sim::assignment};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::validity_monitor;
    use crate::EncodingScheme;

    #[rstest]
    #[case(0b000, false)]
    #[case(0b001, true)]
    #[case(0b010, true)]
    #[case(0b100, true)]
    #[case(0b011, false)]
    #[case(0b111, false)]
    fn one_hot_test_per_code(#[case] code: u64, #[case] legal: bool) {
        let monitor = validity_monitor("action", 3, EncodingScheme::OneHot, "valid").unwrap();
        let eval = monitor.eval(&assignment([("action", Bits::from_u64(code, 3))]), None).unwrap();
        assert_eq!(eval.output("valid"), Some(&Bits::from([legal])));
    }

    #[test]
    fn validity_is_sticky() {
        let monitor = validity_monitor("action", 2, EncodingScheme::OneHot, "valid").unwrap();
        assert_eq!(monitor.inputs().len(), 1);
        assert_eq!(monitor.outputs().len(), 1);

        let mut sim = monitor.simulator();
        let seen: Vec<bool> = [0b01, 0b10, 0b11, 0b01, 0b10]
            .into_iter()
            .map(|code| {
                let eval = sim.step(&assignment([("action", Bits::from_u64(code, 2))])).unwrap();
                eval.output("valid").and_then(|bits| bits.get(0)).unwrap()
            })
            .collect();
        assert_eq!(seen, vec![true, true, false, false, false]);
    }

    #[test]
    fn binary_actions_are_always_valid() {
        let monitor = validity_monitor("action", 2, EncodingScheme::Binary, "valid").unwrap();
        assert_eq!(monitor.num_ands(), 0);
        let mut sim = monitor.simulator();
        for code in [0, 3, 2, 1] {
            let eval = sim.step(&assignment([("action", Bits::from_u64(code, 2))])).unwrap();
            assert_eq!(eval.output("valid"), Some(&Bits::from([true])));
        }
    }
}
