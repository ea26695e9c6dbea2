//! Temporal operators over single-bit signals.

use crate::{Bits, Circuit, CircuitBuilder, CircuitError};

/// Returns a circuit whose `output` is true iff `input` has been true at every step so far,
/// including the current one.
///
/// The history is kept in a one-bit latch named `historically(<input>)` that starts out true.
pub fn historically(input: &str, output: &str) -> Result<Circuit, CircuitError> {
    let mut builder = CircuitBuilder::new();
    let now = builder.input(input, 1)?;
    let name = format!("historically({input})");
    let so_far = builder.latch(name.as_str(), Bits::from([true]))?;
    let holds = builder.and(&now, &so_far)?;
    builder.drive_latch(&name, &holds)?;
    builder.output(output, &holds)?;
    builder.finish()
}
