//! Effect interpreter: the loop both phases share.
//!
//! The loop's only state is the current program value. Each step decodes its
//! effect against a closed vocabulary, performs the host action, and either
//! resumes with the next program value or halts with the phase's outcome.

use crate::error::{HostError, HostResult};
use crate::value::Value;

pub enum Step<V, O> {
    Resume(V),
    Halt(O),
}

pub trait Phase<V: Value> {
    type Outcome;

    fn step(&mut self, program: &V) -> HostResult<Step<V, Self::Outcome>>;
}

/// Run `phase` from `program` until it halts.
pub fn interpret<V: Value, P: Phase<V>>(phase: &mut P, mut program: V) -> HostResult<P::Outcome> {
    loop {
        match phase.step(&program)? {
            Step::Resume(next) => program = next,
            Step::Halt(outcome) => return Ok(outcome),
        }
    }
}

/// A closed, positionally-numbered effect vocabulary.
pub trait Vocabulary: Sized + Copy + 'static {
    const PHASE: &'static str;
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Number of fields the variant carries.
    fn arity(self) -> usize;
}

/// Map the program's discriminant to a variant and check its field count.
pub fn decode<E: Vocabulary, V: Value>(program: &V) -> HostResult<E> {
    let discriminant = program.discriminant()?;
    let effect = E::ALL
        .get(discriminant)
        .copied()
        .ok_or(HostError::Protocol {
            phase: E::PHASE,
            discriminant,
        })?;
    let found = program.arity()?;
    if found != effect.arity() {
        return Err(HostError::Arity {
            phase: E::PHASE,
            effect: effect.name(),
            expected: effect.arity(),
            found,
        });
    }
    Ok(effect)
}
