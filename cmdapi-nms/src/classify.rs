//! Classifying opaque score operations by what they do
//!
//! The host hands back a score operation as a closure with no inspectable
//! identity. Applying it to two scratch scores with known values tells the
//! operators apart: 6 and 2 separate everything except `<` from `=` (both
//! leave 2), which a second probe with 2 and 6 settles.

use crate::error::AdapterError;
use cmdapi_wrappers::MathOperation;
use std::fmt::Display;

/// A scratch score an operation can be applied to
pub trait ProbeCell {
    fn value(&self) -> i32;
    fn set_value(&mut self, value: i32);
}

impl ProbeCell for mchost::scoreboard::ScoreboardScore {
    fn value(&self) -> i32 {
        self.get_score()
    }

    fn set_value(&mut self, value: i32) {
        self.set_score(value);
    }
}

/// Work out which operator `apply` implements
///
/// `fresh_cell` must return an unattached score each call. Anything other
/// than the nine known outcomes, or a host error while probing, is fatal.
pub fn classify_operation<C, E>(
    fresh_cell: impl Fn() -> C,
    apply: impl Fn(&mut C, &mut C) -> Result<(), E>,
) -> Result<MathOperation, AdapterError>
where
    C: ProbeCell,
    E: Display,
{
    let probe = |left: i32, right: i32| -> Result<(i32, i32), AdapterError> {
        let mut l = fresh_cell();
        let mut r = fresh_cell();
        l.set_value(left);
        r.set_value(right);
        apply(&mut l, &mut r).map_err(|e| AdapterError::ProbeFailed(e.to_string()))?;
        Ok((l.value(), r.value()))
    };

    let (left, right) = probe(6, 2)?;
    let operation = match left {
        8 => MathOperation::Add,
        4 => MathOperation::Subtract,
        12 => MathOperation::Multiply,
        3 => MathOperation::Divide,
        0 => MathOperation::Mod,
        6 => MathOperation::Max,
        2 if right == 6 => MathOperation::Swap,
        2 => {
            let (left, _) = probe(2, 6)?;
            if left == 2 {
                MathOperation::Min
            } else {
                MathOperation::Assign
            }
        }
        _ => return Err(AdapterError::UnrecognizedOperation { left, right }),
    };
    tracing::debug!(operation = operation.symbol(), "Classified score operation");
    Ok(operation)
}
