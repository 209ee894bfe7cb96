//! Execution validation: admissibility, replay, final-state comparison.
//!
//! Validation never fails with an `Err`. A malformed step sequence is a
//! rejected execution, reported through the returned [`Verdict`].

use tracing::{debug, trace};

use crate::error::ReplayError;
use crate::execution::{Execution, StateVector, Step};
use crate::value::Value;
use crate::verdict::{Reason, Verdict};

/// The only action value that makes a step admissible.
pub const STEP_QUANTUM: i64 = 1;

/// A step is admissible iff its action equals the step quantum.
pub fn admissible_step(step: &Step) -> bool {
    step.action() == STEP_QUANTUM
}

/// Apply `step` (at position `index`) to `state` by coordinate-wise addition.
///
/// The result keeps `state`'s metadata.
pub fn apply_step(state: &StateVector, step: &Step, index: usize) -> Result<StateVector, ReplayError> {
    let (a, b) = (state.coords(), step.delta().coords());
    if a.len() != b.len() {
        return Err(ReplayError::DimensionMismatch {
            index,
            state: a.len(),
            delta: b.len(),
        });
    }

    let coords = a
        .iter()
        .zip(b)
        .enumerate()
        .map(|(coord, (x, dx))| x.checked_add(*dx).ok_or(ReplayError::Overflow { index, coord }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(state.with_coords(coords))
}

/// Replay every step from `init`, returning the computed end state.
pub fn replay(execution: &Execution) -> Result<StateVector, ReplayError> {
    execution
        .steps()
        .iter()
        .enumerate()
        .try_fold(execution.init().clone(), |state, (index, step)| {
            let next = apply_step(&state, step, index)?;
            trace!(index, step_id = step.id(), coords = ?next.coords(), "applied step");
            Ok(next)
        })
}

/// Validate an execution.
///
/// 1. Every step must be admissible; the first that is not rejects with
///    `NON_ADMISSIBLE_STEP`.
/// 2. Replay must succeed; failures reject with `REPLAY_ERROR`.
/// 3. The computed coordinates must equal the declared final coordinates,
///    else `REPLAY_MISMATCH`.
pub fn validate_execution(execution: &Execution) -> Verdict {
    if let Some((index, step)) = execution
        .steps()
        .iter()
        .enumerate()
        .find(|(_, s)| !admissible_step(s))
    {
        debug!(index, step_id = step.id(), action = step.action(), "non-admissible step");
        return Verdict::reject(
            Reason::NonAdmissibleStep,
            [
                ("index", Value::from(index)),
                ("step_id", Value::from(step.id())),
                ("action", Value::Int(step.action())),
                ("expected", Value::Int(STEP_QUANTUM)),
            ],
        );
    }

    let computed = match replay(execution) {
        Ok(state) => state,
        Err(e) => {
            debug!(step = e.step_index(), error = %e, "replay failed");
            return Verdict::reject(Reason::ReplayError, [("error", e.to_string())]);
        }
    };

    let declared = execution.final_state();
    if computed.coords() != declared.coords() {
        debug!(computed = ?computed.coords(), declared = ?declared.coords(), "replay mismatch");
        return Verdict::reject(
            Reason::ReplayMismatch,
            [
                ("computed", Value::ints(computed.coords())),
                ("declared", Value::ints(declared.coords())),
            ],
        );
    }

    Verdict::accept()
}

/// Whether a valid execution's declared final state equals `target`.
///
/// Compares coordinates only. Always false for an execution that does not
/// validate.
pub fn closed(execution: &Execution, target: &StateVector) -> bool {
    validate_execution(execution).ok() && execution.final_state().coords() == target.coords()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    fn sv(coords: &[i64]) -> StateVector {
        StateVector::from_coords(coords.to_vec()).unwrap()
    }

    fn step(id: &str, delta: &[i64], action: i64) -> Step {
        Step::new(id, sv(delta), action, Map::new()).unwrap()
    }

    fn exec(init: &[i64], steps: Vec<Step>, fin: &[i64]) -> Execution {
        Execution::new(sv(init), steps, sv(fin), Map::new())
    }

    fn unit_walk(fin: &[i64]) -> Execution {
        exec(&[0, 0], vec![step("s1", &[1, 0], 1), step("s2", &[0, 1], 1)], fin)
    }

    #[test]
    fn test_valid_unit_walk() {
        let v = validate_execution(&unit_walk(&[1, 1]));
        assert!(v.ok());
        assert_eq!(v.reason(), Reason::Ok);
        assert!(v.details().is_empty());
    }

    #[test]
    fn test_non_admissible_step() {
        let e = exec(&[0, 0], vec![step("s1", &[1, 1], 2)], &[1, 1]);
        let v = validate_execution(&e);
        assert!(!v.ok());
        assert_eq!(v.reason(), Reason::NonAdmissibleStep);
        assert_eq!(v.details().get("index"), Some(&Value::Int(0)));
        assert_eq!(v.details().get("step_id"), Some(&Value::from("s1")));
        assert_eq!(v.details().get("action"), Some(&Value::Int(2)));
        assert_eq!(v.details().get("expected"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_first_non_admissible_step_wins() {
        let e = exec(
            &[0],
            vec![step("a", &[1], 1), step("b", &[1], 0), step("c", &[1], 5)],
            &[3],
        );
        let v = validate_execution(&e);
        assert_eq!(v.details().get("step_id"), Some(&Value::from("b")));
    }

    #[test]
    fn test_admissibility_checked_before_replay() {
        // Dimension mismatch at step 0 and bad action at step 1: admissibility wins.
        let e = exec(&[0, 0], vec![step("a", &[1], 1), step("b", &[1, 1], 7)], &[1, 1]);
        assert_eq!(validate_execution(&e).reason(), Reason::NonAdmissibleStep);
    }

    #[test]
    fn test_replay_mismatch() {
        let v = validate_execution(&unit_walk(&[9, 9]));
        assert_eq!(v.reason(), Reason::ReplayMismatch);
        assert_eq!(v.details().get("computed"), Some(&Value::ints(&[1, 1])));
        assert_eq!(v.details().get("declared"), Some(&Value::ints(&[9, 9])));
    }

    #[test]
    fn test_replay_dimension_mismatch() {
        let e = exec(&[0, 0], vec![step("s1", &[1, 0, 0], 1)], &[1, 0]);
        let v = validate_execution(&e);
        assert_eq!(v.reason(), Reason::ReplayError);
        assert_eq!(
            v.details().get("error"),
            Some(&Value::from("Dimension mismatch: 2 != 3"))
        );
    }

    #[test]
    fn test_replay_overflow_is_a_verdict() {
        let e = exec(&[i64::MAX], vec![step("s1", &[1], 1)], &[0]);
        let v = validate_execution(&e);
        assert_eq!(v.reason(), Reason::ReplayError);
    }

    #[test]
    fn test_empty_steps() {
        assert!(validate_execution(&exec(&[5], vec![], &[5])).ok());
        assert_eq!(
            validate_execution(&exec(&[5], vec![], &[6])).reason(),
            Reason::ReplayMismatch
        );
    }

    #[test]
    fn test_final_dimension_differs() {
        let e = exec(&[0], vec![step("s1", &[1], 1)], &[1, 0]);
        assert_eq!(validate_execution(&e).reason(), Reason::ReplayMismatch);
    }

    #[test]
    fn test_replay_keeps_init_meta() {
        let mut meta = Map::new();
        meta.insert("origin".into(), Value::Bool(true));
        let init = StateVector::new(vec![0], meta.clone()).unwrap();
        let e = Execution::new(init, vec![step("s1", &[2], 1)], sv(&[2]), Map::new());
        let out = replay(&e).unwrap();
        assert_eq!(out.coords(), &[2]);
        assert_eq!(out.meta(), &meta);
    }

    #[test]
    fn test_closed() {
        let e = unit_walk(&[1, 1]);
        assert!(closed(&e, &sv(&[1, 1])));
        assert!(!closed(&e, &sv(&[0, 0])));
    }

    #[test]
    fn test_closed_requires_valid_execution() {
        let e = unit_walk(&[9, 9]);
        assert!(!closed(&e, &sv(&[9, 9])));
    }

    #[test]
    fn test_closed_ignores_target_meta() {
        let mut meta = Map::new();
        meta.insert("note".into(), Value::from("anything"));
        let target = StateVector::new(vec![1, 1], meta).unwrap();
        assert!(closed(&unit_walk(&[1, 1]), &target));
    }
}
