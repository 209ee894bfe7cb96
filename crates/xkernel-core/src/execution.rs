//! The execution data model: state vectors, steps, executions.
//!
//! All three are immutable once built. Constructors enforce the
//! structural invariants, so any value of these types can be encoded and
//! replayed without further checks.

use crate::error::{CoreError, Result};
use crate::value::Map;

/// A point in ℤⁿ with attached metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVector {
    coords: Vec<i64>,
    meta: Map,
}

impl StateVector {
    /// Build a state vector. `coords` must be non-empty.
    pub fn new(coords: Vec<i64>, meta: Map) -> Result<Self> {
        if coords.is_empty() {
            return Err(CoreError::EmptyCoords {
                path: "StateVector.coords".into(),
            });
        }
        Ok(Self { coords, meta })
    }

    /// Build a state vector with empty metadata.
    pub fn from_coords(coords: Vec<i64>) -> Result<Self> {
        Self::new(coords, Map::new())
    }

    pub fn coords(&self) -> &[i64] {
        &self.coords
    }

    pub fn meta(&self) -> &Map {
        &self.meta
    }

    /// Number of coordinates.
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// A new state with the same metadata and different coordinates.
    /// Replace the metadata, keeping the coordinates.
    pub fn with_meta(self, meta: Map) -> Self {
        Self { meta, ..self }
    }

    pub(crate) fn with_coords(&self, coords: Vec<i64>) -> Self {
        debug_assert!(!coords.is_empty());
        Self {
            coords,
            meta: self.meta.clone(),
        }
    }
}

/// One transition: a coordinate delta plus an admissibility weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    id: String,
    delta: StateVector,
    action: i64,
    witness: Map,
}

impl Step {
    /// Build a step. `id` must be non-empty.
    pub fn new(id: impl Into<String>, delta: StateVector, action: i64, witness: Map) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyStepId);
        }
        Ok(Self {
            id,
            delta,
            action,
            witness,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn delta(&self) -> &StateVector {
        &self.delta
    }

    pub fn action(&self) -> i64 {
        self.action
    }

    /// Auxiliary data. Carried and hashed, never interpreted.
    pub fn witness(&self) -> &Map {
        &self.witness
    }
}

/// A claimed run from `init` through `steps` to `final_state`.
///
/// Steps replay in list order. `claims` is caller-asserted metadata and is
/// not verified beyond being JSON-safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    init: StateVector,
    steps: Vec<Step>,
    final_state: StateVector,
    claims: Map,
}

impl Execution {
    pub fn new(init: StateVector, steps: Vec<Step>, final_state: StateVector, claims: Map) -> Self {
        Self {
            init,
            steps,
            final_state,
            claims,
        }
    }

    pub fn init(&self) -> &StateVector {
        &self.init
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The declared end state.
    pub fn final_state(&self) -> &StateVector {
        &self.final_state
    }

    pub fn claims(&self) -> &Map {
        &self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_state_vector_rejects_empty() {
        let err = StateVector::from_coords(vec![]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCoords { .. }));
    }

    #[test]
    fn test_state_vector_accessors() {
        let mut meta = Map::new();
        meta.insert("label".into(), Value::from("origin"));
        let sv = StateVector::new(vec![0, -1, 2], meta).unwrap();
        assert_eq!(sv.coords(), &[0, -1, 2]);
        assert_eq!(sv.dimension(), 3);
        assert_eq!(sv.meta().get("label"), Some(&Value::from("origin")));
    }

    #[test]
    fn test_step_rejects_empty_id() {
        let delta = StateVector::from_coords(vec![1]).unwrap();
        let err = Step::new("", delta, 1, Map::new()).unwrap_err();
        assert_eq!(err, CoreError::EmptyStepId);
    }

    #[test]
    fn test_caller_mutation_does_not_alias() {
        let mut coords = vec![1, 2];
        let sv = StateVector::from_coords(coords.clone()).unwrap();
        coords[0] = 99;
        assert_eq!(sv.coords(), &[1, 2]);
    }

    #[test]
    fn test_with_coords_keeps_meta() {
        let mut meta = Map::new();
        meta.insert("k".into(), Value::Bool(true));
        let sv = StateVector::new(vec![0], meta).unwrap();
        let moved = sv.with_coords(vec![5]);
        assert_eq!(moved.coords(), &[5]);
        assert_eq!(moved.meta(), sv.meta());
    }
}
