//! Proptest generators for property-based testing.

use proptest::prelude::*;

use xkernel_core::{Execution, Map, StateVector, Step, Value};

/// Generate an arbitrary JSON-safe value, nested a few levels deep.
///
/// Strings cover the full Unicode range, control characters included.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<String>().prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Seq),
            prop::collection::btree_map(any::<String>(), inner, 0..4).prop_map(Value::Map),
        ]
    })
}

/// Generate a metadata mapping.
pub fn meta() -> impl Strategy<Value = Map> {
    prop::collection::btree_map("[a-z_]{1,8}", json_value(), 0..3)
}

/// Generate coordinates of the given dimension.
///
/// Bounded so that replaying a handful of deltas cannot overflow.
pub fn coords(dim: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000_000i64..=1_000_000, dim)
}

/// Generate a state vector of the given dimension.
pub fn state_vector(dim: usize) -> impl Strategy<Value = StateVector> {
    (coords(dim), meta()).prop_map(|(c, m)| StateVector::new(c, m).expect("dim >= 1"))
}

/// Generate a step id.
pub fn step_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Parameters for generating a valid execution.
///
/// Every step is admissible and the declared final state is the replay
/// result, so the execution validates.
#[derive(Debug, Clone)]
pub struct ExecutionParams {
    pub init: StateVector,
    pub steps: Vec<(String, Vec<i64>, Map)>,
    pub final_meta: Map,
    pub claims: Map,
}

impl Arbitrary for ExecutionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1usize..=4)
            .prop_flat_map(|dim| {
                (
                    state_vector(dim),
                    prop::collection::vec(
                        (step_id(), prop::collection::vec(-10i64..=10, dim), meta()),
                        0..8,
                    ),
                    meta(),
                    meta(),
                )
            })
            .prop_map(|(init, steps, final_meta, claims)| ExecutionParams {
                init,
                steps,
                final_meta,
                claims,
            })
            .boxed()
    }
}

/// Build the execution described by `params`.
pub fn execution_from_params(params: &ExecutionParams) -> Execution {
    let mut end = params.init.coords().to_vec();
    let steps = params
        .steps
        .iter()
        .map(|(id, delta, witness)| {
            for (x, dx) in end.iter_mut().zip(delta) {
                *x += dx;
            }
            let delta = StateVector::new(delta.clone(), Map::new()).expect("dim >= 1");
            Step::new(id.clone(), delta, 1, witness.clone()).expect("non-empty id")
        })
        .collect();
    let final_state = StateVector::new(end, params.final_meta.clone()).expect("dim >= 1");
    Execution::new(params.init.clone(), steps, final_state, params.claims.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xkernel_core::{
        canonical_bytes, canonical_json_bytes, execution_to_value, validate_execution, Reason,
    };
    use xkernel_receipt::{build_receipt, receipt_id, verify_receipt};

    proptest! {
        #[test]
        fn prop_generated_executions_validate(params: ExecutionParams) {
            let e = execution_from_params(&params);
            let verdict = validate_execution(&e);
            prop_assert!(verdict.ok(), "rejected: {:?}", verdict);
        }

        #[test]
        fn prop_content_id_is_deterministic(params: ExecutionParams) {
            let e1 = execution_from_params(&params);
            let e2 = execution_from_params(&params);
            prop_assert_eq!(canonical_bytes(&e1), canonical_bytes(&e2));
            prop_assert_eq!(e1.content_id(), e2.content_id());
        }

        #[test]
        fn prop_canonical_bytes_match_sorted_compact_json(value in json_value()) {
            let json: serde_json::Value = value.clone().into();
            prop_assert_eq!(canonical_json_bytes(&value), serde_json::to_vec(&json).unwrap());
        }

        #[test]
        fn prop_canonical_bytes_parse_back(params: ExecutionParams) {
            let e = execution_from_params(&params);
            let parsed: serde_json::Value = serde_json::from_slice(&canonical_bytes(&e)).unwrap();
            prop_assert_eq!(Value::try_from(parsed).unwrap(), execution_to_value(&e));
        }

        #[test]
        fn prop_receipt_verifies_against_its_execution(params in any::<ExecutionParams>(), with_target in any::<bool>()) {
            let e = execution_from_params(&params);
            let target = with_target.then(|| e.final_state().clone());
            let receipt = build_receipt(&e, target.as_ref()).to_value();
            prop_assert!(verify_receipt(&receipt, &e).ok());
        }

        #[test]
        fn prop_tampered_final_is_detected(params in any::<ExecutionParams>(), bump in 1i64..100) {
            let e = execution_from_params(&params);
            let receipt = build_receipt(&e, None).to_value();

            let mut coords = e.final_state().coords().to_vec();
            coords[0] += bump;
            let tampered = Execution::new(
                e.init().clone(),
                e.steps().to_vec(),
                StateVector::new(coords, e.final_state().meta().clone()).unwrap(),
                e.claims().clone(),
            );

            prop_assert_ne!(e.content_id(), tampered.content_id());
            prop_assert_eq!(validate_execution(&tampered).reason(), Reason::ReplayMismatch);
            prop_assert_eq!(
                verify_receipt(&receipt, &tampered).reason(),
                Reason::ReceiptExecutionIdMismatch
            );
        }

        #[test]
        fn prop_receipt_id_tracks_content(params: ExecutionParams) {
            let e = execution_from_params(&params);
            let r1 = build_receipt(&e, None);
            let r2 = build_receipt(&e, Some(e.final_state()));
            prop_assert_eq!(r1.id(), receipt_id(&r1.to_value()));
            prop_assert_ne!(r1.id(), r2.id());
        }
    }
}
