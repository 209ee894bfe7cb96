//! Golden test vectors for deterministic verification.
//!
//! Every implementation of xkernel must produce identical execution ids,
//! verdicts, and receipt ids for these executions. The expected values
//! were produced independently of this crate.

use xkernel_core::{validate_execution, Execution, Map, Reason, StateVector, Step, Value};
use xkernel_receipt::build_receipt;

use crate::fixtures::{step, sv, unit_walk};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Builds the execution under test.
    pub build: fn() -> Execution,
    /// Expected execution id (`xk:sha256:...`).
    pub expected_id: &'static str,
    /// Expected verdict reason.
    pub expected_reason: Reason,
    /// Expected id of the receipt built without a target.
    pub expected_receipt_id: &'static str,
    /// Expected canonical bytes, where pinned.
    pub expected_canonical: Option<&'static str>,
}

impl GoldenVector {
    pub fn execution(&self) -> Execution {
        (self.build)()
    }
}

fn empty_steps() -> Execution {
    Execution::new(sv(&[5]), vec![], sv(&[5]), Map::new())
}

fn non_admissible() -> Execution {
    let s1 = Step::new("s1", sv(&[1, 1]), 2, Map::new()).expect("valid step");
    Execution::new(sv(&[0, 0]), vec![s1], sv(&[1, 1]), Map::new())
}

fn replay_mismatch() -> Execution {
    Execution::new(
        sv(&[0, 0]),
        vec![step("s1", &[1, 0]), step("s2", &[0, 1])],
        sv(&[9, 9]),
        Map::new(),
    )
}

fn dimension_mismatch() -> Execution {
    Execution::new(sv(&[0, 0]), vec![step("s1", &[1])], sv(&[1, 1]), Map::new())
}

/// Non-ASCII keys and strings, control characters, nested metadata.
fn rich_meta() -> Execution {
    let init_meta = Value::map([
        ("z", Value::Null),
        (
            "a",
            Value::Seq(vec![Value::Bool(true), Value::Bool(false), Value::Int(-1)]),
        ),
        (
            "m",
            Value::map([("y", Value::from("q")), ("b", Value::from("é\n\"\\\t\u{1}"))]),
        ),
    ]);
    let witness = Value::map([(
        "k",
        Value::Seq(vec![Value::map([("n", Value::Int(0))])]),
    )]);
    let claims = Value::map([("author", Value::from("ç")), ("nums", Value::ints(&[1, 2, 3]))]);

    let as_map = |v: Value| v.as_map().cloned().unwrap_or_default();
    let mut end = Map::new();
    end.insert("label".into(), Value::from("end"));

    Execution::new(
        StateVector::new(vec![-3, 7], as_map(init_meta)).expect("valid state"),
        vec![Step::new("μ", sv(&[3, -7]), 1, as_map(witness)).expect("valid step")],
        StateVector::new(vec![0, 0], end).expect("valid state"),
        as_map(claims),
    )
}

const RICH_META_CANONICAL: &str = concat!(
    r#"{"execution":{"claims":{"author":"ç","nums":[1,2,3]},"#,
    r#""final":{"coords":[0,0],"meta":{"label":"end"}},"#,
    r#""init":{"coords":[-3,7],"meta":{"a":[true,false,-1],"m":{"b":"é\n\"\\\t\u0001","y":"q"},"z":null}},"#,
    r#""steps":[{"action":1,"delta":{"coords":[3,-7],"meta":{}},"id":"μ","witness":{"k":[{"n":0}]}}]},"#,
    r#""spec":"XKERNEL_INVARIANTS_kK_SPEC_V1","version":"1.0.0-draft"}"#
);

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "unit walk to [1,1]",
            build: || unit_walk(&[1, 1]),
            expected_id: "xk:sha256:bd6548f8992226de62fc9849d06c674e14e8d4841f585af438a43d84b36c80b5",
            expected_reason: Reason::Ok,
            expected_receipt_id: "xr:sha256:a6ff17bc5f8e08b12bac944925c02b49c7dc974162a336e9da24d3a374c2c56c",
            expected_canonical: None,
        },
        GoldenVector {
            name: "no steps",
            build: empty_steps,
            expected_id: "xk:sha256:f67394cb96b2e9d4e8efb89e38c8faa6f4c482b802abfc5660c14af5d646fd12",
            expected_reason: Reason::Ok,
            expected_receipt_id: "xr:sha256:eaae705f8b43c203d342a61bb8859377632e177c0840f3b0406144a2f9f067d4",
            expected_canonical: None,
        },
        GoldenVector {
            name: "non-admissible action",
            build: non_admissible,
            expected_id: "xk:sha256:32286998099708ef23ec151c585203078a573e65468d466c9ffe4844a838bd09",
            expected_reason: Reason::NonAdmissibleStep,
            expected_receipt_id: "xr:sha256:d9c19193fe92db234eed0ace640713e2f9d614c1512099cbb8d5a06f292d89b1",
            expected_canonical: None,
        },
        GoldenVector {
            name: "declared final differs",
            build: replay_mismatch,
            expected_id: "xk:sha256:5dba3da09ac86c3d3c125f4a7d5f3589a851adf06007e1238c418b564fdebe80",
            expected_reason: Reason::ReplayMismatch,
            expected_receipt_id: "xr:sha256:329b98383efa6e07def6745b6378f328047a51fa114b41b0897513561ad219f1",
            expected_canonical: None,
        },
        GoldenVector {
            name: "delta dimension mismatch",
            build: dimension_mismatch,
            expected_id: "xk:sha256:6ede82b1e4a62c27c26e880695460bfaa9beb3d12ac15cf77907c9418266e740",
            expected_reason: Reason::ReplayError,
            expected_receipt_id: "xr:sha256:f1e03fbefce128c7fe510b3aa4bb80d1ff8b04df1c116e1e6e884a8a099abb69",
            expected_canonical: None,
        },
        GoldenVector {
            name: "rich metadata",
            build: rich_meta,
            expected_id: "xk:sha256:2bf428ac7814049a4b1774659401f5230ed9a6f0960c49d42295e9ba9c69acb9",
            expected_reason: Reason::Ok,
            expected_receipt_id: "xr:sha256:f4414e373571efd0632c3e617ba5d86bb1571e76ebabc5032984c3b5ad920c86",
            expected_canonical: Some(RICH_META_CANONICAL),
        },
    ]
}

/// Check every vector, returning `(name, matches, computed execution id)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let execution = v.execution();
            let id = execution.content_id().to_string();
            let receipt_id = build_receipt(&execution, None).id().to_string();
            let matches = id == v.expected_id
                && receipt_id == v.expected_receipt_id
                && validate_execution(&execution).reason() == v.expected_reason;
            (v.name.to_string(), matches, id)
        })
        .collect()
}
