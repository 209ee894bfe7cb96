//! Decoding parsed JSON documents into the typed model.
//!
//! The core refuses to construct malformed values; this layer is where
//! structurally wrong input is caught and named. Every error carries a
//! stable code and the dotted path of the offending field, e.g.
//! `BAD_COORD: execution.steps[1].delta.coords[0] (must be int)`.

use serde_json::Value as Json;
use thiserror::Error;

use xkernel_core::{
    json_integer, CoreError, Execution, Map, StateVector, Step, Value, EXECUTION_SPEC,
    EXECUTION_VERSION,
};

use crate::kernel::KernelConfig;

/// Structural problems in an input document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("ROOT_NOT_OBJECT: {0}")]
    RootNotObject(String),

    #[error("BAD_EXECUTION: root.execution (must be object)")]
    BadExecution,

    #[error("BAD_ENVELOPE: root.{field} (expected {expected:?})")]
    BadEnvelope {
        field: &'static str,
        expected: &'static str,
    },

    #[error("MISSING_KEY: {0}")]
    MissingKey(String),

    #[error("BAD_INIT: execution.init (must be object)")]
    BadInit,

    #[error("BAD_FINAL: execution.final (must be object)")]
    BadFinal,

    #[error("BAD_STEPS: execution.steps (must be array)")]
    BadSteps,

    #[error("BAD_CLAIMS: execution.claims (must be object)")]
    BadClaims,

    #[error("BAD_STEP: {0} (must be object)")]
    BadStep(String),

    #[error("BAD_STEP_ID: {0}")]
    BadStepId(String),

    #[error("BAD_DELTA: {0} (must be object)")]
    BadDelta(String),

    #[error("BAD_ACTION: {0} (must be int)")]
    BadAction(String),

    #[error("BAD_WITNESS: {0} (must be object)")]
    BadWitness(String),

    #[error("BAD_COORDS: {0}")]
    BadCoords(String),

    #[error("BAD_COORD: {path}[{index}] (must be int)")]
    BadCoord { path: String, index: usize },

    #[error("BAD_META: {0} (must be object)")]
    BadMeta(String),

    #[error("NON_JSON_SAFE: {0}")]
    NonJsonSafe(CoreError),
}

impl DecodeError {
    /// The stable diagnostic code, e.g. `MISSING_KEY`.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::RootNotObject(_) => "ROOT_NOT_OBJECT",
            DecodeError::BadExecution => "BAD_EXECUTION",
            DecodeError::BadEnvelope { .. } => "BAD_ENVELOPE",
            DecodeError::MissingKey(_) => "MISSING_KEY",
            DecodeError::BadInit => "BAD_INIT",
            DecodeError::BadFinal => "BAD_FINAL",
            DecodeError::BadSteps => "BAD_STEPS",
            DecodeError::BadClaims => "BAD_CLAIMS",
            DecodeError::BadStep(_) => "BAD_STEP",
            DecodeError::BadStepId(_) => "BAD_STEP_ID",
            DecodeError::BadDelta(_) => "BAD_DELTA",
            DecodeError::BadAction(_) => "BAD_ACTION",
            DecodeError::BadWitness(_) => "BAD_WITNESS",
            DecodeError::BadCoords(_) => "BAD_COORDS",
            DecodeError::BadCoord { .. } => "BAD_COORD",
            DecodeError::BadMeta(_) => "BAD_META",
            DecodeError::NonJsonSafe(_) => "NON_JSON_SAFE",
        }
    }
}

type Result<T> = std::result::Result<T, DecodeError>;
pub type Object = serde_json::Map<String, Json>;

fn require<'a>(obj: &'a Object, keys: &[&str], path: &str) -> Result<Vec<&'a Json>> {
    keys.iter()
        .map(|k| {
            obj.get(*k)
                .ok_or_else(|| DecodeError::MissingKey(format!("{path}.{k}")))
        })
        .collect()
}

fn as_int(value: &Json) -> Option<i64> {
    value.as_number().and_then(json_integer)
}

fn to_value(value: &Json, path: &str) -> Result<Value> {
    Value::from_json_at(value.clone(), path).map_err(DecodeError::NonJsonSafe)
}

fn to_map(obj: &Object, path: &str) -> Result<Map> {
    obj.iter()
        .map(|(k, v)| to_value(v, &format!("{path}.{k}")).map(|value| (k.clone(), value)))
        .collect()
}

/// Decode `{"coords": [int, ...], "meta": {...}}`.
pub fn decode_state(obj: &Object, path: &str) -> Result<StateVector> {
    let fields = require(obj, &["coords", "meta"], path)?;
    let (coords, meta) = (fields[0], fields[1]);

    let coords_path = format!("{path}.coords");
    let items = match coords.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(DecodeError::BadCoords(coords_path)),
    };
    let coords = items
        .iter()
        .enumerate()
        .map(|(index, v)| {
            as_int(v).ok_or_else(|| DecodeError::BadCoord {
                path: coords_path.clone(),
                index,
            })
        })
        .collect::<Result<Vec<i64>>>()?;

    let meta_path = format!("{path}.meta");
    let meta = match meta.as_object() {
        Some(m) => to_map(m, &meta_path)?,
        None => return Err(DecodeError::BadMeta(meta_path)),
    };

    StateVector::new(coords, meta).map_err(|_| DecodeError::BadCoords(coords_path))
}

/// Decode `{"id": str, "delta": state, "action": int, "witness": {...}}`.
pub fn decode_step(value: &Json, path: &str) -> Result<Step> {
    let obj = value
        .as_object()
        .ok_or_else(|| DecodeError::BadStep(path.to_string()))?;
    let fields = require(obj, &["id", "delta", "action", "witness"], path)?;
    let (id, delta, action, witness) = (fields[0], fields[1], fields[2], fields[3]);

    let id = match id.as_str() {
        Some(s) if !s.is_empty() => s,
        _ => return Err(DecodeError::BadStepId(format!("{path}.id"))),
    };
    let delta = delta
        .as_object()
        .ok_or_else(|| DecodeError::BadDelta(format!("{path}.delta")))?;
    let action = as_int(action)
        .ok_or_else(|| DecodeError::BadAction(format!("{path}.action")))?;
    let witness_path = format!("{path}.witness");
    let witness = witness
        .as_object()
        .ok_or_else(|| DecodeError::BadWitness(witness_path.clone()))?;

    let delta = decode_state(delta, &format!("{path}.delta"))?;
    let witness = to_map(witness, &witness_path)?;
    Step::new(id, delta, action, witness)
        .map_err(|_| DecodeError::BadStepId(format!("{path}.id")))
}

/// Decode an execution document, wrapped or bare.
///
/// A wrapped document is `{"spec", "version", "execution": {...}}`, the same
/// shape the canonical encoder produces. A bare document is the inner
/// `{"init", "steps", "final", "claims"}` object.
pub fn decode_execution(root: &Json, config: &KernelConfig) -> Result<Execution> {
    let root = root
        .as_object()
        .ok_or_else(|| DecodeError::RootNotObject("execution".into()))?;

    let body = match root.get("execution") {
        Some(inner) => {
            let inner = inner.as_object().ok_or(DecodeError::BadExecution)?;
            if config.require_envelope_tags {
                check_envelope(root)?;
            }
            inner
        }
        None if config.accept_bare_execution => root,
        None => return Err(DecodeError::MissingKey("root.execution".into())),
    };

    let fields = require(body, &["init", "steps", "final", "claims"], "execution")?;
    let (init, steps, fin, claims) = (fields[0], fields[1], fields[2], fields[3]);

    let init = init.as_object().ok_or(DecodeError::BadInit)?;
    let fin = fin.as_object().ok_or(DecodeError::BadFinal)?;
    let steps = steps.as_array().ok_or(DecodeError::BadSteps)?;
    let claims = claims.as_object().ok_or(DecodeError::BadClaims)?;

    let steps = steps
        .iter()
        .enumerate()
        .map(|(i, s)| decode_step(s, &format!("execution.steps[{i}]")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Execution::new(
        decode_state(init, "execution.init")?,
        steps,
        decode_state(fin, "execution.final")?,
        to_map(claims, "execution.claims")?,
    ))
}

fn check_envelope(root: &Object) -> Result<()> {
    for (field, expected) in [("spec", EXECUTION_SPEC), ("version", EXECUTION_VERSION)] {
        if root.get(field).and_then(Json::as_str) != Some(expected) {
            return Err(DecodeError::BadEnvelope { field, expected });
        }
    }
    Ok(())
}

/// Decode a closure target: a bare state vector document.
pub fn decode_target(root: &Json) -> Result<StateVector> {
    let root = root
        .as_object()
        .ok_or_else(|| DecodeError::RootNotObject("target".into()))?;
    decode_state(root, "target")
}

/// Decode a receipt document into a JSON-safe mapping.
///
/// Only the outer shape is checked here. Field-level checks belong to
/// receipt verification, which reports them as verdicts.
pub fn decode_receipt(root: &Json) -> Result<Value> {
    if !root.is_object() {
        return Err(DecodeError::RootNotObject("receipt".into()));
    }
    to_value(root, "receipt")
}
