//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use xkernel_core::{execution_to_value, state_to_value, Execution, Map, StateVector, Step, Value};

/// State vector with empty metadata.
///
/// Panics on empty `coords`; fixtures are always well formed.
pub fn sv(coords: &[i64]) -> StateVector {
    StateVector::from_coords(coords.to_vec()).expect("fixture coords are non-empty")
}

/// Admissible step with empty witness.
pub fn step(id: &str, delta: &[i64]) -> Step {
    Step::new(id, sv(delta), 1, Map::new()).expect("fixture step id is non-empty")
}

/// The reference two-step walk from `[0,0]` to `final_coords`.
///
/// With `[1,1]` it is valid; anything else is a replay mismatch.
pub fn unit_walk(final_coords: &[i64]) -> Execution {
    let mut claims = Map::new();
    claims.insert("intent".into(), Value::from("golden"));
    Execution::new(
        sv(&[0, 0]),
        vec![step("s1", &[1, 0]), step("s2", &[0, 1])],
        sv(final_coords),
        claims,
    )
}

/// A scratch directory for writing input documents.
pub struct TestFixture {
    dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write raw bytes to `name` in the fixture directory.
    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("write fixture file");
        path
    }

    /// Write a JSON document to `name`.
    pub fn write_json(&self, name: &str, doc: &serde_json::Value) -> PathBuf {
        self.write_raw(name, doc.to_string().as_bytes())
    }

    /// Write an execution in its wrapped canonical form.
    pub fn write_execution(&self, name: &str, execution: &Execution) -> PathBuf {
        self.write_json(name, &execution_to_value(execution).into())
    }

    /// Write a state vector as a closure target document.
    pub fn write_target(&self, name: &str, target: &StateVector) -> PathBuf {
        self.write_json(name, &state_to_value(target).into())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
