//! Reading input documents from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

/// Failures before a document reaches the decoder.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("FILE_NOT_FOUND: {}", .0.display())]
    NotFound(PathBuf),

    #[error("READ_ERROR: {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("NOT_UTF8_JSON: {}", .0.display())]
    NotUtf8(PathBuf),

    #[error("INVALID_JSON: {}: {message}", .path.display())]
    InvalidJson { path: PathBuf, message: String },

    #[error("ROOT_NOT_OBJECT: {}", .0.display())]
    RootNotObject(PathBuf),
}

/// Read `path` as UTF-8 JSON whose root is an object.
pub fn load_json(path: &Path) -> Result<Json, LoadError> {
    let raw = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let text = String::from_utf8(raw).map_err(|_| LoadError::NotUtf8(path.to_path_buf()))?;
    let doc: Json = serde_json::from_str(&text).map_err(|e| LoadError::InvalidJson {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !doc.is_object() {
        return Err(LoadError::RootNotObject(path.to_path_buf()));
    }
    debug!(path = %path.display(), bytes = text.len(), "loaded document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xkernel_testkit::TestFixture;

    #[test]
    fn test_load_errors() {
        let fx = TestFixture::new();

        let missing = fx.path().join("missing.json");
        assert!(matches!(load_json(&missing), Err(LoadError::NotFound(_))));

        let bad_utf8 = fx.write_raw("latin1.json", b"{\"k\": \"\xe9\"}");
        assert!(matches!(load_json(&bad_utf8), Err(LoadError::NotUtf8(_))));

        let broken = fx.write_raw("broken.json", b"{\"k\": ");
        let err = load_json(&broken).unwrap_err();
        assert!(err.to_string().starts_with("INVALID_JSON: "));

        let list = fx.write_raw("list.json", b"[1, 2]");
        assert_eq!(
            load_json(&list).unwrap_err().to_string(),
            format!("ROOT_NOT_OBJECT: {}", list.display())
        );

        let dir = fx.path().to_path_buf();
        assert!(matches!(load_json(&dir), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_load_object() {
        let fx = TestFixture::new();
        let path = fx.write_raw("ok.json", "{\"name\": \"ç\"}".as_bytes());
        assert_eq!(load_json(&path).unwrap()["name"], "ç");
    }
}
