//! Content addresses.
//!
//! Executions and receipts are named by the SHA-256 of their canonical
//! bytes, under distinct namespaces so the two address spaces can never
//! collide even if two digests did.

use std::fmt;
use std::str::FromStr;

use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Which kind of object a content address names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `xk:` execution ids.
    Execution,
    /// `xr:` receipt ids.
    Receipt,
}

impl Namespace {
    pub const fn prefix(self) -> &'static str {
        match self {
            Namespace::Execution => "xk",
            Namespace::Receipt => "xr",
        }
    }

    fn from_prefix(s: &str) -> Option<Self> {
        match s {
            "xk" => Some(Namespace::Execution),
            "xr" => Some(Namespace::Receipt),
            _ => None,
        }
    }
}

/// Hash algorithm tag embedded in every address.
pub const HASH_ALGORITHM: &str = "sha256";

/// A namespaced content address: `<ns>:sha256:<64 lowercase hex>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentAddress {
    namespace: Namespace,
    digest: Sha256Hash,
}

impl ContentAddress {
    pub const fn new(namespace: Namespace, digest: Sha256Hash) -> Self {
        Self { namespace, digest }
    }

    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub const fn digest(&self) -> &Sha256Hash {
        &self.digest
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.namespace.prefix(),
            HASH_ALGORITHM,
            self.digest.to_hex()
        )
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContentAddress({}:{}...)",
            self.namespace.prefix(),
            &self.digest.to_hex()[..16]
        )
    }
}

impl FromStr for ContentAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedAddress(s.to_string());

        let mut parts = s.splitn(3, ':');
        let (Some(ns), Some(algo), Some(hex)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let namespace = Namespace::from_prefix(ns).ok_or_else(malformed)?;
        if algo != HASH_ALGORITHM {
            return Err(malformed());
        }
        // Uppercase hex would decode fine but would never be emitted.
        if hex.len() != 64 || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(malformed());
        }
        let digest = Sha256Hash::from_hex(hex).map_err(|_| malformed())?;

        Ok(Self { namespace, digest })
    }
}
