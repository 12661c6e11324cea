//! # Session Identity
//!
//! Correlates a CLI invocation with the editor that was started for the same
//! working directory. The identity is a digest of the path *string*; nothing
//! about the filesystem is consulted, so the same string always yields the
//! same hash across runs and machines.

use std::fmt;
use std::path::Path;

/// Derive the identity hash for a working directory.
///
/// Lowercase hex MD5 of the UTF-8 bytes of `path` (128 bits), the same digest
/// the editor launcher puts in socket names. Only identical strings match:
/// `app` and `/home/me/app` hash differently, and [`SessionIdentity::from_path`]
/// always hashes the canonical absolute spelling. A socket named from a
/// relative path is only found through [`SessionIdentity::new`] with that
/// exact string.
pub fn hash(path: &str) -> String {
    format!("{:x}", md5::compute(path.as_bytes()))
}

/// A working directory together with its identity hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    working_directory: String,
    identity_hash: String,
}

impl SessionIdentity {
    pub fn new(working_directory: impl Into<String>) -> Self {
        let working_directory = working_directory.into();
        let identity_hash = hash(&working_directory);
        Self {
            working_directory,
            identity_hash,
        }
    }

    /// Build an identity from a filesystem path.
    ///
    /// The path is canonicalized when it exists so that `.` and the absolute
    /// spelling of the same folder agree; otherwise it is used as given.
    pub fn from_path(path: &Path) -> Self {
        let resolved = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        Self::new(resolved.to_string_lossy().into_owned())
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub fn identity_hash(&self) -> &str {
        &self.identity_hash
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.working_directory, self.identity_hash)
    }
}
