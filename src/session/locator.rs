//! # Session Locator
//!
//! Finds the socket of the editor that was started for a given identity.
//!
//! Socket files are named `<prefix>-<identity_hash>-<suffix>` where the
//! suffix is random per editor instance. Several editors may be running for
//! the same folder, so a scan can yield more than one match; the
//! [`SelectionPolicy`] decides what happens then.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use rand::Rng;

use super::SessionError;
use crate::config::DEFAULT_SOCKET_PREFIX;

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 15;

/// What to do when more than one socket matches an identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Pick the most recently modified socket; equal times go to the
    /// greatest file name
    #[default]
    Newest,
    /// Fail with `MultipleSessionsFound`
    Reject,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown selection policy '{other}'")),
        }
    }
}

/// A socket file discovered in the socket directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketDescriptor {
    file_name: String,
    path: PathBuf,
    modified: SystemTime,
}

impl SocketDescriptor {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Whether this socket belongs to `identity_hash` under `prefix`
    pub fn matches(&self, identity_hash: &str, prefix: &str) -> bool {
        name_matches(&self.file_name, identity_hash, prefix)
    }
}

fn name_matches(file_name: &str, identity_hash: &str, prefix: &str) -> bool {
    file_name.contains(&format!("{prefix}-{identity_hash}"))
}

/// Build a socket file name for an identity with a fresh random suffix
pub fn generate_socket_name(prefix: &str, identity_hash: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{identity_hash}-{suffix}")
}

/// Scans one socket directory for editor sockets
#[derive(Debug, Clone)]
pub struct SessionLocator {
    directory: PathBuf,
    prefix: String,
    policy: SelectionPolicy,
}

impl SessionLocator {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: DEFAULT_SOCKET_PREFIX.to_string(),
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All sockets in the directory belonging to `identity_hash`, sorted by name
    pub fn candidates(&self, identity_hash: &str) -> Result<Vec<SocketDescriptor>, SessionError> {
        let read_dir_err = |source| SessionError::SocketDirectory {
            directory: self.directory.clone(),
            source,
        };

        let mut found = Vec::new();
        for entry in fs::read_dir(&self.directory).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !name_matches(&file_name, identity_hash, &self.prefix) {
                continue;
            }

            // Sockets can vanish between listing and stat; skip those
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping '{}': {}", file_name, e);
                    continue;
                }
            };
            if metadata.is_dir() {
                continue;
            }

            found.push(SocketDescriptor {
                file_name,
                path: entry.path(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        found.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(found)
    }

    /// Select the socket for `identity_hash` according to the policy
    pub fn locate(&self, identity_hash: &str) -> Result<SocketDescriptor, SessionError> {
        let mut candidates = self.candidates(identity_hash)?;
        tracing::debug!(
            "Found {} socket(s) for {} in {}",
            candidates.len(),
            identity_hash,
            self.directory.display()
        );

        match candidates.len() {
            0 => Err(SessionError::SessionNotFound {
                identity_hash: identity_hash.to_string(),
                directory: self.directory.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => match self.policy {
                SelectionPolicy::Reject => Err(SessionError::MultipleSessionsFound {
                    identity_hash: identity_hash.to_string(),
                    candidates: candidates.into_iter().map(|c| c.file_name).collect(),
                }),
                SelectionPolicy::Newest => {
                    let newest = candidates
                        .into_iter()
                        .max_by(|a, b| {
                            a.modified
                                .cmp(&b.modified)
                                .then_with(|| a.file_name.cmp(&b.file_name))
                        })
                        .ok_or_else(|| SessionError::SessionNotFound {
                            identity_hash: identity_hash.to_string(),
                            directory: self.directory.clone(),
                        })?;
                    tracing::info!("Several sessions match, using newest '{}'", newest.file_name);
                    Ok(newest)
                }
            },
        }
    }
}

/// Locate the socket for `identity_hash` in `socket_directory` with the
/// default prefix and policy
pub fn locate(
    identity_hash: &str,
    socket_directory: impl Into<PathBuf>,
) -> Result<SocketDescriptor, SessionError> {
    SessionLocator::new(socket_directory).locate(identity_hash)
}
