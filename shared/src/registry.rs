//! Repository discovery and validation.
//!
//! At startup the exporter names the repositories it wants watched; this
//! module checks which of them actually exist under the mirror root and
//! carry a readable state file, and binds each survivor to its own metric
//! sink. Validation runs once; the resulting descriptors are immutable for
//! the life of the process.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::metrics::MetricSink;

/// Fixed name of the per-repository state file.
pub const STATE_FILE_NAME: &str = "state";

/// Prefix of the state-file line carrying the last-sync timestamp.
pub const TIMESTAMP_LINE_PREFIX: &str = "date=";

/// Fatal conditions that prevent the registry from being built at all.
///
/// Individual repositories failing validation are not fatal; they are
/// logged and skipped.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No repository names were configured.
    #[error("nothing to check: no repositories configured")]
    NothingToCheck,

    /// The mirror root directory could not be listed.
    #[error("failed to read repository root {path}: {source}")]
    RootUnreadable {
        /// The configured root directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mirror root exists but holds no subdirectories, so no name
    /// could possibly match.
    #[error("repository root {path} contains no repositories")]
    EmptyRoot {
        /// The configured root directory.
        path: PathBuf,
    },
}

/// A verified repository: its name, the resolved state-file path, and the
/// gauge its ages are published to.
pub struct Repository {
    name: String,
    state_file: PathBuf,
    sink: Box<dyn MetricSink>,
}

impl Repository {
    /// The repository name as configured.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the repository's state file.
    ///
    /// The file existed at validation time; it may have vanished since,
    /// which polling treats as a runtime failure for that tick.
    #[must_use]
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// The gauge bound to this repository.
    #[must_use]
    pub fn sink(&self) -> &dyn MetricSink {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("state_file", &self.state_file)
            .finish_non_exhaustive()
    }
}

/// The set of repositories that passed validation, in configuration order.
#[derive(Debug)]
pub struct RepositoryRegistry {
    repositories: Vec<Repository>,
}

impl RepositoryRegistry {
    /// Validates `names` under `root` and builds descriptors for the ones
    /// that check out.
    ///
    /// For each name, independently: the directory must exist and be
    /// listable, must be non-empty, and must contain an entry named
    /// exactly [`STATE_FILE_NAME`]. A name failing any of these is logged
    /// at warn level and skipped; partial success is the expected common
    /// case. Duplicate names are processed independently.
    ///
    /// `make_sink` is called once per verified repository to allocate the
    /// gauge scoped to that repository's name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] only for the fatal conditions: an empty
    /// `names` list, an unlistable `root`, or a `root` with no
    /// subdirectories.
    pub fn build<F>(root: &Path, names: &[String], mut make_sink: F) -> Result<Self, RegistryError>
    where
        F: FnMut(&str) -> Box<dyn MetricSink>,
    {
        if names.is_empty() {
            return Err(RegistryError::NothingToCheck);
        }

        let subdirs = count_subdirectories(root)?;
        if subdirs == 0 {
            return Err(RegistryError::EmptyRoot {
                path: root.to_path_buf(),
            });
        }

        let mut repositories = Vec::new();
        for name in names {
            let repo_dir = root.join(name);
            let entries = match std::fs::read_dir(&repo_dir) {
                Ok(entries) => entries.filter_map(Result::ok).collect::<Vec<_>>(),
                Err(e) => {
                    tracing::warn!(repository = %name, error = %e, "repository not found");
                    continue;
                }
            };

            if entries.is_empty() {
                tracing::warn!(repository = %name, "empty repository");
                continue;
            }

            let Some(state_entry) = entries.iter().find(|e| e.file_name() == STATE_FILE_NAME)
            else {
                tracing::warn!(repository = %name, "state file not found");
                continue;
            };

            repositories.push(Repository {
                name: name.clone(),
                state_file: state_entry.path(),
                sink: make_sink(name),
            });
        }

        Ok(Self { repositories })
    }

    /// The verified repositories, in configuration order minus skips.
    #[must_use]
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Number of verified repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// True when no repository passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

fn count_subdirectories(root: &Path) -> Result<usize, RegistryError> {
    let entries = std::fs::read_dir(root).map_err(|source| RegistryError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let count = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .count();
    Ok(count)
}
