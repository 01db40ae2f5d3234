//! Classpath assembly for the packaging engine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ordered, duplicate-free list of existing classpath entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Build the classpath from the class roots followed by the host's
    /// resolved dependencies.
    ///
    /// Order of first occurrence is kept. Entries missing on disk are
    /// dropped, since the engine cannot read them.
    pub fn assemble<R, D>(class_roots: R, resolved: D) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<Path>,
        D: IntoIterator,
        D::Item: AsRef<Path>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        let roots = class_roots
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect::<Vec<_>>();
        let deps = resolved
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect::<Vec<_>>();

        for entry in roots.into_iter().chain(deps) {
            if !entry.exists() {
                tracing::debug!(entry = %entry.display(), "skipping missing classpath entry");
                continue;
            }
            if seen.insert(entry.clone()) {
                entries.push(entry);
            }
        }

        Self { entries }
    }

    /// Entries in classpath order.
    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join the entries with the platform path separator.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        let separator = if cfg!(windows) { ";" } else { ":" };
        self.entries
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }
}
