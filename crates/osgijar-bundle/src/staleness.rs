//! Staleness decision for archive targets.
//!
//! The manifest produced by the current pass is compared with the one
//! recorded by the previous pass. Only a semantic change (anything other
//! than the volatile header) counts as a manifest change. A fingerprint of
//! the class-root inputs is recorded next to the manifest snapshot, so an
//! edited class body also makes the archive stale.

use crate::manifest::normalize;
use crate::{BundleError, BundleResult};
use osgijar_core::TargetState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix appended to the snapshot path for the recorded input fingerprint.
pub const INPUTS_SUFFIX: &str = ".inputs";

/// Decide whether the archive must be rewritten.
///
/// With no previous manifest the target is always stale.
#[must_use]
pub fn is_stale(current: &str, previous: Option<&str>) -> bool {
    match previous {
        None => true,
        Some(previous) => normalize(current) != normalize(previous),
    }
}

/// Persisted manifest snapshot for one archive target.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot recorded by the previous pass, if any.
    pub fn load(&self) -> BundleResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BundleError::Snapshot {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Record the manifest of the current pass.
    pub fn save(&self, text: &str) -> BundleResult<()> {
        let snapshot_err = |source| BundleError::Snapshot {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(snapshot_err)?;
        }
        fs::write(&self.path, text).map_err(snapshot_err)
    }
}

/// Result of checking a target against its recorded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// The archive step must run.
    pub stale: bool,

    /// The class-root inputs differ from the recorded fingerprint.
    pub inputs_changed: bool,

    /// State of the target before this pass.
    pub state_before: TargetState,
}

/// Tracks manifest snapshots and input fingerprints for one archive target.
#[derive(Debug, Clone)]
pub struct ManifestTracker {
    store: SnapshotStore,
    inputs: SnapshotStore,
}

impl ManifestTracker {
    /// Create a tracker over a snapshot store.
    ///
    /// The input fingerprint lives beside the snapshot, at the snapshot
    /// path with [`INPUTS_SUFFIX`] appended.
    pub fn new(store: SnapshotStore) -> Self {
        let mut inputs_path = store.path().as_os_str().to_owned();
        inputs_path.push(INPUTS_SUFFIX);
        Self {
            inputs: SnapshotStore::new(inputs_path),
            store,
        }
    }

    /// The underlying snapshot store.
    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// The store holding the input fingerprint.
    #[must_use]
    pub fn inputs_store(&self) -> &SnapshotStore {
        &self.inputs
    }

    /// Compare the current manifest and input fingerprint with the recorded ones.
    ///
    /// A target whose archive no longer exists is stale even if nothing
    /// else changed.
    pub fn check(
        &self,
        current: &str,
        fingerprint: &str,
        archive_exists: bool,
    ) -> BundleResult<Freshness> {
        let previous = self.store.load()?;
        let state_before = match previous {
            Some(_) => TargetState::Built,
            None => TargetState::NeverBuilt,
        };

        let manifest_changed = is_stale(current, previous.as_deref());
        let inputs_changed = self.inputs.load()?.as_deref() != Some(fingerprint);
        if !manifest_changed && inputs_changed {
            tracing::debug!("manifest unchanged but class-root inputs changed");
        }
        if !archive_exists {
            tracing::debug!(archive_missing = true, "archive is missing");
        }

        Ok(Freshness {
            stale: manifest_changed || inputs_changed || !archive_exists,
            inputs_changed,
            state_before,
        })
    }

    /// Persist the current manifest and input fingerprint for the next pass.
    pub fn record(&self, current: &str, fingerprint: &str) -> BundleResult<()> {
        tracing::debug!(snapshot = %self.store.path().display(), "recording manifest snapshot");
        self.inputs.save(fingerprint)?;
        self.store.save(current)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use tempfile::TempDir;

    const V1: &str = "Manifest-Version: 1.0\r\nBnd-LastModified: 1\r\nBundle-Version: 1.0\r\n\r\n";
    const V1_LATER: &str =
        "Manifest-Version: 1.0\r\nBnd-LastModified: 2\r\nBundle-Version: 1.0\r\n\r\n";
    const V2: &str = "Manifest-Version: 1.0\r\nBnd-LastModified: 3\r\nBundle-Version: 2.0\r\n\r\n";
    const FP1: &str = "sha256:0001";
    const FP2: &str = "sha256:0002";

    fn tracker(dir: &TempDir) -> ManifestTracker {
        ManifestTracker::new(SnapshotStore::new(dir.path().join("tmp/demo.jar.MF")))
    }

    #[test]
    fn is_stale___without_previous___is_stale() {
        assert!(is_stale(V1, None));
    }

    #[test]
    fn is_stale___empty_manifest_without_previous___is_stale() {
        assert!(is_stale("", None));
    }

    #[test]
    fn is_stale___only_volatile_header_changed___is_fresh() {
        assert!(!is_stale(V1_LATER, Some(V1)));
    }

    #[test]
    fn is_stale___same_text___is_fresh() {
        assert!(!is_stale(V1, Some(V1)));
    }

    #[test]
    fn is_stale___header_changed___is_stale() {
        assert!(is_stale(V2, Some(V1)));
    }

    #[test]
    fn SnapshotStore___load___missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("missing.MF"));

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn SnapshotStore___save___creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("a/b/c.MF"));

        store.save(V1).unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some(V1));
    }

    #[test]
    fn SnapshotStore___load___directory_path_is_snapshot_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let result = store.load();

        assert!(matches!(result, Err(BundleError::Snapshot { .. })));
    }

    #[test]
    fn ManifestTracker___check___first_pass_is_stale_and_never_built() {
        let dir = TempDir::new().unwrap();

        let freshness = tracker(&dir).check(V1, FP1, false).unwrap();

        assert!(freshness.stale);
        assert_eq!(freshness.state_before, TargetState::NeverBuilt);
    }

    #[test]
    fn ManifestTracker___check___unchanged_manifest_is_fresh() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        tracker.record(V1, FP1).unwrap();

        let freshness = tracker.check(V1_LATER, FP1, true).unwrap();

        assert!(!freshness.stale);
        assert_eq!(freshness.state_before, TargetState::Built);
    }

    #[test]
    fn ManifestTracker___check___changed_manifest_is_stale() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        tracker.record(V1, FP1).unwrap();

        let freshness = tracker.check(V2, FP1, true).unwrap();

        assert!(freshness.stale);
    }

    #[test]
    fn ManifestTracker___check___missing_archive_is_stale() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        tracker.record(V1, FP1).unwrap();

        let freshness = tracker.check(V1, FP1, false).unwrap();

        assert!(freshness.stale);
        assert_eq!(freshness.state_before, TargetState::Built);
    }

    #[test]
    fn ManifestTracker___check___does_not_record() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        tracker.check(V1, FP1, false).unwrap();

        assert_eq!(tracker.store().load().unwrap(), None);
    }

    #[test]
    fn ManifestTracker___check___changed_inputs_are_stale() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        tracker.record(V1, FP1).unwrap();

        let freshness = tracker.check(V1_LATER, FP2, true).unwrap();

        assert!(freshness.stale);
        assert!(freshness.inputs_changed);
        assert_eq!(freshness.state_before, TargetState::Built);
    }

    #[test]
    fn ManifestTracker___check___missing_fingerprint_is_stale() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        tracker.store().save(V1).unwrap();

        let freshness = tracker.check(V1, FP1, true).unwrap();

        assert!(freshness.stale);
        assert!(freshness.inputs_changed);
    }

    #[test]
    fn ManifestTracker___record___writes_fingerprint_beside_snapshot() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);

        tracker.record(V1, FP1).unwrap();

        assert_eq!(
            tracker.inputs_store().path(),
            dir.path().join("tmp/demo.jar.MF.inputs")
        );
        assert_eq!(tracker.inputs_store().load().unwrap().as_deref(), Some(FP1));
    }
}
