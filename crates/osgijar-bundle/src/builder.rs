//! The packaging pass.
//!
//! [`JarBuilder`] ties the pieces together for one archive target:
//!
//! 1. build a fresh instruction registry from the [`JarConfig`]
//! 2. merge it over defaults computed from the project and its packages
//! 3. run the injected engine on the merged directives
//! 4. forward the engine diagnostics to the log
//! 5. compare the manifest and the class-root fingerprint with those of the
//!    previous pass and, when stale, write the archive and record both

use crate::archive::{ArchiveWriter, input_fingerprint};
use crate::engine::{EngineFactory, EngineRequest};
use crate::packages::scan_packages;
use crate::staleness::{ManifestTracker, SnapshotStore};
use crate::{BundleResult, Classpath};
use osgijar_core::{
    DefaultInstructions, Instructions, JarConfig, PassOutcome, ProjectIdentity, TargetState,
};
use std::path::PathBuf;

/// What the host build tool knows about the project and where outputs go.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Project identity used for default directives.
    pub identity: ProjectIdentity,

    /// Compiled class/resource roots included in the archive.
    pub class_roots: Vec<PathBuf>,

    /// Resolved build classpath, in resolution order.
    pub classpath: Vec<PathBuf>,

    /// Archive to produce.
    pub archive_path: PathBuf,

    /// Manifest snapshot recorded between passes.
    pub snapshot_path: PathBuf,
}

impl ProjectLayout {
    pub fn new(
        identity: ProjectIdentity,
        archive_path: impl Into<PathBuf>,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            identity,
            class_roots: Vec::new(),
            classpath: Vec::new(),
            archive_path: archive_path.into(),
            snapshot_path: snapshot_path.into(),
        }
    }

    pub fn with_class_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.class_roots.push(root.into());
        self
    }

    pub fn with_classpath_entry(mut self, entry: impl Into<PathBuf>) -> Self {
        self.classpath.push(entry.into());
        self
    }
}

/// Result of a packaging pass.
#[derive(Debug, Clone)]
pub struct PackagingReport {
    /// The archive step ran.
    pub stale: bool,

    /// What the pass did to the archive target.
    pub outcome: PassOutcome,

    /// Target state after the pass.
    pub state: TargetState,

    /// Merged directives handed to the engine.
    pub instructions: Instructions,

    /// Manifest produced by the engine.
    pub manifest: String,

    /// Engine warnings.
    pub warnings: Vec<String>,

    /// Engine errors that did not abort the pass.
    pub errors: Vec<String>,
}

impl PackagingReport {
    /// Check if the engine reported errors on the diagnostic channel.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs packaging passes for one archive target.
pub struct JarBuilder<'f> {
    layout: ProjectLayout,
    config: JarConfig,
    factory: &'f dyn EngineFactory,
    writer: ArchiveWriter,
}

impl<'f> JarBuilder<'f> {
    /// Create a builder; the engine factory is always supplied by the caller.
    pub fn new(layout: ProjectLayout, config: JarConfig, factory: &'f dyn EngineFactory) -> Self {
        Self {
            layout,
            config,
            factory,
            writer: ArchiveWriter::default(),
        }
    }

    /// Use a custom archive writer.
    pub fn with_writer(mut self, writer: ArchiveWriter) -> Self {
        self.writer = writer;
        self
    }

    #[must_use]
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Replace the build description, as when the host re-evaluates it.
    pub fn set_config(&mut self, config: JarConfig) {
        self.config = config;
    }

    /// Merge the configured directives over the computed defaults.
    pub fn instructions(&self) -> BundleResult<Instructions> {
        self.config.validate()?;

        let registry = self.config.registry();
        let exports = scan_packages(&self.layout.class_roots)?;
        let defaults = DefaultInstructions::for_project(&self.layout.identity, &exports);

        Ok(defaults.merge(&registry))
    }

    /// Run one packaging pass.
    pub fn package(&self) -> BundleResult<PackagingReport> {
        let layout = &self.layout;
        tracing::debug!(archive = %layout.archive_path.display(), "packaging bundle");

        let instructions = self.instructions()?;
        if self.config.trace {
            for (name, value) in instructions.iter() {
                tracing::info!("instruction {name}: {value}");
            }
        }

        let classpath = Classpath::assemble(&layout.class_roots, &layout.classpath);
        if self.config.trace {
            tracing::info!("classpath: {}", classpath.to_path_string());
        }

        let request = EngineRequest {
            instructions: &instructions,
            classpath: &classpath,
            class_roots: &layout.class_roots,
            trace: self.config.trace,
        };
        let mut engine = self.factory.create();
        let output = engine.build(&request)?;

        for warning in &output.warnings {
            tracing::warn!("{warning}");
        }
        for error in &output.errors {
            tracing::error!("{error}");
        }

        let fingerprint = input_fingerprint(&layout.class_roots)?;
        let tracker = ManifestTracker::new(SnapshotStore::new(&layout.snapshot_path));
        let freshness = tracker.check(
            &output.manifest,
            &fingerprint,
            layout.archive_path.exists(),
        )?;
        let outcome = freshness.state_before.outcome(freshness.stale);

        if freshness.stale {
            self.writer
                .write(&layout.archive_path, &output.manifest, &layout.class_roots)?;
            tracker.record(&output.manifest, &fingerprint)?;
        }
        tracing::info!(
            archive = %layout.archive_path.display(),
            %outcome,
            inputs_changed = freshness.inputs_changed,
            warnings = output.warnings.len(),
            errors = output.errors.len(),
            "packaging pass finished"
        );

        Ok(PackagingReport {
            stale: freshness.stale,
            outcome,
            state: freshness.state_before.after(outcome),
            instructions,
            manifest: output.manifest,
            warnings: output.warnings,
            errors: output.errors,
        })
    }
}
