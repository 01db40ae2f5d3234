//! # osgijar
//!
//! Incremental OSGi bundle packaging for host build tools.
//!
//! osgijar collects packaging directives, merges them over defaults computed
//! from the project, runs an injected manifest engine and rewrites the
//! archive only when the manifest changed in substance:
//! - Ordered directive registry with legacy fragment accumulation
//! - Computed defaults (symbolic name, OSGi-clean version, exported packages)
//! - Manifest snapshots that ignore the engine's timestamp header
//! - Class-root fingerprints so edited class bodies still repackage
//! - Engine diagnostics forwarded to the host build log
//!
//! ## Packaging a Bundle
//!
//! ```no_run
//! use osgijar::prelude::*;
//! use std::sync::Arc;
//!
//! let sink: LogSink = Arc::new(|level: LogLevel, _target: &str, message: &str| {
//!     eprintln!("[{level}] {message}");
//! });
//! init_logging(Arc::new(LogForwarder::with_sink(sink)));
//!
//! let layout = ProjectLayout::new(
//!     ProjectIdentity::new("demo", "1.0.2-SNAPSHOT"),
//!     "build/libs/demo-1.0.2-SNAPSHOT.jar",
//!     "build/tmp/jar/demo-1.0.2-SNAPSHOT.jar.MF",
//! )
//! .with_class_root("build/classes");
//!
//! let config = JarConfig::from_file("osgijar.toml")?;
//! let factory = || Box::new(PassthroughEngine::new()) as Box<dyn ManifestEngine>;
//! let report = JarBuilder::new(layout, config, &factory).package()?;
//! if !report.stale {
//!     tracing::info!("bundle is up to date");
//! }
//! # Ok::<(), BundleError>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`osgijar_core`] - Directive registry, defaults, build description and target state
//! - [`osgijar_bundle`] - Manifest snapshots, staleness, engine seam and archive writing
//! - [`osgijar_logging`] - Forwarding of `tracing` events to the host log

// Re-export core types
pub use osgijar_core::{
    DefaultInstructions, InstructionOp, InstructionRegistry, Instructions, JarConfig,
    LogLevel, PackagingError, PackagingResult, PassOutcome, ProjectIdentity, TargetState,
    osgi_version,
};

// Re-export packaging types
pub use osgijar_bundle::{
    ArchiveWriter, BundleError, BundleResult, Classpath, EngineFactory, EngineOutput,
    EngineRequest, Freshness, INPUTS_SUFFIX, JarBuilder, MANIFEST_PATH, ManifestEngine,
    ManifestSnapshot, ManifestTracker, PackagingReport, PassthroughEngine, ProjectLayout,
    SnapshotStore, VOLATILE_HEADER, input_fingerprint, is_stale, normalize, scan_packages,
};

// Re-export logging bridge
pub use osgijar_logging::{HostLoggingLayer, LogForwarder, LogSink, init_logging};

pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use osgijar::prelude::*;` to import commonly used types.
///
/// This includes:
/// - Build description: `JarConfig`, `ProjectIdentity`, `ProjectLayout`
/// - Packaging: `JarBuilder`, `PackagingReport`, `ManifestEngine`, `PassthroughEngine`
/// - Errors: `BundleError`, `PackagingError`
/// - Logging: `LogForwarder`, `LogSink`, `LogLevel`, `init_logging`
pub mod prelude {
    pub use crate::{
        BundleError, BundleResult, EngineFactory, EngineOutput, EngineRequest, JarBuilder,
        JarConfig, LogForwarder, LogLevel, LogSink, ManifestEngine, PackagingError,
        PackagingReport, PassOutcome, PassthroughEngine, ProjectIdentity, ProjectLayout,
        TargetState, init_logging,
    };
}
