//! OSGi bundle packaging for osgijar
//!
//! This crate runs a packaging pass: it merges the declared directives over
//! computed defaults, hands them to an injected [`ManifestEngine`], forwards
//! the engine's diagnostics, and decides from the previous manifest snapshot
//! and class-root fingerprint whether the archive must be rewritten.
//!
//! # Output Layout
//!
//! ```text
//! build/
//! ├── libs/
//! │   └── demo-1.0.2.jar           # archive written when stale
//! │       ├── META-INF/MANIFEST.MF
//! │       └── com/acme/...
//! └── tmp/jar/
//!     ├── demo-1.0.2.jar.MF        # manifest snapshot from the last pass
//!     └── demo-1.0.2.jar.MF.inputs # class-root fingerprint from the last pass
//! ```
//!
//! # Example
//!
//! ```no_run
//! use osgijar_bundle::{JarBuilder, PassthroughEngine, ProjectLayout};
//! use osgijar_core::{JarConfig, ProjectIdentity};
//!
//! let layout = ProjectLayout::new(
//!     ProjectIdentity::new("demo", "1.0.2"),
//!     "build/libs/demo-1.0.2.jar",
//!     "build/tmp/jar/demo-1.0.2.jar.MF",
//! )
//! .with_class_root("build/classes");
//!
//! let mut config = JarConfig::new();
//! config.set_instruction("Bundle-Version", "5.0");
//!
//! let factory = || Box::new(PassthroughEngine::new()) as Box<dyn osgijar_bundle::ManifestEngine>;
//! let report = JarBuilder::new(layout, config, &factory).package()?;
//! println!("stale: {}", report.stale);
//! # Ok::<(), osgijar_bundle::BundleError>(())
//! ```

mod error;

pub mod archive;
pub mod builder;
pub mod classpath;
pub mod engine;
pub mod manifest;
pub mod packages;
pub mod staleness;

pub use archive::{ArchiveWriter, input_fingerprint};
pub use builder::{JarBuilder, PackagingReport, ProjectLayout};
pub use classpath::Classpath;
pub use engine::{EngineFactory, EngineOutput, EngineRequest, ManifestEngine, PassthroughEngine};
pub use error::BundleError;
pub use manifest::{ManifestSnapshot, normalize};
pub use packages::scan_packages;
pub use staleness::{Freshness, INPUTS_SUFFIX, ManifestTracker, SnapshotStore, is_stale};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Manifest path within the archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Header rewritten by the packaging engine on every pass.
pub const VOLATILE_HEADER: &str = "Bnd-LastModified";
