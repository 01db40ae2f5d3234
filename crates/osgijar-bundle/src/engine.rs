//! Packaging engine capability.
//!
//! Manifest synthesis is owned by an external engine. The packaging pass
//! only depends on [`ManifestEngine`], obtained from an [`EngineFactory`]
//! supplied by the caller, so a host can plug in its own engine and tests
//! can plug in a stub.

use crate::manifest::render_manifest;
use crate::{BundleError, BundleResult, Classpath, VOLATILE_HEADER};
use osgijar_core::Instructions;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything an engine needs to synthesize a manifest.
#[derive(Debug, Clone, Copy)]
pub struct EngineRequest<'a> {
    /// Merged directives (explicit over defaults).
    pub instructions: &'a Instructions,

    /// Classpath used to resolve referenced packages.
    pub classpath: &'a Classpath,

    /// Compiled class/resource roots included in the archive.
    pub class_roots: &'a [PathBuf],

    /// Emit engine trace output.
    pub trace: bool,
}

/// Manifest plus the diagnostics produced while synthesizing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Generated manifest text.
    pub manifest: String,

    /// Non-fatal warnings, such as ignored directives.
    pub warnings: Vec<String>,

    /// Errors that do not abort the pass, such as a missing activator class.
    pub errors: Vec<String>,
}

impl EngineOutput {
    /// Output with a manifest and no diagnostics.
    pub fn new(manifest: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }
}

/// Synthesizes a manifest from merged directives.
///
/// Returning `Err` means the configuration itself is unusable (for example a
/// malformed directive value) and halts the pass. Problems the build can
/// live with belong in [`EngineOutput::warnings`] or
/// [`EngineOutput::errors`].
pub trait ManifestEngine {
    fn build(&mut self, request: &EngineRequest<'_>) -> BundleResult<EngineOutput>;
}

/// Produces a fresh engine for each packaging pass.
pub trait EngineFactory {
    fn create(&self) -> Box<dyn ManifestEngine>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Box<dyn ManifestEngine>,
{
    fn create(&self) -> Box<dyn ManifestEngine> {
        self()
    }
}

/// Reference engine that writes the merged directives as headers.
///
/// It performs no bytecode analysis: directives are copied through as
/// written, engine controls (names starting with `-`) are ignored with a
/// warning, and the volatile header is stamped with the current time.
#[derive(Debug, Default)]
pub struct PassthroughEngine {
    clock: Option<fn() -> u128>,
}

impl PassthroughEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed clock for the volatile header.
    pub fn with_clock(clock: fn() -> u128) -> Self {
        Self { clock: Some(clock) }
    }

    fn now_millis(&self) -> u128 {
        match self.clock {
            Some(clock) => clock(),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
        }
    }
}

impl ManifestEngine for PassthroughEngine {
    fn build(&mut self, request: &EngineRequest<'_>) -> BundleResult<EngineOutput> {
        let instructions = request.instructions;

        match instructions.get("Bundle-SymbolicName") {
            Some(bsn) if !bsn.trim().is_empty() => {}
            _ => {
                return Err(BundleError::Engine(
                    "Bundle-SymbolicName must not be empty".to_string(),
                ));
            }
        }

        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for name in instructions.names().filter(|n| n.starts_with('-')) {
            warnings.push(format!("Unknown instruction ignored: {name}"));
        }

        if let Some(activator) = instructions.get("Bundle-Activator") {
            let activator = activator.trim();
            if !class_exists(request.class_roots, activator) {
                errors.push(format!(
                    "Bundle-Activator {activator} is being imported into the bundle rather than being contained inside it"
                ));
            }
        }

        if request.trace {
            tracing::trace!(
                classpath_entries = request.classpath.len(),
                class_roots = request.class_roots.len(),
                "passthrough engine building manifest"
            );
        }

        let stamp = self.now_millis().to_string();
        let manifest = render_manifest(instructions, &[(VOLATILE_HEADER, stamp.as_str())]);

        Ok(EngineOutput {
            manifest,
            warnings,
            errors,
        })
    }
}

fn class_exists(class_roots: &[PathBuf], class_name: &str) -> bool {
    let relative: PathBuf = format!("{}.class", class_name.replace('.', "/")).into();
    class_roots
        .iter()
        .any(|root| root.join(&relative).is_file())
}
