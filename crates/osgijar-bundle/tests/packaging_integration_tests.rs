//! Integration tests for full packaging passes.
//!
//! Runs the builder with the passthrough engine against real class roots
//! and checks the merged directives, the manifest snapshot and the archive.

#![allow(non_snake_case)]

use osgijar_bundle::{
    BundleError, JarBuilder, MANIFEST_PATH, ManifestEngine, ManifestSnapshot, PassthroughEngine,
    ProjectLayout, is_stale, normalize,
};
use osgijar_core::{JarConfig, PassOutcome, ProjectIdentity};
use proptest::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

static TICK: AtomicU64 = AtomicU64::new(1_700_000_000_000);

/// Clock that advances on every call, so each pass stamps a new time.
fn ticking_clock() -> u128 {
    u128::from(TICK.fetch_add(1, Ordering::SeqCst))
}

fn passthrough() -> Box<dyn ManifestEngine> {
    Box::new(PassthroughEngine::with_clock(ticking_clock))
}

fn write_class(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"\xca\xfe\xba\xbe").unwrap();
}

fn project(dir: &TempDir) -> ProjectLayout {
    let classes = dir.path().join("build/classes");
    write_class(&classes, "com/acme/api/Service.class");
    write_class(&classes, "com/acme/impl/Activator.class");

    ProjectLayout::new(
        ProjectIdentity::new("demo", "1.0.2"),
        dir.path().join("build/libs/demo-1.0.2.jar"),
        dir.path().join("build/tmp/jar/demo-1.0.2.jar.MF"),
    )
    .with_class_root(classes)
}

fn archive_manifest(path: &Path) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut manifest = String::new();
    archive
        .by_name(MANIFEST_PATH)
        .unwrap()
        .read_to_string(&mut manifest)
        .unwrap();
    manifest
}

fn archive_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut contents = Vec::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    contents
}

// =============================================================================
// Directive Merging
// =============================================================================

mod merging {
    use super::*;

    #[test]
    fn package___explicit_version___overrides_computed_default() {
        let dir = TempDir::new().unwrap();
        let mut config = JarConfig::new();
        config.set_instruction("Bundle-Version", "5.0");

        let report = JarBuilder::new(project(&dir), config, &passthrough)
            .package()
            .unwrap();

        assert_eq!(report.instructions.get("Bundle-Version"), Some("5.0"));
        let snapshot = ManifestSnapshot::new(report.manifest);
        assert_eq!(
            snapshot.header("Bundle-Version").unwrap().as_deref(),
            Some("5.0")
        );
    }

    #[test]
    fn package___legacy_fragments___accumulate_in_call_order() {
        let dir = TempDir::new().unwrap();
        let mut config = JarConfig::new();
        config.instruction(Some("Built-By"), ["ab", "c"]);
        config.instruction(Some("Built-By"), ["x", "y", "z"]);

        let report = JarBuilder::new(project(&dir), config, &passthrough)
            .package()
            .unwrap();

        assert_eq!(report.instructions.get("Built-By"), Some("ab,c,x,y,z"));
    }

    #[test]
    fn package___defaults___export_scanned_packages() {
        let dir = TempDir::new().unwrap();

        let report = JarBuilder::new(project(&dir), JarConfig::new(), &passthrough)
            .package()
            .unwrap();

        assert_eq!(
            report.instructions.get("Export-Package"),
            Some("com.acme.api,com.acme.impl")
        );
        assert_eq!(report.instructions.get("Bundle-SymbolicName"), Some("demo"));
        assert_eq!(report.instructions.get("Bundle-Version"), Some("1.0.2"));
    }

    #[test]
    fn package___toml_config___drives_the_pass() {
        let dir = TempDir::new().unwrap();
        let config = JarConfig::from_toml_str(
            r#"
trace = true

[[instruction]]
name = "Bundle-Activator"
value = "com.acme.impl.Activator"

[[instruction]]
name = "Built-By"
values = ["ci"]
"#,
        )
        .unwrap();

        let report = JarBuilder::new(project(&dir), config, &passthrough)
            .package()
            .unwrap();

        assert!(!report.has_errors());
        assert_eq!(report.instructions.get("Built-By"), Some("ci"));
    }
}

// =============================================================================
// Staleness Across Passes
// =============================================================================

mod staleness {
    use super::*;

    #[test]
    fn package___first_pass___is_always_stale() {
        let dir = TempDir::new().unwrap();
        let layout = project(&dir);
        let archive = layout.archive_path.clone();

        let report = JarBuilder::new(layout, JarConfig::new(), &passthrough)
            .package()
            .unwrap();

        assert!(report.stale);
        assert_eq!(report.outcome, PassOutcome::FirstBuild);
        assert_eq!(archive_manifest(&archive), report.manifest);
    }

    #[test]
    fn package___identical_second_pass___skips_archive() {
        let dir = TempDir::new().unwrap();
        let builder = JarBuilder::new(project(&dir), JarConfig::new(), &passthrough);
        let first = builder.package().unwrap();
        let written = fs::metadata(&builder.layout().archive_path)
            .unwrap()
            .modified()
            .unwrap();

        let second = builder.package().unwrap();

        assert_ne!(first.manifest, second.manifest);
        assert!(!second.stale);
        assert_eq!(second.outcome, PassOutcome::Untouched);
        let after = fs::metadata(&builder.layout().archive_path)
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(written, after);
        assert_eq!(archive_manifest(&builder.layout().archive_path), first.manifest);
    }

    #[test]
    fn package___new_class_package___rewrites_archive() {
        let dir = TempDir::new().unwrap();
        let builder = JarBuilder::new(project(&dir), JarConfig::new(), &passthrough);
        builder.package().unwrap();

        write_class(&builder.layout().class_roots[0], "com/acme/spi/Hook.class");
        let report = builder.package().unwrap();

        assert!(report.stale);
        assert_eq!(report.outcome, PassOutcome::Rewritten);
        assert!(archive_manifest(&builder.layout().archive_path).contains("com.acme.spi"));
    }

    #[test]
    fn package___edited_class_body___repackages_new_bytes() {
        let dir = TempDir::new().unwrap();
        let builder = JarBuilder::new(project(&dir), JarConfig::new(), &passthrough);
        builder.package().unwrap();
        let class = builder.layout().class_roots[0].join("com/acme/api/Service.class");

        fs::write(&class, b"new-bytecode").unwrap();
        let report = builder.package().unwrap();

        assert!(report.stale);
        assert_eq!(report.outcome, PassOutcome::Rewritten);
        assert_eq!(
            archive_entry(&builder.layout().archive_path, "com/acme/api/Service.class"),
            b"new-bytecode"
        );
    }

    #[test]
    fn package___edited_body_then_idle___settles_to_untouched() {
        let dir = TempDir::new().unwrap();
        let builder = JarBuilder::new(project(&dir), JarConfig::new(), &passthrough);
        builder.package().unwrap();
        fs::write(
            builder.layout().class_roots[0].join("com/acme/impl/Activator.class"),
            b"new-bytecode",
        )
        .unwrap();
        builder.package().unwrap();

        let report = builder.package().unwrap();

        assert!(!report.stale);
        assert_eq!(report.outcome, PassOutcome::Untouched);
    }
}

// =============================================================================
// Engine Diagnostics
// =============================================================================

mod diagnostics {
    use super::*;

    #[test]
    fn package___missing_activator___reports_error_and_still_writes() {
        let dir = TempDir::new().unwrap();
        let mut config = JarConfig::new();
        config.set_instruction("Bundle-Activator", "com.acme.Missing");
        let layout = project(&dir);
        let archive = layout.archive_path.clone();

        let report = JarBuilder::new(layout, config, &passthrough)
            .package()
            .unwrap();

        assert!(report.has_errors());
        assert!(report.errors[0].contains("com.acme.Missing"));
        assert!(archive.exists());
    }

    #[test]
    fn package___empty_symbolic_name___fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let mut config = JarConfig::new();
        config.set_instruction("Bundle-SymbolicName", "");
        let layout = project(&dir);
        let archive = layout.archive_path.clone();
        let snapshot = layout.snapshot_path.clone();

        let result = JarBuilder::new(layout, config, &passthrough).package();

        assert!(matches!(result, Err(BundleError::Engine(_))));
        assert!(!archive.exists());
        assert!(!snapshot.exists());
    }

    #[test]
    fn package___control_directive___warns_and_is_left_out() {
        let dir = TempDir::new().unwrap();
        let mut config = JarConfig::new();
        config.set_instruction("-removeheaders", "Bnd-LastModified");

        let report = JarBuilder::new(project(&dir), config, &passthrough)
            .package()
            .unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert!(!report.manifest.contains("-removeheaders"));
    }
}

// =============================================================================
// Normalization Properties
// =============================================================================

fn arb_header_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9.,;=_-]{0,40}"
}

proptest! {
    /// Property: normalizing twice gives the same text as normalizing once
    #[test]
    fn proptest_normalize_idempotent(version in arb_header_value(), stamp in any::<u64>()) {
        let text = format!(
            "Manifest-Version: 1.0\r\nBnd-LastModified: {stamp}\r\nBundle-Version: {version}\r\n\r\n"
        );

        let once = normalize(&text).into_owned();
        prop_assert_eq!(normalize(&once).into_owned(), once);
    }

    /// Property: manifests differing only in the volatile header are not stale
    #[test]
    fn proptest_volatile_header_never_stale(
        version in arb_header_value(),
        first in any::<u64>(),
        second in any::<u64>()
    ) {
        let manifest = |stamp: u64| format!(
            "Manifest-Version: 1.0\r\nBnd-LastModified: {stamp}\r\nBundle-Version: {version}\r\n\r\n"
        );

        prop_assert!(!is_stale(&manifest(first), Some(&manifest(second))));
        prop_assert!(is_stale(&manifest(first), None));
    }
}
