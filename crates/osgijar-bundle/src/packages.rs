//! Package discovery in compiled class roots.

use crate::BundleResult;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Collect the packages that contain at least one `.class` file.
///
/// Package names are the dotted directory path relative to the class root.
/// Classes in the default package and anything under `META-INF` are not
/// exportable and are skipped. Missing roots are ignored.
pub fn scan_packages(class_roots: &[PathBuf]) -> BundleResult<Vec<String>> {
    let mut packages = BTreeSet::new();

    for root in class_roots.iter().filter(|r| r.is_dir()) {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().is_none_or(|ext| ext != "class") {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if let Some(package) = package_name(relative) {
                packages.insert(package);
            }
        }
    }

    Ok(packages.into_iter().collect())
}

fn package_name(class_file: &Path) -> Option<String> {
    let parent = class_file.parent()?;
    let segments: Vec<String> = parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    match segments.first() {
        None => None,
        Some(first) if first == "META-INF" => None,
        Some(_) => Some(segments.join(".")),
    }
}
