//! Archive writing.
//!
//! The [`ArchiveWriter`] writes the bundle jar: the manifest first, as the
//! JAR format expects, followed by the contents of every class root.

use crate::{BundleResult, MANIFEST_PATH};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Prefix of fingerprints produced by [`input_fingerprint`].
pub const FINGERPRINT_PREFIX: &str = "sha256:";

/// A class-root file or directory as it will appear in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArchiveEntry {
    name: String,
    source: PathBuf,
    is_dir: bool,
}

/// Writes bundle archives.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    options: SimpleFileOptions,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self {
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
        }
    }
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store entries without compression.
    pub fn stored(mut self) -> Self {
        self.options = self
            .options
            .compression_method(zip::CompressionMethod::Stored);
        self
    }

    /// Write the archive, replacing any existing file.
    ///
    /// Files are added in sorted order per class root. A `MANIFEST.MF`
    /// found in a class root is skipped in favour of `manifest`, and an
    /// entry already added from an earlier root wins over later ones.
    pub fn write<P: AsRef<Path>>(
        &self,
        output_path: P,
        manifest: &str,
        class_roots: &[PathBuf],
    ) -> BundleResult<usize> {
        let output_path = output_path.as_ref();
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);

        zip.add_directory("META-INF/", self.options)?;
        zip.start_file(MANIFEST_PATH, self.options)?;
        zip.write_all(manifest.as_bytes())?;

        let entries = collect_entries(class_roots)?;
        for entry in &entries {
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), self.options)?;
            } else {
                let contents = fs::read(&entry.source)?;
                zip.start_file(entry.name.as_str(), self.options)?;
                zip.write_all(&contents)?;
            }
        }

        zip.finish()?;

        let entries = entries.len() + 2;
        tracing::debug!(archive = %output_path.display(), entries, "archive written");
        Ok(entries)
    }
}

/// Fingerprint the class-root contents that go into the archive.
///
/// Covers every entry name and file body, in archive order, so an edited
/// class changes the fingerprint even when the manifest does not.
pub fn input_fingerprint(class_roots: &[PathBuf]) -> BundleResult<String> {
    let mut hasher = Sha256::new();

    for entry in collect_entries(class_roots)? {
        hasher.update(entry.name.as_bytes());
        hasher.update([0u8]);
        if !entry.is_dir {
            let contents = fs::read(&entry.source)?;
            hasher.update((contents.len() as u64).to_le_bytes());
            hasher.update(&contents);
        }
    }

    Ok(format!("{FINGERPRINT_PREFIX}{}", hex::encode(hasher.finalize())))
}

/// Walk the class roots in sorted order, first root winning on duplicates.
///
/// A root's `META-INF/MANIFEST.MF` is left out, since the writer supplies
/// its own.
fn collect_entries(class_roots: &[PathBuf]) -> BundleResult<Vec<ArchiveEntry>> {
    let mut seen = HashSet::from([MANIFEST_PATH.to_string(), "META-INF/".to_string()]);
    let mut entries = Vec::new();

    for root in class_roots.iter().filter(|r| r.is_dir()) {
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let is_dir = entry.file_type().is_dir();
            let Some(name) = archive_path(root, entry.path(), is_dir) else {
                continue;
            };
            if !seen.insert(name.clone()) {
                tracing::debug!(entry = %name, "skipping duplicate archive entry");
                continue;
            }
            entries.push(ArchiveEntry {
                name,
                source: entry.path().to_path_buf(),
                is_dir,
            });
        }
    }

    Ok(entries)
}

/// Path of a file inside the archive, always `/`-separated.
fn archive_path(root: &Path, path: &Path, is_dir: bool) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut name = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if name.is_empty() {
        return None;
    }
    if is_dir {
        name.push('/');
    }
    Some(name)
}
