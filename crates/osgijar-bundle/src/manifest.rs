//! Manifest snapshots.
//!
//! A snapshot is the text of a generated `MANIFEST.MF`. Two snapshots are
//! compared after [`normalize`] strips the [`VOLATILE_HEADER`], which the
//! packaging engine rewrites on every pass regardless of its inputs.

use crate::{BundleError, BundleResult, VOLATILE_HEADER};
use osgijar_core::Instructions;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Maximum line length in bytes, excluding the line terminator.
pub const MAX_LINE_BYTES: usize = 72;

/// Line terminator used when rendering manifests.
pub const LINE_END: &str = "\r\n";

// The header line plus any continuation lines, for any line-ending style.
#[allow(clippy::expect_used)] // Safe: the pattern is built from a literal
static VOLATILE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?mR)^{}:[^\r\n]*(?:\r\n|\r|\n)?(?: [^\r\n]*(?:\r\n|\r|\n)?)*",
        regex::escape(VOLATILE_HEADER)
    ))
    .expect("volatile header pattern is valid")
});

/// Strip the volatile header from manifest text.
///
/// Line endings are otherwise left as they are. Normalizing an already
/// normalized text returns it unchanged.
pub fn normalize(text: &str) -> Cow<'_, str> {
    VOLATILE_LINE.replace_all(text, "")
}

/// Text of a generated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSnapshot {
    text: String,
}

impl ManifestSnapshot {
    /// Wrap manifest text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw manifest text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The manifest text without the volatile header.
    #[must_use]
    pub fn normalized(&self) -> Cow<'_, str> {
        normalize(&self.text)
    }

    /// Check if two snapshots are equal apart from the volatile header.
    #[must_use]
    pub fn matches(&self, other: &ManifestSnapshot) -> bool {
        self.normalized() == other.normalized()
    }

    /// Parse the main-section headers, unfolding continuation lines.
    pub fn headers(&self) -> BundleResult<Vec<(String, String)>> {
        let mut headers: Vec<(String, String)> = Vec::new();

        for (index, line) in split_lines(&self.text).enumerate() {
            if line.is_empty() {
                break;
            }

            if let Some(continued) = line.strip_prefix(' ') {
                let Some((_, value)) = headers.last_mut() else {
                    return Err(BundleError::InvalidManifest(format!(
                        "line {} continues a header that does not exist",
                        index + 1
                    )));
                };
                value.push_str(continued);
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                return Err(BundleError::InvalidManifest(format!(
                    "line {} has no ':' separator",
                    index + 1
                )));
            };
            let value = value.strip_prefix(' ').unwrap_or(value);
            headers.push((name.to_string(), value.to_string()));
        }

        Ok(headers)
    }

    /// Get a main-section header value by exact name.
    pub fn header(&self, name: &str) -> BundleResult<Option<String>> {
        Ok(self
            .headers()?
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value))
    }
}

impl From<String> for ManifestSnapshot {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Render a main section from directives.
///
/// Directives whose name starts with `-` are engine controls and are not
/// written. `extra` headers are appended after the directives.
pub fn render_manifest(instructions: &Instructions, extra: &[(&str, &str)]) -> String {
    let mut out = String::new();
    write_header(&mut out, "Manifest-Version", "1.0");

    let headers = instructions
        .iter()
        .filter(|(name, _)| !name.starts_with('-'))
        .chain(extra.iter().copied());
    for (name, value) in headers {
        write_header(&mut out, name, value);
    }

    out.push_str(LINE_END);
    out
}

fn write_header(out: &mut String, name: &str, value: &str) {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut limit = MAX_LINE_BYTES;

    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str(LINE_END);
        out.push(' ');
        rest = &rest[cut..];
        limit = MAX_LINE_BYTES - 1;
    }

    out.push_str(rest);
    out.push_str(LINE_END);
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = text.strip_suffix('\r').unwrap_or(text);
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}
