//! Computed default directives and the merge of explicit directives over them

use crate::{InstructionRegistry, Instructions};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const BUNDLE_MANIFEST_VERSION: &str = "Bundle-ManifestVersion";
pub const BUNDLE_NAME: &str = "Bundle-Name";
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const BUNDLE_VERSION: &str = "Bundle-Version";
pub const BUNDLE_DESCRIPTION: &str = "Bundle-Description";
pub const EXPORT_PACKAGE: &str = "Export-Package";
pub const IMPORT_PACKAGE: &str = "Import-Package";

#[allow(clippy::expect_used)] // Safe: the pattern is a literal
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+)(?:\.(\d+))?)?[.\-_]?(.*)$")
        .expect("version pattern is valid")
});

/// Identity of the project being packaged, as supplied by the host build tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    /// Project display name
    pub name: String,

    /// Project version as declared in the build (not necessarily OSGi syntax)
    pub version: String,

    /// Archive base name, used as the default symbolic name
    pub base_name: String,

    /// Project description
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectIdentity {
    /// Create an identity whose base name equals the project name
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            base_name: name.clone(),
            name,
            version: version.into(),
            description: None,
        }
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Directives derived from the project rather than declared by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultInstructions {
    entries: Instructions,
}

impl DefaultInstructions {
    /// Compute the defaults for a project and its exported packages
    pub fn for_project(project: &ProjectIdentity, exports: &[String]) -> Self {
        let mut entries = Instructions::new();
        entries.insert(BUNDLE_MANIFEST_VERSION.to_string(), "2".to_string());
        entries.insert(BUNDLE_NAME.to_string(), project.name.clone());
        entries.insert(BUNDLE_SYMBOLIC_NAME.to_string(), project.base_name.clone());
        entries.insert(BUNDLE_VERSION.to_string(), osgi_version(&project.version));
        if let Some(description) = &project.description {
            entries.insert(BUNDLE_DESCRIPTION.to_string(), description.clone());
        }
        if !exports.is_empty() {
            entries.insert(EXPORT_PACKAGE.to_string(), exports.join(","));
        }
        entries.insert(IMPORT_PACKAGE.to_string(), "*".to_string());
        Self { entries }
    }

    /// Wrap an explicit set of defaults
    pub fn from_instructions(entries: Instructions) -> Self {
        Self { entries }
    }

    /// The computed defaults
    pub fn as_map(&self) -> &Instructions {
        &self.entries
    }

    /// Overlay explicitly registered directives on the defaults
    ///
    /// A registered directive always wins over the same-named default.
    /// Defaults keep their order; registry-only names follow in registry
    /// order. Names are passed through without validation.
    pub fn merge(&self, registry: &InstructionRegistry) -> Instructions {
        let mut merged = self.entries.clone();
        for (name, value) in registry.iter() {
            if let Some(default) = self.entries.get(name) {
                tracing::debug!(
                    instruction = name,
                    default,
                    value,
                    "explicit instruction overrides default"
                );
            }
            merged.insert(name.to_string(), value.to_string());
        }
        merged
    }
}

/// Convert a build version into OSGi version syntax
///
/// `major[.minor[.micro]]` is kept as written. Anything after it, less one
/// leading `.`, `-` or `_`, becomes the qualifier, in which case the numeric part is padded to three
/// segments. Qualifier characters outside `[A-Za-z0-9_-]` become `_`.
pub fn osgi_version(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "0".to_string();
    }

    let Some(captures) = VERSION_PATTERN.captures(raw) else {
        return format!("0.0.0.{}", sanitize_qualifier(raw));
    };

    let qualifier = captures.get(4).map(|m| m.as_str()).unwrap_or_default();
    if qualifier.is_empty() {
        return raw.trim_end_matches(['.', '-', '_']).to_string();
    }

    let segment = |i: usize| captures.get(i).map(|m| m.as_str()).unwrap_or("0");
    format!(
        "{}.{}.{}.{}",
        segment(1),
        segment(2),
        segment(3),
        sanitize_qualifier(qualifier)
    )
}

fn sanitize_qualifier(qualifier: &str) -> String {
    qualifier
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
