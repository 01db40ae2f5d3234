//! Instruction registry
//!
//! Directives are collected from the build description in two styles:
//! direct `name = value` entries, which replace, and legacy multi-fragment
//! calls, which append with a comma separator. Iteration always follows
//! first-insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Separator used when joining directive fragments
pub const FRAGMENT_SEPARATOR: &str = ",";

/// Immutable, insertion-ordered view of directive name -> value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(IndexMap<String, String>);

impl Instructions {
    /// Create an empty instruction set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a directive name (exact match)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Check if a directive is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of directives
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no directives
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Directive names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }
}

impl<'a> IntoIterator for &'a Instructions {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Instructions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mutable registry of packaging directives
///
/// A registry lives for a single evaluation of the build description. Keys
/// are never removed; they are only replaced ([`set`](Self::set)) or extended
/// ([`add`](Self::add)).
///
/// # Example
///
/// ```
/// use osgijar_core::InstructionRegistry;
///
/// let mut registry = InstructionRegistry::new();
/// registry.add(Some("Built-By"), ["ab", "c"]);
/// registry.add(Some("Built-By"), ["x", "y", "z"]);
/// registry.set("Bundle-Version", "5.0");
///
/// assert_eq!(registry.get("Built-By"), Some("ab,c,x,y,z"));
/// assert_eq!(registry.get("Bundle-Version"), Some("5.0"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstructionRegistry {
    entries: Instructions,
}

impl InstructionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directive or fully replace its current value
    ///
    /// A replaced directive keeps its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        tracing::trace!(instruction = %name, %value, "set instruction");
        self.entries.insert(name, value);
    }

    /// Append comma-joined fragments to a directive, creating it if absent
    ///
    /// A missing name or an empty fragment list leaves the registry untouched.
    pub fn add<I, S>(&mut self, name: Option<&str>, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(name) = name else {
            tracing::trace!("ignoring instruction without a name");
            return;
        };

        let fragments: Vec<String> = fragments
            .into_iter()
            .map(|f| f.as_ref().to_string())
            .collect();
        if fragments.is_empty() {
            tracing::trace!(instruction = %name, "ignoring instruction without values");
            return;
        }

        let joined = fragments.join(FRAGMENT_SEPARATOR);
        let value = match self.entries.get(name) {
            Some(existing) => format!("{existing}{FRAGMENT_SEPARATOR}{joined}"),
            None => joined,
        };
        tracing::trace!(instruction = %name, %value, "add instruction");
        self.entries.insert(name.to_string(), value);
    }

    /// Get the current value for a directive
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name)
    }

    /// Check if a directive has been registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// Number of registered directives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter()
    }

    /// Immutable view of the registered directives
    pub fn as_map(&self) -> &Instructions {
        &self.entries
    }

    /// Consume the registry, yielding the registered directives
    pub fn into_instructions(self) -> Instructions {
        self.entries
    }
}
