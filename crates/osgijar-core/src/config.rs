//! Build description for a packaging pass
//!
//! A host tool describes the bundle either programmatically or with a TOML
//! document. Every `[[instruction]]` entry is one operation, replayed in
//! document order: an entry with `value` replaces the directive, an entry
//! with `values` appends its fragments.
//!
//! ```toml
//! trace = true
//!
//! [[instruction]]
//! name = "Bundle-Version"
//! value = "5.0"
//!
//! [[instruction]]
//! name = "Built-By"
//! values = ["ab", "c"]
//! ```

use crate::{InstructionRegistry, PackagingError, PackagingResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Packaging configuration evaluated once per build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarConfig {
    /// Forward the merged instruction set and engine trace to the host log
    #[serde(default)]
    pub trace: bool,

    /// Directive operations in the order they were declared
    #[serde(default, rename = "instruction", skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<InstructionOp>,
}

/// One declared directive operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionOp {
    /// Insert the directive or fully replace its value
    Set { name: String, value: String },

    /// Legacy multi-value call: append fragments, creating the directive
    Add {
        #[serde(default)]
        name: Option<String>,

        #[serde(default)]
        values: Vec<String>,
    },
}

impl InstructionOp {
    /// Directive name, if the operation has one
    pub fn name(&self) -> Option<&str> {
        match self {
            InstructionOp::Set { name, .. } => Some(name.as_str()),
            InstructionOp::Add { name, .. } => name.as_deref(),
        }
    }

    /// Values carried by the operation
    pub fn values(&self) -> &[String] {
        match self {
            InstructionOp::Set { value, .. } => std::slice::from_ref(value),
            InstructionOp::Add { values, .. } => values,
        }
    }

    fn apply(&self, registry: &mut InstructionRegistry) {
        match self {
            InstructionOp::Set { name, value } => registry.set(name.as_str(), value.as_str()),
            InstructionOp::Add { name, values } => registry.add(name.as_deref(), values),
        }
    }
}

impl JarConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> PackagingResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PackagingError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> PackagingResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> PackagingResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Enable or disable trace output
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Record a directive that replaces any earlier value
    pub fn set_instruction(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.operations.push(InstructionOp::Set {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Record a legacy multi-value directive
    pub fn instruction<I, S>(&mut self, name: Option<&str>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations.push(InstructionOp::Add {
            name: name.map(str::to_string),
            values: values.into_iter().map(Into::into).collect(),
        });
    }

    /// Reject directive names that cannot be written as manifest headers
    ///
    /// Only the shape of names and values is checked; whether a directive is
    /// understood is left to the packaging engine.
    pub fn validate(&self) -> PackagingResult<()> {
        for op in &self.operations {
            let Some(name) = op.name() else { continue };
            let values = op.values();
            if name.is_empty() {
                return Err(PackagingError::InvalidInstruction {
                    name: name.to_string(),
                    reason: "name cannot be empty".to_string(),
                });
            }
            if name.contains([':', '\r', '\n']) || name.chars().any(char::is_whitespace) {
                return Err(PackagingError::InvalidInstruction {
                    name: name.to_string(),
                    reason: "name cannot contain ':' or whitespace".to_string(),
                });
            }
            if values.iter().any(|v| v.contains(['\r', '\n'])) {
                return Err(PackagingError::InvalidInstruction {
                    name: name.to_string(),
                    reason: "value cannot contain line breaks".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Build a fresh registry by replaying the operations in order
    pub fn registry(&self) -> InstructionRegistry {
        let mut registry = InstructionRegistry::new();
        for op in &self.operations {
            op.apply(&mut registry);
        }
        registry
    }
}
