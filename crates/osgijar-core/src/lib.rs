//! osgijar-core - Instruction registry, defaults and build description
//!
//! This crate provides the configuration-side types for producing OSGi bundles:
//! - [`InstructionRegistry`] for collecting packaging directives
//! - [`DefaultInstructions`] for computed defaults and the merge over them
//! - [`JarConfig`] for the build description a host hands to a packaging pass
//! - [`TargetState`] for the per-archive build state machine
//! - [`PackagingError`] for error handling

mod config;
mod defaults;
mod error;
mod instructions;
mod state;

pub use config::{InstructionOp, JarConfig};
pub use defaults::{DefaultInstructions, ProjectIdentity, osgi_version};
pub use error::{PackagingError, PackagingResult};
pub use instructions::{InstructionRegistry, Instructions};
pub use state::{PassOutcome, TargetState};

/// Diagnostic levels forwarded to the host build tool
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DefaultInstructions, InstructionRegistry, Instructions, JarConfig, LogLevel,
        PackagingError, PackagingResult, ProjectIdentity, TargetState,
    };
}
