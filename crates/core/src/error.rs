//! Error and warning types for catalog construction and decoding.
//!
//! This module defines the failure taxonomy of the library. It provides:
//! 1. **Hard errors:** Conditions that fail a single operation (`Error`), such as a
//!    register name that is not present in the catalog.
//! 2. **Warnings:** Non-fatal diagnostics (`Warning`) produced while parsing loosely
//!    structured definition files; these are returned alongside results and logged,
//!    never silently swallowed.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Hard failures reported to the caller.
///
/// Individual malformed definition files never produce an `Error`; they are
/// downgraded to [`Warning::SchemaSkip`] so one bad file cannot abort a whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested register is not present in the catalog.
    #[error("register '{name}' not found in catalog ({known} definitions loaded)")]
    UnknownRegister {
        /// The name that failed to resolve.
        name: String,
        /// Number of definitions currently loaded, for the caller's diagnostics.
        known: usize,
    },

    /// A top-level input path (spec directory or access file) could not be read.
    #[error("failed to read '{path}'")]
    Io {
        /// The unreadable path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The access-configuration file could not be parsed as YAML.
    #[error("failed to parse '{path}' as YAML")]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The access-configuration file could not be parsed as JSON.
    #[error("failed to parse '{path}' as JSON")]
    Json {
        /// The offending file.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Non-fatal diagnostics produced while building or enriching a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A file in the spec directory does not resemble a register definition.
    SchemaSkip {
        /// The skipped file.
        path: String,
        /// Why the file was skipped.
        reason: String,
    },

    /// A field entry could not be converted into a bit range and was dropped.
    FieldSkip {
        /// The owning register.
        register: String,
        /// The unparseable field.
        field: String,
        /// Why the field was skipped.
        reason: String,
    },

    /// Two fields in one register claim overlapping bits.
    ///
    /// The register stays in the catalog and both fields are kept; the ambiguity
    /// is surfaced again by the decode engine when that register is targeted.
    Overlap {
        /// The owning register.
        register: String,
        /// First field of the overlapping pair (higher bit position).
        first: String,
        /// Second field of the overlapping pair.
        second: String,
    },

    /// A field's `bit_high` is at or beyond the register's declared width.
    ///
    /// The field is kept untruncated; same severity class as [`Warning::Overlap`].
    WidthExceeded {
        /// The owning register.
        register: String,
        /// The offending field.
        field: String,
        /// The field's most-significant bit.
        bit_high: u32,
        /// The register's declared width.
        width: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaSkip { path, reason } => {
                write!(f, "skipped '{path}': {reason}")
            }
            Self::FieldSkip {
                register,
                field,
                reason,
            } => {
                write!(f, "{register}: dropped field '{field}': {reason}")
            }
            Self::Overlap {
                register,
                first,
                second,
            } => {
                write!(f, "{register}: fields '{first}' and '{second}' overlap")
            }
            Self::WidthExceeded {
                register,
                field,
                bit_high,
                width,
            } => {
                write!(
                    f,
                    "{register}: field '{field}' bit {bit_high} exceeds declared width {width}"
                )
            }
        }
    }
}
