//! CSR bitfield decoding library.
//!
//! This crate builds an in-memory model of control/status registers from
//! loosely structured definition files and performs bit-exact decoding of
//! concrete register values against it. It provides:
//! 1. **Bits:** Pure bit-range extraction and masking primitives.
//! 2. **Model:** `Field`, `Register`, `AccessClass`, and the per-run `Catalog`.
//! 3. **Parse:** A schema-tolerant parser for per-register YAML/JSON files.
//! 4. **Access:** Enrichment of the catalog with access-class semantics from an
//!    extension-organized configuration source.
//! 5. **Engine:** Decode, diff (XOR-mask), and compare (two-value) operations.
//!
//! The catalog is built once, optionally enriched once, and read-only
//! thereafter; every engine operation is a pure function over it.

/// Access-class enrichment from an extension-organized source.
pub mod access;
/// Bit-range extraction and masking primitives.
pub mod bits;
/// Decode, diff, and compare engines.
pub mod engine;
/// Error and warning taxonomy.
pub mod error;
/// Register/field model and the catalog.
pub mod model;
/// Schema-tolerant register-definition parser.
pub mod parse;

/// Enrichment entry point; overlay access classes onto a built catalog.
pub use crate::access::{ConflictPolicy, EnrichReport, enrich_catalog};
/// Engine entry points and their ordered result records.
pub use crate::engine::{Compare, Decode, Diff, compare, decode, diff};
/// Operation-level error and non-fatal parse warnings.
pub use crate::error::{Error, Warning};
/// The canonical register model.
pub use crate::model::{AccessClass, Catalog, Field, Register};
/// Catalog construction from a directory of definition files.
pub use crate::parse::build_catalog;
