//! Shared test fixtures.
//!
//! Provides canonical register models built directly in memory (for engine
//! tests) and helpers that materialize definition files into a temporary
//! spec directory (for parser and enrichment tests).

use std::fs;

use csrdec_core::model::{Catalog, Field, Register};
use tempfile::TempDir;

/// A unified-db style `mstatus` definition exercising every accepted
/// bit-location notation.
pub const MSTATUS_YAML: &str = r#"
kind: csr
name: mstatus
long_name: Machine Status
length: 64
description: |
  Machine-mode status register tracking global interrupt enables,
  previous privilege, and extension dirty state.
fields:
  SD:
    location: 63
    description: State-dirty summary bit.
  FS:
    location: 14-13
    description: Floating-point unit state.
  MPP:
    location:
      msb: 12
      lsb: 11
  SPP:
    location: "8"
  MPIE:
    location: "7:7"
  MIE:
    location: [3, 3]
  SIE:
    location: 1
"#;

/// Builds the `mstatus` model directly, bypassing the parser.
///
/// Fields are listed in canonical order (descending `bit_high`), matching
/// what the parser would produce from [`MSTATUS_YAML`].
pub fn mstatus() -> Register {
    Register {
        name: "mstatus".to_string(),
        long_name: "Machine Status".to_string(),
        width: 64,
        description: String::new(),
        fields: vec![
            Field::new("SD", 63, 63),
            Field::new("FS", 14, 13),
            Field::new("MPP", 12, 11),
            Field::new("SPP", 8, 8),
            Field::new("MPIE", 7, 7),
            Field::new("MIE", 3, 3),
            Field::new("SIE", 1, 1),
        ],
        overlaps: Vec::new(),
    }
}

/// A 64-bit register whose fields cover every bit with no gaps, for
/// round-trip reconstruction tests.
pub fn gapless() -> Register {
    Register {
        name: "gapless".to_string(),
        long_name: String::new(),
        width: 64,
        description: String::new(),
        fields: vec![
            Field::new("HI", 63, 32),
            Field::new("MID", 31, 16),
            Field::new("LO", 15, 1),
            Field::new("BIT0", 0, 0),
        ],
        overlaps: Vec::new(),
    }
}

/// A register whose two fields claim overlapping bits, as the parser would
/// record it: both fields kept, the pair listed in `overlaps`.
pub fn tangled() -> Register {
    Register {
        name: "tangled".to_string(),
        long_name: String::new(),
        width: 64,
        description: String::new(),
        fields: vec![Field::new("A", 7, 4), Field::new("B", 5, 2)],
        overlaps: vec![("A".to_string(), "B".to_string())],
    }
}

/// Wraps registers into a catalog.
pub fn catalog_of(registers: Vec<Register>) -> Catalog {
    let mut catalog = Catalog::new();
    for register in registers {
        catalog.insert(register);
    }
    catalog
}

/// Writes `(file_name, content)` pairs into a fresh temporary spec directory.
pub fn write_spec_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// Writes a single access-configuration file into a temporary directory and
/// returns the directory together with the file name used.
pub fn write_access_file(name: &str, content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}
