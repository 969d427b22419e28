//! Register model: access classes, fields, registers, and the catalog.
//!
//! This module defines the canonical in-memory representation that the parser
//! produces and every engine consumes. It provides:
//! 1. **Access classes:** The read/write legality classification attached to fields.
//! 2. **Fields:** Named contiguous bit ranges within a register.
//! 3. **Registers:** Named fixed-width CSR definitions with canonically ordered fields.
//! 4. **Catalog:** The per-run collection of registers, indexed by exact name.
//!
//! A `Register` is built once by the parser, optionally enriched once, and
//! read-only thereafter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bits;

/// Default register width when a definition file does not declare one.
pub const DEFAULT_WIDTH: u32 = 64;

/// Read/write legality classification of a field, per the RISC-V privileged
/// specification's field-type taxonomy.
///
/// Every field starts as [`Unspecified`](Self::Unspecified); enrichment from an
/// access-configuration source upgrades matching fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessClass {
    /// No access-class information available.
    #[default]
    Unspecified,
    /// Write-Any-Read-Legal: any value may be written; reads return only legal values.
    #[serde(alias = "WARL")]
    Warl,
    /// Write-Legal-Read-Legal: only legal values may be written.
    #[serde(alias = "WLRL")]
    Wlrl,
    /// Write-Preserve-Read-Ignore: reserved field.
    #[serde(alias = "WPRI")]
    Wpri,
    /// Write-Ignore-Read-Ignore: ignored field.
    #[serde(alias = "WIRI")]
    Wiri,
    /// Read-only with a fixed value.
    #[serde(alias = "RO_constant")]
    RoConstant,
    /// Read-only with an implementation-defined value.
    #[serde(alias = "RO_variable")]
    RoVariable,
}

impl AccessClass {
    /// Parses an access-class tag as written in access-configuration sources.
    ///
    /// Matching is case-insensitive; unknown tags yield `None` so the caller can
    /// count the entry as unmatched instead of guessing.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "warl" => Some(Self::Warl),
            "wlrl" => Some(Self::Wlrl),
            "wpri" => Some(Self::Wpri),
            "wiri" => Some(Self::Wiri),
            "ro_constant" | "ro-constant" => Some(Self::RoConstant),
            "ro_variable" | "ro-variable" => Some(Self::RoVariable),
            _ => None,
        }
    }

    /// Short display label, e.g. `WARL` or `ro_const`; empty for unspecified.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Warl => "WARL",
            Self::Wlrl => "WLRL",
            Self::Wpri => "WPRI",
            Self::Wiri => "WIRI",
            Self::RoConstant => "ro_constant",
            Self::RoVariable => "ro_variable",
        }
    }

    /// Whether no access-class information has been attached.
    pub const fn is_unspecified(self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

/// A named contiguous bit range within a register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field name, unique within its owning register, case preserved.
    pub name: String,
    /// Most-significant bit of the range (inclusive).
    pub bit_high: u32,
    /// Least-significant bit of the range (inclusive); equals `bit_high` for
    /// single-bit fields.
    pub bit_low: u32,
    /// Read/write legality class; [`AccessClass::Unspecified`] until enrichment.
    pub access_class: AccessClass,
    /// Explicit enumeration of admissible raw values, when the access source
    /// supplies one. Not rendered by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_values: Option<Vec<u64>>,
    /// Free-form description from the definition file, newlines collapsed.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Alternate name for the field, when the definition file declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Reset value of the field, when the definition file declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<u64>,
}

impl Field {
    /// Creates a field covering `[bit_low, bit_high]` with no metadata attached.
    pub fn new(name: impl Into<String>, bit_high: u32, bit_low: u32) -> Self {
        debug_assert!(bit_low <= bit_high && bit_high <= bits::MAX_BIT);
        Self {
            name: name.into(),
            bit_high,
            bit_low,
            access_class: AccessClass::Unspecified,
            legal_values: None,
            description: String::new(),
            alias: None,
            reset_value: None,
        }
    }

    /// Width of the field in bits.
    pub const fn width(&self) -> u32 {
        self.bit_high - self.bit_low + 1
    }

    /// Mask with exactly this field's bits set, in register bit positions.
    pub const fn mask(&self) -> u64 {
        bits::mask(self.bit_high, self.bit_low)
    }

    /// Extracts this field's raw value from a full register value.
    pub const fn extract_from(&self, value: u64) -> u64 {
        bits::extract(value, self.bit_high, self.bit_low)
    }

    /// Whether this field's bit range intersects `other`'s.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.mask() & other.mask() != 0
    }
}

/// A named CSR definition.
///
/// `fields` is kept sorted by descending `bit_high` (most-significant field
/// first); this is the canonical order used by decode, diff, and compare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Register {
    /// Register name, case preserved, matched case-sensitively.
    pub name: String,
    /// Human-readable long name, when the definition file declares one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub long_name: String,
    /// Bit width of the register; defaults to [`DEFAULT_WIDTH`].
    pub width: u32,
    /// Free-form description from the definition file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Fields in canonical order (descending `bit_high`).
    pub fields: Vec<Field>,
    /// Pairs of field names with overlapping bit ranges, recorded by the parser.
    ///
    /// Non-empty means the definition is ambiguous; decoding proceeds in field
    /// order but the pairs are surfaced with every engine result.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<(String, String)>,
}

impl Register {
    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Mutable field lookup by exact name; used by the enricher.
    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// Mapping from register name to register definition for one invocation.
///
/// Insertion order is the parser's (sorted-filename) scan order; lookup is by
/// exact, case-sensitive name. Once built and optionally enriched, the catalog
/// is read-only.
#[derive(Debug, Default)]
pub struct Catalog {
    registers: Vec<Register>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a register, replacing any existing definition with the same name.
    pub fn insert(&mut self, register: Register) {
        if let Some(&slot) = self.index.get(&register.name) {
            self.registers[slot] = register;
        } else {
            self.index
                .insert(register.name.clone(), self.registers.len());
            self.registers.push(register);
        }
    }

    /// Looks up a register by exact name.
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.index.get(name).map(|&slot| &self.registers[slot])
    }

    /// Mutable lookup by exact name; used by the enricher.
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Register> {
        let slot = *self.index.get(name)?;
        Some(&mut self.registers[slot])
    }

    /// Number of registers in the catalog.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Whether the catalog holds no registers.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Iterates registers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Register;
    type IntoIter = std::slice::Iter<'a, Register>;

    fn into_iter(self) -> Self::IntoIter {
        self.registers.iter()
    }
}
