//! Decode, diff, and compare engines.
//!
//! Pure transformations from a register model and one or two concrete values
//! into ordered per-field records. This module provides:
//! 1. **Decode:** Every field's raw value extracted from one register value.
//! 2. **Diff:** Fields touched by an XOR mask (before ^ after), with changed-bit detail.
//! 3. **Compare:** Fields whose extracted values differ between two register values.
//!
//! All three walk the register's canonical field order (most-significant field
//! first) and are deterministic, total functions; the only failure mode is a
//! register name absent from the catalog.

use serde::Serialize;

use crate::error::Error;
use crate::model::{AccessClass, Catalog, Register};

/// One field's decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    /// Field name.
    pub name: String,
    /// Most-significant bit of the field.
    pub bit_high: u32,
    /// Least-significant bit of the field.
    pub bit_low: u32,
    /// Field width in bits.
    pub width: u32,
    /// Raw value extracted from the register value, right-aligned.
    pub raw_value: u64,
    /// Access class attached by enrichment, if any.
    pub access_class: AccessClass,
    /// Field description from the definition file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Result of decoding one value against one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decode {
    /// Register name.
    pub register: String,
    /// Register width in bits.
    pub width: u32,
    /// The decoded value.
    pub value: u64,
    /// Overlapping field pairs recorded at parse time; non-empty means the
    /// per-field values below are ambiguous.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<(String, String)>,
    /// One entry per field, canonical order, zero values included.
    pub fields: Vec<DecodedField>,
}

/// One field touched by an XOR mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Field name.
    pub name: String,
    /// Most-significant bit of the field.
    pub bit_high: u32,
    /// Least-significant bit of the field.
    pub bit_low: u32,
    /// Changed bits in absolute register positions (`xor_mask & field_mask`).
    pub changed_mask: u64,
    /// Changed bits relative to the field's own low bit.
    pub rel: u64,
    /// Number of changed bits within the field.
    pub bits_changed: u32,
    /// Access class attached by enrichment, if any.
    pub access_class: AccessClass,
}

/// Result of diffing an XOR mask against one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    /// Register name.
    pub register: String,
    /// The XOR mask (before ^ after).
    pub xor_mask: u64,
    /// Overlapping field pairs recorded at parse time.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<(String, String)>,
    /// Fields with at least one changed bit, canonical order.
    pub changes: Vec<FieldChange>,
}

/// One field whose extracted value differs between two register values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldComparison {
    /// Field name.
    pub name: String,
    /// Most-significant bit of the field.
    pub bit_high: u32,
    /// Least-significant bit of the field.
    pub bit_low: u32,
    /// Field width in bits.
    pub width: u32,
    /// Raw value extracted from the first register value.
    pub value1: u64,
    /// Raw value extracted from the second register value.
    pub value2: u64,
    /// Access class attached by enrichment, if any.
    pub access_class: AccessClass,
}

/// Result of comparing two values against one register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compare {
    /// Register name.
    pub register: String,
    /// The first value.
    pub value1: u64,
    /// The second value.
    pub value2: u64,
    /// Overlapping field pairs recorded at parse time.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<(String, String)>,
    /// Fields whose extracted values differ, canonical order.
    pub differences: Vec<FieldComparison>,
}

/// Decodes `value` against the named register: one entry per field, in
/// canonical order, zero values included.
///
/// # Arguments
///
/// * `catalog` - The built (and optionally enriched) catalog.
/// * `name` - Register name, matched exactly.
/// * `value` - The concrete register value.
///
/// # Returns
///
/// The decoded fields, or [`Error::UnknownRegister`] if `name` is absent.
pub fn decode(catalog: &Catalog, name: &str, value: u64) -> Result<Decode, Error> {
    let register = lookup(catalog, name)?;
    let fields = register
        .fields
        .iter()
        .map(|f| DecodedField {
            name: f.name.clone(),
            bit_high: f.bit_high,
            bit_low: f.bit_low,
            width: f.width(),
            raw_value: f.extract_from(value),
            access_class: f.access_class,
            description: f.description.clone(),
        })
        .collect();
    Ok(Decode {
        register: register.name.clone(),
        width: register.width,
        value,
        overlaps: register.overlaps.clone(),
        fields,
    })
}

/// Reports the fields touched by `xor_mask` (before ^ after), in canonical order.
///
/// Fields with no changed bits are omitted; a zero mask yields an empty list.
///
/// # Arguments
///
/// * `catalog` - The built (and optionally enriched) catalog.
/// * `name` - Register name, matched exactly.
/// * `xor_mask` - Bitwise XOR of the before and after register values.
///
/// # Returns
///
/// The changed fields, or [`Error::UnknownRegister`] if `name` is absent.
pub fn diff(catalog: &Catalog, name: &str, xor_mask: u64) -> Result<Diff, Error> {
    let register = lookup(catalog, name)?;
    let changes = register
        .fields
        .iter()
        .filter_map(|f| {
            let changed_mask = xor_mask & f.mask();
            if changed_mask == 0 {
                return None;
            }
            let rel = changed_mask >> f.bit_low;
            Some(FieldChange {
                name: f.name.clone(),
                bit_high: f.bit_high,
                bit_low: f.bit_low,
                changed_mask,
                rel,
                bits_changed: rel.count_ones(),
                access_class: f.access_class,
            })
        })
        .collect();
    Ok(Diff {
        register: register.name.clone(),
        xor_mask,
        overlaps: register.overlaps.clone(),
        changes,
    })
}

/// Reports the fields whose extracted values differ between `value1` and
/// `value2`, in canonical order.
///
/// Agrees with [`diff`] on the set of reported field names when called with
/// `xor_mask = value1 ^ value2`.
///
/// # Arguments
///
/// * `catalog` - The built (and optionally enriched) catalog.
/// * `name` - Register name, matched exactly.
/// * `value1` - The first register value.
/// * `value2` - The second register value.
///
/// # Returns
///
/// The differing fields, or [`Error::UnknownRegister`] if `name` is absent.
pub fn compare(catalog: &Catalog, name: &str, value1: u64, value2: u64) -> Result<Compare, Error> {
    let register = lookup(catalog, name)?;
    let differences = register
        .fields
        .iter()
        .filter_map(|f| {
            let v1 = f.extract_from(value1);
            let v2 = f.extract_from(value2);
            if v1 == v2 {
                return None;
            }
            Some(FieldComparison {
                name: f.name.clone(),
                bit_high: f.bit_high,
                bit_low: f.bit_low,
                width: f.width(),
                value1: v1,
                value2: v2,
                access_class: f.access_class,
            })
        })
        .collect();
    Ok(Compare {
        register: register.name.clone(),
        value1,
        value2,
        overlaps: register.overlaps.clone(),
        differences,
    })
}

/// Exact-name register lookup, mapped to the operation-level error.
fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Register, Error> {
    catalog.get(name).ok_or_else(|| Error::UnknownRegister {
        name: name.to_owned(),
        known: catalog.len(),
    })
}
