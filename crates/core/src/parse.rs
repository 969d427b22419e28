//! Schema-tolerant register-definition parser.
//!
//! This module turns a directory of loosely structured YAML/JSON definition
//! files (one register per file, riscv-unified-db style) into a canonical
//! [`Catalog`]. It performs:
//! 1. **Enumeration:** Scanning the directory for recognized extensions, in
//!    sorted filename order so catalog order is deterministic.
//! 2. **Normalization:** Mapping recognized key synonyms and bit-range
//!    notations onto the canonical `Field`/`Register` attributes.
//! 3. **Validation:** Recording overlapping or out-of-range fields as warnings
//!    without merging, truncating, or dropping register definitions.
//!
//! Files that do not resemble a register definition are skipped with a
//! [`Warning::SchemaSkip`]; a single malformed file never aborts the scan.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::warn;

use crate::bits;
use crate::error::{Error, Warning};
use crate::model::{Catalog, DEFAULT_WIDTH, Field, Register};

/// Recognized file extensions for definition files.
const EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Key synonyms resolving to the register name.
pub const NAME_KEYS: &[&str] = &["name", "register", "csr", "reg"];

/// Key synonyms resolving to the register width.
pub const WIDTH_KEYS: &[&str] = &["length", "width", "size", "bits"];

/// Key synonyms resolving to the field table.
pub const FIELD_TABLE_KEYS: &[&str] = &["fields", "bitfields"];

/// Key synonyms resolving to a field's bit location, in preference order.
///
/// `location_rv64` is preferred over `location_rv32` since decoding operates
/// on 64-bit values.
pub const LOCATION_KEYS: &[&str] = &[
    "location",
    "location_rv64",
    "location_rv32",
    "bits",
    "range",
    "position",
];

/// Key synonyms resolving to a description string.
pub const DESCRIPTION_KEYS: &[&str] = &["description", "desc"];

/// Key synonyms resolving to a field's reset value.
pub const RESET_KEYS: &[&str] = &["reset_value", "reset"];

/// Builds a catalog from every recognized definition file under `spec_dir`.
///
/// Files are visited in sorted filename order. Files that cannot be read,
/// parsed, or recognized as register definitions produce warnings, not errors;
/// only an unreadable directory is fatal.
///
/// # Arguments
///
/// * `spec_dir` - Directory containing `*.yml` / `*.yaml` / `*.json` definition files.
///
/// # Returns
///
/// The catalog plus every non-fatal warning encountered during the scan.
pub fn build_catalog(spec_dir: &Path) -> Result<(Catalog, Vec<Warning>), Error> {
    let entries = fs::read_dir(spec_dir).map_err(|source| Error::Io {
        path: spec_dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| EXTENSIONS.contains(&ext))
        })
        .collect();
    paths.sort();

    let mut catalog = Catalog::new();
    let mut warnings = Vec::new();

    for path in paths {
        match load_document(&path) {
            Ok(doc) => {
                if let Some(register) = parse_register(&path, &doc, &mut warnings) {
                    catalog.insert(register);
                }
            }
            Err(reason) => push_warning(
                &mut warnings,
                Warning::SchemaSkip {
                    path: path.display().to_string(),
                    reason,
                },
            ),
        }
    }

    Ok((catalog, warnings))
}

/// Reads and parses one definition file into a YAML value.
///
/// JSON files go through `serde_json` first so JSON-specific diagnostics stay
/// accurate, then convert into the common YAML value representation.
fn load_document(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("unreadable: {e}"))?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {e}"))?;
        serde_yaml::to_value(json).map_err(|e| format!("invalid JSON document: {e}"))
    } else {
        serde_yaml::from_str(&text).map_err(|e| format!("invalid YAML: {e}"))
    }
}

/// Converts one parsed document into a register, or records why it was skipped.
fn parse_register(path: &Path, doc: &Value, warnings: &mut Vec<Warning>) -> Option<Register> {
    let skip = |warnings: &mut Vec<Warning>, reason: &str| {
        push_warning(
            warnings,
            Warning::SchemaSkip {
                path: path.display().to_string(),
                reason: reason.to_string(),
            },
        );
        None
    };

    let Value::Mapping(map) = doc else {
        return skip(warnings, "top level is not a mapping");
    };

    // unified-db convention: an explicit non-CSR kind is authoritative.
    if let Some(kind) = lookup(map, &["kind"]).and_then(as_string)
        && kind != "csr"
    {
        return skip(warnings, &format!("kind is '{kind}', not 'csr'"));
    }
    let declares_kind = lookup(map, &["kind"]).is_some();

    let name = lookup(map, NAME_KEYS).and_then(as_string);
    let field_table = lookup(map, FIELD_TABLE_KEYS).and_then(Value::as_mapping);

    // A document is register-like when it declares `kind: csr`, or failing
    // that, carries both a resolvable name and a field table.
    if !declares_kind && (name.is_none() || field_table.is_none()) {
        return skip(warnings, "missing both register name and field table");
    }
    let Some(name) = name else {
        return skip(warnings, "no resolvable register name");
    };

    let width = lookup(map, WIDTH_KEYS)
        .and_then(as_u64)
        .map_or(DEFAULT_WIDTH, |w| w as u32);

    let mut register = Register {
        name: name.clone(),
        long_name: lookup(map, &["long_name"])
            .and_then(as_string)
            .unwrap_or_default(),
        width,
        description: lookup(map, DESCRIPTION_KEYS)
            .and_then(as_string)
            .map(collapse_whitespace)
            .unwrap_or_default(),
        fields: Vec::new(),
        overlaps: Vec::new(),
    };

    if let Some(table) = field_table {
        for (key, data) in table {
            let Some(field_name) = as_string(key) else {
                continue;
            };
            match parse_field(&field_name, data) {
                Ok(field) => {
                    if field.bit_high >= register.width {
                        push_warning(
                            warnings,
                            Warning::WidthExceeded {
                                register: name.clone(),
                                field: field_name,
                                bit_high: field.bit_high,
                                width: register.width,
                            },
                        );
                    }
                    register.fields.push(field);
                }
                Err(reason) => push_warning(
                    warnings,
                    Warning::FieldSkip {
                        register: name.clone(),
                        field: field_name,
                        reason,
                    },
                ),
            }
        }
    }

    // Canonical order: most-significant field first.
    register
        .fields
        .sort_by(|a, b| b.bit_high.cmp(&a.bit_high).then(b.bit_low.cmp(&a.bit_low)));

    for i in 0..register.fields.len() {
        for j in (i + 1)..register.fields.len() {
            if register.fields[i].overlaps(&register.fields[j]) {
                let pair = (
                    register.fields[i].name.clone(),
                    register.fields[j].name.clone(),
                );
                push_warning(
                    warnings,
                    Warning::Overlap {
                        register: name.clone(),
                        first: pair.0.clone(),
                        second: pair.1.clone(),
                    },
                );
                register.overlaps.push(pair);
            }
        }
    }

    Some(register)
}

/// Converts one field entry into a [`Field`], normalizing its bit location.
fn parse_field(name: &str, data: &Value) -> Result<Field, String> {
    let Value::Mapping(map) = data else {
        return Err("field entry is not a mapping".to_string());
    };

    let location = lookup(map, LOCATION_KEYS).ok_or("no bit location")?;
    let (bit_high, bit_low) = parse_location(location)?;
    if bit_high > bits::MAX_BIT {
        return Err(format!("bit {bit_high} is beyond bit {}", bits::MAX_BIT));
    }

    let mut field = Field::new(name, bit_high, bit_low);
    field.description = lookup(map, DESCRIPTION_KEYS)
        .and_then(as_string)
        .map(collapse_whitespace)
        .unwrap_or_default();
    field.alias = lookup(map, &["alias"])
        .and_then(as_string)
        .filter(|a| !a.is_empty());
    field.reset_value = lookup(map, RESET_KEYS).and_then(as_u64);
    Ok(field)
}

/// Normalizes any accepted bit-location notation to `(bit_high, bit_low)`.
///
/// Accepted forms: a bare integer (single bit), `"63:60"` / `"63..60"` /
/// `"63-60"` / `"7"`, a two-element sequence `[63, 60]`, and mappings such as
/// `{msb: 63, lsb: 60}`, `{hi: 63, lo: 60}`, or `{from: 60, to: 63}`. Either
/// endpoint order is tolerated; the larger endpoint becomes `bit_high`.
pub fn parse_location(value: &Value) -> Result<(u32, u32), String> {
    match value {
        Value::Number(_) => {
            let bit = as_u64(value).ok_or("bit index is not a non-negative integer")? as u32;
            Ok((bit, bit))
        }
        Value::String(s) => parse_location_str(s),
        Value::Sequence(seq) if seq.len() >= 2 => {
            let a = as_u64(&seq[0]).ok_or("range endpoint is not an integer")? as u32;
            let b = as_u64(&seq[1]).ok_or("range endpoint is not an integer")? as u32;
            Ok(ordered(a, b))
        }
        Value::Mapping(map) => {
            let high = lookup(map, &["msb", "hi", "high", "from"]).and_then(as_u64);
            let low = lookup(map, &["lsb", "lo", "low", "to"]).and_then(as_u64);
            match (high, low) {
                (Some(a), Some(b)) => Ok(ordered(a as u32, b as u32)),
                _ => Err(format!("unrecognized location mapping: {map:?}")),
            }
        }
        other => Err(format!("unrecognized location value: {other:?}")),
    }
}

/// Parses textual ranges: `"63:60"`, `"63..60"`, `"63-60"`, or a single `"7"`.
fn parse_location_str(s: &str) -> Result<(u32, u32), String> {
    let s = s.trim();
    for sep in ["..", ":", "-"] {
        if let Some((a, b)) = s.split_once(sep) {
            let a: u32 = a
                .trim()
                .parse()
                .map_err(|_| format!("bad range endpoint in '{s}'"))?;
            let b: u32 = b
                .trim()
                .parse()
                .map_err(|_| format!("bad range endpoint in '{s}'"))?;
            return Ok(ordered(a, b));
        }
    }
    s.parse::<u32>()
        .map(|bit| (bit, bit))
        .map_err(|_| format!("unrecognized range notation: '{s}'"))
}

const fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a >= b { (a, b) } else { (b, a) }
}

/// Finds the first of `keys` present in `map`, by exact string match.
fn lookup<'a>(map: &'a serde_yaml::Mapping, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|&key| map.get(&Value::String(key.to_owned())))
}

/// String view of a scalar value; numbers render in decimal.
fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Unsigned view of a scalar value; numeric strings are accepted too.
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            s.strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
        }
        _ => None,
    }
}

/// Collapses newlines and repeated whitespace into single spaces.
fn collapse_whitespace(s: String) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Records a warning and mirrors it to the log.
fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{warning}");
    warnings.push(warning);
}
