//! Access-class enrichment from an extension-organized configuration source.
//!
//! The access source has a different shape from the definition files: it is
//! organized by ISA extension, not by register. Each extension maps to a list
//! of field descriptors naming a register, a field, an access-class tag, and
//! optionally the legal values for that field. This module performs:
//! 1. **Loading:** Parsing the YAML/JSON access file into typed entries.
//! 2. **Overlay:** Matching entries onto catalog fields by exact name and
//!    attaching the access class and legal values.
//! 3. **Metrics:** Counting loaded, enriched, and unmatched entries so schema
//!    drift between the two sources is observable, never fatal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::error::Error;
use crate::model::{AccessClass, Catalog};

/// Tie-break rule when the access source declares the same field more than once.
///
/// Legitimate sources may override base definitions with extension-specific
/// refinements, so the default favors the later declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The later declaration wins (default).
    #[default]
    LastWins,
    /// The first declaration sticks; later ones for the same field are ignored.
    FirstWins,
}

/// One field descriptor from the access source.
#[derive(Debug, Clone, Deserialize)]
struct AccessEntry {
    /// Register name, matched case-sensitively against the catalog.
    csr: String,
    /// Field name, matched case-sensitively within the register.
    field: String,
    /// Access-class tag, e.g. `warl` or `ro_constant`.
    #[serde(alias = "type")]
    access: String,
    /// Explicit enumeration of legal raw values, when the source supplies one.
    #[serde(default)]
    legal: Option<Vec<u64>>,
}

/// Counters reported by [`enrich_catalog`]; observability, not a correctness gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    /// Total field descriptors found in the access source.
    pub loaded: usize,
    /// Descriptors applied to a matching catalog field.
    pub enriched: usize,
    /// `register.field` names with no catalog counterpart (schema drift).
    pub unmatched: Vec<String>,
}

/// Overlays access-class metadata from `access_path` onto `catalog`.
///
/// Matching is exact and case-sensitive on register then field name. Entries
/// without a catalog counterpart are counted in the report; catalog fields the
/// source never mentions keep [`AccessClass::Unspecified`]. Extensions are
/// visited in document order so [`ConflictPolicy::LastWins`] reflects the
/// source's own ordering.
///
/// # Arguments
///
/// * `catalog` - The catalog to enrich in place.
/// * `access_path` - YAML or JSON access-configuration file.
/// * `policy` - Tie-break rule for repeated declarations of one field.
///
/// # Returns
///
/// Enrichment metrics; failure only when the file itself cannot be read or parsed.
pub fn enrich_catalog(
    catalog: &mut Catalog,
    access_path: &Path,
    policy: ConflictPolicy,
) -> Result<EnrichReport, Error> {
    let doc = load_access_document(access_path)?;
    let mut report = EnrichReport::default();

    let Value::Mapping(extensions) = doc else {
        warn!(
            "access source '{}' is not a mapping of extensions; nothing to apply",
            access_path.display()
        );
        return Ok(report);
    };

    for (extension, entries) in &extensions {
        let extension = extension.as_str().unwrap_or("<non-string>");
        let entries: Vec<AccessEntry> = match serde_yaml::from_value(entries.clone()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("access source: skipping extension '{extension}': {e}");
                continue;
            }
        };

        for entry in entries {
            report.loaded += 1;
            apply_entry(catalog, extension, &entry, policy, &mut report);
        }
    }

    debug!(
        "access enrichment: {} of {} entries applied, {} unmatched",
        report.enriched,
        report.loaded,
        report.unmatched.len()
    );
    Ok(report)
}

/// Applies one descriptor to the catalog, updating the report.
fn apply_entry(
    catalog: &mut Catalog,
    extension: &str,
    entry: &AccessEntry,
    policy: ConflictPolicy,
    report: &mut EnrichReport,
) {
    let qualified = format!("{}.{}", entry.csr, entry.field);

    let Some(class) = AccessClass::parse_tag(&entry.access) else {
        warn!(
            "access source [{extension}]: unknown access class '{}' for {qualified}",
            entry.access
        );
        report.unmatched.push(qualified);
        return;
    };

    let field = catalog
        .get_mut(&entry.csr)
        .and_then(|register| register.field_mut(&entry.field));
    let Some(field) = field else {
        report.unmatched.push(qualified);
        return;
    };

    if policy == ConflictPolicy::FirstWins && !field.access_class.is_unspecified() {
        debug!("access source [{extension}]: keeping earlier class for {qualified}");
        return;
    }

    field.access_class = class;
    if entry.legal.is_some() {
        field.legal_values.clone_from(&entry.legal);
    }
    report.enriched += 1;
}

/// Reads and parses the access file; JSON by extension, YAML otherwise.
fn load_access_document(path: &Path) -> Result<Value, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;
        serde_yaml::to_value(json).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
