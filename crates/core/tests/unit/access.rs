//! # Access-Class Enrichment Tests
//!
//! Verifies the overlay of access semantics onto a built catalog: exact-name
//! matching, legal-value attachment, conflict policies, and the metrics that
//! make schema drift observable without ever failing the run.

use csrdec_core::access::{ConflictPolicy, enrich_catalog};
use csrdec_core::model::AccessClass;
use pretty_assertions::assert_eq;

use crate::common::{catalog_of, mstatus, write_access_file};

const ACCESS_YAML: &str = r"
Sm:
  - csr: mstatus
    field: FS
    access: warl
    legal: [0, 1, 2, 3]
  - csr: mstatus
    field: SD
    access: ro_variable
";

/// Matching entries set the access class and legal values; untouched fields
/// stay unspecified.
#[test]
fn enriches_matching_fields() {
    let mut catalog = catalog_of(vec![mstatus()]);
    let (_dir, path) = write_access_file("access.yaml", ACCESS_YAML);

    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.enriched, 2);
    assert!(report.unmatched.is_empty());

    let reg = catalog.get("mstatus").unwrap();
    let fs = reg.field("FS").unwrap();
    assert_eq!(fs.access_class, AccessClass::Warl);
    assert_eq!(fs.legal_values.as_deref(), Some(&[0, 1, 2, 3][..]));

    let sd = reg.field("SD").unwrap();
    assert_eq!(sd.access_class, AccessClass::RoVariable);
    assert_eq!(sd.legal_values, None);

    assert_eq!(
        reg.field("MIE").unwrap().access_class,
        AccessClass::Unspecified
    );
}

/// Later declarations win by default; `FirstWins` inverts the tie-break.
#[test]
fn conflict_policies() {
    let conflicting = r"
base:
  - csr: mstatus
    field: FS
    access: warl
refinement:
  - csr: mstatus
    field: FS
    access: wlrl
";
    let (_dir, path) = write_access_file("access.yaml", conflicting);

    let mut catalog = catalog_of(vec![mstatus()]);
    let _ = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();
    assert_eq!(
        catalog.get("mstatus").unwrap().field("FS").unwrap().access_class,
        AccessClass::Wlrl
    );

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::FirstWins).unwrap();
    assert_eq!(
        catalog.get("mstatus").unwrap().field("FS").unwrap().access_class,
        AccessClass::Warl
    );
    // The ignored refinement is neither enriched nor unmatched.
    assert_eq!(report.loaded, 2);
    assert_eq!(report.enriched, 1);
    assert!(report.unmatched.is_empty());
}

/// Entries without a catalog counterpart are counted, not fatal.
#[test]
fn unmatched_entries_are_counted() {
    let drifted = r"
Sm:
  - csr: mstatus
    field: NO_SUCH_FIELD
    access: warl
  - csr: no_such_register
    field: SD
    access: warl
  - csr: mstatus
    field: MIE
    access: warl
";
    let (_dir, path) = write_access_file("access.yaml", drifted);

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.loaded, 3);
    assert_eq!(report.enriched, 1);
    assert_eq!(
        report.unmatched,
        vec![
            "mstatus.NO_SUCH_FIELD".to_string(),
            "no_such_register.SD".to_string(),
        ]
    );
}

/// Zero matches leave every field unspecified and report `enriched = 0`
/// without raising.
#[test]
fn zero_matches_is_not_an_error() {
    let unrelated = r"
Zicsr:
  - csr: fflags
    field: NX
    access: warl
";
    let (_dir, path) = write_access_file("access.yaml", unrelated);

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.enriched, 0);
    assert_eq!(report.loaded, 1);
    for field in &catalog.get("mstatus").unwrap().fields {
        assert_eq!(field.access_class, AccessClass::Unspecified);
    }
}

/// Matching is case-sensitive: `fs` does not match `FS`.
#[test]
fn matching_is_case_sensitive() {
    let lowercase = r"
Sm:
  - csr: mstatus
    field: fs
    access: warl
";
    let (_dir, path) = write_access_file("access.yaml", lowercase);

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.enriched, 0);
    assert_eq!(report.unmatched, vec!["mstatus.fs".to_string()]);
}

/// An unknown access-class tag skips the entry and counts it as unmatched.
#[test]
fn unknown_tag_is_unmatched() {
    let bad_tag = r"
Sm:
  - csr: mstatus
    field: SD
    access: read-mostly
";
    let (_dir, path) = write_access_file("access.yaml", bad_tag);

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.enriched, 0);
    assert_eq!(report.unmatched, vec!["mstatus.SD".to_string()]);
    assert_eq!(
        catalog.get("mstatus").unwrap().field("SD").unwrap().access_class,
        AccessClass::Unspecified
    );
}

/// Tags are case-insensitive and the `type` key is accepted as a synonym.
#[test]
fn json_source_with_type_key() {
    let json = r#"{
  "Sm": [
    { "csr": "mstatus", "field": "SD", "type": "WARL" }
  ]
}"#;
    let (_dir, path) = write_access_file("access.json", json);

    let mut catalog = catalog_of(vec![mstatus()]);
    let report = enrich_catalog(&mut catalog, &path, ConflictPolicy::LastWins).unwrap();

    assert_eq!(report.enriched, 1);
    assert_eq!(
        catalog.get("mstatus").unwrap().field("SD").unwrap().access_class,
        AccessClass::Warl
    );
}

/// A missing access file is fatal for the enrichment call.
#[test]
fn missing_access_file_is_fatal() {
    let mut catalog = catalog_of(vec![mstatus()]);
    let result = enrich_catalog(
        &mut catalog,
        std::path::Path::new("/nonexistent/access.yaml"),
        ConflictPolicy::LastWins,
    );
    assert!(result.is_err());
}
