use std::collections::BTreeMap;

use jd_core::{Catalog, JabdoriError};

mod builtin;
mod check;
mod document;

pub use builtin::{builtin_catalog, BUILTIN_CATALOG_PATH};
pub use check::{check_catalog, CatalogIssue};
pub use document::{compile_catalog_from_json_map, CatalogDocument, UiTextDocument};

/// Compiles a single JSON document, e.g. one read from stdin or embedded.
pub fn compile_catalog_from_json(path: &str, source: &str) -> Result<Catalog, JabdoriError> {
    let mut json_by_path = BTreeMap::new();
    json_by_path.insert(path.to_string(), source.to_string());
    compile_catalog_from_json_map(&json_by_path)
}
