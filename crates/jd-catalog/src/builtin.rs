use jd_core::{Catalog, JabdoriError};

use crate::compile_catalog_from_json;

pub const BUILTIN_CATALOG_PATH: &str = "builtin/zero.catalog.json";

const BUILTIN_CATALOG_JSON: &str = include_str!("../builtin/zero.catalog.json");

pub fn builtin_catalog() -> Result<Catalog, JabdoriError> {
    compile_catalog_from_json(BUILTIN_CATALOG_PATH, BUILTIN_CATALOG_JSON)
}
