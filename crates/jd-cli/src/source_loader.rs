use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jd_catalog::{builtin_catalog, compile_catalog_from_json_map};
use jd_core::JabdoriError;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    map_cli_source_path, map_cli_source_read, map_cli_source_scan, LoadedCatalog,
    BUILTIN_CATALOG_ID,
};

const CATALOG_FILE_SUFFIX: &str = ".catalog.json";

/// The built-in catalog unless a catalog directory was given.
pub(crate) fn load_catalog(catalog_dir: Option<&str>) -> Result<LoadedCatalog, JabdoriError> {
    match catalog_dir {
        Some(catalog_dir) => load_catalog_by_dir(catalog_dir),
        None => Ok(LoadedCatalog {
            id: BUILTIN_CATALOG_ID.to_string(),
            catalog: builtin_catalog()?,
        }),
    }
}

pub(crate) fn load_catalog_by_dir(catalog_dir: &str) -> Result<LoadedCatalog, JabdoriError> {
    let catalog_root = resolve_catalog_dir(catalog_dir)?;
    let json_by_path = read_catalog_json_from_dir(&catalog_root)?;
    debug!(
        dir = %catalog_root.display(),
        files = json_by_path.len(),
        "loading catalog directory"
    );
    let catalog = compile_catalog_from_json_map(&json_by_path)?;

    Ok(LoadedCatalog {
        id: make_catalog_dir_id(&catalog_root),
        catalog,
    })
}

pub(crate) fn resolve_catalog_dir(catalog_dir: &str) -> Result<PathBuf, JabdoriError> {
    let path = PathBuf::from(catalog_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(JabdoriError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("catalog-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(JabdoriError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("catalog-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

/// Collects every `*.catalog.json` below `catalog_dir`, keyed by its
/// slash-separated relative path.
pub(crate) fn read_catalog_json_from_dir(
    catalog_dir: &Path,
) -> Result<BTreeMap<String, String>, JabdoriError> {
    let mut documents = BTreeMap::new();

    for entry in WalkDir::new(catalog_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(CATALOG_FILE_SUFFIX) {
            continue;
        }

        let relative = path
            .strip_prefix(catalog_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
        documents.insert(relative, content);
    }

    if documents.is_empty() {
        return Err(JabdoriError::new(
            "CLI_SOURCE_EMPTY",
            format!(
                "No {} files under {}",
                CATALOG_FILE_SUFFIX,
                catalog_dir.display()
            ),
        ));
    }

    Ok(documents)
}

pub(crate) fn make_catalog_dir_id(catalog_dir: &Path) -> String {
    format!("catalog-dir:{}", catalog_dir.display())
}
