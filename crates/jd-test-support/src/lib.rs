use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn catalogs_root() -> PathBuf {
    workspace_root().join("catalogs")
}

pub fn catalog_dir(name: &str) -> PathBuf {
    catalogs_root().join(name)
}
