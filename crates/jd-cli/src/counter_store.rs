use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jd_core::JabdoriError;
use jd_runtime::{parse_counter, CounterStore};
use serde_json::Value;
use tracing::warn;

use crate::{map_cli_store_encode, map_cli_store_read, map_cli_store_write};

/// Rotation counters persisted as one flat JSON object of base-10 strings.
///
/// The file is rewritten on every `set`, so counters survive restarts. A
/// missing file is an empty store; an unreadable one is treated the same way
/// and overwritten on the next write.
#[derive(Debug)]
pub(crate) struct FileCounterStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl FileCounterStore {
    pub(crate) fn open(path: &Path) -> Result<Self, JabdoriError> {
        let values = if path.exists() {
            let raw = fs::read_to_string(path).map_err(map_cli_store_read)?;
            match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
                Ok(values) => values,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "counter store is not a JSON object; starting empty"
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn save(&self) -> Result<(), JabdoriError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(map_cli_store_write)?;

        let payload = serde_json::to_string_pretty(&self.values).map_err(map_cli_store_encode)?;
        fs::write(&self.path, payload).map_err(map_cli_store_write)
    }
}

impl CounterStore for FileCounterStore {
    fn get(&self, key: &str) -> u64 {
        match self.values.get(key) {
            Some(Value::String(raw)) => parse_counter(raw),
            Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
            _ => 0,
        }
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), JabdoriError> {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
        self.save()
    }
}
