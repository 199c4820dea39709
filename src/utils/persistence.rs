//! Small JSON file helpers shared by the console config and the local store.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ConfigError;

use super::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// Writes `value` as pretty JSON next to `path`, then renames it into place.
pub fn save_json_atomic<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a JSON document, returning `None` when the file does not exist.
pub fn load_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn missing_files_load_as_none() {
        let temp = TempDir::new().expect("temp dir");
        let loaded: Option<BTreeMap<String, String>> =
            load_json_opt(&temp.path().join("absent.json")).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn atomic_save_leaves_no_staging_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("key".to_string(), "value".to_string());

        save_json_atomic(&doc, &path).expect("save");

        assert!(!tmp_path(&path).exists());
        let loaded: Option<BTreeMap<String, String>> = load_json_opt(&path).expect("load");
        assert_eq!(loaded, Some(doc));
    }
}
