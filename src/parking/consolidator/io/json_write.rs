use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;

/// Serializes `value` as pretty UTF-8 JSON and moves it into place only once
/// fully written, so a failed run never leaves a truncated file at `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json_string = serde_json::to_string_pretty(value)?;
    let staging = staging_path(path);
    if let Err(error) = fs::write(&staging, &json_string) {
        let _ = fs::remove_file(&staging);
        return Err(error.into());
    }
    fs::rename(&staging, path)?;
    debug!(bytes = json_string.len(), "output written");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_pretty_json_without_leftovers() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("out.json");

        write_json(&path, &serde_json::json!({"name": "Подземен"})).expect("JSON written");

        let written = fs::read_to_string(&path).expect("output read");
        assert!(written.contains("\"name\": \"Подземен\""));
        assert!(!dir.path().join("out.json.partial").exists());
    }
}
