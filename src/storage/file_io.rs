//! JSON table files
//!
//! Each repository keeps one pretty-printed JSON document on disk. Saves go
//! through a sibling `.tmp` file that is synced and renamed over the table.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::MedstockError;

fn table_error(action: &str, path: &Path, e: impl std::fmt::Display) -> MedstockError {
    MedstockError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load a table, or its default when the file has not been written yet
pub fn read_json<T, P>(path: P) -> Result<T, MedstockError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(table_error("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| table_error("parse", path, e))
}

/// Replace a table on disk
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), MedstockError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| table_error("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path).map_err(|e| table_error("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|e| table_error("serialize", path, e))?;
    writer.flush().map_err(|e| table_error("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| table_error("sync", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(table_error("replace", path, e));
    }
    Ok(())
}
