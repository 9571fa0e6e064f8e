#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! JSON-file persistence for imported CRICOS records.
//!
//! Imported institutions and directory contacts are kept as pretty-printed
//! JSON arrays under a data directory, one file per record kind. This is
//! deliberately simple: the importer's consumers read the files directly.

use std::fs;
use std::path::{Path, PathBuf};

use cricos_models::{Contact, Institution};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const INSTITUTIONS_FILE: &str = "institutions.json";
const CONTACTS_FILE: &str = "contacts.json";

/// A JSON-file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the institutions file, creating the data directory if
    /// needed. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the
    /// file cannot be written.
    pub fn save_institutions(&self, institutions: &[Institution]) -> Result<PathBuf, StoreError> {
        self.save(INSTITUTIONS_FILE, institutions)
    }

    /// Reads the institutions file. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_institutions(&self) -> Result<Vec<Institution>, StoreError> {
        self.load(INSTITUTIONS_FILE)
    }

    /// Writes the directory contacts file. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created or the
    /// file cannot be written.
    pub fn save_contacts(&self, contacts: &[Contact]) -> Result<PathBuf, StoreError> {
        self.save(CONTACTS_FILE, contacts)
    }

    /// Reads the directory contacts file. A missing file is an empty
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.load(CONTACTS_FILE)
    }

    fn save<T: Serialize>(&self, file: &str, records: &[T]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        fs::write(&path, serde_json::to_string_pretty(records)?)?;
        log::info!("wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(file);
        if !Path::new(&path).exists() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "cricos_store_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonFileStore::new(dir)
    }

    fn sample_institution() -> Institution {
        Institution {
            provider_id: 1,
            provider_code: Some("00873F".to_owned()),
            trading_name: None,
            name: Some("Australian Catholic University Limited".to_owned()),
            institution_type: Some("Government".to_owned()),
            total_capacity: Some(50),
            website: Some("www.acu.edu.au".to_owned()),
            postal_address: Some("PO Box 968\nNORTH SYDNEY".to_owned()),
            locations: None,
            contact_officers: Vec::new(),
        }
    }

    #[test]
    fn round_trips_institutions() {
        let store = temp_store("institutions");
        let records = vec![sample_institution()];

        store.save_institutions(&records).unwrap();
        assert_eq!(store.load_institutions().unwrap(), records);
    }

    #[test]
    fn missing_file_loads_empty() {
        let store = temp_store("empty");
        assert!(store.load_institutions().unwrap().is_empty());
        assert!(store.load_contacts().unwrap().is_empty());
    }
}
