//! Append-only CSV registration store.
//!
//! File layout: a fixed header row followed by one row per record.
//! The file is created with its header on the first successful insert
//! and existing rows are never rewritten.
//!
//! `add` holds an in-process lock across the duplicate check and the
//! append. There is no cross-process locking: two processes writing the
//! same file can race between the check and the append.

use crate::error::{RegistrationError, RegistrationResult};
use crate::types::{timestamp, StoredRecord, ValidRecord, CSV_HEADER};
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Default location of the registrations file.
pub const DEFAULT_STORE_PATH: &str = "user_registrations.csv";

/// One CSV row, keyed by the file's column names.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Date_of_Birth")]
    date_of_birth: NaiveDate,
    #[serde(rename = "Registration_Date", with = "timestamp")]
    registered_at: NaiveDateTime,
}

impl From<&StoredRecord> for CsvRow {
    fn from(record: &StoredRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            date_of_birth: record.date_of_birth,
            registered_at: record.registered_at,
        }
    }
}

impl From<CsvRow> for StoredRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            name: row.name,
            email: row.email,
            date_of_birth: row.date_of_birth,
            registered_at: row.registered_at,
        }
    }
}

/// Registration store backed by a CSV file.
pub struct RegistrationStore {
    path: PathBuf,
    /// Last timestamp handed out; also serializes writers in this process.
    last_issued: Mutex<Option<NaiveDateTime>>,
}

impl RegistrationStore {
    /// Create a store for the given file. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_issued: Mutex::new(None),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Insert a record unless its email is already stored.
    ///
    /// Returns the stored record with its registration timestamp.
    pub fn add(&self, record: ValidRecord) -> RegistrationResult<StoredRecord> {
        let mut last_issued = self
            .last_issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.email_exists(record.email().as_str())? {
            warn!(email = %record.email(), "Attempted duplicate registration");
            return Err(RegistrationError::DuplicateEmail(record.email().to_string()));
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if needs_header {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let registered_at = next_timestamp(&mut last_issued);
        let stored = StoredRecord::from_valid(record, registered_at);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)?;
        if !needs_header && !ends_with_newline(&mut file)? {
            // Terminate the last row so the new one does not run into it
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(CsvRow::from(&stored))?;
        writer.flush()?;

        if needs_header {
            info!(path = ?self.path, "Created registrations file");
        }
        info!(email = %stored.email, "Registration stored");

        Ok(stored)
    }

    /// Read every record in file order.
    ///
    /// A missing or empty file yields an empty list.
    pub fn list_all(&self) -> RegistrationResult<Vec<StoredRecord>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "Registrations file not found, nothing stored yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().eq(CSV_HEADER) {
            return Err(RegistrationError::StorageUnavailable(format!(
                "unexpected header in {}: {:?}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>()
            )));
        }

        let records = reader
            .deserialize::<CsvRow>()
            .map(|row| row.map(StoredRecord::from))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Loaded registrations");
        Ok(records)
    }

    /// Records whose name or email contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> RegistrationResult<Vec<StoredRecord>> {
        let query = query.trim().to_lowercase();

        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&query) || r.email.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// Check if an email is already registered, case-insensitively.
    pub fn email_exists(&self, email: &str) -> RegistrationResult<bool> {
        let email = email.trim().to_lowercase();

        Ok(self
            .list_all()?
            .iter()
            .any(|r| r.email.to_lowercase() == email))
    }

    /// Number of stored records.
    pub fn count(&self) -> RegistrationResult<usize> {
        Ok(self.list_all()?.len())
    }
}

/// Whether a non-empty file's last byte is a line break.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Current local time at second precision, never earlier than the last one issued.
fn next_timestamp(last_issued: &mut Option<NaiveDateTime>) -> NaiveDateTime {
    let now = Local::now().naive_local().trunc_subsecs(0);
    let ts = match *last_issued {
        Some(prev) if prev > now => prev,
        _ => now,
    };
    *last_issued = Some(ts);
    ts
}
