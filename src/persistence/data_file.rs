//! Checksummed data files.
//!
//! Layout: `payload & checksum`, where the checksum is the decimal
//! `FxHasher` hash of the payload bytes. The checksum never contains `&`,
//! so the last `&` in the file always separates the two, even for binary
//! payloads.

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PersistenceError;

const CHECKSUM_SEPARATOR: u8 = b'&';

/// Payload encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFileFormat {
    /// Pretty-printed JSON. Readable; used while debugging.
    #[default]
    Json,
    /// bincode.
    Binary,
}

impl DataFileFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            DataFileFormat::Json => "json",
            DataFileFormat::Binary => "bin",
        }
    }

    /// Infer the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(DataFileFormat::Json),
            "bin" => Some(DataFileFormat::Binary),
            _ => None,
        }
    }
}

/// Checksum of a payload.
#[must_use]
pub fn checksum(payload: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(payload);
    hasher.finish()
}

/// Serialize `value` and append the checksum trailer.
pub fn encode<T: Serialize>(
    value: &T,
    format: DataFileFormat,
) -> Result<Vec<u8>, PersistenceError> {
    let mut bytes = match format {
        DataFileFormat::Json => serde_json::to_vec_pretty(value)?,
        DataFileFormat::Binary => bincode::serialize(value)?,
    };
    let sum = checksum(&bytes);
    bytes.push(CHECKSUM_SEPARATOR);
    bytes.extend_from_slice(sum.to_string().as_bytes());
    Ok(bytes)
}

/// Split off and optionally verify the checksum trailer, then deserialize.
pub fn decode<T: DeserializeOwned>(
    bytes: &[u8],
    format: DataFileFormat,
    path: &Path,
    verify_checksum: bool,
) -> Result<T, PersistenceError> {
    let separator = bytes
        .iter()
        .rposition(|&byte| byte == CHECKSUM_SEPARATOR)
        .ok_or_else(|| PersistenceError::MissingChecksum {
            path: path.to_path_buf(),
        })?;
    let (payload, trailer) = (&bytes[..separator], &bytes[separator + 1..]);

    if verify_checksum {
        let expected = checksum(payload);
        let found = String::from_utf8_lossy(trailer).trim().to_string();
        if found.parse::<u64>().ok() != Some(expected) {
            return Err(PersistenceError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected,
                found,
            });
        }
    }

    Ok(match format {
        DataFileFormat::Json => serde_json::from_slice(payload)?,
        DataFileFormat::Binary => bincode::deserialize(payload)?,
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `value` to `path`, replacing any previous file only once the new
/// contents are fully on disk.
pub fn write_data_file<T: Serialize>(
    path: &Path,
    value: &T,
    format: DataFileFormat,
) -> Result<(), PersistenceError> {
    let bytes = encode(value, format)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let temp = temp_path(path);
    fs::write(&temp, &bytes).map_err(io_error(&temp))?;
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(io_error(path)(err));
    }

    debug!(path = %path.display(), bytes = bytes.len(), ?format, "data file written");
    Ok(())
}

/// Read and checksum-verify a data file.
pub fn read_data_file<T: DeserializeOwned>(
    path: &Path,
    format: DataFileFormat,
) -> Result<T, PersistenceError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    decode(&bytes, format, path, true)
}

/// Read a data file without verifying its checksum.
pub fn read_data_file_unverified<T: DeserializeOwned>(
    path: &Path,
    format: DataFileFormat,
) -> Result<T, PersistenceError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    decode(&bytes, format, path, false)
}
