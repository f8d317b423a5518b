//! Text loading for command inputs
//!
//! Handles:
//! - stdin (`-`) and file paths
//! - Oversized inputs
//! - Non-UTF-8 content (strict or lossy)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum input size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Path value that selects standard input
pub const STDIN_PATH: &str = "-";

const UTF8_BOM: &str = "\u{feff}";

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Reject invalid UTF-8 with an error
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD
    Lossy,
}

/// Configuration for loading text
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadConfig {
    /// Maximum input size to accept (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Strict,
        }
    }
}

impl ReadConfig {
    pub fn lossy() -> Self {
        Self {
            encoding_strategy: EncodingStrategy::Lossy,
            ..Default::default()
        }
    }
}

/// Errors raised while loading text input
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8 (first invalid byte at offset {valid_up_to})", path.display())]
    InvalidUtf8 { path: PathBuf, valid_up_to: usize },

    #[error("{} is too large ({size} > {limit} bytes)", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

impl LoadError {
    /// Stable code for the error, used in structured output
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::NotFound(_) => "FILE_NOT_FOUND",
            LoadError::Io { .. } => "IO_ERROR",
            LoadError::InvalidUtf8 { .. } => "INVALID_UTF8",
            LoadError::TooLarge { .. } => "FILE_TOO_LARGE",
        }
    }
}

/// Successfully loaded text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    /// Decoded content, BOM stripped
    pub content: String,

    /// Raw size in bytes
    pub size: u64,

    /// Whether lossy conversion replaced anything
    pub lossy: bool,
}

/// Load text from `path` (or stdin when `path` is `-`)
pub fn read_text(path: &Path, config: &ReadConfig) -> Result<LoadedText, LoadError> {
    let bytes = if path == Path::new(STDIN_PATH) {
        read_stdin_bytes(config)?
    } else {
        read_file_bytes(path, config)?
    };

    decode(path, bytes, config)
}

fn read_stdin_bytes(config: &ReadConfig) -> Result<Vec<u8>, LoadError> {
    let mut buffer = Vec::new();
    io::stdin()
        .lock()
        .take(config.max_file_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|source| LoadError::Io {
            path: PathBuf::from(STDIN_PATH),
            source,
        })?;

    let size = buffer.len() as u64;
    if size > config.max_file_size {
        return Err(LoadError::TooLarge {
            path: PathBuf::from(STDIN_PATH),
            size,
            limit: config.max_file_size,
        });
    }
    Ok(buffer)
}

fn read_file_bytes(path: &Path, config: &ReadConfig) -> Result<Vec<u8>, LoadError> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > config.max_file_size {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: config.max_file_size,
        });
    }

    fs::read(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: io::Error) -> LoadError {
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound(path.to_path_buf())
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn decode(path: &Path, bytes: Vec<u8>, config: &ReadConfig) -> Result<LoadedText, LoadError> {
    let size = bytes.len() as u64;

    let (content, lossy) = match String::from_utf8(bytes) {
        Ok(content) => (content, false),
        Err(e) => match config.encoding_strategy {
            EncodingStrategy::Strict => {
                return Err(LoadError::InvalidUtf8 {
                    path: path.to_path_buf(),
                    valid_up_to: e.utf8_error().valid_up_to(),
                });
            }
            EncodingStrategy::Lossy => {
                (String::from_utf8_lossy(e.as_bytes()).into_owned(), true)
            }
        },
    };

    let content = match content.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => content,
    };

    Ok(LoadedText {
        content,
        size,
        lossy,
    })
}
