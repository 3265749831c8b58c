//! Error types for reading and writing byte fonts

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ByteFontError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file '{path}': {message}")]
    OpenFile { path: PathBuf, message: String },

    // === Metadata Errors (fatal) ===
    #[error("No valid META_BEGIN/META_END section found")]
    MissingMetadata,

    #[error("Invalid meta value for '{key}' ({value}): {reason}")]
    InvalidMetadata { key: String, value: String, reason: String },

    // === Glyph Errors (recoverable while decoding) ===
    #[error("could not read begin at line {line} '{text}'")]
    InvalidCodePoint { line: usize, text: String },

    #[error("could not read bytes at line {line} '{text}' for char {ch:?}")]
    InvalidHexRow { line: usize, text: String, ch: char },

    #[error("row at line {line} for char {ch:?} has {actual} columns, expected {expected}")]
    RaggedGlyph { line: usize, ch: char, expected: usize, actual: usize },

    // === Bitmap Errors ===
    #[error("column {column} has byte height {actual}, expected {expected}")]
    NonUniformColumns { column: usize, expected: usize, actual: usize },

    #[error("row {row} has {actual} bytes, expected {expected}")]
    NonUniformRows { row: usize, expected: usize, actual: usize },
}

impl ByteFontError {
    pub fn open_file(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::OpenFile {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_meta(key: impl Into<String>, value: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidMetadata {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ByteFontError>;
