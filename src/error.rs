//! # Error Types
//!
//! Error handling for the shape readers and writers.
//!
//! This module defines all error variants that can occur while decoding or encoding
//! shape files, from low-level I/O errors to malformed headers and inconsistent meshes.
//!
//! ## Error Categories
//! - **I/O Errors**: Failures opening, reading or writing files
//! - **Format Errors**: Truncated input, invalid headers, unknown datatypes
//! - **Mesh Errors**: Attachments whose length does not match the vertex count
//! - **Dispatch Errors**: Unsupported file extensions
//! - **Aggregation Errors**: Attribute or vertex count mismatches across files
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust,no_run
//! use shapeio::core::dfs::read_dfs;
//! use shapeio::error::{Result, ShapeError};
//! use tracing::{error, info};
//!
//! fn vertex_count(path: &str) -> Result<usize> {
//!     Ok(read_dfs(path)?.vertex_count())
//! }
//!
//! fn main() {
//!     match vertex_count("lh.mid.dfs") {
//!         Ok(count) => info!(count, "Read surface"),
//!         Err(ShapeError::TruncatedInput { section, .. }) => error!(section, "File is truncated"),
//!         Err(e) => error!(error=%e, "Error reading surface"),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Dispatcher-related error messages
    pub const ERR_DISPATCHER_WRITE_LOCK: &str = "Failed to acquire write lock on format dispatcher";
    pub const ERR_DISPATCHER_READ_LOCK: &str = "Failed to acquire read lock on format dispatcher";

    /// Header validation errors
    pub const ERR_NEGATIVE_HEADER_SIZE: &str = "headerSize is negative";
    pub const ERR_NEGATIVE_TRIANGLE_COUNT: &str = "triangleCount is negative";
    pub const ERR_NEGATIVE_VERTEX_COUNT: &str = "vertexCount is negative";
    pub const ERR_NEGATIVE_DIMENSION: &str = "volume dimension or frame count is negative";
    pub const ERR_VOXEL_COUNT_OVERFLOW: &str = "voxel count overflows the address space";
}

// ShapeError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open {path}: {source}")]
    IoOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Truncated input in {section}: needed {needed} bytes at offset {offset}, only {available} available")]
    TruncatedInput {
        section: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid magic signature: {0:?}")]
    InvalidMagic([u8; 12]),

    #[error("Unsupported datatype code: {0}")]
    UnsupportedDatatype(i32),

    #[error("Unsupported data type '{extension}'. Supported data types are: {}", supported.join(", "))]
    UnsupportedExtension {
        extension: String,
        supported: Vec<String>,
    },

    #[error("Invalid {section} attachment: expected {expected} elements, found {found}")]
    InvalidAttachment {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Mesh too large for 32-bit offsets: {0} bytes")]
    MeshTooLarge(usize),

    #[error("Input too large: {size} bytes (limit {limit})")]
    OversizedInput { size: u64, limit: usize },

    #[error("Length of attributes in {path} ({found}) and {reference} ({expected}) do not match")]
    AttributeLengthMismatch {
        path: PathBuf,
        reference: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Vertex count of {path} ({found}) does not match the first file ({expected})")]
    VertexCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("No attributes present in {path}")]
    MissingAttributes { path: PathBuf },

    #[error("File list is empty")]
    EmptyFileList,

    #[error("File list line {line} has no value in the '{column}' column")]
    InvalidFileList { line: usize, column: &'static str },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl ShapeError {
    pub(crate) fn truncated(
        section: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    ) -> Self {
        ShapeError::TruncatedInput {
            section,
            offset,
            needed,
            available,
        }
    }
}

/// Type alias for Results using ShapeError
pub type Result<T> = std::result::Result<T, ShapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_lists_supported_types() {
        let err = ShapeError::UnsupportedExtension {
            extension: ".obj".to_string(),
            supported: vec![".dfs".to_string(), ".mgh".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported data type '.obj'. Supported data types are: .dfs, .mgh"
        );
    }

    #[test]
    fn test_truncated_message() {
        let err = ShapeError::truncated("vertices", 184, 48, 10);
        assert!(err.to_string().contains("vertices"));
        assert!(err.to_string().contains("offset 184"));
    }
}
