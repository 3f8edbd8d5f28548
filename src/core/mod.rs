//! # Core Codecs
//!
//! Binary readers and writers for the shape formats this crate owns.
//!
//! ## Components
//! - **Header**: Fixed 184-byte DFS preamble with named field offsets
//! - **Mesh**: In-memory surface with optional per-vertex attachments
//! - **DFS**: Surface decoder/encoder
//! - **Volume**: MGH scalar-volume reader used for overlays
//!
//! ## Wire Format
//! ```text
//! [Header(184)] [Faces(F*12)] [Vertices(V*12)] [Optional sections at header offsets]
//! ```
//!
//! DFS is little-endian; MGH is big-endian.

pub mod dfs;
pub mod header;
pub mod mesh;
pub mod volume;

use crate::error::{Result, ShapeError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a whole file, refusing anything larger than `limit` bytes.
pub(crate) fn load_file(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|source| ShapeError::IoOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let read_error = |source| ShapeError::IoRead {
        path: path.to_path_buf(),
        source,
    };

    let size = file.metadata().map_err(read_error)?.len();
    if size > limit as u64 {
        return Err(ShapeError::OversizedInput { size, limit });
    }

    let mut data = Vec::with_capacity(size as usize);
    file.read_to_end(&mut data).map_err(read_error)?;
    Ok(data)
}
