//! Attribute aggregation across a group of surfaces.
//!
//! Every surface must carry an attribute series of the same length as the first
//! one; the first mismatch aborts the aggregation.

use crate::core::mesh::MeshPayload;
use crate::error::{Result, ShapeError};
use crate::shape::dispatcher::FormatDispatcher;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column holding file paths in a tab-separated file list
pub const FILE_COLUMN: &str = "File";

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedAttributes {
    /// First surface of the group, as read
    pub reference: MeshPayload,
    /// Per-vertex mean of the vertex positions of every surface
    pub average_vertices: Vec<[f32; 3]>,
    /// One attribute row per file, in input order
    pub attributes: Vec<Vec<f32>>,
    pub files: Vec<PathBuf>,
}

impl AggregatedAttributes {
    /// The reference surface with its vertices replaced by the group average
    pub fn average_surface(&self) -> MeshPayload {
        MeshPayload {
            vertices: self.average_vertices.clone(),
            ..self.reference.clone()
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Read every file through `dispatcher` and stack their attribute series.
///
/// # Errors
/// - `ShapeError::EmptyFileList` when `paths` is empty
/// - `ShapeError::MissingAttributes` when a surface has no attributes
/// - `ShapeError::AttributeLengthMismatch` when a surface's attribute length differs from the first
/// - `ShapeError::VertexCountMismatch` when vertex positions cannot be averaged
/// - any error from reading the files
pub fn aggregate_attributes<P: AsRef<Path>>(
    dispatcher: &FormatDispatcher,
    paths: &[P],
) -> Result<AggregatedAttributes> {
    let (first, rest) = paths.split_first().ok_or(ShapeError::EmptyFileList)?;
    let first = first.as_ref();

    let reference = dispatcher.read(first)?;
    let reference_attributes = take_attributes(&reference, first)?;
    let expected = reference_attributes.len();
    let vertex_count = reference.vertex_count();

    let mut sums: Vec<[f64; 3]> = reference
        .vertices
        .iter()
        .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
        .collect();
    let mut attributes = vec![reference_attributes];
    let mut files = vec![first.to_path_buf()];

    for path in rest {
        let path = path.as_ref();
        let surface = dispatcher.read(path)?;
        let row = take_attributes(&surface, path)?;

        if row.len() != expected {
            return Err(ShapeError::AttributeLengthMismatch {
                path: path.to_path_buf(),
                reference: first.to_path_buf(),
                expected,
                found: row.len(),
            });
        }
        if surface.vertex_count() != vertex_count {
            return Err(ShapeError::VertexCountMismatch {
                path: path.to_path_buf(),
                expected: vertex_count,
                found: surface.vertex_count(),
            });
        }

        for (sum, vertex) in sums.iter_mut().zip(&surface.vertices) {
            for axis in 0..3 {
                sum[axis] += vertex[axis] as f64;
            }
        }
        debug!(path = %path.display(), "Aggregated surface attributes");
        attributes.push(row);
        files.push(path.to_path_buf());
    }

    let n = files.len() as f64;
    let average_vertices = sums
        .into_iter()
        .map(|s| [(s[0] / n) as f32, (s[1] / n) as f32, (s[2] / n) as f32])
        .collect();

    info!(
        files = files.len(),
        attribute_length = expected,
        "Aggregated attributes"
    );
    Ok(AggregatedAttributes {
        reference,
        average_vertices,
        attributes,
        files,
    })
}

fn take_attributes(surface: &MeshPayload, path: &Path) -> Result<Vec<f32>> {
    surface
        .attributes
        .clone()
        .ok_or_else(|| ShapeError::MissingAttributes {
            path: path.to_path_buf(),
        })
}

/// Parse a file list: a tab-separated table with a `File` column, or one path per line.
///
/// # Errors
/// Returns `ShapeError::InvalidFileList` for a table row whose `File` cell is
/// missing or blank.
pub fn parse_file_list(content: &str) -> Result<Vec<PathBuf>> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());
    let Some((_, first)) = lines.next() else {
        return Ok(Vec::new());
    };

    match first.split('\t').position(|c| c.trim() == FILE_COLUMN) {
        Some(column) => lines
            .map(|(index, row)| {
                row.split('\t')
                    .nth(column)
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .map(PathBuf::from)
                    .ok_or(ShapeError::InvalidFileList {
                        line: index + 1,
                        column: FILE_COLUMN,
                    })
            })
            .collect(),
        None => Ok(std::iter::once(first)
            .chain(lines.map(|(_, l)| l))
            .map(|l| PathBuf::from(l.trim()))
            .collect()),
    }
}

pub fn read_file_list<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ShapeError::IoRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file_list(&content)
}

/// Aggregate the surfaces named in a file list
pub fn aggregate_from_list_file<P: AsRef<Path>>(
    dispatcher: &FormatDispatcher,
    list_path: P,
) -> Result<AggregatedAttributes> {
    let files = read_file_list(list_path)?;
    aggregate_attributes(dispatcher, &files)
}

/// Extension (with leading dot) of `path`, or of the first file it lists.
pub fn file_list_extension<P: AsRef<Path>>(path: P, contains_file_list: bool) -> Result<String> {
    let path = path.as_ref();
    let target = if contains_file_list {
        read_file_list(path)?
            .into_iter()
            .next()
            .ok_or(ShapeError::EmptyFileList)?
    } else {
        path.to_path_buf()
    };
    Ok(target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default())
}
