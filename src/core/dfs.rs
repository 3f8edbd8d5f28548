//! # DFS Surface Codec
//!
//! Decodes and encodes BrainSuite DFS surface files.
//!
//! A file is the 184-byte [`DfsHeader`] followed by the face block and the vertex
//! block, which always start at `headerSize`. Optional per-vertex sections
//! (normals, colors, uv, labels, attributes) are located through absolute offsets
//! stored in the header, where 0 means the section is absent.
//!
//! ## Reading
//! The decoder trusts `headerSize` as the start of the face block, so headers
//! larger than 184 bytes are accepted. Optional sections are located only through
//! their offsets; they may appear in any order in the file.
//!
//! ## Writing
//! The encoder always emits a 184-byte header, then faces, vertices and each
//! present section in the order normals, colors, uv, labels, attributes, with no
//! gaps and no trailing data.
//!
//! ## Usage
//! ```rust,no_run
//! use shapeio::core::dfs::{read_dfs, write_dfs};
//!
//! # fn main() -> shapeio::error::Result<()> {
//! let mut surface = read_dfs("subject.left.pial.cortex.dfs")?;
//! surface.attributes = Some(vec![0.0; surface.vertex_count()]);
//! write_dfs("subject.left.pial.cortex.attr.dfs", &surface)?;
//! # Ok(())
//! # }
//! ```

use crate::config::CodecConfig;
use crate::core::header::{DfsHeader, Section, DFS_HEADER_SIZE, FACE_SIZE, VERTEX_SIZE};
use crate::core::load_file;
use crate::core::mesh::{MeshPayload, UvCoords};
use crate::error::{Result, ShapeError};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header plus total encoded length for a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsLayout {
    pub header: DfsHeader,
    pub total_len: usize,
}

/// Compute the header and section offsets the encoder will emit for `mesh`.
///
/// # Errors
/// Returns `ShapeError::InvalidAttachment` if a present attachment does not have
/// one element per vertex, and `ShapeError::MeshTooLarge` if an offset would not
/// fit in 32 bits.
pub fn layout(mesh: &MeshPayload) -> Result<DfsLayout> {
    mesh.validate()?;

    let triangles = mesh.triangle_count();
    let vertices = mesh.vertex_count();
    let mut header = DfsHeader::new(to_i32(triangles)?, to_i32(vertices)?);

    let mut cursor = advance(DFS_HEADER_SIZE, triangles, FACE_SIZE)?;
    cursor = advance(cursor, vertices, VERTEX_SIZE)?;

    for section in Section::ORDER {
        if mesh.has_section(section) {
            header.set_section_offset(section, to_i32(cursor)?);
            cursor = advance(cursor, vertices, section.element_size())?;
        }
    }
    to_i32(cursor)?;

    Ok(DfsLayout {
        header,
        total_len: cursor,
    })
}

fn advance(cursor: usize, count: usize, element_size: usize) -> Result<usize> {
    count
        .checked_mul(element_size)
        .and_then(|len| cursor.checked_add(len))
        .ok_or(ShapeError::MeshTooLarge(usize::MAX))
}

fn to_i32(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| ShapeError::MeshTooLarge(value))
}

/// Borrow `count * element_size` bytes starting at `offset`.
fn block<'a>(
    data: &'a [u8],
    section: &'static str,
    offset: usize,
    count: usize,
    element_size: usize,
) -> Result<&'a [u8]> {
    let available = data.len().saturating_sub(offset);
    let needed = count
        .checked_mul(element_size)
        .ok_or_else(|| ShapeError::truncated(section, offset, usize::MAX, available))?;
    if needed > available {
        return Err(ShapeError::truncated(section, offset, needed, available));
    }
    if needed == 0 {
        // Empty sections may point anywhere, including past the end
        return Ok(&[]);
    }
    Ok(&data[offset..offset + needed])
}

fn read_f32_triples(bytes: &[u8]) -> Vec<[f32; 3]> {
    bytes
        .chunks_exact(12)
        .map(|mut c| [c.get_f32_le(), c.get_f32_le(), c.get_f32_le()])
        .collect()
}

fn put_f32_triples(buf: &mut BytesMut, values: &[[f32; 3]]) {
    for triple in values {
        for &component in triple {
            buf.put_f32_le(component);
        }
    }
}

/// DFS reader/writer with configurable strictness
#[derive(Debug, Clone, Copy)]
pub struct DfsCodec {
    strict_magic: bool,
    max_input_bytes: usize,
}

impl Default for DfsCodec {
    fn default() -> Self {
        Self::from_config(&CodecConfig::default())
    }
}

impl DfsCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            strict_magic: config.strict_magic,
            max_input_bytes: config.max_input_bytes,
        }
    }

    /// Reject files whose signature is not `DFS_LE v2.0\0`
    pub fn with_strict_magic(mut self, strict: bool) -> Self {
        self.strict_magic = strict;
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Decode a complete DFS byte image.
    ///
    /// # Errors
    /// - `ShapeError::TruncatedInput` if the data ends before the header, the face or
    ///   vertex block, or any section declared present
    /// - `ShapeError::InvalidHeader` if a count or `headerSize` is negative
    /// - `ShapeError::InvalidMagic` in strict mode when the signature differs
    pub fn decode(&self, data: &[u8]) -> Result<MeshPayload> {
        let header = DfsHeader::from_bytes(data)?;

        if !header.has_valid_magic() {
            if self.strict_magic {
                return Err(ShapeError::InvalidMagic(header.magic));
            }
            warn!(magic = ?header.magic, "Unrecognised DFS signature, decoding anyway");
        }

        let (body_start, triangles, vertices) = header.checked_layout()?;
        if body_start != DFS_HEADER_SIZE {
            warn!(header_size = body_start, "Non-standard DFS header size");
        }

        let face_bytes = block(data, "faces", body_start, triangles, FACE_SIZE)?;
        let faces = face_bytes
            .chunks_exact(FACE_SIZE)
            .map(|mut c| [c.get_i32_le(), c.get_i32_le(), c.get_i32_le()])
            .collect();

        let vertex_start = body_start + face_bytes.len();
        let vertex_bytes = block(data, "vertices", vertex_start, vertices, VERTEX_SIZE)?;

        let mut mesh = MeshPayload::new(faces, read_f32_triples(vertex_bytes));

        for section in Section::ORDER {
            let Some(offset) = header.section_position(section) else {
                continue;
            };
            debug!(section = section.name(), offset, "Reading DFS section");
            let bytes = block(data, section.name(), offset, vertices, section.element_size())?;

            match section {
                Section::Normals => mesh.normals = Some(read_f32_triples(bytes)),
                Section::Colors => mesh.colors = Some(read_f32_triples(bytes)),
                Section::Uv => {
                    let mut uv = UvCoords {
                        u: Vec::with_capacity(vertices),
                        v: Vec::with_capacity(vertices),
                    };
                    for mut pair in bytes.chunks_exact(8) {
                        uv.u.push(pair.get_f32_le());
                        uv.v.push(pair.get_f32_le());
                    }
                    mesh.uv = Some(uv);
                }
                Section::Labels => {
                    mesh.labels = Some(bytes.chunks_exact(2).map(|mut c| c.get_u16_le()).collect())
                }
                Section::Attributes => {
                    mesh.attributes =
                        Some(bytes.chunks_exact(4).map(|mut c| c.get_f32_le()).collect())
                }
            }
        }

        Ok(mesh)
    }

    /// Encode a mesh into its DFS byte image.
    ///
    /// # Errors
    /// Returns the errors of [`layout`]; encoding itself cannot fail.
    pub fn encode(&self, mesh: &MeshPayload) -> Result<Bytes> {
        let DfsLayout { header, total_len } = layout(mesh)?;
        debug!(
            triangles = header.triangle_count,
            vertices = header.vertex_count,
            normals = header.normals_offset,
            colors = header.color_offset,
            uv = header.uv_offset,
            labels = header.label_offset,
            attributes = header.attribute_offset,
            total_len,
            "DFS layout"
        );

        let mut buf = BytesMut::with_capacity(total_len);
        buf.put_slice(&header.to_bytes());

        for face in &mesh.faces {
            for &index in face {
                buf.put_i32_le(index);
            }
        }
        put_f32_triples(&mut buf, &mesh.vertices);

        if let Some(normals) = &mesh.normals {
            put_f32_triples(&mut buf, normals);
        }
        if let Some(colors) = &mesh.colors {
            put_f32_triples(&mut buf, colors);
        }
        if let Some(uv) = &mesh.uv {
            for (&u, &v) in uv.u.iter().zip(&uv.v) {
                buf.put_f32_le(u);
                buf.put_f32_le(v);
            }
        }
        if let Some(labels) = &mesh.labels {
            for &label in labels {
                buf.put_u16_le(label);
            }
        }
        if let Some(attributes) = &mesh.attributes {
            for &value in attributes {
                buf.put_f32_le(value);
            }
        }

        debug_assert_eq!(buf.len(), total_len);
        Ok(buf.freeze())
    }

    /// Read and decode a DFS file.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<MeshPayload> {
        let path = path.as_ref();
        let _timer = Timer::start("dfs_read");
        let metrics = global_metrics();

        let data =
            load_file(path, self.max_input_bytes).inspect_err(|_| metrics.decode_failure())?;
        let mesh = self.decode(&data).inspect_err(|_| metrics.decode_failure())?;

        metrics.mesh_decoded(data.len() as u64);
        info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Read DFS surface"
        );
        Ok(mesh)
    }

    /// Encode a mesh and write it to `path`, replacing any existing file.
    ///
    /// The file is written in place; a failure part way leaves it partially written.
    pub fn write<P: AsRef<Path>>(&self, path: P, mesh: &MeshPayload) -> Result<()> {
        let path = path.as_ref();
        let _timer = Timer::start("dfs_write");
        let metrics = global_metrics();

        let bytes = self.encode(mesh).inspect_err(|_| metrics.encode_failure())?;

        let mut file = File::create(path).map_err(|source| {
            metrics.encode_failure();
            ShapeError::IoOpen {
                path: path.to_path_buf(),
                source,
            }
        })?;
        file.write_all(&bytes)
            .and_then(|()| file.flush())
            .map_err(|source| {
                metrics.encode_failure();
                ShapeError::IoWrite {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        metrics.mesh_encoded(bytes.len() as u64);
        info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            bytes = bytes.len(),
            "Wrote DFS surface"
        );
        Ok(())
    }
}

/// Decode a DFS byte image with the default (permissive) codec
pub fn decode(data: &[u8]) -> Result<MeshPayload> {
    DfsCodec::default().decode(data)
}

/// Encode a mesh with the default codec
pub fn encode(mesh: &MeshPayload) -> Result<Bytes> {
    DfsCodec::default().encode(mesh)
}

/// Read a DFS file with the default codec
pub fn read_dfs<P: AsRef<Path>>(path: P) -> Result<MeshPayload> {
    DfsCodec::default().read(path)
}

/// Write a DFS file with the default codec
pub fn write_dfs<P: AsRef<Path>>(path: P, mesh: &MeshPayload) -> Result<()> {
    DfsCodec::default().write(path, mesh)
}
