//! # DFS Header
//!
//! Fixed-layout 184-byte preamble of a DFS surface file.
//!
//! ## Layout
//! ```text
//! 0x00: magic              [u8; 12]  "DFS_LE v2.0\0"
//! 0x0C: headerSize         i32       start of the face block (184 on write)
//! 0x10: metadataOffset     i32       reserved (0)
//! 0x14: patientDataOffset  i32       reserved (0)
//! 0x18: triangleCount      i32
//! 0x1C: vertexCount        i32
//! 0x20: stripCount         i32       legacy (0)
//! 0x24: stripSize          i32       legacy (0)
//! 0x28: normalsOffset      i32       0 if absent
//! 0x2C: uvOffset           i32       0 if absent
//! 0x30: colorOffset        i32       0 if absent
//! 0x34: labelOffset        i32       0 if absent
//! 0x38: attributeOffset    i32       0 if absent
//! 0x3C: padding            zero-filled up to 0xB8
//! ```
//!
//! All fields are little-endian.

use crate::error::{constants, Result, ShapeError};
use bytes::{Buf, BufMut};

/// Signature written at the start of every DFS file
pub const DFS_MAGIC: [u8; 12] = *b"DFS_LE v2.0\0";

/// Size of the fixed preamble; also the headerSize this codec emits
pub const DFS_HEADER_SIZE: usize = 184;

/// Byte offsets of the named header fields
pub mod field {
    pub const MAGIC: usize = 0;
    pub const HEADER_SIZE: usize = 12;
    pub const METADATA_OFFSET: usize = 16;
    pub const PATIENT_DATA_OFFSET: usize = 20;
    pub const TRIANGLE_COUNT: usize = 24;
    pub const VERTEX_COUNT: usize = 28;
    pub const STRIP_COUNT: usize = 32;
    pub const STRIP_SIZE: usize = 36;
    pub const NORMALS_OFFSET: usize = 40;
    pub const UV_OFFSET: usize = 44;
    pub const COLOR_OFFSET: usize = 48;
    pub const LABEL_OFFSET: usize = 52;
    pub const ATTRIBUTE_OFFSET: usize = 56;
    pub const PADDING: usize = 60;
}

/// Bytes per face triple (3 x i32)
pub const FACE_SIZE: usize = 12;

/// Bytes per vertex position (3 x f32)
pub const VERTEX_SIZE: usize = 12;

/// Optional offset-addressed per-vertex sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Normals,
    Colors,
    Uv,
    Labels,
    Attributes,
}

impl Section {
    /// Layout precedence on write, and the order sections are read in.
    pub const ORDER: [Section; 5] = [
        Section::Normals,
        Section::Colors,
        Section::Uv,
        Section::Labels,
        Section::Attributes,
    ];

    /// Bytes per vertex in this section
    pub fn element_size(self) -> usize {
        match self {
            Section::Normals | Section::Colors => 12,
            Section::Uv => 8,
            Section::Labels => 2,
            Section::Attributes => 4,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Section::Normals => "normals",
            Section::Colors => "colors",
            Section::Uv => "uv",
            Section::Labels => "labels",
            Section::Attributes => "attributes",
        }
    }

    /// Position of this section's offset field in the header
    pub fn header_field(self) -> usize {
        match self {
            Section::Normals => field::NORMALS_OFFSET,
            Section::Colors => field::COLOR_OFFSET,
            Section::Uv => field::UV_OFFSET,
            Section::Labels => field::LABEL_OFFSET,
            Section::Attributes => field::ATTRIBUTE_OFFSET,
        }
    }
}

/// Decoded DFS preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsHeader {
    pub magic: [u8; 12],
    pub header_size: i32,
    pub metadata_offset: i32,
    pub patient_data_offset: i32,
    pub triangle_count: i32,
    pub vertex_count: i32,
    pub strip_count: i32,
    pub strip_size: i32,
    pub normals_offset: i32,
    pub uv_offset: i32,
    pub color_offset: i32,
    pub label_offset: i32,
    pub attribute_offset: i32,
}

impl Default for DfsHeader {
    fn default() -> Self {
        Self {
            magic: DFS_MAGIC,
            header_size: DFS_HEADER_SIZE as i32,
            metadata_offset: 0,
            patient_data_offset: 0,
            triangle_count: 0,
            vertex_count: 0,
            strip_count: 0,
            strip_size: 0,
            normals_offset: 0,
            uv_offset: 0,
            color_offset: 0,
            label_offset: 0,
            attribute_offset: 0,
        }
    }
}

impl DfsHeader {
    pub const SIZE: usize = DFS_HEADER_SIZE;

    /// Header for a mesh with the given counts and no optional sections
    pub fn new(triangle_count: i32, vertex_count: i32) -> Self {
        Self {
            triangle_count,
            vertex_count,
            ..Self::default()
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut buf = &mut bytes[..];
        buf.put_slice(&self.magic);
        buf.put_i32_le(self.header_size);
        buf.put_i32_le(self.metadata_offset);
        buf.put_i32_le(self.patient_data_offset);
        buf.put_i32_le(self.triangle_count);
        buf.put_i32_le(self.vertex_count);
        buf.put_i32_le(self.strip_count);
        buf.put_i32_le(self.strip_size);
        buf.put_i32_le(self.normals_offset);
        buf.put_i32_le(self.uv_offset);
        buf.put_i32_le(self.color_offset);
        buf.put_i32_le(self.label_offset);
        buf.put_i32_le(self.attribute_offset);
        debug_assert_eq!(buf.len(), Self::SIZE - field::PADDING);
        // padding bytes stay 0
        bytes
    }

    /// Read header from bytes
    ///
    /// Only the field values are decoded here; the magic is not checked.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(ShapeError::truncated("header", 0, Self::SIZE, bytes.len()));
        }

        let mut buf = &bytes[..field::PADDING];
        let mut magic = [0u8; 12];
        buf.copy_to_slice(&mut magic);

        Ok(Self {
            magic,
            header_size: buf.get_i32_le(),
            metadata_offset: buf.get_i32_le(),
            patient_data_offset: buf.get_i32_le(),
            triangle_count: buf.get_i32_le(),
            vertex_count: buf.get_i32_le(),
            strip_count: buf.get_i32_le(),
            strip_size: buf.get_i32_le(),
            normals_offset: buf.get_i32_le(),
            uv_offset: buf.get_i32_le(),
            color_offset: buf.get_i32_le(),
            label_offset: buf.get_i32_le(),
            attribute_offset: buf.get_i32_le(),
        })
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == DFS_MAGIC
    }

    /// Stored offset of an optional section
    pub fn section_offset(&self, section: Section) -> i32 {
        match section {
            Section::Normals => self.normals_offset,
            Section::Colors => self.color_offset,
            Section::Uv => self.uv_offset,
            Section::Labels => self.label_offset,
            Section::Attributes => self.attribute_offset,
        }
    }

    pub fn set_section_offset(&mut self, section: Section, offset: i32) {
        match section {
            Section::Normals => self.normals_offset = offset,
            Section::Colors => self.color_offset = offset,
            Section::Uv => self.uv_offset = offset,
            Section::Labels => self.label_offset = offset,
            Section::Attributes => self.attribute_offset = offset,
        }
    }

    /// Absolute position of a section, or `None` when its offset is not positive
    pub fn section_position(&self, section: Section) -> Option<usize> {
        let offset = self.section_offset(section);
        (offset > 0).then_some(offset as usize)
    }

    /// Counts and body start as `usize`, rejecting negative values
    pub fn checked_layout(&self) -> Result<(usize, usize, usize)> {
        let header_size = usize::try_from(self.header_size)
            .map_err(|_| ShapeError::InvalidHeader(constants::ERR_NEGATIVE_HEADER_SIZE.into()))?;
        let triangles = usize::try_from(self.triangle_count).map_err(|_| {
            ShapeError::InvalidHeader(constants::ERR_NEGATIVE_TRIANGLE_COUNT.into())
        })?;
        let vertices = usize::try_from(self.vertex_count)
            .map_err(|_| ShapeError::InvalidHeader(constants::ERR_NEGATIVE_VERTEX_COUNT.into()))?;
        Ok((header_size, triangles, vertices))
    }
}
