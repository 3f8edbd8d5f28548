//! MGH scalar-volume reader.
//!
//! Used for per-vertex overlays: the voxel values are returned flattened as `f32`.
//!
//! ```text
//! 0x00: version  i32 (big-endian)
//! 0x04: width    i32
//! 0x08: height   i32
//! 0x0C: depth    i32
//! 0x10: frames   i32
//! 0x14: datatype i32
//! ...   unused header space
//! 0x11C: voxel data (big-endian)
//! ```

use crate::config::CodecConfig;
use crate::core::load_file;
use crate::error::{constants, Result, ShapeError};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::Buf;
use std::path::Path;
use tracing::info;

/// Start of the voxel data
pub const MGH_DATA_OFFSET: usize = 284;

/// Bytes of the six leading header fields
pub const MGH_HEADER_FIELDS_SIZE: usize = 24;

/// Voxel element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MghDatatype {
    Uchar,
    Int,
    Float,
    Short,
}

impl MghDatatype {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(MghDatatype::Uchar),
            1 => Ok(MghDatatype::Int),
            3 => Ok(MghDatatype::Float),
            4 => Ok(MghDatatype::Short),
            other => Err(ShapeError::UnsupportedDatatype(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            MghDatatype::Uchar => 0,
            MghDatatype::Int => 1,
            MghDatatype::Float => 3,
            MghDatatype::Short => 4,
        }
    }

    pub fn bytes_per_voxel(self) -> usize {
        match self {
            MghDatatype::Uchar => 1,
            MghDatatype::Short => 2,
            MghDatatype::Int | MghDatatype::Float => 4,
        }
    }

    fn read(self, buf: &mut &[u8]) -> f32 {
        match self {
            MghDatatype::Uchar => buf.get_u8() as f32,
            MghDatatype::Int => buf.get_i32() as f32,
            MghDatatype::Float => buf.get_f32(),
            MghDatatype::Short => buf.get_i16() as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MghHeader {
    pub version: i32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub frames: i32,
    pub datatype: MghDatatype,
}

impl MghHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MGH_HEADER_FIELDS_SIZE {
            return Err(ShapeError::truncated(
                "mgh header",
                0,
                MGH_HEADER_FIELDS_SIZE,
                bytes.len(),
            ));
        }
        let mut buf = &bytes[..MGH_HEADER_FIELDS_SIZE];
        Ok(Self {
            version: buf.get_i32(),
            width: buf.get_i32(),
            height: buf.get_i32(),
            depth: buf.get_i32(),
            frames: buf.get_i32(),
            datatype: MghDatatype::from_code(buf.get_i32())?,
        })
    }

    /// width * height * depth * frames
    pub fn voxel_count(&self) -> Result<usize> {
        [self.width, self.height, self.depth, self.frames]
            .into_iter()
            .try_fold(1usize, |acc, dim| {
                let dim = usize::try_from(dim)
                    .map_err(|_| ShapeError::InvalidHeader(constants::ERR_NEGATIVE_DIMENSION.into()))?;
                acc.checked_mul(dim)
                    .ok_or_else(|| ShapeError::InvalidHeader(constants::ERR_VOXEL_COUNT_OVERFLOW.into()))
            })
    }
}

/// Decoded volume
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarVolume {
    pub header: MghHeader,
    pub data: Vec<f32>,
}

impl ScalarVolume {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = MghHeader::from_bytes(bytes)?;
        let count = header.voxel_count()?;
        let element_size = header.datatype.bytes_per_voxel();

        let available = bytes.len().saturating_sub(MGH_DATA_OFFSET);
        let needed = count
            .checked_mul(element_size)
            .ok_or_else(|| ShapeError::InvalidHeader(constants::ERR_VOXEL_COUNT_OVERFLOW.into()))?;
        if needed > available {
            return Err(ShapeError::truncated(
                "voxels",
                MGH_DATA_OFFSET,
                needed,
                available,
            ));
        }

        let mut buf = match needed {
            0 => &[][..],
            _ => &bytes[MGH_DATA_OFFSET..MGH_DATA_OFFSET + needed],
        };
        let data = (0..count).map(|_| header.datatype.read(&mut buf)).collect();
        Ok(Self { header, data })
    }

    pub fn read<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let _timer = Timer::start("mgh_read");
        let metrics = global_metrics();

        let bytes =
            load_file(path, config.max_input_bytes).inspect_err(|_| metrics.decode_failure())?;
        let volume = Self::from_bytes(&bytes).inspect_err(|_| metrics.decode_failure())?;

        metrics.volume_decoded(bytes.len() as u64);
        info!(
            path = %path.display(),
            voxels = volume.data.len(),
            datatype = ?volume.header.datatype,
            "Read MGH volume"
        );
        Ok(volume)
    }
}

/// Read an MGH file and return its voxels flattened to `f32`.
///
/// # Errors
/// Returns `ShapeError::UnsupportedDatatype` for datatype codes other than
/// 0 (uchar), 1 (int), 3 (float) and 4 (short).
pub fn read_scalar_volume<P: AsRef<Path>>(path: P) -> Result<Vec<f32>> {
    Ok(ScalarVolume::read(path, &CodecConfig::default())?.data)
}
