//! Integration tests for the DFS surface codec
//!
//! Covers byte layout, section offsets and file-level reads and writes.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use shapeio::core::dfs::{decode, encode, layout, read_dfs, write_dfs, DfsCodec};
use shapeio::core::header::{field, DfsHeader, Section, DFS_HEADER_SIZE, DFS_MAGIC};
use shapeio::error::ShapeError;
use shapeio::utils::global_metrics;
use shapeio::{MeshPayload, UvCoords};

fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn unit_square() -> MeshPayload {
    MeshPayload::new(
        vec![[0, 1, 2], [0, 2, 3]],
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    )
}

#[test]
fn test_square_with_attributes_layout() {
    let mesh = unit_square().with_attributes(vec![0.1, 0.2, 0.3, 0.4]);
    let bytes = encode(&mesh).expect("encode");

    assert_eq!(bytes.len(), 184 + 24 + 48 + 16);
    assert_eq!(bytes.len(), 272);
    assert_eq!(&bytes[..12], &DFS_MAGIC);
    assert_eq!(read_i32(&bytes, field::HEADER_SIZE), 184);
    assert_eq!(read_i32(&bytes, field::TRIANGLE_COUNT), 2);
    assert_eq!(read_i32(&bytes, field::VERTEX_COUNT), 4);
    assert_eq!(read_i32(&bytes, field::ATTRIBUTE_OFFSET), 256);
    assert_eq!(read_i32(&bytes, field::NORMALS_OFFSET), 0);
    assert_eq!(read_i32(&bytes, field::COLOR_OFFSET), 0);
    assert_eq!(read_i32(&bytes, field::UV_OFFSET), 0);
    assert_eq!(read_i32(&bytes, field::LABEL_OFFSET), 0);

    // Faces start right after the header, little-endian
    assert_eq!(read_i32(&bytes, 184 + 12), 0);
    assert_eq!(read_i32(&bytes, 184 + 16), 2);
    assert_eq!(read_i32(&bytes, 184 + 20), 3);
    assert_eq!(&bytes[256..260], &0.1f32.to_le_bytes());

    let decoded = decode(&bytes).expect("decode");
    assert_eq!(decoded, mesh);
}

#[test]
fn test_reserved_fields_and_padding_are_zero() {
    let mesh = unit_square()
        .with_normals(vec![[0.0, 0.0, 1.0]; 4])
        .with_labels(vec![1, 1, 2, 2]);
    let bytes = encode(&mesh).expect("encode");

    assert_eq!(read_i32(&bytes, field::METADATA_OFFSET), 0);
    assert_eq!(read_i32(&bytes, field::PATIENT_DATA_OFFSET), 0);
    assert_eq!(read_i32(&bytes, field::STRIP_COUNT), 0);
    assert_eq!(read_i32(&bytes, field::STRIP_SIZE), 0);
    assert!(bytes[field::PADDING..DFS_HEADER_SIZE].iter().all(|&b| b == 0));
}

#[test]
fn test_zero_mesh_is_bare_header() {
    let bytes = encode(&MeshPayload::default()).expect("encode");
    assert_eq!(bytes.len(), DFS_HEADER_SIZE);
    for section in Section::ORDER {
        assert_eq!(read_i32(&bytes, section.header_field()), 0);
    }

    let decoded = decode(&bytes).expect("decode");
    assert!(decoded.faces.is_empty());
    assert!(decoded.vertices.is_empty());
    assert_eq!(decoded, MeshPayload::default());
}

#[test]
fn test_only_normals_present() {
    let mesh = unit_square().with_normals(vec![[0.0, 0.0, 1.0]; 4]);
    let bytes = encode(&mesh).expect("encode");

    assert_eq!(read_i32(&bytes, field::NORMALS_OFFSET), 256);
    for section in [Section::Colors, Section::Uv, Section::Labels, Section::Attributes] {
        assert_eq!(read_i32(&bytes, section.header_field()), 0);
    }
    assert_eq!(bytes.len(), 256 + 48);

    let decoded = decode(&bytes).expect("decode");
    assert!(decoded.colors.is_none());
    assert!(decoded.uv.is_none());
    assert!(decoded.labels.is_none());
    assert!(decoded.attributes.is_none());
    assert_eq!(decoded, mesh);
}

#[test]
fn test_all_sections_round_trip() {
    let mesh = unit_square()
        .with_normals(vec![[0.0, 0.0, 1.0]; 4])
        .with_colors(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]])
        .with_uv(UvCoords::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]))
        .with_labels(vec![0, 1, u16::MAX, 42])
        .with_attributes(vec![-1.0, 0.0, 1.0, 2.5]);

    let bytes = encode(&mesh).expect("encode");
    let header = DfsHeader::from_bytes(&bytes).expect("header");

    assert_eq!(header.normals_offset, 256);
    assert_eq!(header.color_offset, 256 + 48);
    assert_eq!(header.uv_offset, 256 + 96);
    assert_eq!(header.label_offset, 256 + 96 + 32);
    assert_eq!(header.attribute_offset, 256 + 96 + 32 + 8);
    assert_eq!(bytes.len(), 256 + 96 + 32 + 8 + 16);

    // uv is interleaved on disk
    let uv_at = header.uv_offset as usize;
    assert_eq!(&bytes[uv_at + 8..uv_at + 12], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[uv_at + 12..uv_at + 16], &0.0f32.to_le_bytes());

    assert_eq!(decode(&bytes).expect("decode"), mesh);
}

#[test]
fn test_section_ranges_do_not_overlap() {
    let mesh = unit_square()
        .with_colors(vec![[0.5; 3]; 4])
        .with_labels(vec![3; 4])
        .with_attributes(vec![1.0; 4]);
    let plan = layout(&mesh).expect("layout");

    let mut ranges: Vec<(usize, usize)> = Section::ORDER
        .iter()
        .filter_map(|&s| {
            plan.header
                .section_position(s)
                .map(|start| (start, start + 4 * s.element_size()))
        })
        .collect();
    ranges.sort();
    assert_eq!(ranges.len(), 3);
    for pair in ranges.windows(2) {
        assert!(pair[0].1 <= pair[1].0);
    }
    assert_eq!(ranges.last().map(|r| r.1), Some(plan.total_len));
}

#[test]
fn test_out_of_range_face_indices_are_kept() {
    let mesh = MeshPayload::new(vec![[-5, 100, i32::MAX]], vec![[0.0; 3]]);
    let decoded = decode(&encode(&mesh).expect("encode")).expect("decode");
    assert_eq!(decoded.faces, vec![[-5, 100, i32::MAX]]);
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("lh.mid.dfs");
    let mesh = unit_square()
        .with_labels(vec![10, 20, 30, 40])
        .with_attributes(vec![0.1, 0.2, 0.3, 0.4]);

    write_dfs(&path, &mesh).expect("write");
    assert_eq!(std::fs::metadata(&path).expect("metadata").len(), 184 + 24 + 48 + 8 + 16);

    let decoded = read_dfs(&path).expect("read");
    assert_eq!(decoded, mesh);
}

#[test]
fn test_write_overwrites_existing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("surface.dfs");
    std::fs::write(&path, vec![0xAB; 4096]).expect("seed file");

    write_dfs(&path, &MeshPayload::default()).expect("write");
    assert_eq!(std::fs::read(&path).expect("read back").len(), 184);
}

#[test]
fn test_missing_file_is_open_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.dfs");
    match read_dfs(&path) {
        Err(ShapeError::IoOpen { path: p, .. }) => assert_eq!(p, path),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("no_such_dir").join("out.dfs");
    assert!(matches!(
        write_dfs(&path, &unit_square()),
        Err(ShapeError::IoOpen { .. })
    ));
}

#[test]
fn test_input_size_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("big.dfs");
    write_dfs(&path, &unit_square()).expect("write");

    let codec = DfsCodec::new().with_max_input_bytes(200);
    assert!(matches!(
        codec.read(&path),
        Err(ShapeError::OversizedInput { size: 256, limit: 200 })
    ));
}

#[test]
fn test_failed_file_operations_are_counted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let before = global_metrics().snapshot();

    assert!(read_dfs(dir.path().join("missing.dfs")).is_err());
    assert!(write_dfs(dir.path().join("no_such_dir").join("x.dfs"), &unit_square()).is_err());

    // Other tests share the global counters, so only a lower bound holds
    let after = global_metrics().snapshot();
    assert!(after.decode_failures > before.decode_failures);
    assert!(after.encode_failures > before.encode_failures);
}
