#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the DFS decoder and encoder
//! Truncated input, malformed headers, non-finite values and attachment validation

use shapeio::core::dfs::{decode, encode};
use shapeio::core::header::{DfsHeader, Section};
use shapeio::error::ShapeError;
use shapeio::{MeshPayload, UvCoords};

fn sample_mesh() -> MeshPayload {
    MeshPayload::new(
        vec![[0, 1, 2], [2, 1, 3]],
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    )
}

// ============================================================================
// TRUNCATION
// ============================================================================

#[test]
fn test_every_truncation_before_vertex_end_fails() {
    let bytes = encode(&sample_mesh()).unwrap();
    let vertex_end = 184 + 2 * 12 + 4 * 12;
    assert_eq!(bytes.len(), vertex_end);

    for cut in 0..vertex_end {
        match decode(&bytes[..cut]) {
            Err(ShapeError::TruncatedInput { .. }) => {}
            other => panic!("cut at {cut}: unexpected {other:?}"),
        }
    }
    assert!(decode(&bytes).is_ok());
}

#[test]
fn test_truncation_reports_section() {
    let bytes = encode(&sample_mesh()).unwrap();

    assert!(matches!(
        decode(&bytes[..100]),
        Err(ShapeError::TruncatedInput { section: "header", needed: 184, available: 100, .. })
    ));
    assert!(matches!(
        decode(&bytes[..190]),
        Err(ShapeError::TruncatedInput { section: "faces", offset: 184, needed: 24, available: 6 })
    ));
    assert!(matches!(
        decode(&bytes[..220]),
        Err(ShapeError::TruncatedInput { section: "vertices", offset: 208, needed: 48, available: 12 })
    ));
}

#[test]
fn test_truncated_optional_section_fails() {
    let mesh = sample_mesh()
        .with_labels(vec![1, 2, 3, 4])
        .with_attributes(vec![0.0; 4]);
    let bytes = encode(&mesh).unwrap();

    // Drop the last attribute value
    let result = decode(&bytes[..bytes.len() - 4]);
    assert!(matches!(
        result,
        Err(ShapeError::TruncatedInput { section: "attributes", needed: 16, available: 12, .. })
    ));
}

#[test]
fn test_offset_past_end_fails() {
    let mut bytes = encode(&sample_mesh()).unwrap().to_vec();
    let mut header = DfsHeader::from_bytes(&bytes).unwrap();
    header.set_section_offset(Section::Normals, 10_000);
    bytes[..184].copy_from_slice(&header.to_bytes());

    assert!(matches!(
        decode(&bytes),
        Err(ShapeError::TruncatedInput { section: "normals", offset: 10_000, .. })
    ));
}

#[test]
fn test_overlapping_offsets_are_accepted() {
    let mesh = sample_mesh().with_normals(vec![[0.0, 0.0, 1.0]; 4]);
    let mut bytes = encode(&mesh).unwrap().to_vec();
    let mut header = DfsHeader::from_bytes(&bytes).unwrap();
    // Colors share the normals block
    header.color_offset = header.normals_offset;
    bytes[..184].copy_from_slice(&header.to_bytes());

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.colors, decoded.normals);
}

// ============================================================================
// MALFORMED HEADERS
// ============================================================================

#[test]
fn test_negative_vertex_count_rejected() {
    let header = DfsHeader::new(0, -1);
    let bytes = header.to_bytes();
    assert!(matches!(decode(&bytes), Err(ShapeError::InvalidHeader(_))));
}

#[test]
fn test_negative_header_size_rejected() {
    let header = DfsHeader {
        header_size: -184,
        ..DfsHeader::default()
    };
    assert!(matches!(
        decode(&header.to_bytes()),
        Err(ShapeError::InvalidHeader(_))
    ));
}

#[test]
fn test_negative_offset_means_absent() {
    let mut bytes = encode(&sample_mesh()).unwrap().to_vec();
    let mut header = DfsHeader::from_bytes(&bytes).unwrap();
    header.label_offset = -8;
    bytes[..184].copy_from_slice(&header.to_bytes());

    assert!(decode(&bytes).unwrap().labels.is_none());
}

#[test]
fn test_strip_fields_are_ignored() {
    let mut bytes = encode(&sample_mesh()).unwrap().to_vec();
    let mut header = DfsHeader::from_bytes(&bytes).unwrap();
    header.strip_count = 12;
    header.strip_size = 99;
    header.metadata_offset = 5000;
    bytes[..184].copy_from_slice(&header.to_bytes());

    assert_eq!(decode(&bytes).unwrap(), sample_mesh());
}

#[test]
fn test_foreign_magic_is_decoded_permissively() {
    let mut bytes = encode(&sample_mesh()).unwrap().to_vec();
    bytes[..12].copy_from_slice(b"DFS_BE v2.0\0");
    assert_eq!(decode(&bytes).unwrap(), sample_mesh());
}

// ============================================================================
// VALUES
// ============================================================================

#[test]
fn test_non_finite_values_keep_their_bits() {
    let odd_nan = f32::from_bits(0x7FC0_1234);
    let mesh = MeshPayload::new(vec![], vec![[f32::NAN, f32::INFINITY, -0.0]])
        .with_attributes(vec![odd_nan])
        .with_uv(UvCoords::new(vec![f32::NEG_INFINITY], vec![f32::MIN_POSITIVE / 2.0]));

    let decoded = decode(&encode(&mesh).unwrap()).unwrap();

    let bits: Vec<u32> = decoded.vertices[0].iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, vec![f32::NAN.to_bits(), f32::INFINITY.to_bits(), (-0.0f32).to_bits()]);
    assert_eq!(decoded.attributes.unwrap()[0].to_bits(), 0x7FC0_1234);
    let uv = decoded.uv.unwrap();
    assert_eq!(uv.u[0], f32::NEG_INFINITY);
    assert_eq!(uv.v[0].to_bits(), (f32::MIN_POSITIVE / 2.0).to_bits());
}

// ============================================================================
// ATTACHMENT VALIDATION
// ============================================================================

#[test]
fn test_empty_attachment_on_nonempty_mesh_rejected() {
    let mesh = sample_mesh().with_normals(Vec::new());
    assert!(matches!(
        encode(&mesh),
        Err(ShapeError::InvalidAttachment { section: "normals", expected: 4, found: 0 })
    ));
}

#[test]
fn test_empty_attachment_on_empty_mesh_is_present() {
    let mesh = MeshPayload::default().with_labels(Vec::new());
    let bytes = encode(&mesh).unwrap();
    let header = DfsHeader::from_bytes(&bytes).unwrap();

    assert_eq!(header.label_offset, 184);
    assert_eq!(bytes.len(), 184);
    assert_eq!(decode(&bytes).unwrap().labels, Some(Vec::new()));
}

#[test]
fn test_long_attachment_rejected() {
    let mesh = sample_mesh().with_colors(vec![[0.0; 3]; 5]);
    assert!(matches!(
        encode(&mesh),
        Err(ShapeError::InvalidAttachment { section: "colors", expected: 4, found: 5 })
    ));
}
