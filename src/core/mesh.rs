//! In-memory triangulated surface with optional per-vertex attachments.
//!
//! Faces and vertices are always present. Every other attachment is an `Option`:
//! `None` means the section is absent from the file, which is distinct from
//! `Some(vec![])`.

use crate::core::header::Section;
use crate::error::{Result, ShapeError};
use serde::{Deserialize, Serialize};

/// Per-vertex texture coordinates, kept as two parallel series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvCoords {
    pub u: Vec<f32>,
    pub v: Vec<f32>,
}

impl UvCoords {
    pub fn new(u: Vec<f32>, v: Vec<f32>) -> Self {
        Self { u, v }
    }

    /// Build from interleaved `(u, v)` pairs
    pub fn from_pairs(pairs: &[[f32; 2]]) -> Self {
        Self {
            u: pairs.iter().map(|p| p[0]).collect(),
            v: pairs.iter().map(|p| p[1]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// Triangulated surface plus optional attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshPayload {
    /// Vertex index triples; indices are not range-checked
    pub faces: Vec<[i32; 3]>,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub uv: Option<UvCoords>,
    pub labels: Option<Vec<u16>>,
    pub attributes: Option<Vec<f32>>,
}

impl MeshPayload {
    pub fn new(faces: Vec<[i32; 3]>, vertices: Vec<[f32; 3]>) -> Self {
        Self {
            faces,
            vertices,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 3]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_uv(mut self, uv: UvCoords) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_labels(mut self, labels: Vec<u16>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<f32>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Attach a scalar overlay as the per-vertex attributes.
    ///
    /// # Errors
    /// Returns `ShapeError::InvalidAttachment` unless there is one value per vertex;
    /// the mesh is left unchanged in that case.
    pub fn attach_overlay(&mut self, overlay: Vec<f32>) -> Result<()> {
        if overlay.len() != self.vertex_count() {
            return Err(ShapeError::InvalidAttachment {
                section: Section::Attributes.name(),
                expected: self.vertex_count(),
                found: overlay.len(),
            });
        }
        self.attributes = Some(overlay);
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of elements in an attachment, or `None` if it is absent
    pub fn section_len(&self, section: Section) -> Option<usize> {
        match section {
            Section::Normals => self.normals.as_ref().map(Vec::len),
            Section::Colors => self.colors.as_ref().map(Vec::len),
            Section::Uv => self.uv.as_ref().map(UvCoords::len),
            Section::Labels => self.labels.as_ref().map(Vec::len),
            Section::Attributes => self.attributes.as_ref().map(Vec::len),
        }
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.section_len(section).is_some()
    }

    /// Check that every present attachment has exactly one element per vertex.
    pub fn validate(&self) -> Result<()> {
        let expected = self.vertex_count();

        if let Some(uv) = &self.uv {
            if uv.u.len() != uv.v.len() {
                return Err(ShapeError::InvalidAttachment {
                    section: "uv",
                    expected: uv.u.len(),
                    found: uv.v.len(),
                });
            }
        }

        for section in Section::ORDER {
            if let Some(found) = self.section_len(section) {
                if found != expected {
                    return Err(ShapeError::InvalidAttachment {
                        section: section.name(),
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(())
    }
}
