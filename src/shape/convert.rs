//! Surface format conversion with an optional scalar overlay.

use crate::core::mesh::MeshPayload;
use crate::error::{Result, ShapeError};
use crate::shape::dispatcher::FormatDispatcher;
use std::path::Path;
use tracing::info;

/// Read `surfin`, optionally attach the overlay's values as per-vertex
/// attributes, and write the result to `surfout`.
///
/// Both surfaces and the overlay are resolved through `dispatcher`, so the
/// overlay may be any format whose reader yields attributes (`.mgh` by default).
/// Returns the surface as written.
///
/// # Errors
/// - `ShapeError::UnsupportedExtension` if no reader/writer handles a path
/// - `ShapeError::MissingAttributes` if the overlay reader yields no values
/// - `ShapeError::InvalidAttachment` if the overlay length is not the vertex count;
///   nothing is written in that case
pub fn surface_format<P, Q>(
    dispatcher: &FormatDispatcher,
    surfin: P,
    surfout: Q,
    overlay: Option<&Path>,
) -> Result<MeshPayload>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (surfin, surfout) = (surfin.as_ref(), surfout.as_ref());
    let mut surface = dispatcher.read(surfin)?;

    if let Some(overlay) = overlay {
        let values = dispatcher
            .read(overlay)?
            .attributes
            .ok_or_else(|| ShapeError::MissingAttributes {
                path: overlay.to_path_buf(),
            })?;
        surface.attach_overlay(values)?;
    }

    dispatcher.write(surfout, &surface)?;
    info!(
        input = %surfin.display(),
        output = %surfout.display(),
        overlay = overlay.is_some(),
        "Conversion complete"
    );
    Ok(surface)
}
