//! CPU-side PNG rendering of engine state.
//!
//! Feature-gated behind `png` (default on) so embedders that only need
//! [`crate::pixel`] do not pull in the `image` crate.

use faultline_core::SceneError;
use std::path::Path;

use crate::pixel::Raster;
use crate::EngineKind;

/// Writes an RGBA raster as a PNG image.
///
/// Returns `SceneError::InvalidParameter` for an empty or oversized raster,
/// or `SceneError::Io` on write failure.
pub fn write_raster(raster: &Raster, path: &Path) -> Result<(), SceneError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(SceneError::invalid("snapshot size must be at least 1x1"));
    }
    let w = u32::try_from(raster.width)
        .map_err(|_| SceneError::invalid(format!("width {} overflows u32", raster.width)))?;
    let h = u32::try_from(raster.height)
        .map_err(|_| SceneError::invalid(format!("height {} overflows u32", raster.height)))?;
    let img = image::RgbaImage::from_raw(w, h, raster.rgba.clone())
        .ok_or_else(|| SceneError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SceneError::Io(e.to_string()))
}

/// Renders `engine` (see [`EngineKind::raster`]) and writes it as a PNG.
pub fn write_png(engine: &EngineKind, size: usize, path: &Path) -> Result<(), SceneError> {
    write_raster(&engine.raster(size), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_png_terrain_round_trip() {
        let engine = EngineKind::from_name("terrain", 5, &json!({"div": 15})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.png");

        write_png(&engine, 0, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 16);
        assert_eq!(img.as_raw(), &engine.raster(0).rgba);
    }

    #[test]
    fn write_png_particles_uses_requested_size() {
        let engine = EngineKind::from_name("particles", 5, &json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("particles.png");

        write_png(&engine, 40, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (40, 40));
    }

    #[test]
    fn zero_size_particles_snapshot_is_rejected() {
        let engine = EngineKind::from_name("particles", 5, &json!({})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = write_png(&engine, 0, &dir.path().join("empty.png"));
        assert!(matches!(result, Err(SceneError::InvalidParameter(_))));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let engine = EngineKind::from_name("terrain", 5, &json!({"div": 2})).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(
            write_png(&engine, 0, &path),
            Err(SceneError::Io(_))
        ));
    }
}
