//! Elevation-band vertex coloring.
//!
//! Each vertex's final elevation falls into one of five ordered bands chosen
//! by four descending thresholds. This is presentation data only; it never
//! feeds back into geometry.

use faultline_core::{SceneError, Srgb};

use crate::heightfield::Heightfield;

/// Highest band.
pub const PINK: Srgb = Srgb::from_rgb8(255, 174, 174);
pub const BROWN: Srgb = Srgb::from_rgb8(85, 65, 36);
pub const GREEN: Srgb = Srgb::from_rgb8(30, 196, 100);
pub const PURPLE: Srgb = Srgb::from_rgb8(172, 139, 204);
/// Lowest band.
pub const BLUE: Srgb = Srgb::from_rgb8(33, 107, 214);

/// Default thresholds, tuned for 100 fault planes of delta 0.005.
pub const DEFAULT_THRESHOLDS: [f64; 4] = [0.06, 0.03, 0.0, -0.03];

/// Thresholds and palette for [`assign_elevation_colors`].
///
/// A vertex with elevation `z` takes `palette[k]` for the first `k` with
/// `z > thresholds[k]`, and `palette[4]` if none match.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationBands {
    pub thresholds: [f64; 4],
    pub palette: [Srgb; 5],
}

impl Default for ElevationBands {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS,
            palette: [PINK, BROWN, GREEN, PURPLE, BLUE],
        }
    }
}

impl ElevationBands {
    /// Builds bands from a threshold slice and optional hex palette.
    ///
    /// Returns `SceneError::InvalidParameter` unless exactly four thresholds
    /// are given, and `SceneError::InvalidColor` for a bad hex string.
    pub fn from_parts(thresholds: &[f64], palette: Option<&[String]>) -> Result<Self, SceneError> {
        let thresholds: [f64; 4] = thresholds.try_into().map_err(|_| {
            SceneError::invalid(format!(
                "expected 4 elevation thresholds, got {}",
                thresholds.len()
            ))
        })?;
        let palette = match palette {
            None => Self::default().palette,
            Some(hexes) => {
                let colors = hexes
                    .iter()
                    .map(|h| Srgb::from_hex(h))
                    .collect::<Result<Vec<_>, _>>()?;
                colors.try_into().map_err(|c: Vec<Srgb>| {
                    SceneError::invalid(format!("expected 5 palette colors, got {}", c.len()))
                })?
            }
        };
        let bands = Self {
            thresholds,
            palette,
        };
        bands.validate()?;
        Ok(bands)
    }

    /// Requires finite, strictly descending thresholds.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.thresholds.iter().any(|t| !t.is_finite()) {
            return Err(SceneError::invalid("elevation thresholds must be finite"));
        }
        if self.thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(SceneError::invalid(format!(
                "elevation thresholds must be strictly descending, got {:?}",
                self.thresholds
            )));
        }
        Ok(())
    }

    /// Band index in `0..5` for elevation `z` (0 is highest).
    pub fn band(&self, z: f64) -> usize {
        self.thresholds
            .iter()
            .position(|&t| z > t)
            .unwrap_or(self.thresholds.len())
    }

    pub fn color(&self, z: f64) -> Srgb {
        self.palette[self.band(z)]
    }
}

/// Assigns one band color per vertex from its current elevation.
pub fn assign_elevation_colors(hf: &mut Heightfield, bands: &ElevationBands) {
    let colors = hf.vertices.iter().map(|v| bands.color(v.z)).collect();
    hf.colors = Some(colors);
    log::info!("terrain: assigned elevation colors");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::Bounds;

    #[test]
    fn bands_are_picked_top_down() {
        let bands = ElevationBands::default();
        assert_eq!(bands.band(0.5), 0);
        assert_eq!(bands.band(0.05), 1);
        assert_eq!(bands.band(0.01), 2);
        assert_eq!(bands.band(-0.01), 3);
        assert_eq!(bands.band(-0.5), 4);
    }

    #[test]
    fn threshold_value_itself_falls_into_lower_band() {
        let bands = ElevationBands::default();
        assert_eq!(bands.band(0.0), 3);
        assert_eq!(bands.band(0.06), 1);
    }

    #[test]
    fn default_palette_runs_pink_to_blue() {
        let bands = ElevationBands::default();
        assert_eq!(bands.color(1.0), PINK);
        assert_eq!(bands.color(-1.0), BLUE);
    }

    #[test]
    fn flat_grid_is_all_purple() {
        let mut hf = Heightfield::generate(3, Bounds::new(0.0, 1.0, 0.0, 1.0)).unwrap();
        assign_elevation_colors(&mut hf, &ElevationBands::default());
        let colors = hf.colors().unwrap();
        assert_eq!(colors.len(), 16);
        assert!(colors.iter().all(|&c| c == PURPLE));
    }

    #[test]
    fn colors_follow_vertex_elevations() {
        let mut hf = Heightfield::generate(1, Bounds::new(0.0, 1.0, 0.0, 1.0)).unwrap();
        for (v, z) in hf.vertices.iter_mut().zip([0.2, 0.04, 0.01, -0.2]) {
            v.z = z;
        }
        assign_elevation_colors(&mut hf, &ElevationBands::default());
        assert_eq!(hf.colors().unwrap(), [PINK, BROWN, GREEN, BLUE]);
    }

    #[test]
    fn from_parts_with_custom_palette() {
        let hexes: Vec<String> = ["#ffffff", "#cccccc", "#888888", "#444444", "#000000"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let bands = ElevationBands::from_parts(&[3.0, 2.0, 1.0, 0.0], Some(hexes.as_slice())).unwrap();
        assert_eq!(bands.color(5.0), Srgb::from_rgb8(255, 255, 255));
        assert_eq!(bands.color(-5.0), Srgb::from_rgb8(0, 0, 0));
    }

    #[test]
    fn from_parts_rejects_wrong_threshold_count() {
        assert!(matches!(
            ElevationBands::from_parts(&[1.0, 0.0], None),
            Err(SceneError::InvalidParameter(_))
        ));
    }

    #[test]
    fn from_parts_rejects_short_palette() {
        let hexes = vec!["#ffffff".to_string()];
        assert!(ElevationBands::from_parts(&DEFAULT_THRESHOLDS, Some(hexes.as_slice())).is_err());
    }

    #[test]
    fn from_parts_rejects_bad_hex() {
        let hexes: Vec<String> = vec!["#zzzzzz".into(); 5];
        assert!(matches!(
            ElevationBands::from_parts(&DEFAULT_THRESHOLDS, Some(hexes.as_slice())),
            Err(SceneError::InvalidColor(_))
        ));
    }

    #[test]
    fn validate_rejects_ascending_thresholds() {
        let bands = ElevationBands {
            thresholds: [0.0, 0.1, 0.2, 0.3],
            ..ElevationBands::default()
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn validate_rejects_nan_threshold() {
        let bands = ElevationBands {
            thresholds: [0.3, f64::NAN, 0.1, 0.0],
            ..ElevationBands::default()
        };
        assert!(bands.validate().is_err());
    }
}
