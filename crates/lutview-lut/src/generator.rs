//! Display LUT generation.

use std::path::Path;

use lutview_icc::{Intent, Profile, Transform};
use tracing::{debug, info};

use crate::color_cube::check_resolution;
use crate::{ColorCube, LutResult};

/// Default edge resolution for profile-derived LUTs.
pub const DEFAULT_RESOLUTION: usize = 65;

/// Builds display LUTs from ICC profiles.
///
/// The cube maps sRGB content to the display's native RGB: each identity
/// entry is pushed through an sRGB → display transform.
///
/// # Example
///
/// ```rust
/// use lutview_lut::LutGenerator;
///
/// // No profile: the 2×2×2 identity cube, whatever size was asked for.
/// let cube = LutGenerator::new().generate(65, None).unwrap();
/// assert_eq!(cube.resolution(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LutGenerator {
    intent: Intent,
}

impl LutGenerator {
    /// Generator with the default absolute colorimetric intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rendering intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Rendering intent used for transforms.
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Generates the LUT for a display profile file.
    ///
    /// Without a profile the resolution is forced to 2 and no transform
    /// runs. With a profile the cube has resolution `n`.
    ///
    /// # Errors
    ///
    /// [`LutError::InvalidSize`](crate::LutError::InvalidSize) for `n < 2`;
    /// [`LutError::Transform`](crate::LutError::Transform) if the profile
    /// cannot be loaded or is not RGB.
    pub fn generate(&self, n: usize, profile: Option<&Path>) -> LutResult<ColorCube> {
        check_resolution(n)?;
        let Some(path) = profile else {
            debug!(requested = n, "no display profile, using identity LUT");
            return Ok(ColorCube::unit());
        };

        let icc = Profile::from_file(path)?;
        info!(
            profile = %path.display(),
            description = %icc.description(),
            resolution = n,
            intent = %self.intent,
            "generating display LUT"
        );
        self.generate_with_profile(n, &icc)
    }

    /// Generates an `n`-resolution LUT for an already loaded profile.
    pub fn generate_with_profile(&self, n: usize, display: &Profile) -> LutResult<ColorCube> {
        let identity = ColorCube::identity(n)?;
        let transform = Transform::new(&Profile::srgb(), display, self.intent)?;

        let mut rgb: Vec<[f32; 3]> = identity
            .as_bytes()
            .chunks_exact(3)
            .map(|c| [normalize(c[0]), normalize(c[1]), normalize(c[2])])
            .collect();
        transform.apply(&mut rgb);

        let data = rgb
            .iter()
            .flat_map(|px| px.map(quantize))
            .collect::<Vec<u8>>();
        ColorCube::from_bytes(n, data)
    }
}

#[inline]
fn normalize(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps() {
        assert_eq!(quantize(-0.2), 0);
        assert_eq!(quantize(1.3), 255);
        assert_eq!(quantize(0.5), 128);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn no_profile_forces_unit_cube() {
        let generator = LutGenerator::new();
        for n in [2, 3, 17, 65] {
            assert_eq!(generator.generate(n, None).unwrap(), ColorCube::unit());
        }
        assert!(generator.generate(1, None).is_err());
    }
}
