//! Color transforms between ICC profiles.

use crate::{IccError, IccResult, Intent, Profile};
use lcms2::Transform as LcmsTransform;

/// An RGB → RGB color transform between two ICC profiles.
///
/// Operates on 32-bit float triples in the nominal `[0, 1]` range.
///
/// # Example
///
/// ```rust
/// use lutview_icc::{Intent, Profile, StandardProfile, Transform};
///
/// let p3 = StandardProfile::DisplayP3.to_profile().unwrap();
/// let transform = Transform::new(&Profile::srgb(), &p3, Intent::RelativeColorimetric).unwrap();
///
/// let mut pixels = [[0.5f32, 0.3, 0.2]];
/// transform.apply(&mut pixels);
/// ```
pub struct Transform {
    inner: LcmsTransform<[f32; 3], [f32; 3]>,
}

impl Transform {
    /// Creates a new transform between two profiles.
    ///
    /// # Errors
    ///
    /// [`IccError::NotRgb`] if either side is not an RGB profile,
    /// [`IccError::TransformFailed`] if Little CMS rejects the pair.
    pub fn new(source: &Profile, dest: &Profile, intent: Intent) -> IccResult<Self> {
        source.ensure_rgb()?;
        dest.ensure_rgb()?;

        let inner = LcmsTransform::new(
            &source.inner,
            lcms2::PixelFormat::RGB_FLT,
            &dest.inner,
            lcms2::PixelFormat::RGB_FLT,
            intent.into(),
        )
        .map_err(|e| IccError::TransformFailed(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Applies the transform to RGB pixels in-place.
    pub fn apply(&self, pixels: &mut [[f32; 3]]) {
        self.inner.transform_in_place(pixels);
    }

    /// Applies the transform to a single RGB pixel in-place.
    pub fn apply_pixel(&self, rgb: &mut [f32; 3]) {
        self.inner.transform_in_place(std::slice::from_mut(rgb));
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StandardProfile;

    #[test]
    fn test_identity() {
        let srgb = Profile::srgb();
        let transform = Transform::new(&srgb, &srgb, Intent::RelativeColorimetric).unwrap();

        let original = [0.5f32, 0.3, 0.2];
        let mut pixels = [original];
        transform.apply(&mut pixels);

        for c in 0..3 {
            assert!((pixels[0][c] - original[c]).abs() < 0.01);
        }
    }

    #[test]
    fn test_srgb_to_p3_moves_saturated_red() {
        let p3 = StandardProfile::DisplayP3.to_profile().unwrap();
        let transform = Transform::new(&Profile::srgb(), &p3, Intent::RelativeColorimetric).unwrap();

        let mut red = [1.0f32, 0.0, 0.0];
        transform.apply_pixel(&mut red);

        // sRGB red sits inside the P3 gamut, so it needs less than full P3 red.
        assert!(red[0] < 0.99);
        assert!(red[1] > 0.01);
    }

    #[test]
    fn test_linearize() {
        let linear = StandardProfile::LinearSrgb.to_profile().unwrap();
        let transform = Transform::new(&Profile::srgb(), &linear, Intent::Perceptual).unwrap();

        let mut pixel = [0.5f32, 0.5, 0.5];
        transform.apply_pixel(&mut pixel);
        assert!(pixel[0] < 0.5);
    }
}
