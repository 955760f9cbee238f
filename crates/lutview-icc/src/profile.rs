//! ICC profile wrapper.

use crate::{IccError, IccResult, StandardProfile};
use lcms2::{ColorSpaceSignature, Profile as LcmsProfile};
use std::path::Path;

/// An ICC color profile.
///
/// Display profiles are loaded from the path a profile resolver returns;
/// the sRGB source side of a display LUT comes from [`Profile::srgb`].
///
/// # Example
///
/// ```rust,no_run
/// use lutview_icc::Profile;
/// use std::path::Path;
///
/// let profile = Profile::from_file(Path::new("monitor.icc")).unwrap();
/// println!("Description: {}", profile.description());
/// ```
pub struct Profile {
    /// Internal lcms2 profile handle.
    pub(crate) inner: LcmsProfile,
}

impl Profile {
    /// Loads a profile from an ICC file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or contains invalid data.
    pub fn from_file(path: &Path) -> IccResult<Self> {
        let inner = LcmsProfile::new_file(path)
            .map_err(|e| IccError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(Self { inner })
    }

    /// Creates a profile from raw ICC data.
    pub fn from_icc(data: &[u8]) -> IccResult<Self> {
        let inner = LcmsProfile::new_icc(data)
            .map_err(|e| IccError::InvalidProfile(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates the IEC 61966-2-1 sRGB profile.
    ///
    /// ```rust
    /// use lutview_icc::Profile;
    ///
    /// assert!(Profile::srgb().is_rgb());
    /// ```
    pub fn srgb() -> Self {
        Self {
            inner: LcmsProfile::new_srgb(),
        }
    }

    /// Creates a profile from a built-in specification.
    pub fn from_standard(standard: StandardProfile) -> IccResult<Self> {
        standard.to_profile()
    }

    /// Returns the profile description.
    pub fn description(&self) -> String {
        self.inner
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .unwrap_or_default()
    }

    /// Returns the color space signature.
    pub fn color_space(&self) -> String {
        format!("{:?}", self.inner.color_space())
    }

    /// Returns true if this is an RGB profile.
    pub fn is_rgb(&self) -> bool {
        matches!(self.inner.color_space(), ColorSpaceSignature::RgbData)
    }

    /// Fails with [`IccError::NotRgb`] unless this is an RGB profile.
    ///
    /// Display LUTs are RGB → RGB, so a CMYK or gray profile assigned to a
    /// monitor is a construction error for that display.
    pub fn ensure_rgb(&self) -> IccResult<()> {
        if self.is_rgb() {
            Ok(())
        } else {
            Err(IccError::NotRgb(self.description()))
        }
    }

    /// Exports the profile as ICC data.
    pub fn to_icc(&self) -> IccResult<Vec<u8>> {
        self.inner
            .icc()
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }

    /// Writes the profile to an `.icc` file.
    pub fn save(&self, path: &Path) -> IccResult<()> {
        let data = self.to_icc()?;
        std::fs::write(path, data)
            .map_err(|e| IccError::CreateFailed(format!("{}: {}", path.display(), e)))
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("description", &self.description())
            .field("color_space", &self.color_space())
            .finish()
    }
}
