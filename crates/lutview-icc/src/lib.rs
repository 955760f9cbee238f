//! # lutview-icc
//!
//! ICC color profile support for display calibration LUTs.
//!
//! This crate is the color-transform engine behind lutview's LUT
//! generator. It wraps Little CMS 2 and exposes only what a display LUT
//! needs: load a display profile, build an sRGB → display transform, and
//! push RGB triples through it.
//!
//! # Example
//!
//! ```rust,no_run
//! use lutview_icc::{Intent, Profile, Transform};
//! use std::path::Path;
//!
//! let display = Profile::from_file(Path::new("monitor.icc")).unwrap();
//! let transform = Transform::new(&Profile::srgb(), &display, Intent::AbsoluteColorimetric).unwrap();
//!
//! let mut pixels = vec![[0.5f32, 0.3, 0.2]; 100];
//! transform.apply(&mut pixels);
//! ```
//!
//! # Built-in profiles
//!
//! [`StandardProfile`] builds sRGB, linear sRGB, Adobe RGB, Display P3 and
//! Rec. 2020 in memory, which is handy for emulating a display without a
//! profile file.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod profile;
mod standard;
mod transform;

pub use error::{IccError, IccResult};
pub use profile::Profile;
pub use standard::StandardProfile;
pub use transform::Transform;

use std::fmt;
use std::str::FromStr;

/// Rendering intent for color transformations.
///
/// Determines how out-of-gamut colors are handled during conversion.
/// Display LUTs default to [`Intent::AbsoluteColorimetric`] so that the
/// preview reproduces the source white point on the target display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// Compresses the source gamut into the destination gamut.
    Perceptual,

    /// Maps source white to destination white, clips out-of-gamut colors.
    RelativeColorimetric,

    /// Maintains saturation at the expense of accuracy.
    Saturation,

    /// No white point adaptation; colors are reproduced as measured.
    #[default]
    AbsoluteColorimetric,
}

impl From<Intent> for lcms2::Intent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Perceptual => lcms2::Intent::Perceptual,
            Intent::RelativeColorimetric => lcms2::Intent::RelativeColorimetric,
            Intent::Saturation => lcms2::Intent::Saturation,
            Intent::AbsoluteColorimetric => lcms2::Intent::AbsoluteColorimetric,
        }
    }
}

impl FromStr for Intent {
    type Err = IccError;

    fn from_str(s: &str) -> IccResult<Self> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "perceptual" => Ok(Self::Perceptual),
            "relative" | "relativecolorimetric" => Ok(Self::RelativeColorimetric),
            "saturation" => Ok(Self::Saturation),
            "absolute" | "absolutecolorimetric" => Ok(Self::AbsoluteColorimetric),
            _ => Err(IccError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Perceptual => "perceptual",
            Self::RelativeColorimetric => "relative",
            Self::Saturation => "saturation",
            Self::AbsoluteColorimetric => "absolute",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intent_is_absolute() {
        assert_eq!(Intent::default(), Intent::AbsoluteColorimetric);
    }

    #[test]
    fn parse_intent() {
        assert_eq!("Relative-Colorimetric".parse::<Intent>().unwrap(), Intent::RelativeColorimetric);
        assert_eq!("absolute".parse::<Intent>().unwrap(), Intent::AbsoluteColorimetric);
        assert!("vivid".parse::<Intent>().is_err());
    }
}
