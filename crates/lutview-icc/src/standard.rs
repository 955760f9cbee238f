//! Built-in RGB display profiles.

use crate::{IccError, IccResult, Profile};
use lcms2::{CIExyY, CIExyYTRIPLE, Profile as LcmsProfile, ToneCurve};
use std::fmt;
use std::str::FromStr;

/// Display profiles that can be synthesized without an ICC file.
///
/// Used to preview how content would look on a display of a known
/// standard gamut when no measured profile is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardProfile {
    /// IEC 61966-2-1 sRGB.
    Srgb,
    /// Linear sRGB (gamma 1.0).
    LinearSrgb,
    /// Adobe RGB (1998).
    AdobeRgb,
    /// Display P3 (Apple).
    DisplayP3,
    /// ITU-R BT.2020.
    Rec2020,
}

impl StandardProfile {
    /// Every built-in profile, in listing order.
    pub const ALL: [StandardProfile; 5] = [
        StandardProfile::Srgb,
        StandardProfile::LinearSrgb,
        StandardProfile::AdobeRgb,
        StandardProfile::DisplayP3,
        StandardProfile::Rec2020,
    ];

    /// Short name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::LinearSrgb => "linear-srgb",
            Self::AdobeRgb => "adobe-rgb",
            Self::DisplayP3 => "display-p3",
            Self::Rec2020 => "rec2020",
        }
    }

    /// Builds the ICC profile for this standard.
    pub fn to_profile(self) -> IccResult<Profile> {
        let (primaries, gamma) = match self {
            Self::Srgb => return Ok(Profile::srgb()),
            Self::LinearSrgb => (srgb_primaries(), 1.0),
            Self::AdobeRgb => (
                CIExyYTRIPLE {
                    Red: CIExyY { x: 0.6400, y: 0.3300, Y: 1.0 },
                    Green: CIExyY { x: 0.2100, y: 0.7100, Y: 1.0 },
                    Blue: CIExyY { x: 0.1500, y: 0.0600, Y: 1.0 },
                },
                2.2,
            ),
            // sRGB transfer approximated by a pure power curve
            Self::DisplayP3 => (
                CIExyYTRIPLE {
                    Red: CIExyY { x: 0.680, y: 0.320, Y: 1.0 },
                    Green: CIExyY { x: 0.265, y: 0.690, Y: 1.0 },
                    Blue: CIExyY { x: 0.150, y: 0.060, Y: 1.0 },
                },
                2.2,
            ),
            Self::Rec2020 => (
                CIExyYTRIPLE {
                    Red: CIExyY { x: 0.708, y: 0.292, Y: 1.0 },
                    Green: CIExyY { x: 0.170, y: 0.797, Y: 1.0 },
                    Blue: CIExyY { x: 0.131, y: 0.046, Y: 1.0 },
                },
                2.4,
            ),
        };

        let curve = ToneCurve::new(gamma);
        let curves = [&curve, &curve, &curve];
        let inner = LcmsProfile::new_rgb(&d65_white(), &primaries, &curves)
            .map_err(|e| IccError::CreateFailed(format!("{}: {}", self.name(), e)))?;
        Ok(Profile { inner })
    }
}

impl FromStr for StandardProfile {
    type Err = IccError;

    fn from_str(s: &str) -> IccResult<Self> {
        match s.to_ascii_lowercase().replace(['-', '_', '.', ' '], "").as_str() {
            "srgb" => Ok(Self::Srgb),
            "linearsrgb" | "linear" => Ok(Self::LinearSrgb),
            "adobergb" | "adobe" => Ok(Self::AdobeRgb),
            "displayp3" | "p3" => Ok(Self::DisplayP3),
            "rec2020" | "bt2020" => Ok(Self::Rec2020),
            _ => Err(IccError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for StandardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// D65 white point.
fn d65_white() -> CIExyY {
    CIExyY { x: 0.3127, y: 0.3290, Y: 1.0 }
}

/// sRGB / Rec.709 primaries.
fn srgb_primaries() -> CIExyYTRIPLE {
    CIExyYTRIPLE {
        Red: CIExyY { x: 0.6400, y: 0.3300, Y: 1.0 },
        Green: CIExyY { x: 0.3000, y: 0.6000, Y: 1.0 },
        Blue: CIExyY { x: 0.1500, y: 0.0600, Y: 1.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_standards() {
        for std in StandardProfile::ALL {
            let profile = std.to_profile().unwrap();
            assert!(profile.is_rgb(), "{:?} should be RGB", std);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for std in StandardProfile::ALL {
            assert_eq!(std.name().parse::<StandardProfile>().unwrap(), std);
        }
        assert_eq!("P3".parse::<StandardProfile>().unwrap(), StandardProfile::DisplayP3);
        assert!(matches!(
            "prophoto".parse::<StandardProfile>(),
            Err(IccError::UnknownName(_))
        ));
    }
}
