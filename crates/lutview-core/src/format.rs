//! Frame format descriptors.
//!
//! A [`FrameFormat`] carries everything the renderer needs to interpret
//! three raw sample planes: per-plane geometry, [`ColorSpace`],
//! [`ColorRange`], bit depth and [`SampleEncoding`]. It is queried once per
//! video source and assumed constant for every frame of that source.
//!
//! # Shader codes
//!
//! Color space and range are closed enums with fixed integer codes. The
//! codes are what the preview shader receives, so they must not change:
//!
//! | enum | code |
//! |------|------|
//! | `ColorSpace::Rgb` | 0 |
//! | `ColorSpace::Bt601` | 1 |
//! | `ColorSpace::Bt709` | 2 |
//! | `ColorSpace::Bt2020` | 3 |
//! | `ColorRange::Limited` | 0 |
//! | `ColorRange::Full` | 1 |
//!
//! # Example
//!
//! ```rust
//! use lutview_core::{ChromaSubsampling, ColorRange, ColorSpace, FrameFormat, SampleEncoding};
//!
//! let format = FrameFormat::yuv(
//!     1920, 1080,
//!     ChromaSubsampling::Cs420,
//!     ColorSpace::Bt709,
//!     ColorRange::Limited,
//!     10,
//!     SampleEncoding::Integer,
//! ).unwrap();
//!
//! assert_eq!(format.planes[1].width, 960);
//! assert_eq!(format.bytes_per_sample(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Number of planes in every frame.
pub const PLANE_COUNT: usize = 3;

/// How samples are stored in a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleEncoding {
    /// Unsigned integer codes, `bit_depth` significant bits.
    #[default]
    Integer,
    /// IEEE float, pre-normalized to [0, 1].
    Float,
}

impl SampleEncoding {
    /// Lowercase name, used in messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }

    /// Bytes one sample occupies at the given bit depth.
    ///
    /// Integer samples up to 8 bits take one byte, up to 16 bits two.
    /// Float samples are 16-bit half or 32-bit single precision.
    pub fn bytes_per_sample(self, bits: u32) -> CoreResult<usize> {
        match (self, bits) {
            (Self::Integer, 1..=8) => Ok(1),
            (Self::Integer, 9..=16) => Ok(2),
            (Self::Float, 16) => Ok(2),
            (Self::Float, 32) => Ok(4),
            _ => Err(CoreError::UnsupportedBitDepth {
                bits,
                encoding: self.name(),
            }),
        }
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matrix used to reconstruct RGB from the three planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Planes already hold R, G, B.
    #[default]
    Rgb,
    /// ITU-R BT.601 Y'CbCr.
    Bt601,
    /// ITU-R BT.709 Y'CbCr.
    Bt709,
    /// ITU-R BT.2020 non-constant luminance Y'CbCr.
    Bt2020,
}

impl ColorSpace {
    /// Integer code passed to the shader.
    pub const fn code(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::Bt601 => 1,
            Self::Bt709 => 2,
            Self::Bt2020 => 3,
        }
    }

    /// Whether planes 1 and 2 carry chroma.
    pub const fn is_ycbcr(self) -> bool {
        !matches!(self, Self::Rgb)
    }
}

impl FromStr for ColorSpace {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "bt601" | "601" | "smpte170m" => Ok(Self::Bt601),
            "bt709" | "709" => Ok(Self::Bt709),
            "bt2020" | "2020" | "bt2020nc" => Ok(Self::Bt2020),
            _ => Err(CoreError::UnknownTag {
                kind: "color space",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb => "rgb",
            Self::Bt601 => "bt601",
            Self::Bt709 => "bt709",
            Self::Bt2020 => "bt2020",
        };
        f.write_str(name)
    }
}

/// Quantization range of integer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorRange {
    /// Studio swing (16-235 luma, 16-240 chroma at 8 bits).
    #[default]
    Limited,
    /// Full swing (0-255 at 8 bits).
    Full,
}

impl ColorRange {
    /// Integer code passed to the shader.
    pub const fn code(self) -> u32 {
        match self {
            Self::Limited => 0,
            Self::Full => 1,
        }
    }
}

impl FromStr for ColorRange {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "limited" | "tv" | "studio" => Ok(Self::Limited),
            "full" | "pc" | "jpeg" => Ok(Self::Full),
            _ => Err(CoreError::UnknownTag {
                kind: "color range",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Limited => "limited",
            Self::Full => "full",
        })
    }
}

/// Chroma subsampling of planes 1 and 2 relative to plane 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChromaSubsampling {
    /// No subsampling.
    #[default]
    Cs444,
    /// Half horizontal resolution.
    Cs422,
    /// Half horizontal and vertical resolution.
    Cs420,
}

impl ChromaSubsampling {
    /// Chroma plane size for a given luma size (rounding up).
    pub const fn chroma_size(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Cs444 => (width, height),
            Self::Cs422 => (width.div_ceil(2), height),
            Self::Cs420 => (width.div_ceil(2), height.div_ceil(2)),
        }
    }
}

impl FromStr for ChromaSubsampling {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "444" => Ok(Self::Cs444),
            "422" => Ok(Self::Cs422),
            "420" => Ok(Self::Cs420),
            _ => Err(CoreError::UnknownTag {
                kind: "chroma subsampling",
                value: s.to_string(),
            }),
        }
    }
}

/// Width and height of one plane, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneSize {
    /// Width in samples.
    pub width: u32,
    /// Height in samples.
    pub height: u32,
}

impl PlaneSize {
    /// Creates a plane size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of samples in the plane.
    #[inline]
    pub const fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<(u32, u32)> for PlaneSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Constant description of every frame produced by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    /// Geometry of planes 0, 1 and 2.
    pub planes: [PlaneSize; PLANE_COUNT],
    /// Matrix tag.
    pub color_space: ColorSpace,
    /// Range tag.
    pub color_range: ColorRange,
    /// Significant bits per sample.
    pub bit_depth: u32,
    /// Sample storage.
    pub encoding: SampleEncoding,
}

impl FrameFormat {
    /// Creates a format from explicit plane sizes.
    ///
    /// Fails if the bit depth is not valid for the encoding or a plane has a
    /// zero dimension.
    pub fn new(
        planes: [PlaneSize; PLANE_COUNT],
        color_space: ColorSpace,
        color_range: ColorRange,
        bit_depth: u32,
        encoding: SampleEncoding,
    ) -> CoreResult<Self> {
        let format = Self {
            planes,
            color_space,
            color_range,
            bit_depth,
            encoding,
        };
        format.validate()?;
        Ok(format)
    }

    /// Checks the bit depth against the encoding and rejects empty planes.
    ///
    /// Fields are public, so consumers of a format built elsewhere call this
    /// before sizing buffers from it.
    pub fn validate(&self) -> CoreResult<()> {
        self.encoding.bytes_per_sample(self.bit_depth)?;
        for (plane, size) in self.planes.iter().enumerate() {
            if size.width == 0 || size.height == 0 {
                return Err(CoreError::InvalidDimensions {
                    plane,
                    width: size.width,
                    height: size.height,
                });
            }
        }
        Ok(())
    }

    /// Creates a Y'CbCr (or planar RGB) format from the luma size and a
    /// subsampling scheme.
    pub fn yuv(
        width: u32,
        height: u32,
        subsampling: ChromaSubsampling,
        color_space: ColorSpace,
        color_range: ColorRange,
        bit_depth: u32,
        encoding: SampleEncoding,
    ) -> CoreResult<Self> {
        let (cw, ch) = subsampling.chroma_size(width, height);
        Self::new(
            [
                PlaneSize::new(width, height),
                PlaneSize::new(cw, ch),
                PlaneSize::new(cw, ch),
            ],
            color_space,
            color_range,
            bit_depth,
            encoding,
        )
    }

    /// Bytes per sample for this format.
    #[inline]
    pub fn bytes_per_sample(&self) -> usize {
        // Checked by `validate`.
        self.encoding.bytes_per_sample(self.bit_depth).unwrap_or(1)
    }

    /// Byte length of a single plane.
    #[inline]
    pub fn plane_len(&self, plane: usize) -> usize {
        self.planes[plane].sample_count() * self.bytes_per_sample()
    }

    /// Byte length of one whole frame (all planes).
    pub fn frame_len(&self) -> usize {
        (0..PLANE_COUNT).map(|p| self.plane_len(p)).sum()
    }

    /// Display size, taken from plane 0.
    #[inline]
    pub fn display_size(&self) -> PlaneSize {
        self.planes[0]
    }
}
