//! Plane transfer formats and shader uniforms.

use bytemuck::{Pod, Zeroable};
use lutview_core::{
    ColorRange, ColorSpace, Frame, FrameFormat, PLANE_COUNT, PlaneSize, SampleEncoding,
};

use crate::GpuResult;

/// Single-channel texture format a plane is uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneFormat {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer (9..=16 bit samples).
    U16,
    /// IEEE half float.
    F16,
    /// IEEE single float.
    F32,
}

impl PlaneFormat {
    /// Picks the transfer format for a sample encoding and bit depth.
    ///
    /// Float samples map to the float format of their width; integer
    /// samples above 8 bits use 16-bit storage, anything else 8-bit.
    pub fn select(encoding: SampleEncoding, bit_depth: u32) -> GpuResult<Self> {
        // Rejects unsupported depths.
        encoding.bytes_per_sample(bit_depth)?;
        Ok(match encoding {
            SampleEncoding::Float if bit_depth == 16 => Self::F16,
            SampleEncoding::Float => Self::F32,
            SampleEncoding::Integer if bit_depth > 8 => Self::U16,
            SampleEncoding::Integer => Self::U8,
        })
    }

    /// Bytes per texel.
    pub const fn bytes_per_texel(self) -> u32 {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::F16 => 2,
            Self::F32 => 4,
        }
    }

    /// Whether the shader reads this format as float.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F16 | Self::F32)
    }

    /// The wgpu texture format.
    #[cfg(feature = "wgpu")]
    pub fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            Self::U8 => wgpu::TextureFormat::R8Uint,
            Self::U16 => wgpu::TextureFormat::R16Uint,
            Self::F16 => wgpu::TextureFormat::R16Float,
            Self::F32 => wgpu::TextureFormat::R32Float,
        }
    }
}

/// Uniform block shared by both fragment variants.
///
/// Layout matches `Params` in the WGSL source.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct ShaderParams {
    pub color_space: u32,
    pub color_range: u32,
    pub bit_depth: u32,
    pub _pad: u32,
}

impl ShaderParams {
    pub fn from_format(format: &FrameFormat) -> Self {
        Self {
            color_space: format.color_space.code(),
            color_range: format.color_range.code(),
            bit_depth: format.bit_depth,
            _pad: 0,
        }
    }
}

impl Default for ShaderParams {
    /// Full-range 8-bit RGB.
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Rgb.code(),
            color_range: ColorRange::Full.code(),
            bit_depth: 8,
            _pad: 0,
        }
    }
}

/// One plane ready for texture upload.
#[derive(Debug, Clone, Copy)]
pub struct PlaneUpload<'a> {
    pub size: PlaneSize,
    pub format: PlaneFormat,
    pub data: &'a [u8],
}

impl PlaneUpload<'_> {
    /// Bytes per texture row.
    pub fn bytes_per_row(&self) -> u32 {
        self.size.width * self.format.bytes_per_texel()
    }
}

/// Everything the backend needs to upload one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameUpload<'a> {
    pub index: usize,
    pub planes: [PlaneUpload<'a>; PLANE_COUNT],
    pub params: ShaderParams,
}

impl<'a> FrameUpload<'a> {
    /// Borrows `frame` for upload, choosing the per-plane transfer format.
    pub fn from_frame(frame: &'a Frame) -> GpuResult<Self> {
        let format = frame.format();
        let plane_format = PlaneFormat::select(format.encoding, format.bit_depth)?;
        let plane = |i: usize| PlaneUpload {
            size: frame.plane_size(i),
            format: plane_format,
            data: frame.plane(i),
        };

        Ok(Self {
            index: frame.index(),
            planes: [plane(0), plane(1), plane(2)],
            params: ShaderParams::from_format(format),
        })
    }

    /// Whether the planes are float.
    pub fn is_float(&self) -> bool {
        self.planes[0].format.is_float()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GpuError;

    #[test]
    fn test_select() {
        use SampleEncoding::*;
        assert_eq!(PlaneFormat::select(Integer, 8).unwrap(), PlaneFormat::U8);
        assert_eq!(PlaneFormat::select(Integer, 1).unwrap(), PlaneFormat::U8);
        assert_eq!(PlaneFormat::select(Integer, 9).unwrap(), PlaneFormat::U16);
        assert_eq!(PlaneFormat::select(Integer, 10).unwrap(), PlaneFormat::U16);
        assert_eq!(PlaneFormat::select(Integer, 16).unwrap(), PlaneFormat::U16);
        assert_eq!(PlaneFormat::select(Float, 16).unwrap(), PlaneFormat::F16);
        assert_eq!(PlaneFormat::select(Float, 32).unwrap(), PlaneFormat::F32);
        assert!(matches!(PlaneFormat::select(Integer, 17), Err(GpuError::Frame(_))));
        assert!(PlaneFormat::select(Float, 8).is_err());
    }

    #[test]
    fn test_params_layout() {
        assert_eq!(std::mem::size_of::<ShaderParams>(), 16);
        let format = FrameFormat::yuv(
            8,
            8,
            lutview_core::ChromaSubsampling::Cs420,
            ColorSpace::Bt2020,
            ColorRange::Limited,
            10,
            SampleEncoding::Integer,
        )
        .unwrap();
        let params = ShaderParams::from_format(&format);
        assert_eq!(bytemuck::cast::<_, [u32; 4]>(params), [3, 0, 10, 0]);
    }
}
