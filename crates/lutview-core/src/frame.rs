//! Decoded planar frames.

use crate::format::{FrameFormat, PLANE_COUNT, PlaneSize};
use crate::{CoreError, CoreResult};

/// One decoded video frame: three raw sample planes plus their format.
///
/// Planes are stored in fixed channel order (0, 1, 2). Multi-byte samples
/// are little-endian. Construction validates that every buffer matches the
/// geometry and sample size declared by the [`FrameFormat`].
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    format: FrameFormat,
    planes: [Vec<u8>; PLANE_COUNT],
}

impl Frame {
    /// Creates a frame, checking the format, plane count and byte lengths.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutview_core::{ChromaSubsampling, ColorRange, ColorSpace, Frame, FrameFormat, SampleEncoding};
    ///
    /// let format = FrameFormat::yuv(
    ///     4, 2, ChromaSubsampling::Cs420,
    ///     ColorSpace::Bt709, ColorRange::Limited, 8, SampleEncoding::Integer,
    /// ).unwrap();
    /// let frame = Frame::new(0, format, vec![vec![16; 8], vec![128; 2], vec![128; 2]]).unwrap();
    /// assert_eq!(frame.plane(0).len(), 8);
    /// ```
    pub fn new(index: usize, format: FrameFormat, planes: Vec<Vec<u8>>) -> CoreResult<Self> {
        format.validate()?;
        let planes: [Vec<u8>; PLANE_COUNT] =
            planes.try_into().map_err(|p: Vec<Vec<u8>>| CoreError::PlaneCount {
                expected: PLANE_COUNT,
                actual: p.len(),
            })?;

        for (plane, data) in planes.iter().enumerate() {
            let size = format.planes[plane];
            let expected = format.plane_len(plane);
            if data.len() != expected {
                return Err(CoreError::PlaneSize {
                    plane,
                    width: size.width,
                    height: size.height,
                    expected,
                    actual: data.len(),
                });
            }
        }

        Ok(Self { index, format, planes })
    }

    /// Frame index within its source.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Format shared by all frames of the source.
    #[inline]
    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    /// Raw bytes of plane `i`.
    #[inline]
    pub fn plane(&self, i: usize) -> &[u8] {
        &self.planes[i]
    }

    /// Size of plane `i`.
    #[inline]
    pub fn plane_size(&self, i: usize) -> PlaneSize {
        self.format.planes[i]
    }

    /// Iterates over `(size, bytes)` for planes 0, 1, 2.
    pub fn planes(&self) -> impl Iterator<Item = (PlaneSize, &[u8])> {
        self.format
            .planes
            .iter()
            .copied()
            .zip(self.planes.iter().map(Vec::as_slice))
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("format", &self.format)
            .field("bytes", &self.format.frame_len())
            .finish()
    }
}
