//! Frame sources.
//!
//! A [`FrameSource`] hands out decoded frames by index. Its format is
//! constant for the lifetime of the source. Two sources ship here:
//!
//! - [`RawPlanarSource`] - headerless planar file, frames stored back to back
//! - [`TestPatternSource`] - synthetic ramps in any [`FrameFormat`]

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::format::{ColorRange, FrameFormat, PLANE_COUNT, SampleEncoding};
use crate::{CoreError, CoreResult, Frame};

/// Producer of decoded frames.
pub trait FrameSource {
    /// Format shared by every frame.
    fn format(&self) -> &FrameFormat;

    /// Number of frames available.
    fn num_frames(&self) -> usize;

    /// Returns planes 0, 1, 2 of frame `index`.
    ///
    /// There is no plane selection: every call yields all three planes in
    /// that fixed order, the layout [`Frame::new`] checks against the format.
    fn get_planes(&mut self, index: usize) -> CoreResult<Frame>;

    /// Checks `index` against [`num_frames`](Self::num_frames).
    fn check_index(&self, index: usize) -> CoreResult<()> {
        let count = self.num_frames();
        if index >= count {
            return Err(CoreError::FrameOutOfRange { index, count });
        }
        Ok(())
    }
}

// =============================================================================
// Raw planar file
// =============================================================================

/// Headerless planar file (`.yuv` style): plane 0, 1, 2 of frame 0, then
/// frame 1, and so on.
///
/// The format is not stored in the file; the caller supplies it.
#[derive(Debug)]
pub struct RawPlanarSource {
    path: PathBuf,
    reader: BufReader<File>,
    format: FrameFormat,
    frame_len: u64,
    num_frames: usize,
}

impl RawPlanarSource {
    /// Opens `path` and interprets it with `format`.
    ///
    /// Trailing bytes that do not form a full frame are ignored.
    pub fn open<P: AsRef<Path>>(path: P, format: FrameFormat) -> CoreResult<Self> {
        format.validate()?;
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let len = file.metadata()?.len();
        let frame_len = format.frame_len() as u64;
        let num_frames = (len / frame_len) as usize;

        debug!(
            path = %path.display(),
            frame_len,
            num_frames,
            "opened raw planar source"
        );

        Ok(Self {
            path,
            reader: BufReader::new(file),
            format,
            frame_len,
            num_frames,
        })
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for RawPlanarSource {
    fn format(&self) -> &FrameFormat {
        &self.format
    }

    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn get_planes(&mut self, index: usize) -> CoreResult<Frame> {
        self.check_index(index)?;
        self.reader.seek(SeekFrom::Start(index as u64 * self.frame_len))?;

        let mut planes = Vec::with_capacity(PLANE_COUNT);
        for plane in 0..PLANE_COUNT {
            let mut buf = vec![0u8; self.format.plane_len(plane)];
            self.reader.read_exact(&mut buf)?;
            planes.push(buf);
        }

        Frame::new(index, self.format, planes)
    }
}

// =============================================================================
// Test pattern
// =============================================================================

/// Synthetic source producing ramps, useful without real footage.
///
/// Plane 0 is a horizontal ramp that scrolls by one sample per frame,
/// plane 1 a vertical ramp and plane 2 a reversed horizontal ramp. Integer
/// samples respect the format's [`ColorRange`]; float samples are written
/// as normalized [0, 1] values.
#[derive(Debug, Clone)]
pub struct TestPatternSource {
    format: FrameFormat,
    num_frames: usize,
}

impl TestPatternSource {
    /// Creates a pattern source with `num_frames` frames.
    pub fn new(format: FrameFormat, num_frames: usize) -> Self {
        Self { format, num_frames }
    }

    fn render_plane(&self, plane: usize, index: usize) -> Vec<u8> {
        let size = self.format.planes[plane];
        let (w, h) = (size.width as usize, size.height as usize);
        let bps = self.format.bytes_per_sample();
        let mut out = Vec::with_capacity(w * h * bps);

        let span_x = (w.saturating_sub(1)).max(1) as f64;
        let span_y = (h.saturating_sub(1)).max(1) as f64;

        for y in 0..h {
            for x in 0..w {
                let v = match plane {
                    0 => ((x + index) % w) as f64 / span_x,
                    1 => y as f64 / span_y,
                    _ => 1.0 - x as f64 / span_x,
                };
                self.push_sample(&mut out, plane, v.clamp(0.0, 1.0));
            }
        }
        out
    }

    fn push_sample(&self, out: &mut Vec<u8>, plane: usize, v: f64) {
        let fmt = &self.format;
        match fmt.encoding {
            SampleEncoding::Float if fmt.bit_depth == 16 => {
                out.extend_from_slice(&half::f16::from_f64(v).to_le_bytes());
            }
            SampleEncoding::Float => {
                out.extend_from_slice(&(v as f32).to_le_bytes());
            }
            SampleEncoding::Integer => {
                let (lo, hi) = integer_bounds(fmt, plane);
                let code = (lo + v * (hi - lo)).round() as u32;
                if fmt.bytes_per_sample() == 1 {
                    out.push(code as u8);
                } else {
                    out.extend_from_slice(&(code as u16).to_le_bytes());
                }
            }
        }
    }
}

/// Code range used for integer samples of `plane`.
fn integer_bounds(fmt: &FrameFormat, plane: usize) -> (f64, f64) {
    let max = ((1u64 << fmt.bit_depth) - 1) as f64;
    if fmt.color_range == ColorRange::Full {
        return (0.0, max);
    }
    // Studio swing scales with bit depth: 16..235 luma (and limited RGB),
    // 16..240 chroma at 8 bits.
    let scale = (1u64 << fmt.bit_depth) as f64 / 256.0;
    let hi = if plane == 0 || !fmt.color_space.is_ycbcr() { 235.0 } else { 240.0 };
    (16.0 * scale, hi * scale)
}

impl FrameSource for TestPatternSource {
    fn format(&self) -> &FrameFormat {
        &self.format
    }

    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn get_planes(&mut self, index: usize) -> CoreResult<Frame> {
        self.check_index(index)?;
        let planes = (0..PLANE_COUNT)
            .map(|p| self.render_plane(p, index))
            .collect();
        Frame::new(index, self.format, planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChromaSubsampling, ColorSpace};

    fn fmt(bits: u32, encoding: SampleEncoding, range: ColorRange) -> FrameFormat {
        FrameFormat::yuv(8, 4, ChromaSubsampling::Cs420, ColorSpace::Bt709, range, bits, encoding)
            .unwrap()
    }

    #[test]
    fn pattern_8bit_limited_range() {
        let mut src = TestPatternSource::new(fmt(8, SampleEncoding::Integer, ColorRange::Limited), 2);
        let frame = src.get_planes(0).unwrap();
        let luma = frame.plane(0);
        assert_eq!(luma[0], 16);
        assert_eq!(luma[7], 235);
        assert!(luma.iter().all(|&v| (16..=235).contains(&v)));
    }

    #[test]
    fn pattern_10bit_is_little_endian() {
        let mut src = TestPatternSource::new(fmt(10, SampleEncoding::Integer, ColorRange::Full), 1);
        let frame = src.get_planes(0).unwrap();
        let luma = frame.plane(0);
        let last = u16::from_le_bytes([luma[14], luma[15]]);
        assert_eq!(last, 1023);
    }

    #[test]
    fn pattern_scrolls_per_frame() {
        let mut src = TestPatternSource::new(fmt(8, SampleEncoding::Integer, ColorRange::Full), 3);
        let a = src.get_planes(0).unwrap();
        let b = src.get_planes(1).unwrap();
        assert_eq!(a.plane(0)[1], b.plane(0)[0]);
        assert_eq!(a.plane(1), b.plane(1));
    }

    #[test]
    fn pattern_float_half() {
        let mut src = TestPatternSource::new(fmt(16, SampleEncoding::Float, ColorRange::Full), 1);
        let frame = src.get_planes(0).unwrap();
        let p = frame.plane(0);
        let last = half::f16::from_le_bytes([p[14], p[15]]).to_f32();
        assert!((last - 1.0).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_index() {
        let mut src = TestPatternSource::new(fmt(8, SampleEncoding::Integer, ColorRange::Full), 1);
        assert!(matches!(
            src.get_planes(1),
            Err(CoreError::FrameOutOfRange { index: 1, count: 1 })
        ));
    }
}
