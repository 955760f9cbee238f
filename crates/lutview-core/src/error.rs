//! Error types for lutview-core.
//!
//! Frame construction checks the cheap preconditions a [`FrameSource`]
//! is expected to uphold (plane count, plane sizes, bit depth) and reports
//! violations here instead of handing malformed buffers to the GPU.
//!
//! [`FrameSource`]: crate::FrameSource

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while building or reading frames.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Frame does not carry exactly three planes.
    #[error("expected {expected} planes, got {actual}")]
    PlaneCount {
        /// Required plane count.
        expected: usize,
        /// Plane count supplied.
        actual: usize,
    },

    /// Plane buffer length does not match its declared geometry.
    #[error("plane {plane}: expected {expected} bytes for {width}x{height}, got {actual}")]
    PlaneSize {
        /// Plane index (0, 1 or 2).
        plane: usize,
        /// Plane width in samples.
        width: u32,
        /// Plane height in samples.
        height: u32,
        /// Required byte length.
        expected: usize,
        /// Supplied byte length.
        actual: usize,
    },

    /// Plane has a zero dimension.
    #[error("plane {plane}: invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Plane index.
        plane: usize,
        /// Width in samples.
        width: u32,
        /// Height in samples.
        height: u32,
    },

    /// Bit depth cannot be represented with the given sample encoding.
    #[error("unsupported bit depth {bits} for {encoding} samples")]
    UnsupportedBitDepth {
        /// Requested bits per sample.
        bits: u32,
        /// Encoding name ("integer" or "float").
        encoding: &'static str,
    },

    /// Requested frame index is past the end of the source.
    #[error("frame {index} out of range (source has {count} frames)")]
    FrameOutOfRange {
        /// Requested frame index.
        index: usize,
        /// Number of frames available.
        count: usize,
    },

    /// Unknown name for a color space or range tag.
    #[error("unknown {kind}: {value}")]
    UnknownTag {
        /// Tag kind ("color space", "color range").
        kind: &'static str,
        /// Offending input.
        value: String,
    },

    /// I/O error while reading a frame source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
