//! # lutview-core
//!
//! Core frame types for the lutview preview pipeline.
//!
//! - [`Frame`] - three raw sample planes of one decoded video frame
//! - [`FrameFormat`] - plane geometry, [`ColorSpace`], [`ColorRange`], bit
//!   depth and [`SampleEncoding`], constant per source
//! - [`FrameSource`] - producer of frames by index
//!
//! ## Crate Structure
//!
//! ```text
//! lutview-core (this crate)
//!    ^
//!    +-- lutview-gpu (uploads frames as plane textures)
//!    +-- lutview-cli (reads raw files / test patterns)
//! ```
//!
//! Frames arrive already decoded; nothing here parses compressed video.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod frame;
pub mod source;

pub use error::{CoreError, CoreResult};
pub use format::{
    ChromaSubsampling, ColorRange, ColorSpace, FrameFormat, PLANE_COUNT, PlaneSize,
    SampleEncoding,
};
pub use frame::Frame;
pub use source::{FrameSource, RawPlanarSource, TestPatternSource};
