//! GPU render surface for the lutview preview pipeline.
//!
//! Uploads three sample planes and a 3D display LUT as textures and draws
//! one full-screen quad whose fragment shader reconstructs RGB and looks it
//! up in the LUT.
//!
//! # Architecture
//!
//! ```text
//! host (window / headless CLI)
//!     └── RenderSurface<B>           state machine + pending slots
//!             └── RenderBackend      GPU seam
//!                     └── WgpuBackend (feature `wgpu`)
//! ```
//!
//! The host pushes data with [`RenderSurface::update_image`] and
//! [`RenderSurface::update_lut`] whenever it likes; GPU work only happens
//! inside [`RenderSurface::draw`].
//!
//! # Example
//!
//! ```ignore
//! use lutview_gpu::{GpuContext, OffscreenTarget, RenderSurface, WgpuBackend};
//!
//! let ctx = std::sync::Arc::new(GpuContext::new()?);
//! let target = OffscreenTarget::new(&ctx, 1920, 1080);
//! let mut surface = RenderSurface::new(WgpuBackend::new(ctx.clone(), OffscreenTarget::FORMAT));
//! surface.initialize()?;
//! surface.update_image(frame);
//! surface.draw(target.view())?;
//! let rgba = target.read_rgba(&ctx)?;
//! ```

pub mod backend;
pub mod format;
mod shaders;
pub mod slot;
pub mod surface;

#[cfg(feature = "wgpu")]
mod context;

pub use backend::RenderBackend;
pub use format::{FrameUpload, PlaneFormat, PlaneUpload, ShaderParams};
pub use slot::PendingSlot;
pub use surface::{DrawReport, RenderSurface, SurfaceState, SurfaceStats};

#[cfg(feature = "wgpu")]
pub use backend::{OffscreenTarget, WgpuBackend};
#[cfg(feature = "wgpu")]
pub use context::GpuContext;

use lutview_core::CoreError;
use thiserror::Error;

/// GPU operation errors
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    DeviceCreation(String),

    #[error("Failed to compile shader: {0}")]
    ShaderCompilation(String),

    #[error("Render surface is not initialized")]
    NotInitialized,

    #[error("Render surface is already initialized")]
    AlreadyInitialized,

    #[error("GPU resources have not been created")]
    ResourcesMissing,

    #[error("Texture too large: {width}x{height}x{depth} exceeds GPU limit {limit}")]
    TextureTooLarge {
        width: u32,
        height: u32,
        depth: u32,
        limit: u32,
    },

    #[error("Readback failed: {0}")]
    Readback(String),

    #[error("Invalid frame: {0}")]
    Frame(#[from] CoreError),
}

pub type GpuResult<T> = Result<T, GpuError>;
