//! GPU backends for the render surface.

#[cfg(feature = "wgpu")]
mod wgpu_backend;

#[cfg(feature = "wgpu")]
pub use wgpu_backend::{OffscreenTarget, WgpuBackend};

use lutview_lut::ColorCube;

use crate::GpuResult;
use crate::format::FrameUpload;

/// GPU operations behind a [`RenderSurface`](crate::RenderSurface).
///
/// Texture units are fixed: planes at 0, 1 and 2, the LUT at 3.
pub trait RenderBackend {
    /// What a draw renders into.
    type Target: ?Sized;

    /// Backend name.
    fn name(&self) -> &'static str;

    /// Compiles the shader and allocates the resource set.
    fn create_resources(&mut self) -> GpuResult<()>;

    /// Uploads three planes and the frame's uniforms.
    ///
    /// Plane textures are reallocated when size or format changes.
    fn upload_planes(&mut self, frame: &FrameUpload<'_>) -> GpuResult<()>;

    /// Uploads an N×N×N LUT with linear filtering and edge clamping.
    fn upload_lut(&mut self, cube: &ColorCube) -> GpuResult<()>;

    /// Clears to black, binds everything and draws the full-screen quad.
    fn draw(&mut self, target: &Self::Target) -> GpuResult<()>;

    /// Releases every GPU handle. Safe to call without resources.
    fn release(&mut self);
}
