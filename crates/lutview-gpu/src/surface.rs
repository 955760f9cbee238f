//! Render surface state machine.
//!
//! ```text
//!                initialize()             draw()
//! Uninitialized ─────────────> ContextReady ─────> Rendering ─┐
//!       ^                                             ^  draw()│
//!       └────────────────── teardown() ───────────────┴────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use lutview_core::Frame;
use lutview_lut::ColorCube;
use tracing::{debug, trace};

use crate::backend::RenderBackend;
use crate::format::FrameUpload;
use crate::slot::PendingSlot;
use crate::{GpuError, GpuResult};

/// Lifecycle state of a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// No GPU resources.
    #[default]
    Uninitialized,
    /// Resources allocated, nothing drawn yet.
    ContextReady,
    /// At least one draw since initialization.
    Rendering,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::ContextReady => "context-ready",
            Self::Rendering => "rendering",
        })
    }
}

/// What one draw uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawReport {
    pub frame_uploaded: bool,
    pub lut_uploaded: bool,
}

/// Cumulative counters since construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStats {
    pub draws: u64,
    pub frame_uploads: u64,
    pub lut_uploads: u64,
    /// Frames replaced in the slot before any draw consumed them.
    pub frames_superseded: u64,
    /// LUTs replaced in the slot before any draw consumed them.
    pub luts_superseded: u64,
}

/// Video preview surface: pending frame and LUT slots in front of a GPU
/// backend.
///
/// `update_image` and `update_lut` only store into their slot and schedule
/// a redraw; the next [`draw`](Self::draw) uploads whatever is pending
/// (frame first, then LUT) and draws. The slots are independent, so a LUT
/// change redraws the last frame and vice versa.
///
/// [`teardown`](Self::teardown) moves the last uploaded frame and LUT back
/// into empty slots, so a re-initialized surface shows the same picture.
pub struct RenderSurface<B: RenderBackend> {
    backend: B,
    state: SurfaceState,
    pending_frame: PendingSlot<Frame>,
    pending_lut: PendingSlot<Arc<ColorCube>>,
    current_frame: Option<Frame>,
    current_lut: Option<Arc<ColorCube>>,
    needs_redraw: bool,
    stats: SurfaceStats,
}

impl<B: RenderBackend> RenderSurface<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SurfaceState::Uninitialized,
            pending_frame: PendingSlot::new(),
            pending_lut: PendingSlot::new(),
            current_frame: None,
            current_lut: None,
            needs_redraw: false,
            stats: SurfaceStats::default(),
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn stats(&self) -> &SurfaceStats {
        &self.stats
    }

    /// Whether an update arrived since the last draw.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn pending_frame(&self) -> Option<&Frame> {
        self.pending_frame.peek()
    }

    pub fn pending_lut(&self) -> Option<&Arc<ColorCube>> {
        self.pending_lut.peek()
    }

    /// Allocates GPU resources and seeds the identity LUT.
    ///
    /// The 2×2×2 identity cube is seeded only if no LUT is pending, so a
    /// LUT pushed before initialization survives. On error the surface
    /// stays uninitialized and partial resources are released.
    pub fn initialize(&mut self) -> GpuResult<()> {
        if self.state != SurfaceState::Uninitialized {
            return Err(GpuError::AlreadyInitialized);
        }

        if let Err(e) = self.backend.create_resources() {
            self.backend.release();
            return Err(e);
        }

        if self.pending_lut.put_if_empty(Arc::new(ColorCube::unit())) {
            trace!("seeded identity LUT");
        }
        self.state = SurfaceState::ContextReady;
        self.needs_redraw = true;
        debug!(backend = self.backend.name(), "render surface initialized");
        Ok(())
    }

    /// Replaces the pending frame and schedules a redraw.
    pub fn update_image(&mut self, frame: Frame) {
        trace!(index = frame.index(), "frame pending");
        if self.pending_frame.put(frame).is_some() {
            self.stats.frames_superseded += 1;
        }
        self.needs_redraw = true;
    }

    /// Replaces the pending LUT and schedules a redraw.
    pub fn update_lut(&mut self, cube: Arc<ColorCube>) {
        trace!(resolution = cube.resolution(), "LUT pending");
        if self.pending_lut.put(cube).is_some() {
            self.stats.luts_superseded += 1;
        }
        self.needs_redraw = true;
    }

    /// Uploads pending data (frame before LUT) and draws into `target`.
    pub fn draw(&mut self, target: &B::Target) -> GpuResult<DrawReport> {
        if self.state == SurfaceState::Uninitialized {
            return Err(GpuError::NotInitialized);
        }

        let mut report = DrawReport::default();

        if let Some(frame) = self.pending_frame.take() {
            let upload = FrameUpload::from_frame(&frame)?;
            self.backend.upload_planes(&upload)?;
            debug!(
                index = frame.index(),
                format = ?upload.planes[0].format,
                "uploaded frame planes"
            );
            self.current_frame = Some(frame);
            self.stats.frame_uploads += 1;
            report.frame_uploaded = true;
        }

        if let Some(cube) = self.pending_lut.take() {
            self.backend.upload_lut(&cube)?;
            debug!(resolution = cube.resolution(), "uploaded LUT");
            self.current_lut = Some(cube);
            self.stats.lut_uploads += 1;
            report.lut_uploaded = true;
        }

        self.backend.draw(target)?;

        if self.state == SurfaceState::ContextReady {
            debug!("render surface rendering");
        }
        self.state = SurfaceState::Rendering;
        self.needs_redraw = false;
        self.stats.draws += 1;
        Ok(report)
    }

    /// Releases all GPU resources and returns to `Uninitialized`.
    pub fn teardown(&mut self) {
        if self.state == SurfaceState::Uninitialized {
            return;
        }
        self.backend.release();

        if let Some(frame) = self.current_frame.take() {
            self.pending_frame.put_if_empty(frame);
        }
        if let Some(cube) = self.current_lut.take() {
            self.pending_lut.put_if_empty(cube);
        }

        self.state = SurfaceState::Uninitialized;
        debug!(backend = self.backend.name(), "render surface torn down");
    }
}

impl<B: RenderBackend> fmt::Debug for RenderSurface<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSurface")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("frame_pending", &self.pending_frame.is_pending())
            .field("lut_pending", &self.pending_lut.is_pending())
            .field("needs_redraw", &self.needs_redraw)
            .finish()
    }
}
