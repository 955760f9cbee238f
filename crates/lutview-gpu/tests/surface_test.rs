//! Render surface state machine tests against a recording backend.

use std::sync::Arc;

use lutview_core::{
    ChromaSubsampling, ColorRange, ColorSpace, Frame, FrameFormat, PlaneSize, SampleEncoding,
};
use lutview_gpu::{
    DrawReport, FrameUpload, GpuError, GpuResult, PlaneFormat, RenderBackend, RenderSurface,
    SurfaceState,
};
use lutview_lut::ColorCube;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create,
    Planes {
        index: usize,
        formats: [PlaneFormat; 3],
        sizes: [PlaneSize; 3],
        params: [u32; 3],
    },
    Lut(usize),
    Draw,
    Release,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    fail_create: bool,
}

impl Recorder {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderBackend for Recorder {
    type Target = ();

    fn name(&self) -> &'static str {
        "recorder"
    }

    fn create_resources(&mut self) -> GpuResult<()> {
        if self.fail_create {
            return Err(GpuError::ShaderCompilation("forced".into()));
        }
        self.calls.push(Call::Create);
        Ok(())
    }

    fn upload_planes(&mut self, frame: &FrameUpload<'_>) -> GpuResult<()> {
        self.calls.push(Call::Planes {
            index: frame.index,
            formats: frame.planes.map(|p| p.format),
            sizes: frame.planes.map(|p| p.size),
            params: [
                frame.params.color_space,
                frame.params.color_range,
                frame.params.bit_depth,
            ],
        });
        Ok(())
    }

    fn upload_lut(&mut self, cube: &ColorCube) -> GpuResult<()> {
        self.calls.push(Call::Lut(cube.resolution()));
        Ok(())
    }

    fn draw(&mut self, _target: &()) -> GpuResult<()> {
        self.calls.push(Call::Draw);
        Ok(())
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
    }
}

fn format_8bit() -> FrameFormat {
    FrameFormat::yuv(
        4,
        4,
        ChromaSubsampling::Cs420,
        ColorSpace::Bt709,
        ColorRange::Limited,
        8,
        SampleEncoding::Integer,
    )
    .unwrap()
}

fn frame(index: usize, format: FrameFormat) -> Frame {
    let planes = (0..3).map(|p| vec![0u8; format.plane_len(p)]).collect();
    Frame::new(index, format, planes).unwrap()
}

fn ready_surface() -> RenderSurface<Recorder> {
    let mut surface = RenderSurface::new(Recorder::default());
    surface.initialize().unwrap();
    surface.backend_mut().take();
    surface
}

#[test]
fn test_draw_before_initialize_fails() {
    let mut surface = RenderSurface::new(Recorder::default());
    surface.update_image(frame(0, format_8bit()));
    assert!(matches!(surface.draw(&()), Err(GpuError::NotInitialized)));
    assert_eq!(surface.state(), SurfaceState::Uninitialized);
    assert!(surface.backend().calls.is_empty());
    // The frame waits for initialization.
    assert!(surface.pending_frame().is_some());
}

#[test]
fn test_initialize_seeds_identity_lut() {
    let mut surface = RenderSurface::new(Recorder::default());
    surface.initialize().unwrap();
    assert_eq!(surface.state(), SurfaceState::ContextReady);
    assert_eq!(**surface.pending_lut().unwrap(), ColorCube::unit());
    assert!(surface.needs_redraw());
    assert!(matches!(surface.initialize(), Err(GpuError::AlreadyInitialized)));
}

#[test]
fn test_lut_pushed_before_initialize_survives() {
    let mut surface = RenderSurface::new(Recorder::default());
    let cube = Arc::new(ColorCube::identity(17).unwrap());
    surface.update_lut(cube.clone());
    surface.initialize().unwrap();
    assert!(Arc::ptr_eq(surface.pending_lut().unwrap(), &cube));
}

#[test]
fn test_failed_initialize_stays_uninitialized() {
    let mut surface = RenderSurface::new(Recorder {
        fail_create: true,
        ..Default::default()
    });
    assert!(matches!(surface.initialize(), Err(GpuError::ShaderCompilation(_))));
    assert_eq!(surface.state(), SurfaceState::Uninitialized);
    assert_eq!(surface.backend().calls, vec![Call::Release]);
    assert!(surface.pending_lut().is_none());
}

#[test]
fn test_update_lut_twice_keeps_latest() {
    let mut surface = ready_surface();
    let c = Arc::new(ColorCube::identity(9).unwrap());
    surface.update_lut(c.clone());
    surface.update_lut(c.clone());
    assert!(Arc::ptr_eq(surface.pending_lut().unwrap(), &c));

    surface.draw(&()).unwrap();
    assert_eq!(surface.backend().calls, vec![Call::Lut(9), Call::Draw]);
}

#[test]
fn test_only_latest_image_is_uploaded() {
    let mut surface = ready_surface();
    surface.draw(&()).unwrap();
    surface.backend_mut().take();

    surface.update_image(frame(1, format_8bit()));
    surface.update_image(frame(2, format_8bit()));
    surface.draw(&()).unwrap();

    let calls = surface.backend_mut().take();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Planes { index: 2, .. }));
    assert_eq!(calls[1], Call::Draw);
    assert_eq!(surface.stats().frames_superseded, 1);
    assert_eq!(surface.stats().frame_uploads, 1);
}

#[test]
fn test_two_draws_upload_once() {
    let mut surface = ready_surface();
    let cube = Arc::new(ColorCube::identity(5).unwrap());
    surface.update_image(frame(0, format_8bit()));
    surface.update_lut(cube);

    let first = surface.draw(&()).unwrap();
    assert_eq!(
        first,
        DrawReport {
            frame_uploaded: true,
            lut_uploaded: true
        }
    );
    assert_eq!(surface.state(), SurfaceState::Rendering);
    assert!(surface.pending_frame().is_none());
    assert!(surface.pending_lut().is_none());
    assert!(!surface.needs_redraw());

    let second = surface.draw(&()).unwrap();
    assert_eq!(second, DrawReport::default());

    let calls = surface.backend_mut().take();
    // Frame drains before LUT.
    assert!(matches!(calls[0], Call::Planes { index: 0, .. }));
    assert_eq!(&calls[1..], &[Call::Lut(5), Call::Draw, Call::Draw]);
    assert_eq!(surface.stats().draws, 2);
}

#[test]
fn test_ten_bit_planes_use_16_bit_storage() {
    let mut surface = ready_surface();
    let format = FrameFormat::new(
        [
            PlaneSize::new(64, 64),
            PlaneSize::new(32, 32),
            PlaneSize::new(32, 32),
        ],
        ColorSpace::Bt2020,
        ColorRange::Limited,
        10,
        SampleEncoding::Integer,
    )
    .unwrap();
    surface.update_image(frame(7, format));
    surface.draw(&()).unwrap();

    let calls = surface.backend_mut().take();
    let Call::Planes {
        formats,
        sizes,
        params,
        ..
    } = &calls[0]
    else {
        panic!("expected plane upload, got {:?}", calls[0]);
    };
    assert_eq!(*formats, [PlaneFormat::U16; 3]);
    assert_eq!(sizes[0], PlaneSize::new(64, 64));
    assert_eq!(sizes[2], PlaneSize::new(32, 32));
    assert_eq!(*params, [3, 0, 10]);
}

#[test]
fn test_float_planes() {
    let mut surface = ready_surface();
    let format = FrameFormat::yuv(
        2,
        2,
        ChromaSubsampling::Cs444,
        ColorSpace::Rgb,
        ColorRange::Full,
        16,
        SampleEncoding::Float,
    )
    .unwrap();
    let half_one = half::f16::from_f32(1.0).to_le_bytes();
    let plane: Vec<u8> = half_one.iter().copied().cycle().take(8).collect();
    let frame = Frame::new(0, format, vec![plane.clone(), plane.clone(), plane]).unwrap();

    surface.update_image(frame);
    surface.draw(&()).unwrap();
    let calls = surface.backend_mut().take();
    assert!(matches!(&calls[0], Call::Planes { formats, .. } if *formats == [PlaneFormat::F16; 3]));
}

#[test]
fn test_teardown_and_reinitialize() {
    let mut surface = ready_surface();
    let cube = Arc::new(ColorCube::identity(3).unwrap());
    surface.update_image(frame(4, format_8bit()));
    surface.update_lut(cube.clone());
    surface.draw(&()).unwrap();

    surface.teardown();
    assert_eq!(surface.state(), SurfaceState::Uninitialized);
    assert!(matches!(surface.draw(&()), Err(GpuError::NotInitialized)));

    // Last uploaded frame and LUT are restored for the next context.
    assert_eq!(surface.pending_frame().unwrap().index(), 4);
    assert!(Arc::ptr_eq(surface.pending_lut().unwrap(), &cube));

    surface.backend_mut().take();
    surface.initialize().unwrap();
    surface.draw(&()).unwrap();
    let calls = surface.backend_mut().take();
    assert_eq!(calls[0], Call::Create);
    assert!(matches!(calls[1], Call::Planes { index: 4, .. }));
    assert_eq!(&calls[2..], &[Call::Lut(3), Call::Draw]);

    // Teardown twice is harmless.
    surface.teardown();
    surface.teardown();
    assert_eq!(
        surface.backend().calls.iter().filter(|c| **c == Call::Release).count(),
        1
    );
}

#[test]
fn test_newer_pending_frame_wins_over_restored() {
    let mut surface = ready_surface();
    surface.update_image(frame(1, format_8bit()));
    surface.draw(&()).unwrap();
    surface.teardown();

    surface.update_image(frame(9, format_8bit()));
    assert_eq!(surface.pending_frame().unwrap().index(), 9);
}
