//! Headless render: one frame through the display LUT to PNG.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use lutview_core::{FrameFormat, FrameSource, RawPlanarSource, SampleEncoding, TestPatternSource};
use lutview_gpu::{GpuContext, OffscreenTarget, RenderSurface, WgpuBackend};

use crate::RenderArgs;
use crate::config::Settings;

pub fn run(args: RenderArgs, settings: &Settings) -> Result<()> {
    let encoding = if args.float {
        SampleEncoding::Float
    } else {
        SampleEncoding::Integer
    };
    let format = FrameFormat::yuv(
        args.width,
        args.height,
        args.subsampling,
        args.color_space,
        args.range,
        args.bits,
        encoding,
    )?;

    let mut source: Box<dyn FrameSource> = match &args.input {
        Some(path) => Box::new(
            RawPlanarSource::open(path, format)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(TestPatternSource::new(format, args.frame + 1)),
    };
    let frame = source.get_planes(args.frame)?;
    let lut = super::select_lut(&args.lut, settings)?;
    info!(frame = args.frame, lut = %lut.label, "rendering");

    let ctx = Arc::new(GpuContext::new().context("No GPU available for rendering")?);
    let size = format.display_size();
    let target = OffscreenTarget::new(&ctx, size.width, size.height);

    let mut surface = RenderSurface::new(WgpuBackend::new(ctx.clone(), OffscreenTarget::FORMAT));
    surface.initialize()?;
    surface.update_image(frame);
    surface.update_lut(lut.cube);
    surface.draw(target.view())?;
    let pixels = target.read_rgba(&ctx)?;
    surface.teardown();

    super::write_png(&args.output, size.width, size.height, &pixels)?;
    println!(
        "Rendered frame {} ({}x{}, {}) with {} -> {}",
        args.frame,
        size.width,
        size.height,
        ctx.device_name(),
        lut.label,
        args.output.display()
    );
    Ok(())
}
