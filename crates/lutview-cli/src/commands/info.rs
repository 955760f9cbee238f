//! Environment report: GPU adapter, settings, built-in profiles.

use anyhow::Result;
use lutview_gpu::GpuContext;
use lutview_icc::StandardProfile;

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    println!("lutview {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("GPU:");
    match GpuContext::new() {
        Ok(ctx) => {
            println!("  Adapter:    {}", ctx.device_name());
            println!("  Backend:    {:?}", ctx.backend());
            println!("  Max 3D tex: {}", ctx.limits().max_texture_dimension_3d);
            println!("  Max 2D tex: {}", ctx.limits().max_texture_dimension_2d);
        }
        Err(e) => println!("  unavailable ({e})"),
    }
    println!();

    println!("Settings:");
    match Settings::default_path() {
        Some(p) if p.exists() => println!("  File:       {}", p.display()),
        Some(p) => println!("  File:       {} (not found, defaults)", p.display()),
        None => println!("  File:       none"),
    }
    println!("  Resolution: {}", settings.lut_resolution);
    println!("  Intent:     {}", settings.intent);
    println!("  Displays:   {}", settings.displays.len());
    println!();

    println!("Built-in profiles:");
    for p in StandardProfile::ALL {
        println!("  {}", p.name());
    }
    Ok(())
}
