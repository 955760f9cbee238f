//! CLI subcommands and the helpers they share.

pub mod displays;
pub mod info;
pub mod lut;
pub mod render;

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use lutview_icc::{Intent, Profile};
use lutview_lut::{ColorCube, DisplayId, LutCache, LutGenerator, LutOrigin, cube};

use crate::LutSource;
use crate::config::Settings;

/// A LUT chosen from the command line, with a label for output.
pub struct SelectedLut {
    pub cube: Arc<ColorCube>,
    pub label: String,
}

/// Resolution and intent: command line first, then settings.
pub fn lut_options(source: &LutSource, settings: &Settings) -> Result<(usize, Intent)> {
    let resolution = source.resolution.unwrap_or(settings.lut_resolution);
    let intent = match source.intent {
        Some(i) => i,
        None => settings.intent()?,
    };
    Ok((resolution, intent))
}

/// Builds the LUT named by `source`. No source means the identity cube.
pub fn select_lut(source: &LutSource, settings: &Settings) -> Result<SelectedLut> {
    let (resolution, intent) = lut_options(source, settings)?;
    let generator = LutGenerator::new().with_intent(intent);

    if let Some(path) = &source.cube {
        let cube = cube::read_3d(path)
            .with_context(|| format!("Failed to read LUT: {}", path.display()))?;
        return Ok(SelectedLut {
            cube: Arc::new(cube),
            label: format!("cube file {}", path.display()),
        });
    }

    if let Some(path) = &source.profile {
        let cube = generator
            .generate(resolution, Some(path.as_path()))
            .with_context(|| format!("Failed to build LUT from {}", path.display()))?;
        return Ok(SelectedLut {
            cube: Arc::new(cube),
            label: format!("profile {} ({intent})", path.display()),
        });
    }

    if let Some(standard) = source.standard {
        let profile = Profile::from_standard(standard)?;
        let cube = generator
            .generate_with_profile(resolution, &profile)
            .with_context(|| format!("Failed to build LUT for {standard}"))?;
        return Ok(SelectedLut {
            cube: Arc::new(cube),
            label: format!("{standard} ({intent})"),
        });
    }

    if let Some(name) = &source.display {
        let id = DisplayId::new(name.as_str());
        if !settings.display_ids().contains(&id) {
            bail!("Display '{name}' is not configured");
        }
        let cache = LutCache::build_with(
            generator,
            std::slice::from_ref(&id),
            resolution,
            &settings.resolver(),
        )?;
        let entry = cache
            .entry(&id)
            .with_context(|| format!("No LUT for display '{name}'"))?;
        let label = match &entry.origin {
            LutOrigin::Profile(p) => format!("display {name}: {}", p.display()),
            LutOrigin::Identity => format!("display {name}: no profile, identity"),
            LutOrigin::Fallback { profile, reason } => {
                format!("display {name}: {} failed ({reason}), identity", profile.display())
            }
        };
        return Ok(SelectedLut {
            cube: entry.cube.clone(),
            label,
        });
    }

    Ok(SelectedLut {
        cube: Arc::new(ColorCube::unit()),
        label: "identity".to_string(),
    })
}

/// Writes tightly packed RGBA8 rows as PNG.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;
    info!(path = %path.display(), width, height, "wrote png");
    Ok(())
}
