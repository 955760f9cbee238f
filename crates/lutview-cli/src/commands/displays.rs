//! Display table: resolved profile and LUT origin per display.

use anyhow::Result;
use lutview_lut::{DisplayId, LutCache, LutGenerator, LutOrigin};

use crate::DisplaysArgs;
use crate::config::Settings;

pub fn run(args: DisplaysArgs, settings: &Settings) -> Result<()> {
    let mut displays = settings.display_ids();
    for name in &args.displays {
        let id = DisplayId::new(name.as_str());
        if !displays.contains(&id) {
            displays.push(id);
        }
    }
    if displays.is_empty() {
        println!("No displays configured.");
        if let Some(p) = Settings::default_path() {
            println!("Add them to {}", p.display());
        }
        return Ok(());
    }

    let resolution = args.resolution.unwrap_or(settings.lut_resolution);
    let generator = LutGenerator::new().with_intent(settings.intent()?);
    let cache = LutCache::build_with(generator, &displays, resolution, &settings.resolver())?;

    let width = displays.iter().map(|d| d.as_str().len()).max().unwrap_or(0).max(7);
    println!("{:<width$}  {:<8}  {:>4}  PROFILE", "DISPLAY", "ORIGIN", "SIZE");
    for entry in cache.entries() {
        let profile = match &entry.origin {
            LutOrigin::Profile(p) => p.display().to_string(),
            LutOrigin::Identity => "-".to_string(),
            LutOrigin::Fallback { profile, reason } => {
                format!("{} ({reason})", profile.display())
            }
        };
        println!(
            "{:<width$}  {:<8}  {:>4}  {}",
            entry.display.as_str(),
            entry.origin.label(),
            entry.cube.resolution(),
            profile
        );
    }
    Ok(())
}
