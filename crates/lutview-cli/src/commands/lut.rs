//! LUT generation and `.cube` export.

use anyhow::{Context, Result};
use lutview_lut::cube;

use crate::LutArgs;
use crate::config::Settings;

pub fn run(args: LutArgs, settings: &Settings) -> Result<()> {
    let lut = super::select_lut(&args.source, settings)?;
    let n = lut.cube.resolution();

    println!("LUT: {}", lut.label);
    println!("  Size:     {n}x{n}x{n} ({} entries)", lut.cube.entry_count());
    println!("  Identity: {}", lut.cube.is_identity());
    // Corners of the cube: black, white and the primaries.
    let last = n - 1;
    for (name, (x, y, z)) in [
        ("black", (0, 0, 0)),
        ("red", (last, 0, 0)),
        ("green", (0, last, 0)),
        ("blue", (0, 0, last)),
        ("white", (last, last, last)),
    ] {
        let [r, g, b] = lut.cube.get(x, y, z);
        println!("  {name:<8}  {r:>3} {g:>3} {b:>3}");
    }

    if let Some(output) = &args.output {
        let title = args.title.as_deref().unwrap_or(&lut.label);
        cube::write_3d(output, &lut.cube, Some(title))
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}
