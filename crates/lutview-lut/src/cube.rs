//! Adobe/Resolve `.cube` export and import.
//!
//! Lets a generated display LUT be inspected or reused in grading tools.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! 0.000000 0.000000 0.000000
//! ...
//! 1.000000 1.000000 1.000000
//! ```
//!
//! Rows list red varying fastest, then green, then blue. [`ColorCube`]
//! stores blue fastest, so both directions re-index.

use crate::color_cube::check_resolution;
use crate::{ColorCube, LutError, LutResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Writes a cube to a `.cube` file.
///
/// ```rust,ignore
/// let cube = ColorCube::identity(33)?;
/// cube::write_3d("identity.cube", &cube, Some("identity"))?;
/// ```
pub fn write_3d<P: AsRef<Path>>(path: P, cube: &ColorCube, title: Option<&str>) -> LutResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_3d_to(&mut writer, cube, title)?;
    writer.flush()?;
    Ok(())
}

/// Writes a cube in `.cube` text form to any writer.
pub fn write_3d_to<W: Write>(writer: &mut W, cube: &ColorCube, title: Option<&str>) -> LutResult<()> {
    writeln!(writer, "# Generated by lutview")?;
    if let Some(title) = title {
        writeln!(writer, "TITLE \"{}\"", title)?;
    }
    writeln!(writer, "LUT_3D_SIZE {}", cube.resolution())?;
    writeln!(writer)?;

    let n = cube.resolution();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let [r, g, b] = cube.get(x, y, z);
                writeln!(
                    writer,
                    "{:.6} {:.6} {:.6}",
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0
                )?;
            }
        }
    }

    Ok(())
}

/// Reads a 3D `.cube` file, quantizing values to bytes.
pub fn read_3d<P: AsRef<Path>>(path: P) -> LutResult<ColorCube> {
    let file = File::open(path.as_ref())?;
    parse_3d(BufReader::new(file))
}

/// Parses 3D `.cube` text.
///
/// `DOMAIN_MIN`/`DOMAIN_MAX` other than `[0, 1]` are rejected; display
/// LUTs never carry them.
pub fn parse_3d<R: BufRead>(reader: R) -> LutResult<ColorCube> {
    let mut size: Option<usize> = None;
    let mut rows: Vec<[f32; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
            continue;
        }

        if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(LutError::ParseError("1D LUTs are not supported".into()));
        } else if line.starts_with("DOMAIN_MIN") {
            check_domain(line, 0.0)?;
        } else if line.starts_with("DOMAIN_MAX") {
            check_domain(line, 1.0)?;
        } else {
            rows.push(parse_rgb(line)?);
        }
    }

    let n = size.ok_or_else(|| LutError::ParseError("missing LUT_3D_SIZE".into()))?;
    check_resolution(n)?;
    let expected = n * n * n;
    if rows.len() != expected {
        return Err(LutError::ParseError(format!(
            "expected {} entries for size {}, got {}",
            expected,
            n,
            rows.len()
        )));
    }

    let mut data = vec![0u8; expected * 3];
    for (row, rgb) in rows.iter().enumerate() {
        // File order: red fastest.
        let (x, y, z) = (row % n, row / n % n, row / (n * n));
        let i = ColorCube::index(n, x, y, z) * 3;
        for c in 0..3 {
            data[i + c] = (rgb[c] * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }

    ColorCube::from_bytes(n, data)
}

fn parse_size(line: &str) -> LutResult<usize> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| LutError::ParseError("invalid size line".into()))?
        .parse()
        .map_err(|_| LutError::ParseError(format!("invalid size: {}", line)))
}

fn check_domain(line: &str, expected: f32) -> LutResult<()> {
    for v in line.split_whitespace().skip(1) {
        let v: f32 = v
            .parse()
            .map_err(|_| LutError::ParseError(format!("invalid domain: {}", line)))?;
        if v != expected {
            return Err(LutError::ParseError(format!("unsupported domain: {}", line)));
        }
    }
    Ok(())
}

fn parse_rgb(line: &str) -> LutResult<[f32; 3]> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(LutError::ParseError(format!("invalid RGB line: {}", line)));
    }
    let value = |s: &str| {
        s.parse::<f32>()
            .map_err(|_| LutError::ParseError(format!("invalid value '{}'", s)))
    };
    Ok([value(parts[0])?, value(parts[1])?, value(parts[2])?])
}
