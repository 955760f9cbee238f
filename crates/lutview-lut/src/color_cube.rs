//! Byte-valued 3D color cube.
//!
//! A [`ColorCube`] is what the GPU receives as a 3D texture: `N³` RGB
//! triples of `u8`, red-major, blue varying fastest.

use crate::{LutError, LutResult};
use rayon::prelude::*;

/// Smallest valid edge resolution.
pub const MIN_RESOLUTION: usize = 2;

/// Largest accepted edge resolution (256³ entries, 48 MiB of RGB bytes).
pub const MAX_RESOLUTION: usize = 256;

/// An immutable N×N×N RGB byte cube.
///
/// # Layout
///
/// Entry `i` holds the output for grid position `(x, y, z)` = (red, green,
/// blue) with `i = x·N² + y·N + z`. Entry bytes are at `3i..3i + 3`.
///
/// # Example
///
/// ```rust
/// use lutview_lut::ColorCube;
///
/// let cube = ColorCube::identity(17).unwrap();
/// assert_eq!(cube.get(16, 0, 8), [255, 0, 128]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ColorCube {
    resolution: usize,
    data: Vec<u8>,
}

impl ColorCube {
    /// Creates the identity cube of edge resolution `n`.
    ///
    /// Component values are `round(index / (n - 1) × 255)`.
    pub fn identity(n: usize) -> LutResult<Self> {
        check_resolution(n)?;
        Ok(Self::fill_identity(n))
    }

    /// The 2×2×2 identity cube, used whenever no display profile applies.
    pub fn unit() -> Self {
        Self::fill_identity(MIN_RESOLUTION)
    }

    fn fill_identity(n: usize) -> Self {
        let scale = 255.0 / (n - 1) as f32;
        let level = |v: usize| (v as f32 * scale).round() as u8;

        let mut data = vec![0u8; n * n * n * 3];
        // One red slab per task.
        data.par_chunks_mut(n * n * 3)
            .enumerate()
            .for_each(|(x, slab)| {
                let r = level(x);
                for (j, rgb) in slab.chunks_exact_mut(3).enumerate() {
                    rgb[0] = r;
                    rgb[1] = level(j / n);
                    rgb[2] = level(j % n);
                }
            });

        Self { resolution: n, data }
    }

    /// Wraps an existing byte buffer of `n³ × 3` bytes.
    pub fn from_bytes(n: usize, data: Vec<u8>) -> LutResult<Self> {
        check_resolution(n)?;
        let expected = n * n * n * 3;
        if data.len() != expected {
            return Err(LutError::DataLength {
                size: n,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { resolution: n, data })
    }

    /// Edge resolution `N`.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of entries (`N³`).
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.resolution.pow(3)
    }

    /// Raw RGB bytes, `N³ × 3` long.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Output RGB at grid position (red `x`, green `y`, blue `z`).
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is `>= N`.
    pub fn get(&self, x: usize, y: usize, z: usize) -> [u8; 3] {
        let n = self.resolution;
        assert!(x < n && y < n && z < n, "cube coordinate out of range");
        let i = Self::index(n, x, y, z) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Flat entry index of `(x, y, z)` in a cube of resolution `n`.
    #[inline]
    pub fn index(n: usize, x: usize, y: usize, z: usize) -> usize {
        x * n * n + y * n + z
    }

    /// Grid position of entry `i` in a cube of resolution `n`.
    #[inline]
    pub fn coords(n: usize, i: usize) -> (usize, usize, usize) {
        (i / (n * n), i / n % n, i % n)
    }

    /// True if every entry equals the identity cube of the same size.
    pub fn is_identity(&self) -> bool {
        *self == Self::fill_identity(self.resolution)
    }
}

impl std::fmt::Debug for ColorCube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorCube")
            .field("resolution", &self.resolution)
            .field("bytes", &self.data.len())
            .finish()
    }
}

pub(crate) fn check_resolution(n: usize) -> LutResult<()> {
    if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&n) {
        Err(LutError::InvalidSize(n))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube() {
        let cube = ColorCube::unit();
        assert_eq!(cube.resolution(), 2);
        assert_eq!(
            cube.as_bytes(),
            &[
                0, 0, 0, 0, 0, 255, 0, 255, 0, 0, 255, 255, //
                255, 0, 0, 255, 0, 255, 255, 255, 0, 255, 255, 255,
            ]
        );
        assert!(cube.is_identity());
    }

    #[test]
    fn test_identity_rounding() {
        // 255 / 4 = 63.75 per step
        let cube = ColorCube::identity(5).unwrap();
        assert_eq!(cube.get(1, 2, 3), [64, 128, 191]);
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(ColorCube::identity(1), Err(LutError::InvalidSize(1))));
        assert!(matches!(ColorCube::identity(0), Err(LutError::InvalidSize(0))));
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            ColorCube::identity(3_000_000),
            Err(LutError::InvalidSize(3_000_000))
        ));
        assert!(matches!(
            ColorCube::from_bytes(usize::MAX, Vec::new()),
            Err(LutError::InvalidSize(_))
        ));
        assert!(ColorCube::identity(MAX_RESOLUTION + 1).is_err());
    }

    #[test]
    fn test_from_bytes_length() {
        let err = ColorCube::from_bytes(2, vec![0; 23]).unwrap_err();
        assert!(matches!(
            err,
            LutError::DataLength { expected: 24, actual: 23, .. }
        ));
        assert!(ColorCube::from_bytes(2, vec![7; 24]).is_ok());
    }

    #[test]
    fn test_index_law() {
        let n = 5;
        for i in 0..n * n * n {
            let (x, y, z) = ColorCube::coords(n, i);
            assert_eq!(ColorCube::index(n, x, y, z), i);
        }
    }
}
