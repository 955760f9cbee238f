//! # lutview-lut
//!
//! Display calibration LUTs for the lutview preview pipeline.
//!
//! ```text
//! ProfileResolver --> LutGenerator --> LutCache --> render surface
//!   (display id)       (ColorCube)     (per display)
//! ```
//!
//! - [`ColorCube`] - N×N×N RGB byte cube, the GPU's 3D LUT texture
//! - [`LutGenerator`] - identity cube pushed through sRGB → display profile
//! - [`ProfileResolver`] - display → ICC profile path seam
//! - [`LutCache`] - one cube per display, with per-display fallback
//! - [`cube`] - `.cube` file export and import
//!
//! # Example
//!
//! ```rust
//! use lutview_lut::{DisplayId, LutCache, NullResolver};
//!
//! let displays = [DisplayId::from("built-in")];
//! let cache = LutCache::build(&displays, 65, &NullResolver).unwrap();
//! assert_eq!(cache.get(&displays[0]).unwrap().resolution(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod color_cube;
pub mod cube;
mod error;
mod generator;
mod resolver;

pub use cache::{LutCache, LutEntry, LutOrigin};
pub use color_cube::{ColorCube, MAX_RESOLUTION, MIN_RESOLUTION};
pub use error::{LutError, LutResult};
pub use generator::{DEFAULT_RESOLUTION, LutGenerator};
pub use resolver::{DisplayId, DisplayProfileHandle, NullResolver, ProfileResolver, StaticResolver};

pub use lutview_icc::Intent;
