//! Per-display LUT cache.

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::color_cube::check_resolution;
use crate::{ColorCube, DisplayId, DisplayProfileHandle, LutGenerator, LutResult, ProfileResolver};

/// Where a cached cube came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LutOrigin {
    /// Generated from this display profile.
    Profile(PathBuf),
    /// No profile resolved; 2×2×2 identity.
    Identity,
    /// Profile resolved but the transform failed; 2×2×2 identity.
    Fallback {
        /// Profile that failed.
        profile: PathBuf,
        /// Error text.
        reason: String,
    },
}

impl LutOrigin {
    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Profile(_) => "profile",
            Self::Identity => "identity",
            Self::Fallback { .. } => "fallback",
        }
    }
}

/// One display's cube.
#[derive(Debug, Clone)]
pub struct LutEntry {
    /// Display the cube belongs to.
    pub display: DisplayId,
    /// The cube, shared with render surfaces.
    pub cube: Arc<ColorCube>,
    /// How the cube was produced.
    pub origin: LutOrigin,
}

/// LUTs for every attached display, in display order.
///
/// Built once at startup. Entries change only through
/// [`invalidate`](Self::invalidate) and [`refresh`](Self::refresh), which a
/// host calls on hot-plug or profile-change events.
///
/// A display whose profile cannot be applied falls back to the identity
/// cube; one bad profile never prevents the others from loading.
#[derive(Debug, Clone)]
pub struct LutCache {
    generator: LutGenerator,
    resolution: usize,
    entries: Vec<LutEntry>,
}

impl LutCache {
    /// Builds the cache with the default generator.
    pub fn build(
        displays: &[DisplayId],
        resolution: usize,
        resolver: &dyn ProfileResolver,
    ) -> LutResult<Self> {
        Self::build_with(LutGenerator::new(), displays, resolution, resolver)
    }

    /// Builds the cache, generating displays in parallel.
    ///
    /// Fails only for an invalid `resolution`.
    pub fn build_with(
        generator: LutGenerator,
        displays: &[DisplayId],
        resolution: usize,
        resolver: &dyn ProfileResolver,
    ) -> LutResult<Self> {
        check_resolution(resolution)?;

        let entries: Vec<LutEntry> = displays
            .par_iter()
            .map(|display| build_entry(&generator, display, resolution, resolver))
            .collect();

        info!(
            displays = entries.len(),
            resolution,
            "built display LUT cache"
        );
        Ok(Self {
            generator,
            resolution,
            entries,
        })
    }

    /// Requested edge resolution for profile-derived cubes.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Cube for `display`.
    pub fn get(&self, display: &DisplayId) -> Option<Arc<ColorCube>> {
        self.entry(display).map(|e| Arc::clone(&e.cube))
    }

    /// Full entry for `display`.
    pub fn entry(&self, display: &DisplayId) -> Option<&LutEntry> {
        self.entries.iter().find(|e| &e.display == display)
    }

    /// All cubes in display order.
    pub fn cubes(&self) -> impl Iterator<Item = &Arc<ColorCube>> + '_ {
        self.entries.iter().map(|e| &e.cube)
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    /// Number of displays.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no displays.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the entry for `id`, returning it.
    pub fn invalidate(&mut self, id: &DisplayId) -> Option<LutEntry> {
        let pos = self.entries.iter().position(|e| &e.display == id)?;
        debug!(display = %id, "invalidated display LUT");
        Some(self.entries.remove(pos))
    }

    /// Regenerates the entry for `id`.
    ///
    /// An existing entry is replaced in place; an unknown display is
    /// appended.
    pub fn refresh(&mut self, id: &DisplayId, resolver: &dyn ProfileResolver) -> &LutEntry {
        let entry = build_entry(&self.generator, id, self.resolution, resolver);
        let pos = match self.entries.iter().position(|e| &e.display == id) {
            Some(pos) => {
                self.entries[pos] = entry;
                pos
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        &self.entries[pos]
    }
}

fn build_entry(
    generator: &LutGenerator,
    id: &DisplayId,
    resolution: usize,
    resolver: &dyn ProfileResolver,
) -> LutEntry {
    let handle = DisplayProfileHandle::resolve(resolver, id);
    let Some(profile) = handle.profile else {
        debug!(display = %id, "no profile, identity LUT");
        return LutEntry {
            display: handle.display,
            cube: Arc::new(ColorCube::unit()),
            origin: LutOrigin::Identity,
        };
    };

    let (cube, origin) = match generator.generate(resolution, Some(&profile)) {
        Ok(cube) => (cube, LutOrigin::Profile(profile)),
        Err(e) => {
            warn!(
                display = %id,
                profile = %profile.display(),
                error = %e,
                "display LUT failed, falling back to identity"
            );
            (
                ColorCube::unit(),
                LutOrigin::Fallback {
                    profile,
                    reason: e.to_string(),
                },
            )
        }
    };

    LutEntry {
        display: handle.display,
        cube: Arc::new(cube),
        origin,
    }
}
