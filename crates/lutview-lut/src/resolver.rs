//! Display → ICC profile resolution.
//!
//! Finding a monitor's profile is platform territory (ColorSync, ICM,
//! colord). The pipeline only sees the [`ProfileResolver`] trait: a
//! display name goes in, a profile path or nothing comes out.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

/// Stable display identifier (the display name reported by the host).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(String);

impl DisplayId {
    /// Creates an identifier from a display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The display name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DisplayId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Resolved profile for one display. Absent means "use identity".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayProfileHandle {
    /// Display the query was made for.
    pub display: DisplayId,
    /// ICC profile path, if the platform knows one.
    pub profile: Option<PathBuf>,
}

impl DisplayProfileHandle {
    /// Queries `resolver` for `display`.
    pub fn resolve(resolver: &dyn ProfileResolver, display: &DisplayId) -> Self {
        Self {
            display: display.clone(),
            profile: resolver.resolve(display),
        }
    }
}

/// Maps a display to its ICC profile path.
///
/// Implementations must not cache: every call reflects the current
/// platform state, and repeated calls with no change in between return the
/// same answer. Failure of any kind is reported as `None`.
pub trait ProfileResolver: Send + Sync {
    /// Profile path for `display`, or `None` if unknown or unsupported.
    fn resolve(&self, display: &DisplayId) -> Option<PathBuf>;
}

/// Resolver for platforms without profile discovery. Always absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ProfileResolver for NullResolver {
    fn resolve(&self, _display: &DisplayId) -> Option<PathBuf> {
        None
    }
}

/// Resolver backed by a fixed display-name → path table.
///
/// Entries whose file does not exist resolve to `None` with a warning,
/// matching what a platform query reports for a deleted profile.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    table: HashMap<DisplayId, PathBuf>,
}

impl StaticResolver {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the profile for `display`.
    pub fn insert(&mut self, display: impl Into<DisplayId>, profile: impl Into<PathBuf>) {
        self.table.insert(display.into(), profile.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, display: impl Into<DisplayId>, profile: impl Into<PathBuf>) -> Self {
        self.insert(display, profile);
        self
    }

    /// Number of configured displays.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if no display is configured.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<D: Into<DisplayId>, P: Into<PathBuf>> FromIterator<(D, P)> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = (D, P)>>(iter: I) -> Self {
        let mut resolver = Self::new();
        for (display, profile) in iter {
            resolver.insert(display, profile);
        }
        resolver
    }
}

impl ProfileResolver for StaticResolver {
    fn resolve(&self, id: &DisplayId) -> Option<PathBuf> {
        let path = self.table.get(id)?;
        if path.is_file() {
            Some(path.clone())
        } else {
            warn!(display = %id, profile = %path.display(), "configured profile not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_resolver_is_always_absent() {
        let id = DisplayId::from("DELL U2720Q");
        assert_eq!(NullResolver.resolve(&id), None);
        assert_eq!(DisplayProfileHandle::resolve(&NullResolver, &id).profile, None);
    }

    #[test]
    fn static_resolver_checks_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.icc");
        std::fs::write(&present, b"icc").unwrap();

        let resolver: StaticResolver = [
            ("left", present.clone()),
            ("right", dir.path().join("gone.icc")),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve(&"left".into()), Some(present.clone()));
        assert_eq!(resolver.resolve(&"right".into()), None);
        assert_eq!(resolver.resolve(&"unknown".into()), None);

        // Idempotent.
        assert_eq!(resolver.resolve(&"left".into()), Some(present));
    }
}
