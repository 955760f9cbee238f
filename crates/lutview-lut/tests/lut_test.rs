//! LUT generation and cache tests for lutview-lut.

use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use lutview_icc::{Profile, StandardProfile};
use lutview_lut::{
    ColorCube, DisplayId, Intent, LutCache, LutError, LutGenerator, LutOrigin, ProfileResolver,
    StaticResolver, cube,
};

fn save_standard(dir: &tempfile::TempDir, standard: StandardProfile) -> PathBuf {
    let path = dir.path().join(format!("{}.icc", standard.name()));
    standard.to_profile().unwrap().save(&path).unwrap();
    path
}

#[test]
fn test_identity_65_scenario() {
    let cube = ColorCube::identity(65).unwrap();
    assert_eq!(cube.as_bytes().len(), 65 * 65 * 65 * 3);
    assert_eq!(cube.get(0, 0, 0), [0, 0, 0]);
    assert_eq!(cube.get(64, 64, 64), [255, 255, 255]);
    assert_eq!(cube.get(64, 0, 0), [255, 0, 0]);
    assert_eq!(cube.get(0, 0, 64), [0, 0, 255]);
}

#[test]
fn test_generate_without_profile_is_unit_cube() {
    let generator = LutGenerator::new();
    for n in [2usize, 9, 33, 65] {
        let cube = generator.generate(n, None).unwrap();
        assert_eq!(cube.resolution(), 2);
        assert!(cube.is_identity());
    }
}

#[test]
fn test_index_law_full_cube() {
    let n = 17;
    for i in 0..n * n * n {
        let (x, y, z) = ColorCube::coords(n, i);
        assert!(x < n && y < n && z < n);
        assert_eq!(x * n * n + y * n + z, i);
    }
}

#[test]
fn test_srgb_profile_reproduces_identity() {
    let dir = tempfile::tempdir().unwrap();
    let srgb = save_standard(&dir, StandardProfile::Srgb);

    for intent in [Intent::AbsoluteColorimetric, Intent::RelativeColorimetric] {
        let cube = LutGenerator::new()
            .with_intent(intent)
            .generate(9, Some(&srgb))
            .unwrap();
        assert_eq!(cube.resolution(), 9);

        let identity = ColorCube::identity(9).unwrap();
        for (got, want) in cube.as_bytes().iter().zip(identity.as_bytes()) {
            assert_abs_diff_eq!(*got as f32, *want as f32, epsilon = 2.0);
        }
    }
}

#[test]
fn test_wide_gamut_profile_changes_cube() {
    let p3 = StandardProfile::DisplayP3.to_profile().unwrap();
    let cube = LutGenerator::new()
        .with_intent(Intent::RelativeColorimetric)
        .generate_with_profile(5, &p3)
        .unwrap();

    assert!(!cube.is_identity());
    // Pure sRGB red is less saturated than P3 red.
    let red = cube.get(4, 0, 0);
    assert!(red[0] < 255 || red[1] > 0);
    // Black stays black.
    assert_eq!(cube.get(0, 0, 0), [0, 0, 0]);
}

#[test]
fn test_generate_corrupt_profile_is_transform_error() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.icc");
    std::fs::write(&broken, b"definitely not icc").unwrap();

    let err = LutGenerator::new().generate(17, Some(&broken)).unwrap_err();
    assert!(matches!(err, LutError::Transform(_)));
}

#[test]
fn test_generate_rejects_tiny_resolution() {
    let p3 = Profile::srgb();
    assert!(matches!(
        LutGenerator::new().generate_with_profile(1, &p3),
        Err(LutError::InvalidSize(1))
    ));
}

#[test]
fn test_cache_build_order_and_origins() {
    let dir = tempfile::tempdir().unwrap();
    let p3 = save_standard(&dir, StandardProfile::DisplayP3);
    let broken = dir.path().join("broken.icc");
    std::fs::write(&broken, b"garbage").unwrap();

    let resolver = StaticResolver::new()
        .with("studio", p3.clone())
        .with("laptop", broken.clone())
        .with("unplugged", dir.path().join("missing.icc"));

    let displays: Vec<DisplayId> = ["laptop", "projector", "studio", "unplugged"]
        .into_iter()
        .map(DisplayId::from)
        .collect();
    let cache = LutCache::build(&displays, 9, &resolver).unwrap();

    let order: Vec<&DisplayId> = cache.entries().iter().map(|e| &e.display).collect();
    assert_eq!(order, displays.iter().collect::<Vec<_>>());
    assert_eq!(cache.cubes().count(), 4);

    let laptop = cache.entry(&"laptop".into()).unwrap();
    assert!(matches!(&laptop.origin, LutOrigin::Fallback { profile, .. } if *profile == broken));
    assert!(laptop.cube.is_identity());
    assert_eq!(laptop.cube.resolution(), 2);

    assert_eq!(cache.entry(&"projector".into()).unwrap().origin, LutOrigin::Identity);
    assert_eq!(cache.entry(&"unplugged".into()).unwrap().origin, LutOrigin::Identity);

    let studio = cache.entry(&"studio".into()).unwrap();
    assert_eq!(studio.origin, LutOrigin::Profile(p3));
    assert_eq!(studio.cube.resolution(), 9);
}

#[test]
fn test_cache_invalidate_and_refresh() {
    struct Swappable(std::sync::Mutex<Option<PathBuf>>);

    impl ProfileResolver for Swappable {
        fn resolve(&self, _display: &DisplayId) -> Option<PathBuf> {
            self.0.lock().unwrap().clone()
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let p3 = save_standard(&dir, StandardProfile::DisplayP3);
    let resolver = Swappable(std::sync::Mutex::new(None));

    let main: DisplayId = "main".into();
    let side: DisplayId = "side".into();
    let mut cache = LutCache::build(&[main.clone(), side.clone()], 5, &resolver).unwrap();
    let before = cache.get(&main).unwrap();
    assert_eq!(before.resolution(), 2);

    // Profile assigned after startup: nothing changes until refreshed.
    *resolver.0.lock().unwrap() = Some(p3.clone());
    assert!(Arc::ptr_eq(&cache.get(&main).unwrap(), &before));

    let refreshed = cache.refresh(&main, &resolver);
    assert_eq!(refreshed.origin, LutOrigin::Profile(p3));
    assert_eq!(refreshed.cube.resolution(), 5);
    assert_eq!(cache.entries()[0].display, main);

    let removed = cache.invalidate(&side).unwrap();
    assert_eq!(removed.display, side);
    assert!(cache.get(&side).is_none());
    assert_eq!(cache.len(), 1);
    assert!(cache.invalidate(&side).is_none());

    // Hot-plugged display is appended.
    cache.refresh(&"new".into(), &resolver);
    assert_eq!(cache.entries().last().unwrap().display, DisplayId::from("new"));
}

#[test]
fn test_cube_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p3.cube");
    let p3 = StandardProfile::DisplayP3.to_profile().unwrap();
    let generated = LutGenerator::new().generate_with_profile(5, &p3).unwrap();

    cube::write_3d(&path, &generated, Some("p3")).unwrap();
    let loaded = cube::read_3d(&path).unwrap();
    assert_eq!(loaded, generated);
}
