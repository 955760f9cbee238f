//! Frame source tests for lutview-core.

use std::io::Write;

use lutview_core::{
    ChromaSubsampling, ColorRange, ColorSpace, CoreError, FrameFormat, FrameSource, PlaneSize,
    RawPlanarSource, SampleEncoding,
};

fn nv_format() -> FrameFormat {
    FrameFormat::yuv(
        4,
        2,
        ChromaSubsampling::Cs420,
        ColorSpace::Bt601,
        ColorRange::Limited,
        8,
        SampleEncoding::Integer,
    )
    .unwrap()
}

#[test]
fn test_raw_source_reads_frames_back_to_back() {
    let format = nv_format();
    assert_eq!(format.frame_len(), 8 + 2 + 2);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Two frames: every byte of frame n equals n * 100 + plane.
    for frame in 0..2u8 {
        for plane in 0..3 {
            let len = format.plane_len(plane);
            file.write_all(&vec![frame * 100 + plane as u8; len]).unwrap();
        }
    }
    // Partial trailing frame is ignored.
    file.write_all(&[0xff; 5]).unwrap();
    file.flush().unwrap();

    let mut src = RawPlanarSource::open(file.path(), format).unwrap();
    assert_eq!(src.num_frames(), 2);

    let second = src.get_planes(1).unwrap();
    assert_eq!(second.index(), 1);
    assert!(second.plane(0).iter().all(|&b| b == 100));
    assert!(second.plane(1).iter().all(|&b| b == 101));
    assert!(second.plane(2).iter().all(|&b| b == 102));

    // Random access back to the first frame.
    let first = src.get_planes(0).unwrap();
    assert!(first.plane(2).iter().all(|&b| b == 2));
}

#[test]
fn test_raw_source_out_of_range() {
    let format = nv_format();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0u8; format.frame_len()]).unwrap();
    file.flush().unwrap();

    let mut src = RawPlanarSource::open(file.path(), format).unwrap();
    let err = src.get_planes(5).unwrap_err();
    assert!(matches!(err, CoreError::FrameOutOfRange { index: 5, count: 1 }));
}

#[test]
fn test_raw_source_missing_file() {
    let err = RawPlanarSource::open("/nonexistent/lutview/clip.yuv", nv_format()).unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}

#[test]
fn test_raw_source_rejects_empty_plane_format() {
    // Built as a literal, bypassing `FrameFormat::new`.
    let format = FrameFormat {
        planes: [PlaneSize::new(0, 4), PlaneSize::new(2, 2), PlaneSize::new(2, 2)],
        ..nv_format()
    };
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0u8; 64]).unwrap();
    file.flush().unwrap();

    let err = RawPlanarSource::open(file.path(), format).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDimensions { plane: 0, width: 0, .. }));
}
