use super::*;

#[test]
fn pixel_lookup_is_bounds_checked() {
    let f = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 255, 4, 5, 6, 255],
        premultiplied: true,
    };
    assert_eq!(f.pixel(1, 0), Some([4, 5, 6, 255]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn pixel_offsets_do_not_overflow_on_large_frames() {
    let f = FrameRGBA {
        width: 65_535,
        height: 65_535,
        data: Vec::new(),
        premultiplied: true,
    };
    // The byte offset of the last pixel is past u32::MAX; the lookup must miss, not wrap.
    assert_eq!(f.pixel(65_534, 65_534), None);
    assert_eq!(f.pixel(65_535, 0), None);
}

#[test]
fn unpremultiply_restores_straight_colour() {
    let mut px = vec![64u8, 0, 128, 128, 9, 9, 9, 0, 10, 20, 30, 255];
    unpremultiply_in_place(&mut px);
    assert_eq!(&px[..4], &[128, 0, 255, 128]);
    assert_eq!(&px[4..8], &[9, 9, 9, 0]);
    assert_eq!(&px[8..], &[10, 20, 30, 255]);
}

#[test]
fn png_round_trips_through_image() {
    let dir = std::env::temp_dir().join(format!("disco_doodle_png_{}", std::process::id()));
    let path = dir.join("f.png");
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![255, 0, 255, 255],
        premultiplied: true,
    };
    f.save_png(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 255, 255]);
    let _ = std::fs::remove_dir_all(dir);
}
