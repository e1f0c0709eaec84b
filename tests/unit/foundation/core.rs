use super::*;

#[test]
fn fps_frames_secs_roundtrip_floor() {
    let fps = Fps::new(30000, 1001).unwrap();
    let secs = fps.frames_to_secs(123);
    assert_eq!(fps.secs_to_frames_floor(secs), 123);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn tick_next_is_monotonic() {
    assert_eq!(Tick(0).next(), Tick(1));
    assert_eq!(Tick(u64::MAX).next(), Tick(u64::MAX));
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas {
        width: 200,
        height: 100,
    };
    assert_eq!(c.center(), Point::new(100.0, 50.0));
}

#[test]
fn rgba8_parses_short_and_alpha_forms() {
    assert_eq!(
        Rgba8::from_hex("#ff00ff").unwrap(),
        Rgba8::opaque(255, 0, 255)
    );
    let c = Rgba8::from_hex("#00ffff80").unwrap();
    assert_eq!(c.a, 0x80);
    assert_eq!(c.to_hex(), "#00ffff80");
    assert!(Rgba8::from_hex("ff00ff").is_err());
    assert!(Rgba8::from_hex("#ff00f").is_err());
    assert!(Rgba8::from_hex("#gg0000").is_err());
}

#[test]
fn rgba8_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgba8::opaque(57, 255, 20)).unwrap();
    assert_eq!(json, "\"#39ff14\"");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgba8::opaque(57, 255, 20));
}
