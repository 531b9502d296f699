use super::*;

#[test]
fn hex_colors_parse_in_all_forms() {
    assert_eq!(Color::from_hex("#014c51").unwrap(), Color::rgb(1, 76, 81));
    assert_eq!(Color::from_hex("02787F").unwrap(), Color::rgb(2, 120, 127));
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    assert_eq!(
        Color::from_hex("#10203080").unwrap(),
        Color::rgba(16, 32, 48, 128)
    );
}

#[test]
fn hex_colors_reject_garbage() {
    for bad in ["", "#12", "#ggg", "#12345", "#1234567", "#ééé"] {
        assert!(Color::from_hex(bad).is_err(), "{bad} should not parse");
    }
}

#[test]
fn color_serde_uses_hex_strings() {
    let json = serde_json::to_string(&Color::rgb(1, 76, 81)).unwrap();
    assert_eq!(json, "\"#014c51\"");

    let back: Color = serde_json::from_str("\"#02787F\"").unwrap();
    assert_eq!(back, Color::rgb(2, 120, 127));

    assert!(serde_json::from_str::<Color>("\"teal\"").is_err());
}

#[test]
fn premultiplied_scales_channels_by_alpha() {
    assert_eq!(Color::rgb(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
    assert_eq!(Color::rgba(255, 128, 0, 0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(Color::rgba(255, 255, 255, 128).premultiplied(), [128, 128, 128, 128]);
}

#[test]
fn resolution_helpers() {
    let r = Resolution::new(100, 50);
    assert_eq!(r.max_side(), 100);
    assert_eq!(r.area(), 5000);
    assert_eq!(r.as_uniform(), [100.0, 50.0]);
    assert!(!r.is_empty());
    assert!(Resolution::new(0, 10).is_empty());
    assert_eq!(r.to_string(), "100x50");
}
