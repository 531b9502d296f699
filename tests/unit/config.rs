use super::*;

#[test]
fn empty_object_uses_defaults() {
    let cfg = HalftoneConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, HalftoneConfig::default());
    assert_eq!(cfg.options.dot_size, 16.0);
    assert!(!cfg.options.dark_top);
    assert_eq!(cfg.palette.colors.len(), 2);
    assert_eq!(cfg.palette.overlap, 0.05);
}

#[test]
fn full_document_parses() {
    let cfg = HalftoneConfig::from_json_str(
        r##"{
            "palette": { "colors": ["#000", "#808080", "#ffffff"], "overlap": 0.2 },
            "image": "img/hero.png",
            "dark_top": true,
            "dot_size": 10,
            "shader_dir": "glsl"
        }"##,
    )
    .unwrap();
    assert_eq!(
        cfg.palette.colors,
        vec![Color::BLACK, Color::gray(128), Color::WHITE]
    );
    assert_eq!(cfg.options.image, Some(PathBuf::from("img/hero.png")));
    assert!(cfg.options.dark_top);
    assert_eq!(cfg.options.dot_size, 10.0);
    assert_eq!(cfg.options.shader_dir, Some(PathBuf::from("glsl")));

    let palette = cfg.build_palette().unwrap();
    assert_eq!(palette.len(), 3);
    assert_eq!(palette.overlap(), 0.2);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        r#"{ "dot_size": 0 }"#,
        r#"{ "dot_size": -3 }"#,
        r#"{ "palette": { "colors": [] } }"#,
        r#"{ "palette": { "overlap": 1.0 } }"#,
        r##"{ "palette": { "colors": ["#zzz"] } }"##,
        r#"{ "dark_top": "yes" }"#,
        "not json",
    ] {
        let err = HalftoneConfig::from_json_str(bad).unwrap_err();
        assert!(matches!(err, HalftoneError::Validation(_)), "{bad}: {err}");
    }
}

#[test]
fn round_trips_through_json() {
    let mut cfg = HalftoneConfig::default();
    cfg.options.dark_top = true;
    cfg.palette.colors.push(Color::rgba(1, 2, 3, 4));
    let json = cfg.to_json_string().unwrap();
    assert!(json.contains("\"#01020304\""));
    assert_eq!(HalftoneConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn from_path_reads_files() {
    let path = std::env::temp_dir().join(format!("halftone_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "dot_size": 8 }"#).unwrap();
    assert_eq!(HalftoneConfig::from_path(&path).unwrap().options.dot_size, 8.0);
    std::fs::remove_file(&path).ok();

    assert!(HalftoneConfig::from_path("/definitely/missing/halftone.json").is_err());
}
