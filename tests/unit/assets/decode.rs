use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "halftone_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let raster = decode_image(&png_bytes(1, 1, vec![100, 50, 200, 128])).unwrap();
    assert_eq!(raster.width(), 1);
    assert_eq!(raster.height(), 1);
    assert_eq!(
        raster.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn svg_parses_and_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2">
        <rect width="4" height="2" fill="#ffffff"/>
    </svg>"##;
    let tree = parse_svg(svg).unwrap();
    let raster = rasterize_svg(&tree).unwrap();
    assert_eq!((raster.width(), raster.height()), (4, 2));
    assert_eq!(raster.pixel(1, 1), Some([255, 255, 255, 255]));

    assert!(parse_svg(b"<svg").is_err());
}

#[test]
fn load_image_file_dispatches_on_content() {
    let tmp = temp_dir("decode_dispatch");
    std::fs::create_dir_all(&tmp).unwrap();

    let png = tmp.join("dot.png");
    std::fs::write(&png, png_bytes(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255])).unwrap();
    let raster = load_image_file(&png).unwrap();
    assert_eq!(raster.pixel(1, 0), Some([255, 255, 255, 255]));

    // No extension: sniffed from the markup.
    let svg = tmp.join("shape");
    std::fs::write(
        &svg,
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="3"></svg>"#,
    )
    .unwrap();
    assert_eq!(load_image_file(&svg).unwrap().width(), 3);

    assert!(load_image_file(&tmp.join("missing.png")).is_err());

    std::fs::remove_dir_all(&tmp).ok();
}
