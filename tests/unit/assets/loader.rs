use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "halftone_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn requests_are_numbered_in_order() {
    let mut loader = ImageLoader::new();
    assert_eq!(loader.latest(), None);
    let a = loader.request("/definitely/missing/a.png");
    let b = loader.request("/definitely/missing/b.png");
    assert!(b > a);
    assert_eq!(loader.latest(), Some(b));
}

#[test]
fn loaded_image_is_delivered_through_wait() {
    let tmp = temp_dir("loader_ok");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("img.png");
    write_png(&path, 3, 2);

    let mut loader = ImageLoader::new();
    let req = loader.request(&path);
    let ev = loader.wait(Duration::from_secs(10)).expect("completion");
    assert_eq!(ev.request(), req);
    match ev {
        ImageEvent::Loaded { image, .. } => {
            assert_eq!((image.width(), image.height()), (3, 2));
            assert_eq!(image.pixel(0, 0), Some([10, 20, 30, 255]));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(loader.poll().is_empty());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_is_reported_as_failure() {
    let mut loader = ImageLoader::new();
    let req = loader.request("/definitely/missing/halftone.png");
    match loader.wait(Duration::from_secs(10)).expect("completion") {
        ImageEvent::Failed {
            request,
            path,
            error,
        } => {
            assert_eq!(request, req);
            assert!(path.ends_with("halftone.png"));
            assert!(!error.is_empty());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn wait_times_out_without_requests() {
    let loader = ImageLoader::new();
    assert!(loader.wait(Duration::from_millis(10)).is_none());
}
