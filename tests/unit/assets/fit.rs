use super::*;
use crate::foundation::core::Point;

#[test]
fn cover_scale_takes_the_larger_axis_ratio() {
    assert_eq!(
        cover_scale(Resolution::new(100, 50), Resolution::new(200, 200)),
        4.0
    );
    assert_eq!(
        cover_scale(Resolution::new(400, 400), Resolution::new(100, 50)),
        0.25
    );
    assert_eq!(
        cover_scale(Resolution::new(0, 10), Resolution::new(10, 10)),
        0.0
    );
}

#[test]
fn cover_transform_centres_the_overflow() {
    let xf = cover_transform(Resolution::new(100, 50), Resolution::new(200, 200));
    // Scaled to 400x200, overflowing 100 on each side horizontally.
    let origin = xf * Point::new(0.0, 0.0);
    assert_eq!((origin.x, origin.y), (-100.0, 0.0));
    let corner = xf * Point::new(100.0, 50.0);
    assert_eq!((corner.x, corner.y), (300.0, 200.0));
}

#[test]
fn cover_fit_matches_target_and_fills_it() {
    let image = Raster::solid(Resolution::new(4, 2), crate::Color::rgb(255, 0, 0));
    let fitted = cover_fit(&image, Resolution::new(6, 6)).unwrap();
    assert_eq!(fitted.resolution(), Resolution::new(6, 6));
    assert_eq!(fitted.pixel(3, 3), Some([255, 0, 0, 255]));
    assert_eq!(fitted.pixel(0, 0).map(|p| p[3]), Some(255));
}

#[test]
fn cover_fit_crops_the_wide_axis() {
    // Left half black, right half white.
    let mut data = Vec::new();
    for _y in 0..2 {
        for x in 0..4 {
            let v = if x < 2 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let image = Raster::from_premul_rgba8(4, 2, data).unwrap();
    let fitted = cover_fit(&image, Resolution::new(8, 8)).unwrap();
    let left = fitted.pixel(0, 4).unwrap();
    let right = fitted.pixel(7, 4).unwrap();
    assert!(left[0] < 32, "left {left:?}");
    assert!(right[0] > 223, "right {right:?}");
}

#[test]
fn cover_fit_of_empty_inputs_is_transparent() {
    let fitted = cover_fit(&Raster::default(), Resolution::new(3, 2)).unwrap();
    assert_eq!(fitted, Raster::new(Resolution::new(3, 2)));

    let image = Raster::solid(Resolution::new(2, 2), crate::Color::WHITE);
    assert!(cover_fit(&image, Resolution::new(0, 0)).unwrap().is_empty());
}
