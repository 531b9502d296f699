use super::*;

#[test]
fn in_range_offsets_use_pure_black_and_white() {
    let g = FadeGradient::from_offsets(0.2, 0.8);
    assert_eq!(
        g.stops(),
        &[
            GradientStop {
                offset: 0.2,
                color: Color::BLACK
            },
            GradientStop {
                offset: 0.8,
                color: Color::WHITE
            },
        ]
    );
}

#[test]
fn cutoff_for_black_below_zero() {
    // range -1, perc 0.5, flipped because black is the one cut off.
    assert_eq!(cutoff_color(-0.5, 0.5), Color::gray(128));

    let g = FadeGradient::from_offsets(-0.5, 0.5);
    assert_eq!(g.stops()[0].offset, 0.0);
    assert_eq!(g.stops()[0].color, Color::gray(128));
    assert_eq!(g.stops()[1].color, Color::WHITE);
}

#[test]
fn cutoff_for_white_past_the_end() {
    // range -1.5, perc (0.5 - 1) / -1.5 = 1/3.
    assert_eq!(cutoff_color(0.5, 2.0), Color::gray(85));
    // Start of the reveal: black on the far edge, white beyond it.
    assert_eq!(cutoff_color(1.0, 2.0), Color::gray(0));
    // Start of the conceal: black just beyond the edge.
    assert_eq!(cutoff_color(1.1, 1.0), Color::gray(255));
}

#[test]
fn coincident_offsets_resolve_to_a_hard_edge() {
    assert_eq!(cutoff_color(1.5, 1.5), Color::BLACK);
    assert_eq!(cutoff_color(-0.2, -0.2), Color::WHITE);
}

#[test]
fn color_at_follows_canvas_rules() {
    let g = FadeGradient::from_offsets(0.25, 0.75);
    assert_eq!(g.color_at(0.0), Color::BLACK);
    assert_eq!(g.color_at(0.25), Color::BLACK);
    assert_eq!(g.color_at(0.5), Color::gray(128));
    assert_eq!(g.color_at(0.75), Color::WHITE);
    assert_eq!(g.color_at(1.0), Color::WHITE);
}

#[test]
fn stops_are_sorted_stably() {
    // White before black along the diagonal.
    let g = FadeGradient::from_offsets(0.9, 0.1);
    assert_eq!(g.stops()[0].color, Color::WHITE);
    assert_eq!(g.color_at(0.0), Color::WHITE);
    assert_eq!(g.color_at(1.0), Color::BLACK);

    // Equal offsets keep insertion order: black first.
    let g = FadeGradient::from_offsets(0.5, 0.5);
    assert_eq!(g.color_at(0.4), Color::BLACK);
    assert_eq!(g.color_at(0.6), Color::WHITE);
}

#[test]
fn fresh_and_resized_masks_are_transparent() {
    let mut mask = FadeMask::new(Resolution::new(4, 4));
    assert!(mask.raster().data().iter().all(|&b| b == 0));
    assert!(mask.gradient().is_none());

    mask.paint(0.0, 1.0);
    assert!(mask.gradient().is_some());
    mask.resize(Resolution::new(2, 3));
    assert_eq!(mask.resolution(), Resolution::new(2, 3));
    assert!(mask.raster().data().iter().all(|&b| b == 0));
    assert!(mask.gradient().is_none());
}

#[test]
fn paint_runs_dark_to_light_along_the_diagonal() {
    let mut mask = FadeMask::new(Resolution::new(10, 10));
    mask.paint(0.0, 1.0);
    let tl = mask.raster().pixel(0, 0).unwrap();
    let br = mask.raster().pixel(9, 9).unwrap();
    let tr = mask.raster().pixel(9, 0).unwrap();
    let bl = mask.raster().pixel(0, 9).unwrap();
    assert!(tl[0] < 20, "{tl:?}");
    assert!(br[0] > 235, "{br:?}");
    assert_eq!(tr, bl);
    assert_eq!(tl[3], 255);
}

#[test]
fn paint_uses_the_longer_side_for_the_diagonal() {
    // Wide raster: size = 20, so the bottom-right corner only reaches ~0.75.
    let mut mask = FadeMask::new(Resolution::new(20, 10));
    mask.paint(0.0, 1.0);
    let br = mask.raster().pixel(19, 9).unwrap();
    let expected = ((19.5 + 9.5) / 40.0 * 255.0_f64).round() as u8;
    assert_eq!(br[0], expected);
}

#[test]
fn fully_hidden_and_fully_shown() {
    let mut mask = FadeMask::new(Resolution::new(6, 6));
    // Reveal start: everything before the black stop.
    mask.paint(1.0, 2.0);
    assert!(mask.raster().data().chunks_exact(4).all(|p| p[0] == 0));
    // Reveal end: everything past the white stop.
    mask.paint(-0.7, 0.0);
    assert!(mask.raster().data().chunks_exact(4).all(|p| p[0] == 255));
}
