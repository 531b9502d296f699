use super::*;

#[test]
fn reveal_curves_hit_their_keyframes() {
    let c = FadeCurves::reveal();
    assert_eq!(
        c.sample(0.0),
        FadeOffsets {
            black: 1.0,
            white: 2.0
        }
    );
    assert_eq!(
        c.sample(1.0),
        FadeOffsets {
            black: -0.7,
            white: 0.0
        }
    );
}

#[test]
fn conceal_curves_hit_their_keyframes() {
    let c = FadeCurves::conceal();
    assert_eq!(
        c.sample(0.0),
        FadeOffsets {
            black: 1.1,
            white: 1.0
        }
    );
    assert_eq!(
        c.sample(1.0),
        FadeOffsets {
            black: 0.0,
            white: -0.4
        }
    );
}

#[test]
fn reveal_white_uses_cubic_black_uses_quadratic() {
    let c = FadeCurves::reveal().sample(0.5);
    // black: 1 + (-1.7 * 0.75)
    assert!((c.black - (1.0 - 1.7 * 0.75)).abs() < 1e-12);
    // white: 2 - 2 * 0.875
    assert!((c.white - 0.25).abs() < 1e-12);
}

#[test]
fn progress_tracks_elapsed_time() {
    let start = Instant::now();
    let run = AnimationRun::new(
        AnimationGeneration::default(),
        FadeCurves::reveal(),
        start,
        Duration::from_millis(200),
    );
    assert_eq!(run.progress(start), 0.0);
    assert!((run.progress(start + Duration::from_millis(50)) - 0.25).abs() < 1e-9);
    assert!(run.progress(start + Duration::from_millis(400)) >= 1.0);

    let (offsets, t) = run.sample(start + Duration::from_millis(200));
    assert_eq!(t, 1.0);
    assert_eq!(offsets.black, -0.7);
}

#[test]
fn zero_duration_is_complete_immediately() {
    let start = Instant::now();
    let run = AnimationRun::new(
        AnimationGeneration::default(),
        FadeCurves::conceal(),
        start,
        Duration::ZERO,
    );
    assert_eq!(run.progress(start), 1.0);
}

#[test]
fn newer_runs_supersede_older_ones() {
    let start = Instant::now();
    let mut animator = Animator::default();

    let first = animator.start(FadeCurves::reveal(), start, Duration::from_secs(1));
    assert!(animator.is_current(&first));
    animator.schedule(first.clone());
    assert!(animator.is_animating());

    let second = animator.start(FadeCurves::conceal(), start, Duration::from_secs(1));
    assert!(!animator.is_current(&first));
    assert!(animator.is_current(&second));
    assert!(second.generation() > first.generation());
    assert!(!animator.is_animating());

    let queued = animator.take_scheduled();
    assert_eq!(queued.len(), 1);
    assert!(animator.take_scheduled().is_empty());
}
