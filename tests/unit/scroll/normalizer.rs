use super::*;

fn damp() -> ScrollNormalizer {
    ScrollNormalizer::new(5000.0, 1000.0, Smoothing::Damp { lambda: 8.0 }).unwrap()
}

#[test]
fn limit_is_document_minus_viewport() {
    let n = damp();
    assert_eq!(n.limit(), 4000.0);
    assert_eq!(n.progress(), 0.0);

    let short = ScrollNormalizer::new(600.0, 800.0, Smoothing::default()).unwrap();
    assert_eq!(short.limit(), 0.0);
    assert_eq!(short.progress(), 0.0);
}

#[test]
fn wheel_accumulates_and_clamps_target() {
    let mut n = damp();
    n.input(ScrollInput::Wheel(300.0));
    n.input(ScrollInput::Wheel(200.0));
    assert_eq!(n.target(), 500.0);
    assert_eq!(n.position(), 0.0);

    n.input(ScrollInput::Wheel(1e6));
    assert_eq!(n.target(), 4000.0);
    n.input(ScrollInput::Wheel(-1e7));
    assert_eq!(n.target(), 0.0);
}

#[test]
fn damp_converges_and_snaps() {
    let mut n = damp();
    n.input(ScrollInput::Wheel(1000.0));
    let mut last = 0.0;
    for _ in 0..30 {
        assert!(n.tick(1.0 / 60.0));
        assert!(n.position() > last);
        last = n.position();
    }
    for _ in 0..600 {
        n.tick(1.0 / 60.0);
    }
    assert_eq!(n.position(), 1000.0);
    assert!(n.is_settled());
    assert!(!n.tick(1.0 / 60.0));
    assert_eq!(n.progress(), 0.25);
}

#[test]
fn damp_step_is_frame_rate_independent() {
    let mut a = damp();
    let mut b = damp();
    a.input(ScrollInput::Wheel(2000.0));
    b.input(ScrollInput::Wheel(2000.0));
    a.tick(0.1);
    b.tick(0.05);
    b.tick(0.05);
    assert!((a.position() - b.position()).abs() < 1e-9);
}

#[test]
fn eased_glide_lands_on_target_after_duration() {
    let mut n = ScrollNormalizer::new(5000.0, 1000.0, Smoothing::default()).unwrap();
    n.input(ScrollInput::Wheel(800.0));
    n.tick(0.1);
    let early = n.position();
    assert!(early > 0.0 && early < 800.0);
    // OutExpo covers about half the distance in the first tenth.
    assert!(early > 300.0);
    n.tick(1.0);
    assert_eq!(n.position(), 800.0);
    assert!(n.is_settled());
}

#[test]
fn touch_is_immediate_unless_smoothed() {
    let mut n = damp();
    n.input(ScrollInput::Touch(1200.0));
    assert_eq!(n.position(), 1200.0);
    assert_eq!(n.target(), 1200.0);

    let mut s = damp().with_smooth_touch(true);
    s.input(ScrollInput::Touch(1200.0));
    assert_eq!(s.position(), 0.0);
    assert_eq!(s.target(), 1200.0);
}

#[test]
fn jump_sets_both_positions() {
    let mut n = ScrollNormalizer::new(5000.0, 1000.0, Smoothing::default()).unwrap();
    n.input(ScrollInput::Wheel(500.0));
    n.input(ScrollInput::Jump(9999.0));
    assert_eq!(n.position(), 4000.0);
    assert_eq!(n.target(), 4000.0);
    assert_eq!(n.progress(), 1.0);
    assert!(!n.tick(0.016));
}

#[test]
fn non_finite_input_is_ignored() {
    let mut n = damp();
    n.input(ScrollInput::Wheel(f64::NAN));
    n.input(ScrollInput::Jump(f64::INFINITY));
    assert_eq!(n.target(), 0.0);
    assert_eq!(n.position(), 0.0);
}

#[test]
fn resize_clamps_and_is_idempotent() {
    let mut n = damp();
    n.input(ScrollInput::Jump(3500.0));
    n.resize(3000.0, 1000.0);
    assert_eq!(n.limit(), 2000.0);
    assert_eq!(n.position(), 2000.0);
    assert_eq!(n.progress(), 1.0);
    n.resize(3000.0, 1000.0);
    assert_eq!(n.position(), 2000.0);
}

#[test]
fn invalid_smoothing_is_rejected() {
    let err = ScrollNormalizer::new(10.0, 1.0, Smoothing::Damp { lambda: 0.0 }).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert!(
        ScrollNormalizer::new(
            10.0,
            1.0,
            Smoothing::Eased {
                duration_secs: f64::NAN,
                ease: Ease::Linear
            }
        )
        .is_err()
    );
}

#[test]
fn smoothing_round_trips_through_json() {
    let json = serde_json::to_string(&Smoothing::Damp { lambda: 4.0 }).unwrap();
    assert_eq!(json, r#"{"mode":"damp","lambda":4.0}"#);
    let back: Smoothing = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Smoothing::Damp { lambda: 4.0 });
}
