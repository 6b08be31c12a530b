use super::*;

#[test]
fn viewport_rejects_zero_and_oversized() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    assert!(Viewport::new(70_000, 10).is_err());
    assert!(Viewport::new(1280, 720).is_ok());
}

#[test]
fn fit_centers_letterboxed_content() {
    let vp = Viewport::new(2000, 800).unwrap();
    let a = vp.fit(1000.0, 800.0);
    let p = a * Point::new(0.0, 0.0);
    assert_eq!(p, Point::new(500.0, 0.0));
    let q = a * Point::new(1000.0, 800.0);
    assert_eq!(q, Point::new(1500.0, 800.0));
}

#[test]
fn premul_scales_channels_by_alpha() {
    let c = Rgba8 {
        r: 255,
        g: 128,
        b: 0,
        a: 128,
    };
    assert_eq!(c.premul(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::rgb(1, 2, 3).premul(), [1, 2, 3, 255]);
}

#[test]
fn with_opacity_clamps() {
    let c = Rgba8::rgb(0, 242, 255);
    assert_eq!(c.with_opacity(0.5).a, 128);
    assert_eq!(c.with_opacity(2.0).a, 255);
    assert_eq!(c.with_opacity(-1.0).a, 0);
}
