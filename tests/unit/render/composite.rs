use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn over_opaque_src_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over([0, 0, 0, 255], src, 1.0), src);
}

#[test]
fn over_transparent_dst_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src, 1.0), src);
}

#[test]
fn over_half_opacity_mixes() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
}

#[test]
fn add_saturates_and_stays_premultiplied() {
    let out = add([200, 100, 0, 200], [100, 100, 100, 100], 1.0);
    assert_eq!(out, [255, 200, 100, 255]);
    assert!(out[..3].iter().all(|&c| c <= out[3]));
    assert_eq!(add([10, 10, 10, 10], [50, 50, 50, 50], 0.0), [10, 10, 10, 10]);
}

#[test]
fn in_place_ops_check_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(add_in_place(&mut dst, &[0u8; 12], 1.0).is_err());
    over_in_place(&mut dst, &[9, 9, 9, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}
