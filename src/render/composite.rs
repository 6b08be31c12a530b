use crate::foundation::error::{ScrollreelError, ScrollreelResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Additive (lighter) blend, used for bloom.
pub fn add(dst: PremulRgba8, src: PremulRgba8, strength: f32) -> PremulRgba8 {
    let s = ((strength.clamp(0.0, 4.0) * 255.0).round() as u32).min(1020);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = u32::from(dst[i]) + (u32::from(src[i]) * s + 127) / 255;
        out[i] = v.min(255) as u8;
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ScrollreelResult<()> {
    check_lengths(dst, src, "over_in_place")?;
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn add_in_place(dst: &mut [u8], src: &[u8], strength: f32) -> ScrollreelResult<()> {
    check_lengths(dst, src, "add_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s.iter().all(|&b| b == 0) {
            continue;
        }
        let out = add([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], strength);
        d.copy_from_slice(&out);
    }
    Ok(())
}

fn check_lengths(dst: &[u8], src: &[u8], op: &str) -> ScrollreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ScrollreelError::evaluation(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
