use crate::foundation::error::{ScrollreelError, ScrollreelResult};

pub const MAX_BLUR_RADIUS: u32 = 256;

/// Kernel radius used for a Gaussian of standard deviation `sigma`.
pub fn radius_for_sigma(sigma: f64) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    ((sigma * 2.0).ceil() as u32).min(MAX_BLUR_RADIUS)
}

/// Separable Gaussian blur of a premultiplied RGBA8 buffer, edges clamped.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ScrollreelResult<Vec<u8>> {
    let expected_len = buffer_len(width, height)?;
    if src.len() != expected_len {
        return Err(ScrollreelError::evaluation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur `data` in place, touching only the painted bounding box grown by the
/// kernel radius. Fully transparent buffers are left alone.
pub fn blur_in_place(data: &mut [u8], width: u32, height: u32, sigma: f64) -> ScrollreelResult<()> {
    let radius = radius_for_sigma(sigma);
    if radius == 0 {
        return Ok(());
    }
    if data.len() != buffer_len(width, height)? {
        return Err(ScrollreelError::evaluation(
            "blur_in_place expects data matching width*height*4",
        ));
    }
    let Some((x0, y0, x1, y1)) = painted_bounds(data, width, height) else {
        return Ok(());
    };
    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = (x1 + radius).min(width - 1);
    let y1 = (y1 + radius).min(height - 1);
    let (rw, rh) = (x1 - x0 + 1, y1 - y0 + 1);

    let stride = width as usize * 4;
    let row_bytes = rw as usize * 4;
    let mut region = Vec::with_capacity(row_bytes * rh as usize);
    for y in y0..=y1 {
        let start = y as usize * stride + x0 as usize * 4;
        region.extend_from_slice(&data[start..start + row_bytes]);
    }

    // Pad with transparent pixels so clamped edges do not smear color inward.
    let pad = radius;
    let (pw, ph) = (rw + 2 * pad, rh + 2 * pad);
    let mut padded = vec![0u8; buffer_len(pw, ph)?];
    for y in 0..rh as usize {
        let dst = ((y + pad as usize) * pw as usize + pad as usize) * 4;
        padded[dst..dst + row_bytes].copy_from_slice(&region[y * row_bytes..(y + 1) * row_bytes]);
    }

    let blurred = blur_rgba8_premul(&padded, pw, ph, radius, (sigma as f32).max(0.01))?;
    for y in 0..rh as usize {
        let src = ((y + pad as usize) * pw as usize + pad as usize) * 4;
        let dst = (y0 as usize + y) * stride + x0 as usize * 4;
        data[dst..dst + row_bytes].copy_from_slice(&blurred[src..src + row_bytes]);
    }
    Ok(())
}

fn buffer_len(width: u32, height: u32) -> ScrollreelResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ScrollreelError::evaluation("blur buffer size overflow"))
}

fn painted_bounds(data: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if width == 0 {
        return None;
    }
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    let stride = width as usize * 4;
    for (y, row) in (0..height).zip(data.chunks_exact(stride)) {
        for (x, px) in (0..width).zip(row.chunks_exact(4)) {
            if px[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0, x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ScrollreelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ScrollreelError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ScrollreelError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
