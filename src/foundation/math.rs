/// Rec. 601 luma weights, matching the halftone vertex program.
pub(crate) const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Luminance in [0,1] of a premultiplied RGBA8 pixel, computed on straight color.
pub(crate) fn luminance_premul(px: [u8; 4]) -> f32 {
    if px[3] == 0 {
        return 0.0;
    }
    let a = f32::from(px[3]);
    let weighted = LUMA_WEIGHTS[0] * f32::from(px[0])
        + LUMA_WEIGHTS[1] * f32::from(px[1])
        + LUMA_WEIGHTS[2] * f32::from(px[2]);
    (weighted / a).clamp(0.0, 1.0)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a);
        px[1] = mul_div255(u16::from(px[1]), a);
        px[2] = mul_div255(u16::from(px[2]), a);
    }
}

/// Source-over for premultiplied pixels.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
