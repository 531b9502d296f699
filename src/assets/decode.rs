use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    error::{HalftoneError, HalftoneResult},
    math::premultiply_rgba8_in_place,
    raster::Raster,
};

/// Largest side accepted for a rasterized SVG source.
const MAX_SVG_DIM: u32 = 16_384;

/// Decode encoded image bytes (PNG, JPEG, ...) into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> HalftoneResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Raster::from_premul_rgba8(width, height, data)
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> HalftoneResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG tree at its intrinsic size.
pub fn rasterize_svg(tree: &usvg::Tree) -> HalftoneResult<Raster> {
    fn to_px(v: f32) -> HalftoneResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(HalftoneError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width())?;
    let h = to_px(size.height())?;
    if w > MAX_SVG_DIM || h > MAX_SVG_DIM {
        return Err(HalftoneError::asset(format!(
            "svg raster size too large: {w}x{h} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| HalftoneError::asset("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        w as f32 / size.width(),
        h as f32 / size.height(),
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia already stores premultiplied RGBA8.
    Raster::from_premul_rgba8(w, h, pixmap.data().to_vec())
}

/// Read and decode a source image from disk. SVG documents are detected by
/// extension or by their leading markup.
pub fn load_image_file(path: &Path) -> HalftoneResult<Raster> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read source image '{}'", path.display()))?;

    if is_svg(path, &bytes) {
        let tree = parse_svg(&bytes)?;
        return rasterize_svg(&tree);
    }
    decode_image(&bytes)
}

fn is_svg(path: &Path, bytes: &[u8]) -> bool {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if by_ext {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
