use crate::foundation::{
    core::{Affine, Resolution, Vec2},
    error::HalftoneResult,
    raster::{Raster, pixmap_dims},
};

/// Uniform scale that makes `source` cover `target` while preserving aspect.
pub fn cover_scale(source: Resolution, target: Resolution) -> f64 {
    if source.is_empty() {
        return 0.0;
    }
    let sx = f64::from(target.width) / f64::from(source.width);
    let sy = f64::from(target.height) / f64::from(source.height);
    sx.max(sy)
}

/// Transform placing `source`, scaled by [`cover_scale`], centred on `target`.
pub fn cover_transform(source: Resolution, target: Resolution) -> Affine {
    let scale = cover_scale(source, target);
    let dx = (f64::from(target.width) - f64::from(source.width) * scale) / 2.0;
    let dy = (f64::from(target.height) - f64::from(source.height) * scale) / 2.0;
    Affine::translate(Vec2::new(dx, dy)) * Affine::scale(scale)
}

/// Cover-fit `image` into a raster of exactly `target` size, cropping overflow.
#[tracing::instrument(skip(image), fields(source = %image.resolution()))]
pub fn cover_fit(image: &Raster, target: Resolution) -> HalftoneResult<Raster> {
    if target.is_empty() || image.is_empty() {
        return Ok(Raster::new(target));
    }

    let (w, h) = pixmap_dims(target)?;
    let source = image.resolution();
    let paint = image.to_image_paint()?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(cover_transform(source, target)));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(source.width),
        f64::from(source.height),
    ));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(Raster::from_pixmap(&pixmap))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fit.rs"]
mod tests;
