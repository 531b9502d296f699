use crate::foundation::{
    core::{Point, Resolution},
    error::{HalftoneError, HalftoneResult},
};

/// Largest lattice [`PointField::generate`] will build.
pub const MAX_FIELD_POINTS: usize = 1 << 24;

/// Brick-offset dot lattice covering the viewport.
///
/// Rows are `pitch` apart and columns `pitch / 2` apart; odd columns drop by
/// half a pitch, which packs neighbouring dots into a hex-like pattern.
/// Coordinates are interleaved `x, y` in pixel space, rows outer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointField {
    resolution: Resolution,
    pitch: f32,
    rows: usize,
    cols: usize,
    coords: Vec<f32>,
}

impl PointField {
    /// Generate the lattice for `resolution` at dot pitch `pitch`.
    pub fn generate(resolution: Resolution, pitch: f32) -> HalftoneResult<Self> {
        if !pitch.is_finite() || pitch <= 0.0 {
            return Err(HalftoneError::validation(format!(
                "dot pitch must be finite and > 0, got {pitch}"
            )));
        }

        let half = pitch / 2.0;
        let too_dense = || {
            HalftoneError::validation(format!(
                "dot pitch {pitch} is too small for {resolution} (limit {MAX_FIELD_POINTS} points)"
            ))
        };
        let rows = lattice_count(resolution.height, pitch).ok_or_else(too_dense)?;
        let cols = lattice_count(resolution.width, half).ok_or_else(too_dense)?;
        let points = rows
            .checked_mul(cols)
            .filter(|&n| n <= MAX_FIELD_POINTS)
            .ok_or_else(too_dense)?;

        let mut coords = Vec::with_capacity(points * 2);
        for row in 0..rows {
            for col in 0..cols {
                coords.push(col as f32 * half);
                coords.push(row as f32 * pitch + (col % 2) as f32 * half);
            }
        }

        Ok(Self {
            resolution,
            pitch,
            rows,
            cols,
            coords,
        })
    }

    /// Flat interleaved `x, y` vertex data.
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    /// Number of points (`coords().len() / 2`).
    pub fn len(&self) -> usize {
        self.coords.len() / 2
    }

    /// `true` before the first generation.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Row and column counts.
    pub fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Pitch the field was generated with.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Viewport the field was generated for.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.coords
            .chunks_exact(2)
            .map(|xy| Point::new(f64::from(xy[0]), f64::from(xy[1])))
    }
}

/// `floor(extent / step) + 1`, or `None` past [`MAX_FIELD_POINTS`].
fn lattice_count(extent: u32, step: f32) -> Option<usize> {
    let steps = f64::from((extent as f32 / step).floor());
    if !steps.is_finite() || steps >= MAX_FIELD_POINTS as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}

#[cfg(test)]
#[path = "../tests/unit/field.rs"]
mod tests;
