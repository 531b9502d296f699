use crate::foundation::{
    core::{Color, Resolution},
    math::clamp01,
    raster::Raster,
};

/// One gradient stop: a position along the diagonal and its color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub offset: f64,
    /// Straight color.
    pub color: Color,
}

/// Two-stop linear gradient evaluated the way a 2D canvas does.
///
/// Stops are kept stably sorted by offset. Positions at or before the first
/// stop take its color, at or after the last stop take its color, and
/// positions in between interpolate.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeGradient {
    stops: Vec<GradientStop>,
}

impl FadeGradient {
    /// Build the black/white gradient for a pair of fade offsets.
    ///
    /// Offsets outside `[0, 1]` are clamped onto the edge and their stop is
    /// recolored with [`cutoff_color`], approximating where the gradient would
    /// have been cut.
    pub fn from_offsets(black: f64, white: f64) -> Self {
        let out_of_range = |v: f64| !(0.0..=1.0).contains(&v);
        let black_color = if out_of_range(black) {
            cutoff_color(black, white)
        } else {
            Color::BLACK
        };
        let white_color = if out_of_range(white) {
            cutoff_color(black, white)
        } else {
            Color::WHITE
        };
        Self::from_stops(vec![
            GradientStop {
                offset: clamp01(black),
                color: black_color,
            },
            GradientStop {
                offset: clamp01(white),
                color: white_color,
            },
        ])
    }

    /// Gradient from stops in insertion order.
    pub fn from_stops(mut stops: Vec<GradientStop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// Stops sorted by offset.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at gradient position `t`.
    pub fn color_at(&self, t: f64) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::TRANSPARENT;
        };
        if t.is_nan() || t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        // First stop strictly past `t`; the one before it is at or before `t`.
        let hi = self.stops.partition_point(|s| s.offset <= t);
        let a = self.stops[hi - 1];
        let b = self.stops[hi];
        let span = b.offset - a.offset;
        if span <= 0.0 {
            return b.color;
        }
        lerp_color(a.color, b.color, (t - a.offset) / span)
    }
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let ch = |x: u8, y: u8| -> u8 {
        let v = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color::rgba(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), ch(a.a, b.a))
}

/// Opaque gray standing in for a stop whose offset left `[0, 1]`.
///
/// The gray is the fraction of the black-to-white ramp that survives inside
/// the unit interval, flipped when the black point is the one cut off. When
/// both offsets coincide the ramp is a hard edge outside the raster: black if
/// it lies past the end, white if before the start.
pub fn cutoff_color(black: f64, white: f64) -> Color {
    let range = black - white;
    if range == 0.0 {
        return if black > 1.0 {
            Color::BLACK
        } else {
            Color::WHITE
        };
    }

    let mut perc = (clamp01(black) - clamp01(white)) / range;
    if !(0.0..=1.0).contains(&black) {
        perc = 1.0 - perc;
    }
    let level = (perc * 255.0 + 0.5).floor().clamp(0.0, 255.0);
    Color::gray(level as u8)
}

/// Diagonal fade mask.
///
/// A freshly sized mask is transparent, which hides every dot until the first
/// [`FadeMask::paint`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FadeMask {
    raster: Raster,
    gradient: Option<FadeGradient>,
}

impl FadeMask {
    /// Transparent mask of `resolution`.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            raster: Raster::new(resolution),
            gradient: None,
        }
    }

    /// Reallocate to `resolution`, clearing the content.
    pub fn resize(&mut self, resolution: Resolution) {
        self.raster.resize(resolution);
        self.gradient = None;
    }

    /// Repaint the whole raster for the given black and white offsets.
    ///
    /// The gradient runs along the diagonal `(0,0) -> (size,size)` with
    /// `size = max(width, height)`.
    pub fn paint(&mut self, black: f64, white: f64) {
        let gradient = FadeGradient::from_offsets(black, white);
        let width = self.raster.width();
        let size = f64::from(self.raster.resolution().max_side());
        if size > 0.0 {
            let inv = 1.0 / (2.0 * size);
            for (i, px) in self.raster.data_mut().chunks_exact_mut(4).enumerate() {
                let x = (i % width as usize) as f64 + 0.5;
                let y = (i / width as usize) as f64 + 0.5;
                px.copy_from_slice(&gradient.color_at((x + y) * inv).premultiplied());
            }
        }
        self.gradient = Some(gradient);
    }

    /// Current pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Gradient of the last paint since the last resize.
    pub fn gradient(&self) -> Option<&FadeGradient> {
        self.gradient.as_ref()
    }

    /// Mask dimensions.
    pub fn resolution(&self) -> Resolution {
        self.raster.resolution()
    }
}

#[cfg(test)]
#[path = "../tests/unit/mask.rs"]
mod tests;
