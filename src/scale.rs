/// Fixed design resolution a layout is authored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub width: f64,
    pub height: f64,
}

impl Resolution {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Shared reference every scaled section is authored against.
pub const REFERENCE_RESOLUTION: Resolution = Resolution::new(1920.0, 1080.0);

/// Uniform factor that fits `base` inside the viewport without changing its proportions.
///
/// There is no upper clamp: on viewports larger than `base` the factor exceeds 1.
/// Degenerate inputs (zero or negative sizes, NaN) give 0.
pub fn scale_factor(viewport_width: f64, viewport_height: f64, base: Resolution) -> f64 {
    if !(base.width > 0.0) || !(base.height > 0.0) {
        return 0.0;
    }
    let sx = viewport_width / base.width;
    let sy = viewport_height / base.height;
    if sx.is_nan() || sy.is_nan() {
        return 0.0;
    }
    sx.min(sy).max(0.0)
}
