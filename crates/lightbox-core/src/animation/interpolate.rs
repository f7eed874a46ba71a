#![forbid(unsafe_code)]

//! Piecewise-linear mapping from progress values to visual properties.
//!
//! # Invariants
//!
//! 1. Inputs outside the input range clamp to the nearest endpoint's output;
//!    nothing extrapolates.
//! 2. At (or past) an endpoint the endpoint output is returned exactly, so a
//!    finished transition lands on its destination without rounding drift.
//! 3. NaN input maps to the first output.

use crate::geometry::Rect;

/// Linear interpolation from `from` to `to` at `t`, with `t` clamped to [0, 1].
#[inline]
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    if t.is_nan() || t <= 0.0 {
        from
    } else if t >= 1.0 {
        to
    } else {
        from + (to - from) * t
    }
}

/// Map `value` through the piecewise-linear function defined by matching
/// `input` and `output` breakpoints.
///
/// `input` must be non-decreasing. Breakpoints beyond the shorter of the two
/// slices are ignored. Empty ranges return 0.0, a single breakpoint returns
/// its output.
#[must_use]
pub fn interpolate(value: f32, input: &[f32], output: &[f32]) -> f32 {
    let n = input.len().min(output.len());
    if n == 0 {
        return 0.0;
    }
    if value.is_nan() || value <= input[0] {
        return output[0];
    }
    if value >= input[n - 1] {
        return output[n - 1];
    }

    // First segment whose right breakpoint reaches `value`.
    let seg = input[..n].partition_point(|&x| x < value).max(1);
    let (x0, x1) = (input[seg - 1], input[seg]);
    let (y0, y1) = (output[seg - 1], output[seg]);
    let span = x1 - x0;
    if span <= 0.0 {
        return y1;
    }
    lerp(y0, y1, (value - x0) / span)
}

/// Interpolate every edge of a rectangle between `from` (at 0) and `to` (at 1).
#[must_use]
pub fn interpolate_rect(t: f32, from: Rect, to: Rect) -> Rect {
    Rect::new(
        lerp(from.x, to.x, t),
        lerp(from.y, to.y, t),
        lerp(from.width, to.width, t),
        lerp(from.height, to.height, t),
    )
}
