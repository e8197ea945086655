use crate::foundation::core::Vec2;

#[inline]
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Returns `v` when it is a finite number, `default` otherwise.
#[inline]
pub(crate) fn finite_or(v: f64, default: f64) -> f64 {
    if v.is_finite() { v } else { default }
}

/// Rotates `v` by `degrees` (positive is clockwise on a y-down canvas).
pub(crate) fn rotate_deg(v: Vec2, degrees: f64) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
