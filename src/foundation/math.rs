/// Default decimal precision for drift-free value comparisons.
pub(crate) const DEFAULT_PRECISION: u32 = 8;

/// Round `v` to `precision` decimal places.
pub(crate) fn round_to_precision(v: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (v * scale).round() / scale
}

/// True when `a` and `b` agree to `precision` decimal places.
pub(crate) fn nearly_equal(a: f64, b: f64, precision: u32) -> bool {
    round_to_precision(a, precision) == round_to_precision(b, precision)
}

/// Reduce `magnitude` toward zero by `amount`, never crossing zero.
pub(crate) fn decay_magnitude(magnitude: f64, amount: f64) -> f64 {
    (magnitude - amount).max(0.0)
}

/// Normalize an angle to the half-open interval (-pi, pi].
pub(crate) fn normalize_angle(mut a: f64) -> f64 {
    use std::f64::consts::PI;
    a %= 2.0 * PI;
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}
