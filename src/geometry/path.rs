use kurbo::Vec2;

/// Which side of the start-to-target chord a curved path bows toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CurveDirection {
    #[default]
    Positive,
    Negative,
}

/// Parameters for a curved translation path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveOptions {
    /// Midpoint offset as a fraction of the chord length.
    pub magnitude: f64,
    pub direction: CurveDirection,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            magnitude: 0.5,
            direction: CurveDirection::Positive,
        }
    }
}

/// How a translation interpolates between its start and target points.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PathStyle {
    #[default]
    Linear,
    Curve(CurveOptions),
}

/// Point along the path from `start` toward `start + delta` at percent `p`.
///
/// `Curve` follows a quadratic Bezier whose control point is the chord
/// midpoint pushed perpendicular by `magnitude * chord length`.
pub fn translation_path(start: Vec2, delta: Vec2, p: f64, style: &PathStyle) -> Vec2 {
    match style {
        PathStyle::Linear => start + delta * p,
        PathStyle::Curve(opts) => {
            let len = delta.hypot();
            if len == 0.0 {
                return start;
            }
            let sign = match opts.direction {
                CurveDirection::Positive => 1.0,
                CurveDirection::Negative => -1.0,
            };
            let perp = Vec2::new(-delta.y, delta.x) * (1.0 / len);
            let control = start + delta * 0.5 + perp * (opts.magnitude * len * sign);
            let end = start + delta;
            let q = 1.0 - p;
            Vec2::new(
                q * q * start.x + 2.0 * q * p * control.x + p * p * end.x,
                q * q * start.y + 2.0 * q * p * control.y + p * p * end.y,
            )
        }
    }
}
