use kurbo::{Rect, Vec2};

use crate::geometry::transform::{Transform, TransformComponent};

/// Which side of a limit a clipped value collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryHit {
    Min,
    Max,
}

/// An optional scalar range limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeLimit {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeLimit {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn clip(&self, v: f64) -> f64 {
        self.clip_hit(v).0
    }

    pub(crate) fn clip_hit(&self, v: f64) -> (f64, Option<BoundaryHit>) {
        if let Some(min) = self.min
            && v < min
        {
            return (min, Some(BoundaryHit::Min));
        }
        if let Some(max) = self.max
            && v > max
        {
            return (max, Some(BoundaryHit::Max));
        }
        (v, None)
    }
}

/// Per-axis collision report from a bounded clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BoundaryHits {
    pub x: Option<BoundaryHit>,
    pub y: Option<BoundaryHit>,
    pub rotation: Option<BoundaryHit>,
    pub scale: Option<BoundaryHit>,
}

impl BoundaryHits {
    pub(crate) fn any(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.rotation.is_some() || self.scale.is_some()
    }
}

/// Constraints clipping a transform's translation, rotation and scale.
///
/// Used both to clip user-driven movement and to terminate (or bounce) free
/// movement. Absent limits leave the component untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformBounds {
    /// Rectangle containing every translation component.
    pub translation: Option<Rect>,
    /// Range containing every rotation component (radians).
    pub rotation: Option<RangeLimit>,
    /// Range containing each scale component's axes.
    pub scale: Option<RangeLimit>,
}

impl TransformBounds {
    /// No limits at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, rect: Rect) -> Self {
        self.translation = Some(rect);
        self
    }

    pub fn with_rotation(mut self, limit: RangeLimit) -> Self {
        self.rotation = Some(limit);
        self
    }

    pub fn with_scale(mut self, limit: RangeLimit) -> Self {
        self.scale = Some(limit);
        self
    }

    /// Clip every component of `t` into bounds.
    pub fn clip(&self, t: &Transform) -> Transform {
        self.clip_with_hits(t).0
    }

    /// Clip and report which limits were hit (for bounce reflection).
    pub(crate) fn clip_with_hits(&self, t: &Transform) -> (Transform, BoundaryHits) {
        let mut hits = BoundaryHits::default();
        let components = t
            .components()
            .iter()
            .map(|c| match c {
                TransformComponent::Translation(v) => {
                    let (x, y) = match self.translation {
                        Some(r) => {
                            let (cx, hx) = RangeLimit::new(r.x0, r.x1).clip_hit(v.x);
                            let (cy, hy) = RangeLimit::new(r.y0, r.y1).clip_hit(v.y);
                            hits.x = hits.x.or(hx);
                            hits.y = hits.y.or(hy);
                            (cx, cy)
                        }
                        None => (v.x, v.y),
                    };
                    TransformComponent::Translation(Vec2::new(x, y))
                }
                TransformComponent::Rotation(r) => match self.rotation {
                    Some(limit) => {
                        let (clipped, hit) = limit.clip_hit(*r);
                        hits.rotation = hits.rotation.or(hit);
                        TransformComponent::Rotation(clipped)
                    }
                    None => TransformComponent::Rotation(*r),
                },
                TransformComponent::Scale(s) => match self.scale {
                    Some(limit) => {
                        let (sx, hx) = limit.clip_hit(s.x);
                        let (sy, hy) = limit.clip_hit(s.y);
                        hits.scale = hits.scale.or(hx).or(hy);
                        TransformComponent::Scale(Vec2::new(sx, sy))
                    }
                    None => TransformComponent::Scale(*s),
                },
            })
            .collect();
        (Transform::from_components(components), hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_clip_is_identity() {
        let t = Transform::srt(Vec2::new(2.0, 2.0), 1.0, Vec2::new(100.0, -50.0));
        assert_eq!(TransformBounds::unbounded().clip(&t), t);
    }

    #[test]
    fn translation_clips_to_rect_and_reports_side() {
        let bounds =
            TransformBounds::unbounded().with_translation(Rect::new(-1.0, -1.0, 1.0, 1.0));
        let t = Transform::identity().translated(3.0, -4.0);
        let (clipped, hits) = bounds.clip_with_hits(&t);
        assert_eq!(clipped.translation(), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(hits.x, Some(BoundaryHit::Max));
        assert_eq!(hits.y, Some(BoundaryHit::Min));
    }

    #[test]
    fn rotation_and_scale_clip_to_range() {
        let bounds = TransformBounds::unbounded()
            .with_rotation(RangeLimit::new(0.0, 1.0))
            .with_scale(RangeLimit::new(0.5, 2.0));
        let t = Transform::srt(Vec2::new(3.0, 0.1), -2.0, Vec2::ZERO);
        let clipped = bounds.clip(&t);
        assert_eq!(clipped.rotation(), Some(0.0));
        assert_eq!(clipped.scale(), Some(Vec2::new(2.0, 0.5)));
    }

    #[test]
    fn in_range_values_report_no_hits() {
        let bounds =
            TransformBounds::unbounded().with_translation(Rect::new(-1.0, -1.0, 1.0, 1.0));
        let t = Transform::identity().translated(0.5, 0.5);
        let (_, hits) = bounds.clip_with_hits(&t);
        assert!(!hits.any());
    }
}
