use kurbo::{Affine, Vec2};

use crate::foundation::math::{normalize_angle, round_to_precision};
use crate::geometry::path::{PathStyle, translation_path};

/// One typed entry in a [`Transform`]'s ordered component list.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TransformComponent {
    Translation(Vec2),
    Rotation(f64),
    Scale(Vec2),
}

/// Component discriminant, used for congruence checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ComponentKind {
    Translation,
    Rotation,
    Scale,
}

impl TransformComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Translation(_) => ComponentKind::Translation,
            Self::Rotation(_) => ComponentKind::Rotation,
            Self::Scale(_) => ComponentKind::Scale,
        }
    }

    fn to_affine(self) -> Affine {
        match self {
            Self::Translation(v) => Affine::translate(v),
            Self::Rotation(r) => Affine::rotate(r),
            Self::Scale(s) => Affine::scale_non_uniform(s.x, s.y),
        }
    }

    /// Magnitude used for velocity thresholds and max-velocity clipping.
    pub(crate) fn magnitude(self) -> f64 {
        match self {
            Self::Translation(v) | Self::Scale(v) => v.hypot(),
            Self::Rotation(r) => r.abs(),
        }
    }

    fn zeroed(self) -> Self {
        match self {
            Self::Translation(_) => Self::Translation(Vec2::ZERO),
            Self::Rotation(_) => Self::Rotation(0.0),
            Self::Scale(_) => Self::Scale(Vec2::ZERO),
        }
    }
}

/// Direction preference when interpolating a rotation toward a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RotationDirection {
    /// Shortest angular path.
    #[default]
    Shortest,
    /// Decreasing angle (negative delta).
    Clockwise,
    /// Increasing angle (positive delta).
    CounterClockwise,
    /// The long way around.
    Longest,
}

/// Angular delta from `start` to `target` honoring a direction preference.
pub fn rotation_delta(start: f64, target: f64, direction: RotationDirection) -> f64 {
    use std::f64::consts::PI;
    let short = normalize_angle(target - start);
    match direction {
        RotationDirection::Shortest => short,
        RotationDirection::Clockwise => {
            if short > 0.0 {
                short - 2.0 * PI
            } else {
                short
            }
        }
        RotationDirection::CounterClockwise => {
            if short < 0.0 {
                short + 2.0 * PI
            } else {
                short
            }
        }
        RotationDirection::Longest => {
            if short == 0.0 {
                2.0 * PI
            } else if short > 0.0 {
                short - 2.0 * PI
            } else {
                short + 2.0 * PI
            }
        }
    }
}

/// An ordered, composable sequence of typed transform components.
///
/// Composition is associative; interpolation between two transforms is only
/// defined when they are congruent (same component kinds, same order). All
/// shape-checked operations return `None` on mismatch rather than erroring,
/// which the animation engine treats as "nothing to animate".
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    components: Vec<TransformComponent>,
}

/// Per-kind interpolation options for transform tweens.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformTweenOptions {
    pub path: PathStyle,
    pub rotation_direction: RotationDirection,
}

impl Transform {
    /// The empty transform (multiplicative identity).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Standard scale-rotate-translate component order.
    pub fn srt(scale: Vec2, rotation: f64, translation: Vec2) -> Self {
        Self {
            components: vec![
                TransformComponent::Scale(scale),
                TransformComponent::Rotation(rotation),
                TransformComponent::Translation(translation),
            ],
        }
    }

    pub fn from_components(components: Vec<TransformComponent>) -> Self {
        Self { components }
    }

    /// Append a scale component.
    pub fn scaled(mut self, sx: f64, sy: f64) -> Self {
        self.components.push(TransformComponent::Scale(Vec2::new(sx, sy)));
        self
    }

    /// Append a rotation component (radians).
    pub fn rotated(mut self, r: f64) -> Self {
        self.components.push(TransformComponent::Rotation(r));
        self
    }

    /// Append a translation component.
    pub fn translated(mut self, x: f64, y: f64) -> Self {
        self.components
            .push(TransformComponent::Translation(Vec2::new(x, y)));
        self
    }

    pub fn components(&self) -> &[TransformComponent] {
        &self.components
    }

    pub fn is_identity(&self) -> bool {
        self.components.is_empty()
    }

    /// First translation component, if any.
    pub fn translation(&self) -> Option<Vec2> {
        self.components.iter().find_map(|c| match c {
            TransformComponent::Translation(v) => Some(*v),
            _ => None,
        })
    }

    /// First rotation component, if any.
    pub fn rotation(&self) -> Option<f64> {
        self.components.iter().find_map(|c| match c {
            TransformComponent::Rotation(r) => Some(*r),
            _ => None,
        })
    }

    /// First scale component, if any.
    pub fn scale(&self) -> Option<Vec2> {
        self.components.iter().find_map(|c| match c {
            TransformComponent::Scale(s) => Some(*s),
            _ => None,
        })
    }

    /// Update the first translation component, appending one if absent.
    pub fn update_translation(&mut self, v: Vec2) {
        for c in &mut self.components {
            if let TransformComponent::Translation(t) = c {
                *t = v;
                return;
            }
        }
        self.components.push(TransformComponent::Translation(v));
    }

    /// Update the first rotation component, appending one if absent.
    pub fn update_rotation(&mut self, r: f64) {
        for c in &mut self.components {
            if let TransformComponent::Rotation(rot) = c {
                *rot = r;
                return;
            }
        }
        self.components.push(TransformComponent::Rotation(r));
    }

    /// Update the first scale component, appending one if absent.
    pub fn update_scale(&mut self, s: Vec2) {
        for c in &mut self.components {
            if let TransformComponent::Scale(sc) = c {
                *sc = s;
                return;
            }
        }
        self.components.push(TransformComponent::Scale(s));
    }

    /// Same component kinds in the same order.
    pub fn is_congruent_to(&self, other: &Self) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a.kind() == b.kind())
    }

    /// Component-wise sum; `None` on shape mismatch.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.zip_components(other, |a, b| match (a, b) {
            (TransformComponent::Translation(x), TransformComponent::Translation(y)) => {
                TransformComponent::Translation(x + y)
            }
            (TransformComponent::Rotation(x), TransformComponent::Rotation(y)) => {
                TransformComponent::Rotation(x + y)
            }
            (TransformComponent::Scale(x), TransformComponent::Scale(y)) => {
                TransformComponent::Scale(x + y)
            }
            _ => unreachable!("congruence checked before zip"),
        })
    }

    /// Component-wise difference `self - other`; `None` on shape mismatch.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.zip_components(other, |a, b| match (a, b) {
            (TransformComponent::Translation(x), TransformComponent::Translation(y)) => {
                TransformComponent::Translation(x - y)
            }
            (TransformComponent::Rotation(x), TransformComponent::Rotation(y)) => {
                TransformComponent::Rotation(x - y)
            }
            (TransformComponent::Scale(x), TransformComponent::Scale(y)) => {
                TransformComponent::Scale(x - y)
            }
            _ => unreachable!("congruence checked before zip"),
        })
    }

    fn zip_components(
        &self,
        other: &Self,
        f: impl Fn(TransformComponent, TransformComponent) -> TransformComponent,
    ) -> Option<Self> {
        if !self.is_congruent_to(other) {
            return None;
        }
        Some(Self {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    /// Delta from `start` to `target` with rotation components honoring the
    /// direction preference; `None` on shape mismatch.
    pub fn delta_to(
        start: &Self,
        target: &Self,
        direction: RotationDirection,
    ) -> Option<Self> {
        target.checked_sub(start).map(|mut d| {
            for (dc, (s, t)) in d
                .components
                .iter_mut()
                .zip(start.components.iter().zip(&target.components))
            {
                if let (
                    TransformComponent::Rotation(dr),
                    (TransformComponent::Rotation(sr), TransformComponent::Rotation(tr)),
                ) = (dc, (s, t))
                {
                    *dr = rotation_delta(*sr, *tr, direction);
                }
            }
            d
        })
    }

    /// `start + delta * p`, with translations following the path style.
    /// `None` on shape mismatch.
    pub fn lerp(
        start: &Self,
        delta: &Self,
        p: f64,
        opts: &TransformTweenOptions,
    ) -> Option<Self> {
        start.zip_components(delta, |s, d| match (s, d) {
            (TransformComponent::Translation(sv), TransformComponent::Translation(dv)) => {
                TransformComponent::Translation(translation_path(sv, dv, p, &opts.path))
            }
            (TransformComponent::Rotation(sr), TransformComponent::Rotation(dr)) => {
                TransformComponent::Rotation(sr + dr * p)
            }
            (TransformComponent::Scale(sv), TransformComponent::Scale(dv)) => {
                TransformComponent::Scale(sv + dv * p)
            }
            _ => unreachable!("congruence checked before zip"),
        })
    }

    /// Duration needed to cover `delta` at `velocity`: the maximum over all
    /// independently moving sub-components of `|delta| / velocity`.
    ///
    /// Velocity components that are zero or negative do not constrain the
    /// duration. `None` on shape mismatch.
    pub fn duration_from_velocity(delta: &Self, velocity: &Self) -> Option<f64> {
        if !delta.is_congruent_to(velocity) {
            return None;
        }
        let mut max = 0.0f64;
        for (d, v) in delta.components.iter().zip(&velocity.components) {
            match (d, v) {
                (TransformComponent::Translation(dv), TransformComponent::Translation(vv))
                | (TransformComponent::Scale(dv), TransformComponent::Scale(vv)) => {
                    if vv.x > 0.0 {
                        max = max.max(dv.x.abs() / vv.x);
                    }
                    if vv.y > 0.0 {
                        max = max.max(dv.y.abs() / vv.y);
                    }
                }
                (TransformComponent::Rotation(dr), TransformComponent::Rotation(vr)) => {
                    if *vr > 0.0 {
                        max = max.max(dr.abs() / vr);
                    }
                }
                _ => unreachable!("congruence checked above"),
            }
        }
        Some(max)
    }

    /// Same shape with every component zeroed (additive identity for
    /// velocity tracking).
    pub fn zeroed(&self) -> Self {
        Self {
            components: self.components.iter().map(|c| c.zeroed()).collect(),
        }
    }

    /// Multiply every scalar by `k` (used for velocity estimation and decay).
    pub(crate) fn scaled_by(&self, k: f64) -> Self {
        Self {
            components: self
                .components
                .iter()
                .map(|c| match c {
                    TransformComponent::Translation(v) => TransformComponent::Translation(*v * k),
                    TransformComponent::Rotation(r) => TransformComponent::Rotation(r * k),
                    TransformComponent::Scale(v) => TransformComponent::Scale(*v * k),
                })
                .collect(),
        }
    }

    /// Clip each component's magnitude to `max`, preserving direction.
    pub(crate) fn clip_magnitudes(&self, max: f64) -> Self {
        let clip_vec = |v: Vec2| {
            let m = v.hypot();
            if m > max && m > 0.0 { v * (max / m) } else { v }
        };
        Self {
            components: self
                .components
                .iter()
                .map(|c| match c {
                    TransformComponent::Translation(v) => {
                        TransformComponent::Translation(clip_vec(*v))
                    }
                    TransformComponent::Scale(v) => TransformComponent::Scale(clip_vec(*v)),
                    TransformComponent::Rotation(r) => {
                        TransformComponent::Rotation(r.clamp(-max, max))
                    }
                })
                .collect(),
        }
    }

    /// True when every component magnitude is below `threshold`.
    pub(crate) fn is_below(&self, threshold: f64) -> bool {
        self.components.iter().all(|c| c.magnitude() < threshold)
    }

    /// Fold the component list into a single affine map. The first component
    /// in the list applies first to a point.
    pub fn to_affine(&self) -> Affine {
        self.components
            .iter()
            .fold(Affine::IDENTITY, |acc, c| c.to_affine() * acc)
    }

    /// Round every scalar to `precision` decimal places.
    pub fn round(&self, precision: u32) -> Self {
        let r = |v: f64| round_to_precision(v, precision);
        Self {
            components: self
                .components
                .iter()
                .map(|c| match c {
                    TransformComponent::Translation(v) => {
                        TransformComponent::Translation(Vec2::new(r(v.x), r(v.y)))
                    }
                    TransformComponent::Rotation(rot) => TransformComponent::Rotation(r(*rot)),
                    TransformComponent::Scale(v) => {
                        TransformComponent::Scale(Vec2::new(r(v.x), r(v.y)))
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn srt1(r: f64, tx: f64, ty: f64) -> Transform {
        Transform::srt(Vec2::new(1.0, 1.0), r, Vec2::new(tx, ty))
    }

    #[test]
    fn congruence_requires_same_kinds_in_order() {
        let a = srt1(0.0, 1.0, 2.0);
        let b = srt1(PI, -1.0, 0.0);
        assert!(a.is_congruent_to(&b));
        let c = Transform::identity().translated(1.0, 2.0).rotated(PI);
        assert!(!a.is_congruent_to(&c));
    }

    #[test]
    fn mismatched_shapes_yield_none() {
        let a = srt1(0.0, 1.0, 2.0);
        let c = Transform::identity().translated(1.0, 2.0);
        assert!(a.checked_add(&c).is_none());
        assert!(a.checked_sub(&c).is_none());
        assert!(Transform::delta_to(&a, &c, RotationDirection::Shortest).is_none());
        assert!(Transform::duration_from_velocity(&a, &c).is_none());
    }

    #[test]
    fn add_sub_roundtrip() {
        let a = srt1(1.0, 1.0, 2.0);
        let b = srt1(0.5, -3.0, 4.0);
        let sum = a.checked_add(&b).unwrap();
        let back = sum.checked_sub(&b).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn rotation_delta_honors_direction() {
        let s = 0.1;
        let t = 2.0 * PI - 0.1;
        assert!((rotation_delta(s, t, RotationDirection::Shortest) + 0.2).abs() < 1e-12);
        assert!(rotation_delta(s, t, RotationDirection::CounterClockwise) > 0.0);
        assert!(rotation_delta(s, t, RotationDirection::Clockwise) < 0.0);
        let long = rotation_delta(0.0, PI / 2.0, RotationDirection::Longest);
        assert!((long - (PI / 2.0 - 2.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let start = srt1(0.0, 0.0, 0.0);
        let target = srt1(PI, 4.0, -2.0);
        let delta = Transform::delta_to(&start, &target, RotationDirection::Shortest).unwrap();
        let opts = TransformTweenOptions::default();
        assert_eq!(Transform::lerp(&start, &delta, 0.0, &opts).unwrap(), start);
        let end = Transform::lerp(&start, &delta, 1.0, &opts).unwrap();
        assert_eq!(end.round(8), target.round(8));
    }

    #[test]
    fn velocity_duration_is_max_over_components() {
        let start = Transform::identity().translated(0.0, 0.0).rotated(0.0);
        let target = Transform::identity().translated(4.0, 0.0).rotated(1.0);
        let delta = Transform::delta_to(&start, &target, RotationDirection::Shortest).unwrap();
        let velocity = Transform::identity().translated(2.0, 0.0).rotated(4.0);
        let d = Transform::duration_from_velocity(&delta, &velocity).unwrap();
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn affine_folds_components_in_order() {
        // Scale then translate: point (1,0) -> (2,0) -> (5,0).
        let t = Transform::identity().scaled(2.0, 2.0).translated(3.0, 0.0);
        let p = t.to_affine() * kurbo::Point::new(1.0, 0.0);
        assert!((p.x - 5.0).abs() < 1e-12);

        // Translate then scale: point (1,0) -> (4,0) -> (8,0).
        let t = Transform::identity().translated(3.0, 0.0).scaled(2.0, 2.0);
        let p = t.to_affine() * kurbo::Point::new(1.0, 0.0);
        assert!((p.x - 8.0).abs() < 1e-12);
    }

    #[test]
    fn update_accessors_hit_first_occurrence() {
        let mut t = srt1(0.0, 1.0, 1.0);
        t.update_translation(Vec2::new(9.0, 9.0));
        assert_eq!(t.translation(), Some(Vec2::new(9.0, 9.0)));
        t.update_rotation(1.5);
        assert_eq!(t.rotation(), Some(1.5));

        let mut bare = Transform::identity();
        bare.update_translation(Vec2::new(1.0, 0.0));
        assert_eq!(bare.translation(), Some(Vec2::new(1.0, 0.0)));
    }
}
