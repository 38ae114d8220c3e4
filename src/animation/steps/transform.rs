use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::geometry::path::PathStyle;
use crate::geometry::transform::{RotationDirection, Transform, TransformTweenOptions};
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct TransformKind;

impl TweenKind for TransformKind {
    type Value = Transform;
    type Velocity = Transform;
    type Options = TransformTweenOptions;

    fn read(scene: &Scene, id: ElementId) -> Option<Transform> {
        scene.element(id).map(|e| e.transform().clone())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &Transform) {
        if let Some(e) = scene.element_mut(id) {
            e.set_transform(value.clone());
        }
    }

    fn delta(
        start: &Transform,
        target: &Transform,
        opts: &TransformTweenOptions,
    ) -> Option<Transform> {
        Transform::delta_to(start, target, opts.rotation_direction)
    }

    fn lerp(
        start: &Transform,
        delta: &Transform,
        p: f64,
        opts: &TransformTweenOptions,
    ) -> Option<Transform> {
        Transform::lerp(start, delta, p, opts)
    }

    fn duration(delta: &Transform, velocity: &Transform) -> Option<f64> {
        Transform::duration_from_velocity(delta, velocity)
    }
}

/// Animate an element's whole transform. Start and target must be congruent
/// (same component kinds in the same order); a mismatch degrades to a
/// zero-duration no-op.
pub fn transform() -> TransformOpts {
    TransformOpts::default()
}

#[derive(Clone, Debug, Default)]
pub struct TransformOpts {
    start: Option<Transform>,
    target: Option<Transform>,
    delta: Option<Transform>,
    velocity: Option<Transform>,
    options: TransformTweenOptions,
}

impl TransformOpts {
    pub fn start(mut self, t: Transform) -> Self {
        self.start = Some(t);
        self
    }

    pub fn to(mut self, t: Transform) -> Self {
        self.target = Some(t);
        self
    }

    pub fn by(mut self, t: Transform) -> Self {
        self.delta = Some(t);
        self
    }

    /// Component-wise velocity, congruent with the animated transforms;
    /// consulted when no explicit duration is set.
    pub fn velocity(mut self, v: Transform) -> Self {
        self.velocity = Some(v);
        self
    }

    /// Path style for translation components.
    pub fn path(mut self, style: PathStyle) -> Self {
        self.options.path = style;
        self
    }

    /// Direction preference for rotation components.
    pub fn rotation_direction(mut self, d: RotationDirection) -> Self {
        self.options.rotation_direction = d;
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<TransformKind>::new(element);
        tween.start_spec = self.start;
        tween.target_spec = self.target;
        tween.delta_spec = self.delta;
        tween.velocity = self.velocity;
        tween.options = self.options;
        Step::new(
            StepCore::new(Some(TransformKind::DEFAULT_DURATION)),
            StepKind::Transform(tween),
        )
    }
}
