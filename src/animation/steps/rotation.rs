use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::geometry::transform::{RotationDirection, rotation_delta};
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct RotationKind;

impl TweenKind for RotationKind {
    type Value = f64;
    type Velocity = f64;
    type Options = RotationDirection;

    fn read(scene: &Scene, id: ElementId) -> Option<f64> {
        scene.element(id).map(|e| e.rotation())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &f64) {
        if let Some(e) = scene.element_mut(id) {
            e.set_rotation(*value);
        }
    }

    fn delta(start: &f64, target: &f64, direction: &RotationDirection) -> Option<f64> {
        Some(rotation_delta(*start, *target, *direction))
    }

    fn lerp(start: &f64, delta: &f64, p: f64, _opts: &RotationDirection) -> Option<f64> {
        Some(start + delta * p)
    }

    fn duration(delta: &f64, velocity: &f64) -> Option<f64> {
        (*velocity > 0.0).then(|| delta.abs() / velocity)
    }
}

/// Animate an element's rotation (radians).
pub fn rotation() -> RotationOpts {
    RotationOpts::default()
}

#[derive(Clone, Debug, Default)]
pub struct RotationOpts {
    start: Option<f64>,
    target: Option<f64>,
    delta: Option<f64>,
    velocity: Option<f64>,
    direction: RotationDirection,
}

impl RotationOpts {
    pub fn start(mut self, r: f64) -> Self {
        self.start = Some(r);
        self
    }

    pub fn to(mut self, r: f64) -> Self {
        self.target = Some(r);
        self
    }

    pub fn by(mut self, dr: f64) -> Self {
        self.delta = Some(dr);
        self
    }

    /// Radians per second; consulted when no explicit duration is set.
    pub fn velocity(mut self, v: f64) -> Self {
        self.velocity = Some(v);
        self
    }

    /// Which way around to rotate when a target is given.
    pub fn direction(mut self, d: RotationDirection) -> Self {
        self.direction = d;
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<RotationKind>::new(element);
        tween.start_spec = self.start;
        tween.target_spec = self.target;
        tween.delta_spec = self.delta;
        tween.velocity = self.velocity;
        tween.options = self.direction;
        Step::new(
            StepCore::new(Some(RotationKind::DEFAULT_DURATION)),
            StepKind::Rotation(tween),
        )
    }
}
