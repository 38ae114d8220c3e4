use kurbo::Vec2;

use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct ScaleKind;

impl TweenKind for ScaleKind {
    type Value = Vec2;
    type Velocity = Vec2;
    type Options = ();

    fn read(scene: &Scene, id: ElementId) -> Option<Vec2> {
        scene.element(id).map(|e| e.scale())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &Vec2) {
        if let Some(e) = scene.element_mut(id) {
            e.set_scale(*value);
        }
    }

    fn delta(start: &Vec2, target: &Vec2, _opts: &()) -> Option<Vec2> {
        Some(*target - *start)
    }

    fn lerp(start: &Vec2, delta: &Vec2, p: f64, _opts: &()) -> Option<Vec2> {
        Some(*start + *delta * p)
    }

    fn duration(delta: &Vec2, velocity: &Vec2) -> Option<f64> {
        let mut max = 0.0f64;
        let mut constrained = false;
        if velocity.x > 0.0 {
            max = max.max(delta.x.abs() / velocity.x);
            constrained = true;
        }
        if velocity.y > 0.0 {
            max = max.max(delta.y.abs() / velocity.y);
            constrained = true;
        }
        constrained.then_some(max)
    }
}

/// Animate an element's scale.
pub fn scale() -> ScaleOpts {
    ScaleOpts::default()
}

#[derive(Clone, Debug, Default)]
pub struct ScaleOpts {
    start: Option<Vec2>,
    target: Option<Vec2>,
    delta: Option<Vec2>,
    velocity: Option<Vec2>,
}

impl ScaleOpts {
    pub fn start(mut self, s: f64) -> Self {
        self.start = Some(Vec2::new(s, s));
        self
    }

    /// Uniform target scale.
    pub fn to(mut self, s: f64) -> Self {
        self.target = Some(Vec2::new(s, s));
        self
    }

    pub fn to_xy(mut self, sx: f64, sy: f64) -> Self {
        self.target = Some(Vec2::new(sx, sy));
        self
    }

    pub fn by(mut self, ds: f64) -> Self {
        self.delta = Some(Vec2::new(ds, ds));
        self
    }

    /// Scale units per second; consulted when no explicit duration is set.
    pub fn velocity(mut self, v: f64) -> Self {
        self.velocity = Some(Vec2::new(v, v));
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<ScaleKind>::new(element);
        tween.start_spec = self.start;
        tween.target_spec = self.target;
        tween.delta_spec = self.delta;
        tween.velocity = self.velocity;
        Step::new(
            StepCore::new(Some(ScaleKind::DEFAULT_DURATION)),
            StepKind::Scale(tween),
        )
    }
}
