use kurbo::Vec2;

use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::geometry::path::{PathStyle, translation_path};
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct PositionKind;

impl TweenKind for PositionKind {
    type Value = Vec2;
    type Velocity = Vec2;
    type Options = PathStyle;

    fn read(scene: &Scene, id: ElementId) -> Option<Vec2> {
        scene.element(id).map(|e| e.position())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &Vec2) {
        if let Some(e) = scene.element_mut(id) {
            e.set_position(*value);
        }
    }

    fn delta(start: &Vec2, target: &Vec2, _opts: &PathStyle) -> Option<Vec2> {
        Some(*target - *start)
    }

    fn lerp(start: &Vec2, delta: &Vec2, p: f64, opts: &PathStyle) -> Option<Vec2> {
        Some(translation_path(*start, *delta, p, opts))
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

/// Animate an element's translation.
pub fn position() -> PositionOpts {
    PositionOpts::default()
}

#[derive(Clone, Debug, Default)]
pub struct PositionOpts {
    start: Option<Vec2>,
    target: Option<Vec2>,
    delta: Option<Vec2>,
    velocity: Option<Vec2>,
    path: PathStyle,
}

impl PositionOpts {
    /// Start point; defaults to the element's position when the step begins.
    pub fn start(mut self, x: f64, y: f64) -> Self {
        self.start = Some(Vec2::new(x, y));
        self
    }

    /// Absolute target point.
    pub fn to(mut self, x: f64, y: f64) -> Self {
        self.target = Some(Vec2::new(x, y));
        self
    }

    /// Offset from the start point; ignored when a target is given.
    pub fn by(mut self, dx: f64, dy: f64) -> Self {
        self.delta = Some(Vec2::new(dx, dy));
        self
    }

    /// Units per second, same on both axes. Only consulted when no explicit
    /// duration is set on the step.
    pub fn velocity(mut self, v: f64) -> Self {
        self.velocity = Some(Vec2::new(v, v));
        self
    }

    /// Per-axis velocity; the slower axis governs the duration.
    pub fn velocity_xy(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Some(Vec2::new(vx, vy));
        self
    }

    pub fn path(mut self, style: PathStyle) -> Self {
        self.path = style;
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<PositionKind>::new(element);
        tween.start_spec = self.start;
        tween.target_spec = self.target;
        tween.delta_spec = self.delta;
        tween.velocity = self.velocity;
        tween.options = self.path;
        Step::new(
            StepCore::new(Some(PositionKind::DEFAULT_DURATION)),
            StepKind::Position(tween),
        )
    }
}
