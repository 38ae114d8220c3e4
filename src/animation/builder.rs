use crate::animation::composite::{parallel, serial};
use crate::animation::step::Step;
use crate::animation::steps::{
    ColorOpts, OpacityOpts, PositionOpts, PulseOpts, RotationOpts, ScaleOpts, ScenarioOpts,
    TransformOpts, custom, delay, trigger,
};
use crate::scene::graph::{ElementId, Scene};
use crate::timing::clock::StartTime;

/// Fluent builder for one element's animation sequence.
///
/// Each call appends a step; `build` wraps them in a serial composite.
/// Handing the builder to [`Scene::play`](crate::scene::graph::Scene::play)
/// registers and starts it in one go.
pub struct AnimationBuilder {
    element: ElementId,
    name: Option<String>,
    steps: Vec<Step>,
    when: StartTime,
}

impl AnimationBuilder {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            name: None,
            steps: Vec::new(),
            when: StartTime::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// When the sequence starts once played.
    pub fn starting(mut self, when: StartTime) -> Self {
        self.when = when;
        self
    }

    pub fn position(mut self, opts: PositionOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn rotation(mut self, opts: RotationOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn scale(mut self, opts: ScaleOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn transform(mut self, opts: TransformOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn color(mut self, opts: ColorOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn opacity(mut self, opts: OpacityOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn pulse(mut self, opts: PulseOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn scenario(mut self, opts: ScenarioOpts) -> Self {
        self.steps.push(opts.step(self.element));
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.steps.push(delay(seconds));
        self
    }

    pub fn trigger(mut self, f: impl FnMut(&mut Scene) -> Option<f64> + 'static) -> Self {
        self.steps.push(trigger(f));
        self
    }

    pub fn custom(mut self, f: impl FnMut(&mut Scene, f64) -> bool + 'static) -> Self {
        self.steps.push(custom(f));
        self
    }

    /// Append an arbitrary step, e.g. one targeting a different element.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a batch of steps that run simultaneously.
    pub fn alongside(mut self, steps: Vec<Step>) -> Self {
        self.steps.push(parallel(steps));
        self
    }

    pub(crate) fn element(&self) -> ElementId {
        self.element
    }

    pub(crate) fn start_at(&self) -> StartTime {
        self.when
    }

    pub fn build(self) -> Step {
        let step = serial(self.steps);
        match self.name {
            Some(n) => step.named(n),
            None => step,
        }
    }
}
