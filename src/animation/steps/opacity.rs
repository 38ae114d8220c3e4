use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::geometry::color::DISSOLVE_ALPHA;
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct OpacityKind;

impl TweenKind for OpacityKind {
    type Value = f64;
    type Velocity = f64;
    type Options = ();

    fn read(scene: &Scene, id: ElementId) -> Option<f64> {
        scene.element(id).map(|e| e.opacity())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &f64) {
        if let Some(e) = scene.element_mut(id) {
            e.set_opacity(*value);
        }
    }

    fn delta(start: &f64, target: &f64, _opts: &()) -> Option<f64> {
        Some(target - start)
    }

    fn lerp(start: &f64, delta: &f64, p: f64, _opts: &()) -> Option<f64> {
        Some(start + delta * p)
    }

    fn duration(delta: &f64, velocity: &f64) -> Option<f64> {
        (*velocity > 0.0).then(|| delta.abs() / velocity)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dissolve {
    In,
    Out,
}

/// Opacity tween with optional dissolve handling: dissolving in shows the
/// element first, dissolving out hides it at the end and restores full
/// opacity so a later plain `show` is not invisibly faded.
pub(crate) struct OpacityStep {
    tween: Tween<OpacityKind>,
    dissolve: Option<Dissolve>,
}

impl OpacityStep {
    pub(crate) fn resolve(&mut self, core: &mut StepCore, scene: &mut Scene) {
        let id = self.tween.element;
        match self.dissolve {
            Some(Dissolve::In) => {
                let Some(el) = scene.element_mut(id) else {
                    core.duration = Some(0.0);
                    return;
                };
                let start = if el.is_shown() {
                    el.opacity()
                } else {
                    DISSOLVE_ALPHA
                };
                el.show();
                el.set_opacity(start);
                self.tween.start_spec = Some(start);
                if self.tween.target_spec.is_none() && self.tween.delta_spec.is_none() {
                    self.tween.target_spec = Some(1.0);
                }
            }
            Some(Dissolve::Out) => {
                if self.tween.target_spec.is_none() && self.tween.delta_spec.is_none() {
                    self.tween.target_spec = Some(DISSOLVE_ALPHA);
                }
            }
            None => {}
        }
        self.tween.resolve(core, scene);
    }

    pub(crate) fn set_frame(&mut self, core: &StepCore, scene: &mut Scene, within: f64) {
        self.tween.set_frame(core, scene, within);
    }

    pub(crate) fn set_to_end(&mut self, scene: &mut Scene) {
        self.tween.set_to_end(scene);
        if self.dissolve == Some(Dissolve::Out)
            && let Some(el) = scene.element_mut(self.tween.element)
        {
            el.hide();
            el.set_opacity(1.0);
        }
    }
}

/// Animate an element's opacity.
pub fn opacity() -> OpacityOpts {
    OpacityOpts::default()
}

/// Fade a hidden element into view.
pub fn dissolve_in() -> OpacityOpts {
    OpacityOpts {
        dissolve: Some(Dissolve::In),
        ..OpacityOpts::default()
    }
}

/// Fade an element out, hiding it when done.
pub fn dissolve_out() -> OpacityOpts {
    OpacityOpts {
        dissolve: Some(Dissolve::Out),
        ..OpacityOpts::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct OpacityOpts {
    start: Option<f64>,
    target: Option<f64>,
    delta: Option<f64>,
    velocity: Option<f64>,
    dissolve: Option<Dissolve>,
}

impl OpacityOpts {
    pub fn start(mut self, o: f64) -> Self {
        self.start = Some(o);
        self
    }

    pub fn to(mut self, o: f64) -> Self {
        self.target = Some(o);
        self
    }

    pub fn by(mut self, d: f64) -> Self {
        self.delta = Some(d);
        self
    }

    /// Opacity units per second; consulted when no explicit duration is set.
    pub fn velocity(mut self, v: f64) -> Self {
        self.velocity = Some(v);
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<OpacityKind>::new(element);
        tween.start_spec = self.start;
        tween.target_spec = self.target;
        tween.delta_spec = self.delta;
        tween.velocity = self.velocity;
        Step::new(
            StepCore::new(Some(OpacityKind::DEFAULT_DURATION)),
            StepKind::Opacity(OpacityStep {
                tween,
                dissolve: self.dissolve,
            }),
        )
    }
}
