use crate::animation::step::{Step, StepCore, StepKind};
use crate::animation::tween::{Tween, TweenKind};
use crate::geometry::color::Color;
use crate::scene::graph::{ElementId, Scene};

pub(crate) struct ColorKind;

impl TweenKind for ColorKind {
    type Value = Color;
    type Velocity = f64;
    type Options = ();

    fn read(scene: &Scene, id: ElementId) -> Option<Color> {
        scene.element(id).map(|e| e.color())
    }

    fn write(scene: &mut Scene, id: ElementId, value: &Color) {
        if let Some(e) = scene.element_mut(id) {
            e.set_color(*value, false);
        }
    }

    fn delta(start: &Color, target: &Color, _opts: &()) -> Option<Color> {
        Some(start.delta_to(*target))
    }

    fn lerp(start: &Color, delta: &Color, p: f64, _opts: &()) -> Option<Color> {
        Some(start.offset(*delta, p))
    }

    fn duration(delta: &Color, velocity: &f64) -> Option<f64> {
        if *velocity <= 0.0 {
            return None;
        }
        let max = delta
            .r
            .abs()
            .max(delta.g.abs())
            .max(delta.b.abs())
            .max(delta.a.abs());
        Some(max / velocity)
    }
}

/// Where a color animation is headed. `Dim` and `Undim` resolve against the
/// element's dim and default colors at start time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ColorGoal {
    Explicit(Color),
    Dim,
    Undim,
}

pub(crate) struct ColorStep {
    tween: Tween<ColorKind>,
    goal: Option<ColorGoal>,
    set_as_default: bool,
}

impl ColorStep {
    pub(crate) fn resolve(&mut self, core: &mut StepCore, scene: &mut Scene) {
        if let Some(goal) = self.goal {
            let Some(el) = scene.element(self.tween.element) else {
                core.duration = Some(0.0);
                return;
            };
            let target = match goal {
                ColorGoal::Explicit(c) => c,
                ColorGoal::Dim => el.dim_color(),
                ColorGoal::Undim => el.default_color(),
            };
            self.tween.target_spec = Some(target);
        }
        self.tween.resolve(core, scene);
    }

    pub(crate) fn set_frame(&mut self, core: &StepCore, scene: &mut Scene, within: f64) {
        self.tween.set_frame(core, scene, within);
    }

    pub(crate) fn set_to_end(&mut self, scene: &mut Scene) {
        self.tween.set_to_end(scene);
        if self.set_as_default
            && let Some(target) = self.tween.resolved_target().copied()
            && let Some(el) = scene.element_mut(self.tween.element)
        {
            el.set_color(target, true);
        }
    }
}

/// Animate an element's color.
pub fn color() -> ColorOpts {
    ColorOpts::default()
}

/// Animate toward the element's dim color.
pub fn dim() -> ColorOpts {
    ColorOpts {
        goal: Some(ColorGoal::Dim),
        ..ColorOpts::default()
    }
}

/// Animate back to the element's default color.
pub fn undim() -> ColorOpts {
    ColorOpts {
        goal: Some(ColorGoal::Undim),
        ..ColorOpts::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ColorOpts {
    start: Option<Color>,
    goal: Option<ColorGoal>,
    velocity: Option<f64>,
    set_as_default: bool,
}

impl ColorOpts {
    pub fn start(mut self, c: Color) -> Self {
        self.start = Some(c);
        self
    }

    pub fn to(mut self, c: Color) -> Self {
        self.goal = Some(ColorGoal::Explicit(c));
        self
    }

    /// Channel units per second; the largest channel delta governs the
    /// duration. Consulted when no explicit duration is set.
    pub fn velocity(mut self, v: f64) -> Self {
        self.velocity = Some(v);
        self
    }

    /// Also make the final color the element's new default.
    pub fn and_set_default(mut self) -> Self {
        self.set_as_default = true;
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut tween = Tween::<ColorKind>::new(element);
        tween.start_spec = self.start;
        tween.velocity = self.velocity;
        Step::new(
            StepCore::new(Some(ColorKind::DEFAULT_DURATION)),
            StepKind::Color(ColorStep {
                tween,
                goal: self.goal,
                set_as_default: self.set_as_default,
            }),
        )
    }
}
