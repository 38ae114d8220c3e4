use std::f64::consts::FRAC_PI_2;

use kurbo::Vec2;

use crate::animation::step::{Step, StepCore, StepKind, StepState};
use crate::animation::steps::color;
use crate::animation::steps::opacity::{dissolve_in, dissolve_out};
use crate::animation::steps::transform as transform_step;
use crate::foundation::math::{DEFAULT_PRECISION, nearly_equal};
use crate::geometry::transform::{RotationDirection, Transform, TransformComponent};
use crate::scene::element::ScenarioPreset;
use crate::scene::graph::{ElementId, Scene};

/// Default speeds used to derive per-channel durations when the step has no
/// explicit duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioVelocity {
    /// Scene units per second.
    pub translation: f64,
    /// Radians per second.
    pub rotation: f64,
    /// Scale units per second.
    pub scale: f64,
    /// Color channel units per second.
    pub color: f64,
    /// Opacity units per second.
    pub opacity: f64,
}

impl Default for ScenarioVelocity {
    fn default() -> Self {
        Self {
            translation: 1.0,
            rotation: FRAC_PI_2,
            scale: 1.0,
            color: 0.8,
            opacity: 0.8,
        }
    }
}

/// Animates an element to a named saved scenario. Expands at start time into
/// a parallel group of transform, color, and visibility steps, so the work
/// after expansion is ordinary step advancement.
pub(crate) struct ScenarioStep {
    element: ElementId,
    target: String,
    start: Option<String>,
    velocity: ScenarioVelocity,
    uniform_duration: bool,
}

impl ScenarioStep {
    pub(crate) fn expand(&mut self, core: &StepCore, scene: &mut Scene) -> Vec<Step> {
        let Some(el) = scene.element(self.element) else {
            return Vec::new();
        };
        let Some(preset) = el.scenario(&self.target).cloned() else {
            return Vec::new();
        };
        let base = self.start.as_ref().and_then(|n| el.scenario(n).cloned());

        let mut from_transform = el.transform().clone();
        let mut from_color = el.color();
        let mut from_shown = el.is_shown();
        if let Some(b) = &base {
            apply_preset(&mut from_transform, b);
            if let Some(c) = b.color {
                from_color = c;
            }
            if let Some(s) = b.is_shown {
                from_shown = s;
            }
        }
        let mut to_transform = from_transform.clone();
        apply_preset(&mut to_transform, &preset);

        let explicit = core.duration_explicit.then(|| core.duration.unwrap_or(0.0));
        let mut children = Vec::new();

        // Poses captured mid-animation carry floating drift; compare at a
        // fixed precision so a no-op channel produces no child step.
        if to_transform.round(DEFAULT_PRECISION) != from_transform.round(DEFAULT_PRECISION) {
            let duration = explicit.unwrap_or_else(|| {
                Transform::delta_to(&from_transform, &to_transform, RotationDirection::Shortest)
                    .and_then(|delta| {
                        let velocity = self.velocity_shaped_like(&delta);
                        Transform::duration_from_velocity(&delta, &velocity)
                    })
                    .unwrap_or(1.0)
            });
            children.push(
                transform_step::transform()
                    .start(from_transform)
                    .to(to_transform)
                    .step(self.element)
                    .with_duration(duration),
            );
        }

        if let Some(target_color) = preset.color
            && !nearly_equal(from_color.max_channel_delta(target_color), 0.0, DEFAULT_PRECISION)
        {
            let duration = explicit.unwrap_or_else(|| {
                from_color.max_channel_delta(target_color) / self.velocity.color
            });
            children.push(
                color::color()
                    .start(from_color)
                    .to(target_color)
                    .step(self.element)
                    .with_duration(duration),
            );
        }

        match preset.is_shown {
            Some(true) if !from_shown => {
                let duration = explicit.unwrap_or(1.0 / self.velocity.opacity);
                children.push(dissolve_in().step(self.element).with_duration(duration));
            }
            Some(false) if from_shown => {
                let duration = explicit.unwrap_or(1.0 / self.velocity.opacity);
                children.push(dissolve_out().step(self.element).with_duration(duration));
            }
            _ => {}
        }

        if self.uniform_duration {
            let max = children
                .iter()
                .filter_map(|c| {
                    (c.state() != StepState::Finished).then(|| c.total_duration()).flatten()
                })
                .fold(0.0f64, f64::max);
            for child in &mut children {
                child.core.duration = Some(max);
                child.core.duration_explicit = true;
            }
        }
        children
    }

    /// Velocity transform congruent with `shape`, one speed per kind.
    fn velocity_shaped_like(&self, shape: &Transform) -> Transform {
        Transform::from_components(
            shape
                .components()
                .iter()
                .map(|c| match c {
                    TransformComponent::Translation(_) => TransformComponent::Translation(
                        Vec2::new(self.velocity.translation, self.velocity.translation),
                    ),
                    TransformComponent::Rotation(_) => {
                        TransformComponent::Rotation(self.velocity.rotation)
                    }
                    TransformComponent::Scale(_) => TransformComponent::Scale(Vec2::new(
                        self.velocity.scale,
                        self.velocity.scale,
                    )),
                })
                .collect(),
        )
    }
}

fn apply_preset(transform: &mut Transform, preset: &ScenarioPreset) {
    if let Some(p) = preset.position {
        transform.update_translation(p);
    }
    if let Some(r) = preset.rotation {
        transform.update_rotation(r);
    }
    if let Some(s) = preset.scale {
        transform.update_scale(s);
    }
}

/// Animate an element to the named saved scenario. Unknown names expand to
/// nothing and the step finishes immediately.
pub fn scenario(target: impl Into<String>) -> ScenarioOpts {
    ScenarioOpts {
        target: target.into(),
        start: None,
        velocity: ScenarioVelocity::default(),
        uniform_duration: false,
    }
}

#[derive(Clone, Debug)]
pub struct ScenarioOpts {
    target: String,
    start: Option<String>,
    velocity: ScenarioVelocity,
    uniform_duration: bool,
}

impl ScenarioOpts {
    /// Animate from this saved scenario instead of the element's current
    /// state.
    pub fn from(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn velocity(mut self, v: ScenarioVelocity) -> Self {
        self.velocity = v;
        self
    }

    /// Stretch every expanded channel to the longest one so they all land
    /// together.
    pub fn uniform_duration(mut self) -> Self {
        self.uniform_duration = true;
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        Step::new(
            StepCore::new(None),
            StepKind::Scenario(ScenarioStep {
                element,
                target: self.target,
                start: self.start,
                velocity: self.velocity,
                uniform_duration: self.uniform_duration,
            }),
        )
    }
}
