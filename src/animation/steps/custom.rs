use crate::animation::step::{Step, StepCore, StepKind};
use crate::scene::graph::Scene;

/// Per-frame callback step.
///
/// The callback receives the eased completion percent, or raw elapsed
/// seconds when the step is indefinite. Returning `false` stops the step at
/// the current frame; the callback then gets a final call with `1.0` as the
/// step completes.
pub(crate) struct CustomStep {
    callback: Box<dyn FnMut(&mut Scene, f64) -> bool>,
}

impl CustomStep {
    pub(crate) fn set_frame(&mut self, core: &mut StepCore, scene: &mut Scene, within: f64) {
        let arg = match core.duration {
            Some(d) if d > 0.0 => core.progression.apply(within / d),
            Some(_) => 1.0,
            None => within,
        };
        if !(self.callback)(scene, arg) {
            core.duration = Some(within);
            core.duration_explicit = true;
        }
    }

    pub(crate) fn set_to_end(&mut self, core: &mut StepCore, scene: &mut Scene) {
        if core.duration.is_some() {
            (self.callback)(scene, 1.0);
        }
    }
}

/// Run a callback every frame. Defaults to a one second duration; use
/// [`Step::with_duration`](crate::animation::step::Step::with_duration) or
/// [`Step::indefinite`](crate::animation::step::Step::indefinite) to change
/// that.
pub fn custom(f: impl FnMut(&mut Scene, f64) -> bool + 'static) -> Step {
    Step::new(
        StepCore::new(Some(1.0)),
        StepKind::Custom(CustomStep {
            callback: Box::new(f),
        }),
    )
}
