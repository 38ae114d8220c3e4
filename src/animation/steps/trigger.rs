use crate::animation::step::{Step, StepCore, StepKind};
use crate::scene::graph::Scene;

/// One-shot callback step. Fires once at its (possibly delayed) start
/// instant; the callback may return a number of seconds to keep the step
/// busy, extending a sequence without a separate delay step.
///
/// Triggers complete rather than freeze on cancel by default, so their side
/// effects still land when a sequence is cut short.
pub(crate) struct TriggerStep {
    callback: Box<dyn FnMut(&mut Scene) -> Option<f64>>,
    fired: bool,
}

impl TriggerStep {
    fn fire(&mut self, core: &mut StepCore, scene: &mut Scene) {
        if self.fired {
            return;
        }
        self.fired = true;
        if let Some(extension) = (self.callback)(scene) {
            core.duration = Some(extension.max(0.0));
            core.duration_explicit = true;
        }
    }

    pub(crate) fn set_frame(&mut self, core: &mut StepCore, scene: &mut Scene, _within: f64) {
        self.fire(core, scene);
    }

    pub(crate) fn set_to_end(&mut self, core: &mut StepCore, scene: &mut Scene) {
        self.fire(core, scene);
    }
}

/// Run a callback once when this point in a sequence is reached.
pub fn trigger(f: impl FnMut(&mut Scene) -> Option<f64> + 'static) -> Step {
    Step::new(
        StepCore::new(Some(0.0)),
        StepKind::Trigger(TriggerStep {
            callback: Box::new(f),
            fired: false,
        }),
    )
}
