use crate::animation::step::{Step, StepCore, StepKind};

/// A step that does nothing for `seconds`, used to space out sequences.
pub fn delay(seconds: f64) -> Step {
    let mut core = StepCore::new(Some(seconds.max(0.0)));
    core.duration_explicit = true;
    Step::new(core, StepKind::Delay)
}
