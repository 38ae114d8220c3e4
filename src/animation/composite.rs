use crate::animation::step::{Step, StepCore, StepKind, StepState};
use crate::scene::graph::Scene;

/// Children run one after another. The handoff is exact: a child that
/// finishes mid-frame starts its successor at the finish instant, not at the
/// frame boundary, so a sequence's total length never drifts.
pub(crate) struct SerialStep {
    pub(crate) children: Vec<Step>,
    active: usize,
}

impl SerialStep {
    pub(crate) fn new(children: Vec<Step>) -> Self {
        Self {
            children,
            active: 0,
        }
    }

    pub(crate) fn all_done(&self) -> bool {
        self.active >= self.children.len()
    }

    /// Start the first child at `t`, skipping over any zero-duration
    /// children that finish the moment they begin.
    pub(crate) fn begin_children(&mut self, scene: &mut Scene, t: f64) {
        self.active = 0;
        while self.active < self.children.len() {
            let child = &mut self.children[self.active];
            child.start(scene, Some(t));
            if child.state() == StepState::Finished {
                self.active += 1;
            } else {
                break;
            }
        }
    }

    pub(crate) fn advance(&mut self, scene: &mut Scene, now: f64, speed: f64) -> Option<f64> {
        // A finishing child's overshoot (remaining <= 0) becomes the start
        // offset of the next child, so zero-duration children never consume
        // a frame and timing stays exact across the whole chain.
        let mut handoff = now;
        loop {
            if self.active >= self.children.len() {
                return Some(0.0);
            }
            let child = &mut self.children[self.active];
            if child.state() == StepState::Idle {
                child.start(scene, Some(handoff));
            }
            if child.state() != StepState::Finished {
                let rem = child.next_frame(scene, now, speed);
                if child.state() != StepState::Finished {
                    return rem;
                }
                handoff = now + rem.unwrap_or(0.0).min(0.0);
            }
            self.active += 1;
        }
    }
}

/// Children run simultaneously; the composite finishes only when every child
/// has finished, but reports the minimum remaining time so callers see the
/// soonest instant anything changes.
pub(crate) struct ParallelStep {
    pub(crate) children: Vec<Step>,
}

impl ParallelStep {
    pub(crate) fn new(children: Vec<Step>) -> Self {
        Self { children }
    }

    pub(crate) fn all_finished(&self) -> bool {
        self.children
            .iter()
            .all(|c| c.state() == StepState::Finished)
    }

    pub(crate) fn begin_children(&mut self, scene: &mut Scene, t: f64) {
        for child in &mut self.children {
            child.start(scene, Some(t));
        }
    }

    pub(crate) fn advance(&mut self, scene: &mut Scene, now: f64, speed: f64) -> Option<f64> {
        let mut min_rem: Option<f64> = None;
        let mut indefinite = false;
        for child in &mut self.children {
            if child.state() == StepState::Finished {
                continue;
            }
            match child.next_frame(scene, now, speed) {
                None => indefinite = true,
                Some(r) => min_rem = Some(min_rem.map_or(r, |m: f64| m.min(r))),
            }
        }
        if indefinite {
            None
        } else {
            Some(min_rem.unwrap_or(0.0))
        }
    }
}

/// A sequence of steps run back to back.
pub fn serial(children: Vec<Step>) -> Step {
    Step::new(
        StepCore::new(None),
        StepKind::Serial(SerialStep::new(children)),
    )
}

/// A batch of steps run simultaneously.
pub fn parallel(children: Vec<Step>) -> Step {
    Step::new(
        StepCore::new(None),
        StepKind::Parallel(ParallelStep::new(children)),
    )
}
