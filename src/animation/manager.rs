use tracing::debug;

use crate::animation::step::{OnCancel, Step, StepState};
use crate::foundation::error::{CadenzaError, CadenzaResult};
use crate::scene::graph::{ElementId, Scene, SceneEvent};

/// Idle/animating summary of a manager, derived from its steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ManagerState {
    #[default]
    Idle,
    Animating,
}

/// Per-element container of animation steps.
///
/// The scene detaches a manager from its element while ticking it, so step
/// callbacks are free to add or start animations on any element, including
/// the one being ticked; whatever accrues on the stand-in is absorbed back
/// afterwards.
pub struct AnimationManager {
    owner: ElementId,
    steps: Vec<Step>,
    state: ManagerState,
    next_auto_name: usize,
}

impl AnimationManager {
    pub(crate) fn new(owner: ElementId) -> Self {
        Self {
            owner,
            steps: Vec::new(),
            state: ManagerState::Idle,
            next_auto_name: 0,
        }
    }

    /// Empty manager standing in for this one while it is detached. Shares
    /// the owner and the auto-name counter so names stay unique.
    pub(crate) fn stand_in(&self) -> Self {
        Self {
            owner: self.owner,
            steps: Vec::new(),
            state: self.state,
            next_auto_name: self.next_auto_name,
        }
    }

    /// Take everything a stand-in accrued while this manager was detached.
    pub(crate) fn absorb(&mut self, mut other: Self) {
        self.next_auto_name = self.next_auto_name.max(other.next_auto_name);
        if !other.steps.is_empty() {
            self.steps.append(&mut other.steps);
            if other.state == ManagerState::Animating {
                self.state = ManagerState::Animating;
            }
        }
    }

    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == ManagerState::Animating
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name() == Some(name))
    }

    /// Longest remaining time over all live steps at `now`, `None` if any
    /// is indefinite. `Some(0.0)` when nothing is running.
    pub fn remaining_time(&self, now: f64) -> Option<f64> {
        self.steps
            .iter()
            .filter(|s| s.state() != StepState::Finished)
            .try_fold(0.0f64, |acc, s| s.remaining_time(now).map(|r| acc.max(r)))
    }

    /// Register a step, assigning an `animation{N}` name if it has none.
    /// Returns the step's name. Explicit names must be unique among the
    /// steps still registered.
    pub(crate) fn add(&mut self, mut step: Step) -> CadenzaResult<String> {
        self.prune();
        let name = match step.core.name.clone() {
            Some(n) => {
                if self.steps.iter().any(|s| s.name() == Some(n.as_str())) {
                    return Err(CadenzaError::animation(format!(
                        "an animation named {n:?} is already registered"
                    )));
                }
                n
            }
            None => {
                let n = format!("animation{}", self.next_auto_name);
                self.next_auto_name += 1;
                step.core.name = Some(n.clone());
                n
            }
        };
        self.steps.push(step);
        Ok(name)
    }

    /// Register then start a step in one call (the play path).
    pub(crate) fn play_step(
        &mut self,
        scene: &mut Scene,
        step: Step,
        when: Option<f64>,
    ) -> CadenzaResult<String> {
        let name = self.add(step)?;
        if let Some(step) = self.steps.last_mut() {
            step.start(scene, when);
        }
        self.refresh_state(scene);
        Ok(name)
    }

    /// Start idle steps, all of them or just those matching `name`.
    pub(crate) fn start(&mut self, scene: &mut Scene, name: Option<&str>, when: Option<f64>) {
        for step in &mut self.steps {
            if let Some(n) = name
                && step.name() != Some(n)
            {
                continue;
            }
            if step.state() == StepState::Idle {
                step.start(scene, when);
            }
        }
        self.refresh_state(scene);
    }

    /// Cancel live steps, all of them or just those matching `name`.
    pub(crate) fn cancel(&mut self, scene: &mut Scene, name: Option<&str>, force: Option<OnCancel>) {
        for step in &mut self.steps {
            if let Some(n) = name
                && step.name() != Some(n)
            {
                continue;
            }
            step.cancel(scene, force);
        }
        self.prune();
        self.refresh_state(scene);
    }

    pub(crate) fn next_frame(&mut self, scene: &mut Scene, now: f64, speed: f64) {
        for step in &mut self.steps {
            if matches!(
                step.state(),
                StepState::WaitingToStart | StepState::Animating
            ) {
                step.next_frame(scene, now, speed);
            }
        }
        self.prune();
        self.refresh_state(scene);
    }

    fn prune(&mut self) {
        self.steps
            .retain(|s| !(s.state() == StepState::Finished && s.remove_on_finish()));
    }

    /// Recompute idle/animating; emits one event per animating-to-idle edge.
    fn refresh_state(&mut self, scene: &mut Scene) {
        let busy = self.steps.iter().any(|s| {
            matches!(
                s.state(),
                StepState::WaitingToStart | StepState::Animating
            )
        });
        let new_state = if busy {
            ManagerState::Animating
        } else {
            ManagerState::Idle
        };
        if self.state == ManagerState::Animating && new_state == ManagerState::Idle {
            debug!(element = self.owner.index(), "animations finished");
            scene.push_event(SceneEvent::AnimationsFinished(self.owner));
        }
        self.state = new_state;
    }
}
