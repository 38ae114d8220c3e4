use crate::animation::composite::{ParallelStep, SerialStep};
use crate::animation::ease::Progression;
use crate::animation::steps::color::ColorStep;
use crate::animation::steps::custom::CustomStep;
use crate::animation::steps::opacity::OpacityStep;
use crate::animation::steps::position::PositionKind;
use crate::animation::steps::pulse::{PulseStep, PulseTransformStep};
use crate::animation::steps::rotation::RotationKind;
use crate::animation::steps::scale::ScaleKind;
use crate::animation::steps::scenario::ScenarioStep;
use crate::animation::steps::transform::TransformKind;
use crate::animation::steps::trigger::TriggerStep;
use crate::animation::tween::Tween;
use crate::foundation::error::{CadenzaError, CadenzaResult};
use crate::scene::graph::Scene;

/// Lifecycle of a step. Transitions only move forward; a finished step must
/// be re-added to run again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StepState {
    #[default]
    Idle,
    WaitingToStart,
    Animating,
    Finished,
}

/// What a cancelled step does to the scene on its way out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OnCancel {
    /// Jump the element to the step's final values.
    Complete,
    /// Leave the element wherever the last frame put it.
    Freeze,
}

/// State every step carries regardless of kind.
pub struct StepCore {
    pub(crate) name: Option<String>,
    pub(crate) state: StepState,
    pub(crate) start_time: Option<f64>,
    pub(crate) delay: f64,
    /// `None` is indefinite. Tween resolution overwrites this unless the
    /// caller set a duration explicitly.
    pub(crate) duration: Option<f64>,
    pub(crate) duration_explicit: bool,
    pub(crate) progression: Progression,
    pub(crate) complete_on_cancel: Option<bool>,
    pub(crate) remove_on_finish: bool,
    pub(crate) on_finish: Option<Box<dyn FnMut(&mut Scene, bool)>>,
}

impl StepCore {
    pub(crate) fn new(default_duration: Option<f64>) -> Self {
        Self {
            name: None,
            state: StepState::Idle,
            start_time: None,
            delay: 0.0,
            duration: default_duration,
            duration_explicit: false,
            progression: Progression::default(),
            complete_on_cancel: None,
            remove_on_finish: true,
            on_finish: None,
        }
    }
}

impl std::fmt::Debug for StepCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepCore")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("progression", &self.progression)
            .finish_non_exhaustive()
    }
}

/// The per-kind body of a step.
///
/// A closed enum rather than a trait object: dispatch sites destructure the
/// owning [`Step`] so kind methods can mutate the shared core (triggers
/// extend their duration, custom steps shrink theirs) without aliasing.
pub(crate) enum StepKind {
    Delay,
    Serial(SerialStep),
    Parallel(ParallelStep),
    Position(Tween<PositionKind>),
    Rotation(Tween<RotationKind>),
    Scale(Tween<ScaleKind>),
    Transform(Tween<TransformKind>),
    Opacity(OpacityStep),
    Color(ColorStep),
    PulseTransform(PulseTransformStep),
    Pulse(PulseStep),
    Scenario(ScenarioStep),
    Trigger(TriggerStep),
    Custom(CustomStep),
}

impl StepKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::Serial(_) => "serial",
            Self::Parallel(_) => "parallel",
            Self::Position(_) => "position",
            Self::Rotation(_) => "rotation",
            Self::Scale(_) => "scale",
            Self::Transform(_) => "transform",
            Self::Opacity(_) => "opacity",
            Self::Color(_) => "color",
            Self::PulseTransform(_) => "pulse-transform",
            Self::Pulse(_) => "pulse",
            Self::Scenario(_) => "scenario",
            Self::Trigger(_) => "trigger",
            Self::Custom(_) => "custom",
        }
    }

    /// Default cancel policy when neither the call site nor the step
    /// overrides it. Triggers complete so one-shot side effects still fire.
    fn completes_by_default(&self) -> bool {
        matches!(self, Self::Trigger(_))
    }

    /// Resolve ambiguous specification against the live scene. Pulse and
    /// scenario steps expand here, morphing into a parallel composite.
    fn resolve(&mut self, core: &mut StepCore, scene: &mut Scene) {
        match self {
            Self::Delay | Self::Serial(_) | Self::Parallel(_) => {}
            Self::Position(t) => t.resolve(core, scene),
            Self::Rotation(t) => t.resolve(core, scene),
            Self::Scale(t) => t.resolve(core, scene),
            Self::Transform(t) => t.resolve(core, scene),
            Self::Opacity(s) => s.resolve(core, scene),
            Self::Color(s) => s.resolve(core, scene),
            Self::PulseTransform(s) => s.resolve(core, scene),
            Self::Trigger(_) | Self::Custom(_) => {}
            Self::Pulse(s) => {
                let children = s.expand(core, scene);
                *self = Self::Parallel(ParallelStep::new(children));
            }
            Self::Scenario(s) => {
                let children = s.expand(core, scene);
                *self = Self::Parallel(ParallelStep::new(children));
            }
        }
    }

    fn set_frame(&mut self, core: &mut StepCore, scene: &mut Scene, within: f64) {
        match self {
            Self::Delay | Self::Serial(_) | Self::Parallel(_) => {}
            Self::Position(t) => t.set_frame(core, scene, within),
            Self::Rotation(t) => t.set_frame(core, scene, within),
            Self::Scale(t) => t.set_frame(core, scene, within),
            Self::Transform(t) => t.set_frame(core, scene, within),
            Self::Opacity(s) => s.set_frame(core, scene, within),
            Self::Color(s) => s.set_frame(core, scene, within),
            Self::PulseTransform(s) => s.set_frame(core, scene, within),
            Self::Trigger(s) => s.set_frame(core, scene, within),
            Self::Custom(s) => s.set_frame(core, scene, within),
            Self::Pulse(_) | Self::Scenario(_) => {}
        }
    }

    fn set_to_end(&mut self, core: &mut StepCore, scene: &mut Scene) {
        match self {
            Self::Delay | Self::Serial(_) | Self::Parallel(_) => {}
            Self::Position(t) => t.set_to_end(scene),
            Self::Rotation(t) => t.set_to_end(scene),
            Self::Scale(t) => t.set_to_end(scene),
            Self::Transform(t) => t.set_to_end(scene),
            Self::Opacity(s) => s.set_to_end(scene),
            Self::Color(s) => s.set_to_end(scene),
            Self::PulseTransform(s) => s.set_to_end(scene),
            Self::Trigger(s) => s.set_to_end(core, scene),
            Self::Custom(s) => s.set_to_end(core, scene),
            Self::Pulse(_) | Self::Scenario(_) => {}
        }
    }

    /// Cancelled with the freeze policy: leave current values in place, but
    /// give kinds that maintain overlays a chance to snapshot them.
    fn cancelled_no_complete(&mut self, scene: &mut Scene) {
        if let Self::PulseTransform(s) = self {
            s.freeze(scene);
        }
    }
}

/// One animation step: shared core plus kind-specific body.
pub struct Step {
    pub(crate) core: StepCore,
    pub(crate) kind: StepKind,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("kind", &self.kind.name())
            .field("core", &self.core)
            .finish()
    }
}

impl Step {
    pub(crate) fn new(core: StepCore, kind: StepKind) -> Self {
        Self { core, kind }
    }

    // Builder-style configuration shared by every kind.

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core.name = Some(name.into());
        self
    }

    pub fn with_delay(mut self, seconds: f64) -> Self {
        self.core.delay = seconds.max(0.0);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.core.duration = Some(seconds.max(0.0));
        self.core.duration_explicit = true;
        self
    }

    /// Run until stopped from the outside (or, for custom steps, until the
    /// callback asks to stop).
    pub fn indefinite(mut self) -> Self {
        self.core.duration = None;
        self.core.duration_explicit = true;
        self
    }

    pub fn ease(mut self, progression: Progression) -> Self {
        self.core.progression = progression;
        self
    }

    pub fn complete_on_cancel(mut self, complete: bool) -> Self {
        self.core.complete_on_cancel = Some(complete);
        self
    }

    /// Keep the step in its manager after it finishes instead of pruning it.
    pub fn retained(mut self) -> Self {
        self.core.remove_on_finish = false;
        self
    }

    /// Called exactly once when the step finishes; the flag is true when the
    /// finish came from a cancel.
    pub fn when_finished(mut self, f: impl FnMut(&mut Scene, bool) + 'static) -> Self {
        self.core.on_finish = Some(Box::new(f));
        self
    }

    // Introspection.

    pub fn name(&self) -> Option<&str> {
        self.core.name.as_deref()
    }

    pub fn state(&self) -> StepState {
        self.core.state
    }

    pub(crate) fn remove_on_finish(&self) -> bool {
        self.core.remove_on_finish
    }

    /// Delay plus duration, recursively for composites. `None` is indefinite.
    pub fn total_duration(&self) -> Option<f64> {
        match &self.kind {
            StepKind::Serial(s) => s
                .children
                .iter()
                .try_fold(0.0, |acc, c| c.total_duration().map(|d| acc + d))
                .map(|d| d + self.core.delay),
            StepKind::Parallel(p) => p
                .children
                .iter()
                .try_fold(0.0_f64, |acc, c| c.total_duration().map(|d| acc.max(d)))
                .map(|d| d + self.core.delay),
            _ => self.core.duration.map(|d| d + self.core.delay),
        }
    }

    /// Animation-seconds left at `now`. Unstarted steps report their total
    /// duration; indefinite steps report `None`.
    pub fn remaining_time(&self, now: f64) -> Option<f64> {
        match self.core.state {
            StepState::Finished => Some(0.0),
            StepState::Idle | StepState::WaitingToStart => self.total_duration(),
            StepState::Animating => {
                let start = self.core.start_time.unwrap_or(now);
                self.total_duration().map(|d| d - (now - start))
            }
        }
    }

    /// Serializable snapshot of the step tree for recording and diagnostics.
    pub fn descriptor(&self) -> StepDescriptor {
        let children = match &self.kind {
            StepKind::Serial(s) => s.children.iter().map(Step::descriptor).collect(),
            StepKind::Parallel(p) => p.children.iter().map(Step::descriptor).collect(),
            _ => Vec::new(),
        };
        StepDescriptor {
            kind: self.kind.name(),
            name: self.core.name.clone(),
            state: self.core.state,
            delay: self.core.delay,
            duration: self.core.duration,
            children,
        }
    }

    /// JSON form of [`Step::descriptor`], for logs and recorded sessions.
    pub fn descriptor_json(&self) -> CadenzaResult<String> {
        serde_json::to_string(&self.descriptor()).map_err(|e| CadenzaError::serde(e.to_string()))
    }

    // Lifecycle.

    /// Arm the step. `when` of `None` means "on the next frame tick".
    pub(crate) fn start(&mut self, scene: &mut Scene, when: Option<f64>) {
        match when {
            Some(t) => self.begin(scene, t),
            None => self.core.state = StepState::WaitingToStart,
        }
    }

    /// Transition to animating at instant `t`: resolve tweens against the
    /// live scene, start composite children, and auto-finish when there is
    /// nothing to do.
    pub(crate) fn begin(&mut self, scene: &mut Scene, t: f64) {
        self.core.state = StepState::Animating;
        self.core.start_time = Some(t);
        {
            let Self { core, kind } = self;
            kind.resolve(core, scene);
        }
        let children_start = t + self.core.delay;
        match &mut self.kind {
            StepKind::Serial(s) => s.begin_children(scene, children_start),
            StepKind::Parallel(p) => p.begin_children(scene, children_start),
            _ => {}
        }
        if self.core.delay == 0.0 {
            // Give zero-duration steps their one frame before finishing, so
            // a trigger's callback can still extend the duration.
            if self.core.duration == Some(0.0)
                && !matches!(self.kind, StepKind::Serial(_) | StepKind::Parallel(_))
            {
                let Self { core, kind } = self;
                kind.set_frame(core, scene, 0.0);
            }
            if self.spent() {
                self.finish(scene, false, None);
            }
        }
    }

    fn spent(&self) -> bool {
        match &self.kind {
            StepKind::Serial(s) => s.all_done(),
            StepKind::Parallel(p) => p.all_finished(),
            _ => self.core.duration == Some(0.0),
        }
    }

    /// Advance to frame time `now`. Returns the wall-clock seconds this step
    /// still needs (`None` for indefinite); zero or negative means it
    /// finished, with the overshoot available for exact serial hand-off.
    pub(crate) fn next_frame(&mut self, scene: &mut Scene, now: f64, speed: f64) -> Option<f64> {
        match self.core.state {
            StepState::Idle | StepState::Finished => return Some(0.0),
            StepState::WaitingToStart => {
                self.begin(scene, now);
                if self.core.state == StepState::Finished {
                    return Some(0.0);
                }
            }
            StepState::Animating => {}
        }
        if matches!(self.kind, StepKind::Serial(_)) {
            let rem = match &mut self.kind {
                StepKind::Serial(s) => s.advance(scene, now, speed),
                _ => unreachable!(),
            };
            if matches!(&self.kind, StepKind::Serial(s) if s.all_done()) {
                self.finish(scene, false, None);
            }
            return rem;
        }
        if matches!(self.kind, StepKind::Parallel(_)) {
            let rem = match &mut self.kind {
                StepKind::Parallel(p) => p.advance(scene, now, speed),
                _ => unreachable!(),
            };
            if matches!(&self.kind, StepKind::Parallel(p) if p.all_finished()) {
                self.finish(scene, false, None);
            }
            return rem;
        }
        let start = match self.core.start_time {
            Some(s) => s,
            None => {
                self.core.start_time = Some(now);
                now
            }
        };
        let elapsed = (now - start) * speed;
        if elapsed < self.core.delay {
            return self
                .core
                .duration
                .map(|d| (self.core.delay + d - elapsed) / speed);
        }
        let within = match self.core.duration {
            Some(d) => (elapsed - self.core.delay).min(d),
            None => elapsed - self.core.delay,
        };
        {
            let Self { core, kind } = self;
            kind.set_frame(core, scene, within);
        }
        // Re-read: triggers extend and custom steps shrink their duration
        // from inside set_frame.
        match self.core.duration {
            Some(d) => {
                let remaining = (self.core.delay + d - elapsed) / speed;
                if remaining <= 0.0 {
                    self.finish(scene, false, None);
                }
                Some(remaining)
            }
            None => None,
        }
    }

    /// Cancel a running (or armed) step. No-op on idle and finished steps.
    pub(crate) fn cancel(&mut self, scene: &mut Scene, force: Option<OnCancel>) {
        if matches!(self.core.state, StepState::Idle | StepState::Finished) {
            return;
        }
        self.force_finish(scene, true, force);
    }

    fn finish(&mut self, scene: &mut Scene, cancelled: bool, force: Option<OnCancel>) {
        if matches!(self.core.state, StepState::Idle | StepState::Finished) {
            return;
        }
        self.force_finish(scene, cancelled, force);
    }

    /// Finish unconditionally, resolving the cancel policy and propagating
    /// it to composite children. Idle steps finishing with the complete
    /// policy are begun first so their side effects still land, in order.
    pub(crate) fn force_finish(
        &mut self,
        scene: &mut Scene,
        cancelled: bool,
        force: Option<OnCancel>,
    ) {
        if self.core.state == StepState::Finished {
            return;
        }
        let complete = if !cancelled {
            true
        } else {
            match force {
                Some(OnCancel::Complete) => true,
                Some(OnCancel::Freeze) => false,
                None => self
                    .core
                    .complete_on_cancel
                    .unwrap_or_else(|| self.kind.completes_by_default()),
            }
        };
        if matches!(
            self.core.state,
            StepState::Idle | StepState::WaitingToStart
        ) {
            if complete {
                let t = scene.now();
                self.begin(scene, t);
                if self.core.state == StepState::Finished {
                    // Zero-duration chain already completed and notified.
                    return;
                }
            } else {
                self.core.state = StepState::Finished;
                self.fire_on_finish(scene, cancelled);
                return;
            }
        }
        self.core.state = StepState::Finished;
        // Children inherit an explicit force or this step's own policy
        // override; otherwise each child resolves its own default, so e.g. a
        // trigger inside a frozen sequence still fires.
        let child_force = if !cancelled {
            Some(OnCancel::Complete)
        } else {
            force.or_else(|| {
                self.core.complete_on_cancel.map(|b| {
                    if b {
                        OnCancel::Complete
                    } else {
                        OnCancel::Freeze
                    }
                })
            })
        };
        {
            let Self { core, kind } = self;
            match kind {
                StepKind::Serial(s) => {
                    for child in &mut s.children {
                        child.force_finish(scene, cancelled, child_force);
                    }
                }
                StepKind::Parallel(p) => {
                    for child in &mut p.children {
                        child.force_finish(scene, cancelled, child_force);
                    }
                }
                kind => {
                    if complete {
                        kind.set_to_end(core, scene);
                    } else {
                        kind.cancelled_no_complete(scene);
                    }
                }
            }
        }
        self.fire_on_finish(scene, cancelled);
    }

    fn fire_on_finish(&mut self, scene: &mut Scene, cancelled: bool) {
        if let Some(mut cb) = self.core.on_finish.take() {
            cb(scene, cancelled);
            self.core.on_finish = Some(cb);
        }
    }
}

/// Serializable view of a step tree.
#[derive(Clone, Debug, serde::Serialize)]
pub struct StepDescriptor {
    pub kind: &'static str,
    pub name: Option<String>,
    pub state: StepState,
    pub delay: f64,
    pub duration: Option<f64>,
    pub children: Vec<StepDescriptor>,
}
