use kurbo::Affine;
use tracing::debug;

use crate::animation::builder::AnimationBuilder;
use crate::animation::manager::AnimationManager;
use crate::animation::step::{OnCancel, Step};
use crate::foundation::error::{CadenzaError, CadenzaResult};
use crate::geometry::transform::Transform;
use crate::scene::element::{ScenarioPreset, SceneElement};
use crate::scene::movement::{MIN_MOVE_DT, MovePhase, STALE_MOVE_WINDOW, decay};
use crate::timing::clock::{Clock, ManualTimeSource, StartTime};

/// Handle to an element in a [`Scene`]. Stable for the scene's lifetime;
/// elements are never removed, so ids never dangle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Things that happened during a frame tick, drained by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// An element's animation manager went from animating to idle.
    AnimationsFinished(ElementId),
    /// An element's free movement decayed to rest.
    MovementStopped(ElementId),
}

/// The element tree plus the clock that drives it.
///
/// Elements live in an arena indexed by [`ElementId`]; parents and children
/// refer to each other by id, which keeps animation callbacks free to reach
/// any element without fighting the borrow checker.
pub struct Scene {
    elements: Vec<SceneElement>,
    clock: Clock,
    time_speed: f64,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_clock(Clock::system())
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            elements: Vec::new(),
            clock,
            time_speed: 1.0,
            events: Vec::new(),
        }
    }

    /// Scene over a hand-driven clock; returns the driving handle.
    pub fn manual() -> (Self, ManualTimeSource) {
        let (clock, time) = Clock::manual();
        (Self::with_clock(clock), time)
    }

    // Element tree.

    /// Add a root primitive element.
    pub fn add_element(&mut self, name: impl Into<String>) -> ElementId {
        self.insert_root(name.into(), false)
    }

    /// Add a root collection (an element that can hold children).
    pub fn add_collection(&mut self, name: impl Into<String>) -> ElementId {
        self.insert_root(name.into(), true)
    }

    /// Add a primitive under `parent`, which must be a collection.
    pub fn add_child(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
    ) -> CadenzaResult<ElementId> {
        self.insert(parent, name.into(), false)
    }

    /// Add a collection under `parent`, which must be a collection.
    pub fn add_child_collection(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
    ) -> CadenzaResult<ElementId> {
        self.insert(parent, name.into(), true)
    }

    fn insert_root(&mut self, name: String, is_collection: bool) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements
            .push(SceneElement::new(name, None, is_collection, id));
        id
    }

    fn insert(
        &mut self,
        parent: ElementId,
        name: String,
        is_collection: bool,
    ) -> CadenzaResult<ElementId> {
        let pe = self
            .elements
            .get(parent.0)
            .ok_or_else(|| CadenzaError::scene(format!("no element with id {}", parent.0)))?;
        if !pe.is_collection {
            return Err(CadenzaError::scene(format!(
                "element '{}' is not a collection",
                pe.name
            )));
        }
        let id = ElementId(self.elements.len());
        self.elements
            .push(SceneElement::new(name, Some(parent), is_collection, id));
        self.elements[parent.0].children.push(id);
        Ok(id)
    }

    pub fn element(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.get(id.0)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut SceneElement> {
        self.elements.get_mut(id.0)
    }

    /// Look up an element by dotted path from a root, e.g. `"figure.label"`.
    pub fn element_by_path(&self, path: &str) -> Option<ElementId> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self
            .elements
            .iter()
            .position(|e| e.parent.is_none() && e.name == first)
            .map(ElementId)?;
        for part in parts {
            current = self
                .element(current)?
                .children
                .iter()
                .copied()
                .find(|&c| self.elements[c.0].name == part)?;
        }
        Some(current)
    }

    fn require(&self, id: ElementId) -> CadenzaResult<&SceneElement> {
        self.elements
            .get(id.0)
            .ok_or_else(|| CadenzaError::scene(format!("no element with id {}", id.0)))
    }

    fn require_mut(&mut self, id: ElementId) -> CadenzaResult<&mut SceneElement> {
        self.elements
            .get_mut(id.0)
            .ok_or_else(|| CadenzaError::scene(format!("no element with id {}", id.0)))
    }

    // Time.

    /// Synchronized now: stable across repeated calls within one frame.
    pub fn now(&self) -> f64 {
        self.clock.synchronized_now()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn time_speed(&self) -> f64 {
        self.time_speed
    }

    /// Global playback rate; must be positive.
    pub fn set_time_speed(&mut self, speed: f64) -> CadenzaResult<()> {
        if !(speed > 0.0 && speed.is_finite()) {
            return Err(CadenzaError::validation(format!(
                "time speed must be positive and finite, got {speed}"
            )));
        }
        self.time_speed = speed;
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Advance the whole scene to the current clock time: movement first,
    /// then animations, per element in insertion order. Returns the frame's
    /// time.
    #[tracing::instrument(skip(self))]
    pub fn next_frame(&mut self) -> f64 {
        let now = self.clock.begin_frame();
        for i in 0..self.elements.len() {
            let id = ElementId(i);
            self.movement_tick(id, now);
            self.animation_tick(id, now);
        }
        now
    }

    // Animation surface.

    /// Register a step on an element without starting it. Returns the
    /// step's (possibly auto-assigned) name; explicitly named steps must
    /// not collide with one already registered on the element.
    pub fn add_animation(&mut self, id: ElementId, step: Step) -> CadenzaResult<String> {
        self.with_manager(id, |mgr, _| mgr.add(step))?
    }

    /// Build, register and start an animation sequence. Returns its name.
    #[tracing::instrument(skip(self, builder))]
    pub fn play(&mut self, builder: AnimationBuilder) -> CadenzaResult<String> {
        let id = builder.element();
        let when = self.clock.resolve(builder.start_at());
        let step = builder.build();
        self.with_manager(id, |mgr, scene| mgr.play_step(scene, step, when))?
    }

    /// Start idle animations on an element, all or just `name`.
    pub fn start_animations(
        &mut self,
        id: ElementId,
        name: Option<&str>,
        when: StartTime,
    ) -> CadenzaResult<()> {
        let when = self.clock.resolve(when);
        self.with_manager(id, |mgr, scene| mgr.start(scene, name, when))
    }

    /// Cancel animations on an element, all or just `name`, optionally
    /// forcing the complete/freeze policy.
    pub fn cancel_animations(
        &mut self,
        id: ElementId,
        name: Option<&str>,
        force: Option<OnCancel>,
    ) -> CadenzaResult<()> {
        self.with_manager(id, |mgr, scene| mgr.cancel(scene, name, force))
    }

    pub fn is_animating(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|e| e.animations.is_animating())
    }

    pub fn animations(&self, id: ElementId) -> Option<&AnimationManager> {
        self.element(id).map(|e| e.animations())
    }

    /// Run `f` with the element's manager detached from the scene, so the
    /// manager can hand `&mut Scene` to steps and their callbacks.
    fn with_manager<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut AnimationManager, &mut Scene) -> R,
    ) -> CadenzaResult<R> {
        self.require(id)?;
        let stand_in = self.elements[id.0].animations.stand_in();
        let mut mgr = std::mem::replace(&mut self.elements[id.0].animations, stand_in);
        let result = f(&mut mgr, self);
        let accrued = std::mem::replace(&mut self.elements[id.0].animations, mgr);
        self.elements[id.0].animations.absorb(accrued);
        Ok(result)
    }

    fn animation_tick(&mut self, id: ElementId, now: f64) {
        if self.elements[id.0].animations.steps().is_empty() {
            return;
        }
        let speed = self.time_speed;
        let stand_in = self.elements[id.0].animations.stand_in();
        let mut mgr = std::mem::replace(&mut self.elements[id.0].animations, stand_in);
        mgr.next_frame(self, now, speed);
        let accrued = std::mem::replace(&mut self.elements[id.0].animations, mgr);
        self.elements[id.0].animations.absorb(accrued);
    }

    // Scenarios.

    pub fn save_scenario(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
        preset: ScenarioPreset,
    ) -> CadenzaResult<()> {
        self.require_mut(id)?.save_scenario(name, preset);
        Ok(())
    }

    /// Save the element's current pose as a scenario.
    pub fn capture_scenario(&mut self, id: ElementId, name: impl Into<String>) -> CadenzaResult<()> {
        self.require_mut(id)?.capture_scenario(name);
        Ok(())
    }

    // User-driven movement.

    /// Take manual control of an element. In-flight animations and pulses
    /// freeze where they are.
    pub fn start_being_moved(&mut self, id: ElementId) -> CadenzaResult<()> {
        self.cancel_animations(id, None, Some(OnCancel::Freeze))?;
        let now = self.clock.now();
        let el = self.require_mut(id)?;
        el.movement.phase = MovePhase::BeingMoved;
        el.movement.previous_transform = el.transform().clone();
        el.movement.velocity = el.transform().zeroed();
        el.movement.last_time = Some(now);
        Ok(())
    }

    /// Apply a movement update and refresh the velocity estimate.
    pub fn moved(&mut self, id: ElementId, to: Transform) -> CadenzaResult<()> {
        // Raw clock time: drag updates land between frames, and flooring
        // them to the synchronized frame time would wreck the velocity
        // estimate.
        let now = self.clock.now();
        let el = self.require_mut(id)?;
        el.set_transform(to);
        let current = el.transform().clone();
        let dt = (now - el.movement.last_time.unwrap_or(now)).max(MIN_MOVE_DT);
        let velocity = current
            .checked_sub(&el.movement.previous_transform)
            .map(|d| d.scaled_by(1.0 / dt))
            .unwrap_or_else(|| current.zeroed());
        el.movement.velocity = el.move_options.clip_velocity(&velocity);
        el.movement.previous_transform = current;
        el.movement.last_time = Some(now);
        Ok(())
    }

    /// Release the element. If it still has meaningful velocity it coasts
    /// into free movement; a stale release (pointer paused before letting
    /// go) stops it dead.
    pub fn stop_being_moved(&mut self, id: ElementId) -> CadenzaResult<()> {
        let now = self.clock.now();
        let el = self.require_mut(id)?;
        let stale = el
            .movement
            .last_time
            .is_none_or(|t| now - t > STALE_MOVE_WINDOW);
        if stale {
            el.movement.velocity = el.movement.velocity.zeroed();
        }
        if el
            .movement
            .velocity
            .is_below(el.move_options.freely.zero_velocity_threshold)
        {
            el.movement.phase = MovePhase::Idle;
        } else {
            el.movement.phase = MovePhase::MovingFreely;
            el.movement.last_time = Some(now);
        }
        Ok(())
    }

    /// Put an element into free movement directly, optionally with an
    /// explicit initial velocity.
    pub fn start_moving_freely(
        &mut self,
        id: ElementId,
        velocity: Option<Transform>,
    ) -> CadenzaResult<()> {
        let now = self.clock.now();
        let el = self.require_mut(id)?;
        if let Some(v) = velocity {
            el.movement.velocity = el.move_options.clip_velocity(&v);
        }
        el.movement.phase = MovePhase::MovingFreely;
        el.movement.last_time = Some(now);
        Ok(())
    }

    pub fn move_phase(&self, id: ElementId) -> Option<MovePhase> {
        self.element(id).map(|e| e.movement.phase)
    }

    /// Where a free decay from the element's current velocity would come to
    /// rest, and how long it would take. Does not advance anything.
    pub fn free_movement_rest(&self, id: ElementId) -> Option<(Transform, f64)> {
        let el = self.element(id)?;
        let res = decay(el.transform(), &el.movement.velocity, &el.move_options, None);
        Some((res.transform, res.duration))
    }

    fn movement_tick(&mut self, id: ElementId, now: f64) {
        let el = &mut self.elements[id.0];
        if el.movement.phase != MovePhase::MovingFreely {
            return;
        }
        let last = el.movement.last_time.unwrap_or(now);
        let dt = ((now - last) * self.time_speed).max(0.0);
        let res = decay(el.transform(), &el.movement.velocity, &el.move_options, Some(dt));
        el.set_transform(res.transform);
        el.movement.velocity = res.velocity;
        el.movement.last_time = Some(now);
        if res.stopped {
            el.movement.phase = MovePhase::Idle;
            debug!(element = id.0, "free movement stopped");
            self.events.push(SceneEvent::MovementStopped(id));
        }
    }

    // Drawing.

    /// The element's draw transforms: the ancestor chain composed with its
    /// own transform, then one entry per pulse overlay (or a single entry
    /// when no pulse is active).
    pub fn draw_transforms(&self, id: ElementId) -> Vec<Affine> {
        let Some(el) = self.element(id) else {
            return Vec::new();
        };
        let chain = self.chain_affine(id);
        let overlays: Vec<Affine> = el
            .pulse_transforms()
            .map(|o| chain * o.to_affine())
            .collect();
        if overlays.is_empty() {
            vec![chain]
        } else {
            overlays
        }
    }

    fn chain_affine(&self, id: ElementId) -> Affine {
        let el = &self.elements[id.0];
        let own = el.transform().to_affine();
        match el.parent {
            Some(p) => self.chain_affine(p) * own,
            None => own,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
