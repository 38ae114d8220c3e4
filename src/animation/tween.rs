use crate::animation::step::StepCore;
use crate::scene::graph::{ElementId, Scene};

/// Strategy for one kind of element-bound interpolation.
///
/// A tween resolves its ambiguous specification at start time (never at
/// construction) because "current value" must be read from the live element
/// at the moment the step actually begins. Shape mismatches and missing
/// elements resolve to `None`, which the step treats as nothing-to-animate.
pub(crate) trait TweenKind {
    type Value: Clone + std::fmt::Debug;
    type Velocity: Clone + std::fmt::Debug;
    type Options: Clone + std::fmt::Debug + Default;

    /// Duration when neither an explicit duration nor a velocity is given.
    const DEFAULT_DURATION: f64 = 1.0;

    /// Current value on the element, if it exists.
    fn read(scene: &Scene, id: ElementId) -> Option<Self::Value>;

    /// Write a value back through the element's setter.
    fn write(scene: &mut Scene, id: ElementId, value: &Self::Value);

    /// Delta from `start` to `target` (directionality lives here).
    fn delta(start: &Self::Value, target: &Self::Value, opts: &Self::Options)
    -> Option<Self::Value>;

    /// `start + delta * p`; `p = 1` must reproduce the target exactly.
    fn lerp(
        start: &Self::Value,
        delta: &Self::Value,
        p: f64,
        opts: &Self::Options,
    ) -> Option<Self::Value>;

    /// Velocity-derived duration: max over independently-moving
    /// sub-components of `|delta| / velocity`.
    fn duration(delta: &Self::Value, velocity: &Self::Velocity) -> Option<f64>;
}

pub(crate) struct ResolvedTween<K: TweenKind> {
    pub(crate) start: K::Value,
    pub(crate) target: K::Value,
    pub(crate) delta: K::Value,
}

/// Generic element-bound interpolation step body.
pub(crate) struct Tween<K: TweenKind> {
    pub(crate) element: ElementId,
    pub(crate) start_spec: Option<K::Value>,
    pub(crate) target_spec: Option<K::Value>,
    pub(crate) delta_spec: Option<K::Value>,
    pub(crate) velocity: Option<K::Velocity>,
    pub(crate) options: K::Options,
    resolved: Option<ResolvedTween<K>>,
}

impl<K: TweenKind> Tween<K> {
    pub(crate) fn new(element: ElementId) -> Self {
        Self {
            element,
            start_spec: None,
            target_spec: None,
            delta_spec: None,
            velocity: None,
            options: K::Options::default(),
            resolved: None,
        }
    }

    /// Resolve start/target/delta against the live element and derive the
    /// step duration. Degrades to a zero-duration no-op on any gap.
    pub(crate) fn resolve(&mut self, core: &mut StepCore, scene: &mut Scene) {
        self.resolved = None;
        let start = match self.start_spec.clone().or_else(|| K::read(scene, self.element)) {
            Some(s) => s,
            None => {
                core.duration = Some(0.0);
                return;
            }
        };
        let pair = if let Some(target) = &self.target_spec {
            K::delta(&start, target, &self.options).map(|d| (target.clone(), d))
        } else if let Some(delta) = &self.delta_spec {
            K::lerp(&start, delta, 1.0, &self.options).map(|t| (t, delta.clone()))
        } else {
            None
        };
        let Some((target, delta)) = pair else {
            core.duration = Some(0.0);
            return;
        };
        if !core.duration_explicit {
            let derived = self
                .velocity
                .as_ref()
                .and_then(|v| K::duration(&delta, v))
                .unwrap_or(K::DEFAULT_DURATION);
            core.duration = Some(derived);
        }
        self.resolved = Some(ResolvedTween {
            start,
            target,
            delta,
        });
    }

    pub(crate) fn set_frame(&mut self, core: &StepCore, scene: &mut Scene, within: f64) {
        let Some(res) = &self.resolved else { return };
        let d = core.duration.unwrap_or(0.0);
        let p = if d > 0.0 {
            core.progression.apply(within / d)
        } else {
            1.0
        };
        if let Some(v) = K::lerp(&res.start, &res.delta, p, &self.options) {
            K::write(scene, self.element, &v);
        }
    }

    /// Write the exact target to avoid floating-point drift.
    pub(crate) fn set_to_end(&mut self, scene: &mut Scene) {
        if let Some(res) = &self.resolved {
            K::write(scene, self.element, &res.target);
        }
    }

    pub(crate) fn resolved_start(&self) -> Option<&K::Value> {
        self.resolved.as_ref().map(|r| &r.start)
    }

    pub(crate) fn resolved_target(&self) -> Option<&K::Value> {
        self.resolved.as_ref().map(|r| &r.target)
    }
}
