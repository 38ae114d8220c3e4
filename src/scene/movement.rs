use crate::foundation::math::decay_magnitude;
use crate::geometry::bounds::{BoundaryHits, TransformBounds};
use crate::geometry::transform::{Transform, TransformComponent};
use kurbo::Vec2;

/// Floor on the time delta used for drag velocity estimation, so two updates
/// in the same millisecond cannot produce an absurd velocity.
pub(crate) const MIN_MOVE_DT: f64 = 1e-4;

/// A release more than this long after the last drag update means the
/// pointer stopped before letting go, so the velocity is stale.
pub(crate) const STALE_MOVE_WINDOW: f64 = 0.05;

/// User-driven movement lifecycle of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MovePhase {
    #[default]
    Idle,
    /// Under direct user control; velocity is being estimated from updates.
    BeingMoved,
    /// Released and decelerating under the element's free-move options.
    MovingFreely,
}

/// Tuning for the free (post-release) phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FreeMoveOptions {
    /// Velocity magnitude lost per second, per component.
    pub deceleration: f64,
    /// Magnitude below which a component counts as stopped.
    pub zero_velocity_threshold: f64,
    /// Fraction of velocity lost on a boundary bounce; `None` kills the
    /// velocity on that axis instead of reflecting it.
    pub bounce_loss: Option<f64>,
}

impl Default for FreeMoveOptions {
    fn default() -> Self {
        Self {
            deceleration: 5.0,
            zero_velocity_threshold: 1e-4,
            bounce_loss: Some(0.5),
        }
    }
}

/// Per-element movement configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MoveOptions {
    pub bounds: TransformBounds,
    /// Cap on each velocity component's magnitude. Zero or negative means
    /// uncapped.
    pub max_velocity: f64,
    pub freely: FreeMoveOptions,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            bounds: TransformBounds::unbounded(),
            max_velocity: 5.0,
            freely: FreeMoveOptions::default(),
        }
    }
}

impl MoveOptions {
    pub(crate) fn clip_velocity(&self, v: &Transform) -> Transform {
        if self.max_velocity > 0.0 {
            v.clip_magnitudes(self.max_velocity)
        } else {
            v.clone()
        }
    }
}

/// Movement tracking state, owned by the element.
#[derive(Clone, Debug, Default)]
pub(crate) struct MovementState {
    pub(crate) phase: MovePhase,
    pub(crate) last_time: Option<f64>,
    pub(crate) previous_transform: Transform,
    pub(crate) velocity: Transform,
}

/// Outcome of advancing (or querying) a free-movement decay.
pub(crate) struct DecayResult {
    pub(crate) transform: Transform,
    pub(crate) velocity: Transform,
    /// Seconds until every component decays below the stop threshold.
    pub(crate) duration: f64,
    pub(crate) stopped: bool,
}

/// Advance a decelerating transform by `dt` seconds, or with `dt` of `None`
/// compute the rest position and total decay time without advancing.
///
/// Each component decays independently: its magnitude shrinks linearly by
/// `deceleration` per second (never crossing zero) while its direction is
/// preserved. Bounds clip the result; a clipped axis bounces with
/// `bounce_loss` applied, or stops dead when bouncing is disabled.
pub(crate) fn decay(
    transform: &Transform,
    velocity: &Transform,
    opts: &MoveOptions,
    dt: Option<f64>,
) -> DecayResult {
    let dec = opts.freely.deceleration.max(0.0);
    let threshold = opts.freely.zero_velocity_threshold.max(0.0);
    match dt {
        Some(dt) => decay_step(transform, velocity, opts, dec, threshold, dt),
        None => decay_rest(transform, velocity, opts, dec, threshold),
    }
}

fn decay_step(
    transform: &Transform,
    velocity: &Transform,
    opts: &MoveOptions,
    dec: f64,
    threshold: f64,
    dt: f64,
) -> DecayResult {
    let mut deltas = Vec::with_capacity(velocity.components().len());
    let mut decayed = Vec::with_capacity(velocity.components().len());
    for c in velocity.components() {
        let m = c.magnitude();
        if m < threshold || m == 0.0 {
            deltas.push(scale_component(*c, 0.0));
            decayed.push(scale_component(*c, 0.0));
            continue;
        }
        // Time until this component's magnitude reaches zero.
        let t_stop = if dec > 0.0 { m / dec } else { f64::INFINITY };
        let tc = dt.min(t_stop);
        let dist = m * tc - 0.5 * dec * tc * tc;
        let new_m = decay_magnitude(m, dec * dt);
        deltas.push(scale_component(*c, dist / m));
        decayed.push(scale_component(*c, new_m / m));
    }
    let delta = Transform::from_components(deltas);
    let mut velocity = Transform::from_components(decayed);
    let moved = transform
        .checked_add(&delta)
        .unwrap_or_else(|| transform.clone());
    let (clipped, hits) = opts.bounds.clip_with_hits(&moved);
    if hits.any() {
        velocity = reflect(&velocity, &hits, opts.freely.bounce_loss);
    }
    let stopped = velocity.is_below(threshold);
    if stopped {
        velocity = velocity.zeroed();
    }
    let duration = remaining_decay_time(&velocity, dec, threshold);
    DecayResult {
        transform: clipped,
        velocity,
        duration,
        stopped,
    }
}

fn decay_rest(
    transform: &Transform,
    velocity: &Transform,
    opts: &MoveOptions,
    dec: f64,
    threshold: f64,
) -> DecayResult {
    let mut deltas = Vec::with_capacity(velocity.components().len());
    for c in velocity.components() {
        let m = c.magnitude();
        if m <= threshold || dec <= 0.0 {
            deltas.push(scale_component(*c, 0.0));
            continue;
        }
        // Distance covered decelerating from m down to the stop threshold.
        let dist = (m * m - threshold * threshold) / (2.0 * dec);
        deltas.push(scale_component(*c, dist / m));
    }
    let delta = Transform::from_components(deltas);
    let moved = transform
        .checked_add(&delta)
        .unwrap_or_else(|| transform.clone());
    DecayResult {
        transform: opts.bounds.clip(&moved),
        velocity: velocity.zeroed(),
        duration: remaining_decay_time(velocity, dec, threshold),
        stopped: true,
    }
}

/// Seconds until the slowest component decays below `threshold`.
fn remaining_decay_time(velocity: &Transform, dec: f64, threshold: f64) -> f64 {
    velocity
        .components()
        .iter()
        .map(|c| {
            let m = c.magnitude();
            if m <= threshold {
                0.0
            } else if dec > 0.0 {
                (m - threshold) / dec
            } else {
                f64::INFINITY
            }
        })
        .fold(0.0, f64::max)
}

fn scale_component(c: TransformComponent, k: f64) -> TransformComponent {
    match c {
        TransformComponent::Translation(v) => TransformComponent::Translation(v * k),
        TransformComponent::Rotation(r) => TransformComponent::Rotation(r * k),
        TransformComponent::Scale(v) => TransformComponent::Scale(v * k),
    }
}

fn reflect(velocity: &Transform, hits: &BoundaryHits, bounce_loss: Option<f64>) -> Transform {
    let factor = match bounce_loss {
        Some(loss) => -(1.0 - loss.clamp(0.0, 1.0)),
        None => 0.0,
    };
    Transform::from_components(
        velocity
            .components()
            .iter()
            .map(|c| match c {
                TransformComponent::Translation(v) => {
                    let x = if hits.x.is_some() { v.x * factor } else { v.x };
                    let y = if hits.y.is_some() { v.y * factor } else { v.y };
                    TransformComponent::Translation(Vec2::new(x, y))
                }
                TransformComponent::Rotation(r) => TransformComponent::Rotation(
                    if hits.rotation.is_some() { r * factor } else { *r },
                ),
                TransformComponent::Scale(v) => TransformComponent::Scale(
                    if hits.scale.is_some() { *v * factor } else { *v },
                ),
            })
            .collect(),
    )
}
