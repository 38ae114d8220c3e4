//! Cadenza: frame-driven animation scheduling and hierarchical scene
//! transforms for interactive figures.
//!
//! A [`Scene`] holds a tree of elements, each with a typed [`Transform`],
//! color, opacity and visibility. Animations are declarative [`Step`]s
//! (tweens, pulses, triggers, composites) registered per element and driven
//! by a single [`Scene::next_frame`] tick; user-driven movement with
//! momentum and decay runs through the same tick.
//!
//! ```no_run
//! use cadenza::{AnimationBuilder, Scene, position, rotation};
//!
//! let mut scene = Scene::new();
//! let ball = scene.add_element("ball");
//! scene.play(
//!     AnimationBuilder::new(ball)
//!         .position(position().to(2.0, 1.0).velocity(0.5))
//!         .rotation(rotation().by(std::f64::consts::PI)),
//! )?;
//! loop {
//!     scene.next_frame();
//!     if !scene.is_animating(ball) {
//!         break;
//!     }
//! }
//! # Ok::<(), cadenza::CadenzaError>(())
//! ```

#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod geometry;
mod scene;
mod timing;

pub use animation::builder::AnimationBuilder;
pub use animation::composite::{parallel, serial};
pub use animation::ease::Progression;
pub use animation::manager::{AnimationManager, ManagerState};
pub use animation::step::{OnCancel, Step, StepDescriptor, StepState};
pub use animation::steps::{
    ColorOpts, OpacityOpts, PositionOpts, PulseOpts, PulseOptions, RotationOpts, ScaleOpts,
    ScenarioOpts, ScenarioVelocity, TransformOpts, color, custom, delay, dim, dissolve_in,
    dissolve_out, opacity, position, pulse, rotation, scale, scenario, transform, trigger, undim,
};
pub use foundation::error::{CadenzaError, CadenzaResult};
pub use geometry::bounds::{BoundaryHit, RangeLimit, TransformBounds};
pub use geometry::color::Color;
pub use geometry::path::{CurveDirection, CurveOptions, PathStyle, translation_path};
pub use geometry::transform::{
    ComponentKind, RotationDirection, Transform, TransformComponent, TransformTweenOptions,
    rotation_delta,
};
pub use scene::element::{ScenarioPreset, SceneElement};
pub use scene::graph::{ElementId, Scene, SceneEvent};
pub use scene::movement::{FreeMoveOptions, MoveOptions, MovePhase};
pub use timing::clock::{Clock, ManualTimeSource, StartTime, SystemTimeSource, TimeSource};

// Geometry primitives come straight from kurbo; re-exported so callers can
// build transforms without naming the dependency.
pub use kurbo::{Affine, Point, Rect, Vec2};
