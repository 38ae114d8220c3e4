//! Concrete step kinds and their option-struct constructors.
//!
//! Each kind follows the same shape: a free function returning an options
//! struct, fluent setters for what that kind can vary, and a `step(element)`
//! finisher producing a [`Step`](crate::animation::step::Step). Shared knobs
//! (name, delay, duration, easing, cancel policy) live on `Step` itself.

pub mod color;
pub mod custom;
pub mod delay;
pub mod opacity;
pub mod position;
pub mod pulse;
pub mod rotation;
pub mod scale;
pub mod scenario;
pub mod transform;
pub mod trigger;

pub use color::{ColorOpts, color, dim, undim};
pub use custom::custom;
pub use delay::delay;
pub use opacity::{OpacityOpts, dissolve_in, dissolve_out, opacity};
pub use position::{PositionOpts, position};
pub use pulse::{PulseOpts, PulseOptions, pulse};
pub use rotation::{RotationOpts, rotation};
pub use scale::{ScaleOpts, scale};
pub use scenario::{ScenarioOpts, ScenarioVelocity, scenario};
pub use transform::{TransformOpts, transform};
pub use trigger::trigger;
