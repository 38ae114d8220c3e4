pub mod builder;
pub mod composite;
pub mod ease;
pub mod manager;
pub mod step;
pub mod steps;
pub(crate) mod tween;
