pub mod bounds;
pub mod color;
pub mod path;
pub mod transform;
