pub mod element;
pub mod graph;
pub mod movement;
