//! Entities, write payloads and the loaded relationship graph.

mod entity;
mod graph;

pub use entity::*;
pub use graph::Graph;
