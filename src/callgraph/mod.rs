//! Weighted call graph generation.
//!
//! This module converts a decoded profile into a caller -> callee graph,
//! serialises it as Graphviz DOT and hands it to an external layout program.

pub mod builder;
pub mod render;

// Re-export main types
pub use builder::{build_graph, build_graph_from, GraphDescription, GraphEdge, GraphNode};
pub use render::{GraphRenderer, GraphvizRenderer, ImageFormat};
