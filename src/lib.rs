//! Mprof Studio
//!
//! Decoding and analysis of binary memory-allocation profiles.
//!
//! A profile is a function table plus captured call stacks carrying
//! allocation and free counters. This crate decodes it, computes flat and
//! cumulative volume per function (raw allocated or net in-use), ranks the
//! hot spots and builds a weighted call graph in Graphviz DOT form.
//!
//! ## Getting Started
//!
//! ```bash
//! mprof report -i heap.mprof --text --svg callgraph.svg
//! ```

pub mod aggregator;
pub mod callgraph;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
