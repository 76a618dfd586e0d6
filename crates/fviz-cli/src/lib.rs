//! CLI library components for fviz.

pub mod logging;
pub mod pipeline;
pub mod settings;
