//! CLI library components for the listing pipeline.

pub mod logging;
pub mod pipeline;
