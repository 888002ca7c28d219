//! Data types shared across the pipeline.

pub mod descriptor;
pub mod resolution;
pub mod search_text;
