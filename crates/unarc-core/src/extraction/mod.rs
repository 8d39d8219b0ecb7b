//! Materialization of entries and the extraction loop.

pub mod engine;
pub mod materialize;

pub use engine::ExtractionEngine;
pub use materialize::Materializer;
