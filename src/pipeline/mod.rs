// Company classification pipeline: processing stages, orchestration and fallback

pub mod fallback;
pub mod orchestrator;
pub mod processing;

pub use orchestrator::{CatPipeline, PipelineReport};
