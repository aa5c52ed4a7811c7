//! # Dispatch
//!
//! State dispatch and the render pipeline, fronted by [`CellEngine`].

pub mod engine;
pub mod pipeline;
pub mod trace;

pub use engine::{CellEngine, EngineStats};
pub use pipeline::{PipelineStats, RenderPipeline};
pub use trace::{DispatchPath, DispatchRecord, RenderTarget, RenderTrace, RenderWarning};
