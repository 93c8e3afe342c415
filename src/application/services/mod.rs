//! # Application Services
//!
//! Concurrency primitives the use cases are built on.
//!
//! This module provides:
//! - [`RaceResolver`]: first-success-wins fan-out under a shared deadline
//! - [`BoundedPipeline`]: fetch then persist under independent deadlines

pub mod bounded_pipeline;
pub mod race_resolver;

pub use bounded_pipeline::{
    BoundedPipeline, PipelineConfig, PipelineError, PipelineStage, StageFailure,
};
pub use race_resolver::{
    resolve, resolve_with_cancellation, NoAnswerReason, ProviderFailure, RaceConfig, RaceError,
    RaceResolver, RaceResult, RaceWinner,
};
