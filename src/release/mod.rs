//! Release orchestration
//!
//! This module ties configuration, document loading and the command runner
//! together into the per-SDK clone, generate, commit and tag pipeline.

pub mod pipeline;
