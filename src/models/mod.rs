//! Input document models
//!
//! This module contains the data structures read from the OpenAPI
//! specification and the SDK definitions document.

pub mod api_spec;
pub mod definitions;
