//! Core application modules
//!
//! This module contains configuration, constants, logging, document loading
//! and external command execution.

pub mod config;
pub mod constants;
pub mod loader;
pub mod logging;
pub mod runner;
