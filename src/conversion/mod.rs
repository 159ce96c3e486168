//! String conversions used to derive repository names
//!
//! This module turns the OpenAPI title into a package identifier and
//! substitutes it into the repository name templates.

pub mod case;
pub mod template;
