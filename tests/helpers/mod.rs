//! Shared helpers for the integration suite.

#![allow(dead_code)]

pub mod model_helpers;
pub mod source_fixtures;
