//! Semantic model tests
//!
//! Tests for the lazily resolved model built from CSDL text:
//! - Type, container, term and operation lookup
//! - Inheritance, navigation and container targets
//! - Validation of complete documents

pub mod tests_lookup;
pub mod tests_scenarios;
pub mod tests_validation;
