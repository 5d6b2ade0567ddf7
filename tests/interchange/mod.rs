//! Interchange tests
//!
//! Reading CSDL XML and JSON, and writing models back out.

pub mod tests_json;
pub mod tests_versions;
pub mod tests_writer;
