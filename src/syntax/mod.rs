//! CSDL syntax layer: the node stream readers produce, the literal AST, and
//! the builder between them.

pub mod ast;
pub mod builder;
pub mod node;

pub use ast::*;
pub use builder::{BuildResult, build_document};
pub use node::CsdlNode;

#[cfg(test)]
mod tests;
