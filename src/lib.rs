//! # edm-base
//!
//! Core library for reading CSDL documents into an Entity Data Model,
//! resolving and validating it, and writing it back out.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! interchange → CSDL XML/JSON readers, CSDL writer
//!   ↓
//! hir         → Lazy semantic model, lookup, validation
//!   ↓
//! syntax      → CsdlNode tree, literal CSDL AST, builder
//!   ↓
//! errors      → EdmError, ErrorCode
//!   ↓
//! base        → Primitives (DocumentId, Position, versions)
//! ```

// ============================================================================
// MODULES (dependency order: base → errors → syntax → hir → interchange)
// ============================================================================

/// Foundation types: DocumentId, Position, version tables
pub mod base;

/// Error records: EdmError, ErrorCode
pub mod errors;

/// Syntax: CsdlNode, the literal CSDL AST and its builder
pub mod syntax;

/// High-level IR: lazily resolved semantic model
pub mod hir;

/// Interchange formats: CSDL XML, CSDL JSON
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export foundation types
pub use base::{DocumentId, EdmVersion, EdmxVersion, LineIndex, Location, Position};
pub use errors::{EdmError, ErrorCode};
pub use hir::{Model, validate};

#[cfg(feature = "interchange")]
pub use interchange::{CsdlReader, parse, try_parse};
