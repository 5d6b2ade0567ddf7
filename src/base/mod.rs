//! Foundation types for the EDM toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentId`] - Identifiers for loaded CSDL documents
//! - [`Position`], [`Location`] - Source positions for diagnostics
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`EdmVersion`], [`EdmxVersion`] - Fixed version and namespace tables
//! - Domain constants (the `Edm` namespace, CSDL element names)
//!
//! This module has NO dependencies on other edm modules.

pub mod constants;
mod document_id;
mod position;
mod version;

pub use document_id::DocumentId;
pub use position::{LineIndex, Location, Position};
pub use version::{EdmVersion, EdmxVersion};
