//! Error records shared by every layer.
//!
//! Data-driven problems (unreadable input, unresolved references, structural
//! violations) are never raised; they are collected as [`EdmError`] values:
//! - Categorized [`ErrorCode`]s for filtering and tests
//! - The [`Location`](crate::base::Location) of the offending node
//! - Related locations (e.g. "previous declaration here")

mod codes;
mod error;

pub use codes::{ErrorCategory, ErrorCode};
pub use error::{DiagnosticCollector, EdmError, RelatedInfo};
