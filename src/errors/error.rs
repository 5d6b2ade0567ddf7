//! Structured error records and their collector.

use std::sync::Arc;

use super::codes::{ErrorCategory, ErrorCode};
use crate::base::Location;

/// Related location information for an error
///
/// Used to point at a second declaration, e.g. "previous declaration here"
/// for a duplicate name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct RelatedInfo {
    pub message: Arc<str>,
    pub location: Location,
}

/// A data-driven problem found while reading, validating or writing a model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct EdmError {
    pub code: ErrorCode,
    /// Where the offending node was declared, when it has a source.
    pub location: Option<Location>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

impl EdmError {
    pub fn new(code: ErrorCode, location: Option<Location>, message: impl Into<Arc<str>>) -> Self {
        Self {
            code,
            location,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create an error carrying the code's default message
    pub fn from_code(code: ErrorCode, location: Option<Location>) -> Self {
        Self::new(code, location, code.default_message())
    }

    /// Add related information
    pub fn with_related(mut self, message: impl Into<Arc<str>>, location: Location) -> Self {
        self.related.push(RelatedInfo {
            message: message.into(),
            location,
        });
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl std::fmt::Display for EdmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}: {}", location, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Collects errors in the order they are found.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    errors: Vec<EdmError>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: EdmError) {
        tracing::trace!(code = %error.code, "{}", error.message);
        self.errors.push(error);
    }

    /// Add an error with a formatted message.
    pub fn report(&mut self, code: ErrorCode, location: Option<Location>, message: impl Into<Arc<str>>) {
        self.add(EdmError::new(code, location, message));
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = EdmError>) {
        for error in errors {
            self.add(error);
        }
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Count the errors with a given code.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.errors.iter().filter(|e| e.code == code).count()
    }

    /// Take all errors, leaving the collector empty.
    pub fn take(&mut self) -> Vec<EdmError> {
        std::mem::take(&mut self.errors)
    }

    pub fn into_errors(self) -> Vec<EdmError> {
        self.errors
    }
}
