//! Error types for reading and writing CSDL documents.

use thiserror::Error;

use crate::base::{Location, Position};
use crate::errors::{EdmError, ErrorCode};

/// The text could not be turned into a node tree at all.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Malformed XML.
    #[error("XML error at {position:?}: {message}")]
    Xml { message: String, position: Position },

    /// Malformed JSON, or JSON that is not shaped like a CSDL document.
    #[error("JSON error: {0}")]
    Json(String),

    /// The document is empty.
    #[error("document has no root element")]
    Empty,
}

impl ReadError {
    pub fn xml(message: impl Into<String>, position: Position) -> Self {
        Self::Xml {
            message: message.into(),
            position,
        }
    }

    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// The same problem as an [`EdmError`] in the given location's document.
    pub fn to_edm_error(&self, location: Location) -> EdmError {
        let (code, location) = match self {
            ReadError::Xml { position, .. } => (
                ErrorCode::XmlError,
                Location::new(location.document, *position),
            ),
            ReadError::Json(_) => (ErrorCode::JsonError, location),
            ReadError::Empty => (ErrorCode::NoSchemasProduced, location),
        };
        EdmError::new(code, Some(location), self.to_string())
    }
}

/// A strict parse failed; every problem found is carried, in order.
#[derive(Debug, Error)]
#[error("CSDL document could not be read ({} error(s)){}", .errors.len(), first_message(.errors))]
pub struct ParseError {
    pub errors: Vec<EdmError>,
}

impl ParseError {
    pub fn new(errors: Vec<EdmError>) -> Self {
        Self { errors }
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }
}

fn first_message(errors: &[EdmError]) -> String {
    errors
        .first()
        .map(|e| format!(": {}", e))
        .unwrap_or_default()
}

/// A sink failed while a model was being written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    /// The sink was driven out of order (e.g. an attribute after content).
    #[error("sink error: {0}")]
    Sink(String),
}

impl WriteError {
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink(message.into())
    }
}

impl From<WriteError> for EdmError {
    fn from(error: WriteError) -> Self {
        EdmError::new(ErrorCode::WriterError, None, error.to_string())
    }
}
