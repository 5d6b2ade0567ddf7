//! Reading and writing CSDL documents.
//!
//! Readers turn text into the [`CsdlNode`](crate::syntax::CsdlNode) tree the
//! builder consumes; the writer turns a resolved [`Model`] back into CSDL
//! through [`CsdlSink`] callbacks.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │  CSDL XML    │   │  CSDL JSON   │
//! └──────┬───────┘   └──────┬───────┘
//!        │ xml::read_nodes  │ json::read_nodes
//!        ▼                  ▼
//! ┌─────────────────────────────────┐
//! │ CsdlNode tree → build_document  │
//! └────────────────┬────────────────┘
//!                  ▼
//! ┌─────────────────────────────────┐      ┌──────────────┐
//! │ Model (lazy, validated on call) │ ───▶ │  CsdlSink    │
//! └─────────────────────────────────┘      └──────────────┘
//! ```
//!
//! Two entry styles share the engine:
//! - `try_parse*` returns whatever model could be built plus every read
//!   error, and [`validate`] reports semantic problems on demand
//! - `parse*` is all-or-nothing: any read error fails with a [`ParseError`]
//!
//! ## Usage
//!
//! ```ignore
//! use edm::interchange::{CsdlReader, XmlSink, try_write_edmx, validate};
//!
//! let model = CsdlReader::new().parse_xml(&std::fs::read_to_string("service.xml")?)?;
//! for error in validate(&model) {
//!     eprintln!("{error}");
//! }
//! try_write_edmx(&model, XmlSink::new(std::io::stdout()))?;
//! ```

mod error;
pub mod json;
pub mod writer;
pub mod xml;

use std::sync::Arc;

pub use error::{ParseError, ReadError, WriteError};
pub use writer::{CsdlSink, XmlSink, try_write_csdl, try_write_csdl_single, try_write_edmx};

pub use crate::hir::validate;

use crate::base::{DocumentId, Location};
use crate::errors::EdmError;
use crate::hir::{Model, ResolverPolicy};
use crate::syntax::{CsdlDocument, CsdlNode, build_document};

/// Input notation of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xml,
    Json,
}

impl Format {
    fn read_nodes(self, text: &str, document: DocumentId) -> Result<CsdlNode, ReadError> {
        match self {
            Format::Xml => xml::read_nodes(text, document),
            Format::Json => json::read_nodes(text, document),
        }
    }
}

/// Reads CSDL text into a [`Model`].
///
/// Configured once, then used for any number of documents. Referenced
/// documents are read alongside every main document: their schemas resolve
/// names but are never written back.
#[derive(Default)]
pub struct CsdlReader {
    policy: Option<Arc<dyn ResolverPolicy>>,
    references: Vec<(Format, String)>,
}

impl CsdlReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(self, policy: impl ResolverPolicy + 'static) -> Self {
        self.shared_policy(Arc::new(policy))
    }

    pub fn shared_policy(mut self, policy: Arc<dyn ResolverPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Add a referenced document in the given notation.
    pub fn reference(mut self, format: Format, text: impl Into<String>) -> Self {
        self.references.push((format, text.into()));
        self
    }

    pub fn reference_xml(self, text: impl Into<String>) -> Self {
        self.reference(Format::Xml, text)
    }

    pub fn reference_json(self, text: impl Into<String>) -> Self {
        self.reference(Format::Json, text)
    }

    /// Read strictly: any read error fails the whole parse.
    pub fn parse(&self, format: Format, text: &str) -> Result<Model, ParseError> {
        match self.try_parse(format, text) {
            (Some(model), errors) if errors.is_empty() => Ok(model),
            (_, errors) => Err(ParseError::new(errors)),
        }
    }

    /// Read partially: the model is `None` only when the main document could
    /// not be turned into a node tree.
    pub fn try_parse(&self, format: Format, text: &str) -> (Option<Model>, Vec<EdmError>) {
        let mut errors = Vec::new();
        let main = read_document(format, text, DocumentId::MAIN, &mut errors);

        // Readable references are numbered in order after the main document.
        // Unreadable ones never join the model; their ids follow the model's.
        let mut next = 1;
        let mut unread = Vec::new();
        let mut references: Vec<CsdlDocument> = Vec::with_capacity(self.references.len());
        for (format, text) in &self.references {
            match format.read_nodes(text, DocumentId::new(next)) {
                Ok(root) => {
                    references.push(build_recording(&root, &mut errors));
                    next += 1;
                }
                Err(e) => unread.push(e),
            }
        }
        for (offset, e) in unread.iter().enumerate() {
            let document = DocumentId::new(next + offset as u32);
            errors.push(e.to_edm_error(Location::new(document, Default::default())));
        }

        let Some(main) = main else {
            tracing::debug!(errors = errors.len(), "main document could not be read");
            return (None, errors);
        };

        let mut builder = Model::builder().document(main);
        if let Some(policy) = &self.policy {
            builder = builder.shared_policy(policy.clone());
        }
        for reference in references {
            builder = builder.reference(reference);
        }
        let model = builder.build();
        tracing::debug!(errors = errors.len(), "read CSDL model");
        (Some(model), errors)
    }

    pub fn parse_xml(&self, text: &str) -> Result<Model, ParseError> {
        self.parse(Format::Xml, text)
    }

    pub fn try_parse_xml(&self, text: &str) -> (Option<Model>, Vec<EdmError>) {
        self.try_parse(Format::Xml, text)
    }

    pub fn parse_json(&self, text: &str) -> Result<Model, ParseError> {
        self.parse(Format::Json, text)
    }

    pub fn try_parse_json(&self, text: &str) -> (Option<Model>, Vec<EdmError>) {
        self.try_parse(Format::Json, text)
    }
}

/// Read one document, recording its errors; `None` when no node tree exists.
fn read_document(
    format: Format,
    text: &str,
    document: DocumentId,
    errors: &mut Vec<EdmError>,
) -> Option<CsdlDocument> {
    match format.read_nodes(text, document) {
        Ok(root) => Some(build_recording(&root, errors)),
        Err(e) => {
            errors.push(e.to_edm_error(Location::new(document, Default::default())));
            None
        }
    }
}

fn build_recording(root: &CsdlNode, errors: &mut Vec<EdmError>) -> CsdlDocument {
    let result = build_document(root);
    errors.extend(result.errors);
    result.document
}

/// Strictly read a CSDL XML document with the default reader.
pub fn parse(text: &str) -> Result<Model, ParseError> {
    CsdlReader::new().parse_xml(text)
}

/// Partially read a CSDL XML document with the default reader.
pub fn try_parse(text: &str) -> (Option<Model>, Vec<EdmError>) {
    CsdlReader::new().try_parse_xml(text)
}
