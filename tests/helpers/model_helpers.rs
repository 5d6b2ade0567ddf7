//! Assertions and lookups over a read model.

use edm::hir::StructuredType;
use edm::{EdmError, ErrorCode, Model};

/// Read XML that must have no read errors.
pub fn model_from_xml(text: &str) -> Model {
    let (model, errors) = edm::try_parse(text);
    assert!(errors.is_empty(), "read errors: {:?}", errors);
    model.expect("model")
}

pub fn codes(errors: &[EdmError]) -> Vec<ErrorCode> {
    errors.iter().map(|e| e.code).collect()
}

/// Validation codes for a model.
pub fn validation_codes(model: &Model) -> Vec<ErrorCode> {
    codes(&edm::validate(model))
}

pub fn structured<'m>(model: &'m Model, full_name: &str) -> StructuredType<'m> {
    let id = model
        .find_type(full_name)
        .and_then(|r| r.declared())
        .unwrap_or_else(|| panic!("type '{}' not declared", full_name));
    model.element(id).as_structured().expect("structured type")
}
