//! Vocabulary annotations.
//!
//! Every annotation in the model, inline or out-of-line, is indexed once by a
//! normalized target key such as `NS.Customer/Name`. Terms and targets
//! resolve lazily.

use std::sync::Arc;

use smol_str::SmolStr;

use super::elements::{ElementBody, ElementData, SchemaElementKind, Term};
use super::ids::{AnnotationId, ElementId, ElementRef, NavigationSourceId, PropertyId};
use super::lazy::Memo;
use super::lookup::PlaceholderKind;
use super::model::Model;
use crate::base::constants::RETURN_TYPE_MEMBER;
use crate::base::{DocumentId, Location};
use crate::syntax::{CsdlAnnotation, CsdlAnnotations, CsdlExpression, CsdlPropertyItem};

pub(crate) struct AnnotationData {
    pub ast: Arc<CsdlAnnotation>,
    pub document: DocumentId,
    /// Normalized target key.
    pub target: Arc<str>,
    /// Qualifier of the enclosing `Annotations` block.
    pub block_qualifier: Option<SmolStr>,
    pub inline: bool,
    pub term: Memo<ElementRef>,
    pub resolved_target: Memo<Option<TargetRef>>,
}

impl AnnotationData {
    pub fn inline(document: DocumentId, target: Arc<str>, ast: &Arc<CsdlAnnotation>) -> Self {
        Self {
            ast: Arc::clone(ast),
            document,
            target,
            block_qualifier: None,
            inline: true,
            term: Memo::new(),
            resolved_target: Memo::new(),
        }
    }

    pub fn out_of_line(
        document: DocumentId,
        target: Arc<str>,
        block: &Arc<CsdlAnnotations>,
        ast: &Arc<CsdlAnnotation>,
    ) -> Self {
        Self {
            block_qualifier: block.qualifier.clone(),
            inline: false,
            ..Self::inline(document, target, ast)
        }
    }
}

/// What an annotation target key resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Schema(SmolStr),
    Element(ElementId),
    Property(PropertyId),
    EnumMember { owner: ElementId, index: usize },
    Parameter { operation: ElementId, index: usize },
    ReturnType(ElementId),
    NavigationSource(NavigationSourceId),
    OperationImport { container: ElementId, index: usize },
}

// ============================================================================
// TARGET KEYS
// ============================================================================

/// Normalize a written target to its index key.
///
/// Aliases expand to namespaces and operation signatures are dropped, so
/// `self.GetPrice(self.Product)/$ReturnType` keys as `NS.GetPrice/$ReturnType`.
pub(crate) fn normalize_target(model: &Model, document: DocumentId, raw: &str) -> Arc<str> {
    let mut unsigned = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.trim().chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => unsigned.push(c),
            _ => {}
        }
    }

    let (head, rest) = match unsigned.split_once('/') {
        Some((head, rest)) => (head, Some(rest)),
        None => (unsigned.as_str(), None),
    };
    let aliases = &model.document_data(document).aliases;
    let head = match aliases.get(head) {
        Some(namespace) => namespace.to_string(),
        None => model.qualify(document, head).into_owned(),
    };
    match rest {
        Some(rest) => format!("{}/{}", head, rest).into(),
        None => head.into(),
    }
}

/// Inline annotations of an element and its members, keyed by target.
pub(crate) fn inline_annotations(data: &ElementData) -> Vec<(Arc<str>, Arc<CsdlAnnotation>)> {
    let mut out = Vec::new();
    let full = &data.full_name;
    let mut push = |target: Arc<str>, annotations: &[Arc<CsdlAnnotation>]| {
        for annotation in annotations {
            out.push((Arc::clone(&target), Arc::clone(annotation)));
        }
    };
    let member = |name: &str| -> Arc<str> { format!("{}/{}", full, name).into() };

    match &data.body {
        ElementBody::Structured(s) => {
            push(Arc::clone(full), &s.ast.annotations);
            for item in &s.ast.properties {
                push(member(item.name()), item.annotations());
            }
        }
        ElementBody::Enum(e) => {
            push(Arc::clone(full), &e.ast.annotations);
            for m in &e.ast.members {
                push(member(&m.name), &m.annotations);
            }
        }
        ElementBody::TypeDefinition(t) => push(Arc::clone(full), &t.ast.annotations),
        ElementBody::Term(t) => push(Arc::clone(full), &t.ast.annotations),
        ElementBody::Operation(o) => {
            push(Arc::clone(full), &o.ast.annotations);
            for parameter in &o.ast.parameters {
                push(member(&parameter.name), &parameter.annotations);
            }
            if let Some(ret) = &o.ast.return_type {
                push(member(RETURN_TYPE_MEMBER), &ret.annotations);
            }
        }
        ElementBody::Container(c) => {
            push(Arc::clone(full), &c.ast.annotations);
            for source in c.ast.entity_sets.iter().chain(&c.ast.singletons) {
                push(member(&source.name), &source.annotations);
            }
            for import in &c.ast.operation_imports {
                push(member(&import.name), &import.annotations);
            }
        }
    }
    out
}

/// Names an annotation refers to: its term, nested terms and the types
/// named by casts, type tests and records.
pub(crate) fn annotation_references<'a>(
    annotation: &'a Arc<CsdlAnnotation>,
    out: &mut Vec<(PlaceholderKind, &'a str)>,
) {
    out.push((PlaceholderKind::Term, annotation.term.as_str()));
    if let Some(expression) = &annotation.expression {
        expression_references(expression, out);
    }
    for nested in &annotation.annotations {
        annotation_references(nested, out);
    }
}

fn expression_references<'a>(expression: &'a CsdlExpression, out: &mut Vec<(PlaceholderKind, &'a str)>) {
    match expression {
        CsdlExpression::Cast { type_name, operand, .. }
        | CsdlExpression::IsType { type_name, operand, .. } => {
            out.push((PlaceholderKind::Type, type_name.as_str()));
            expression_references(operand, out);
        }
        CsdlExpression::Record { type_name, properties } => {
            if let Some(type_name) = type_name {
                out.push((PlaceholderKind::Type, type_name.as_str()));
            }
            for value in properties {
                expression_references(&value.value, out);
            }
        }
        CsdlExpression::If { test, then, otherwise } => {
            expression_references(test, out);
            expression_references(then, out);
            if let Some(otherwise) = otherwise {
                expression_references(otherwise, out);
            }
        }
        CsdlExpression::Collection(items) | CsdlExpression::Apply { arguments: items, .. } => {
            for item in items {
                expression_references(item, out);
            }
        }
        CsdlExpression::LabeledElement { value, .. } => expression_references(value, out),
        CsdlExpression::Constant { .. }
        | CsdlExpression::Null
        | CsdlExpression::Path { .. }
        | CsdlExpression::LabeledElementReference(_) => {}
    }
}

/// Resolve a normalized target key.
pub(crate) fn resolve_target(model: &Model, key: &str) -> Option<TargetRef> {
    let (head, rest) = match key.split_once('/') {
        Some((head, rest)) => (head, Some(rest)),
        None => (key, None),
    };
    let candidates = model
        .lookup_table()
        .find_all(head, model.policy(), |_| true);

    let Some(rest) = rest else {
        if let Some(id) = candidates.first() {
            return Some(TargetRef::Element(*id));
        }
        return model
            .all_schemas()
            .into_iter()
            .find(|s| s.namespace() == head)
            .map(|s| TargetRef::Schema(s.namespace().into()));
    };

    // Overloads share a key; the first one declaring the member wins.
    candidates
        .into_iter()
        .find_map(|id| resolve_member(model, id, rest))
}

fn resolve_member(model: &Model, id: ElementId, rest: &str) -> Option<TargetRef> {
    let element = model.element(id);
    match element.kind() {
        SchemaElementKind::EntityType | SchemaElementKind::ComplexType => {
            let property = element.as_structured()?.resolve_property_path(rest)?;
            Some(TargetRef::Property(property.id()))
        }
        SchemaElementKind::EnumType => {
            let ast = element.as_enum()?.ast();
            let index = ast.members.iter().position(|m| m.name == rest)?;
            Some(TargetRef::EnumMember { owner: id, index })
        }
        SchemaElementKind::Action | SchemaElementKind::Function => {
            let ast = element.as_operation()?.ast();
            if rest == RETURN_TYPE_MEMBER {
                return ast.return_type.as_ref().map(|_| TargetRef::ReturnType(id));
            }
            let index = ast.parameters.iter().position(|p| p.name == rest)?;
            Some(TargetRef::Parameter { operation: id, index })
        }
        SchemaElementKind::EntityContainer => {
            let container = element.as_entity_container()?;
            if let Some(source) = container.navigation_sources().into_iter().find(|s| s.name() == rest) {
                return Some(TargetRef::NavigationSource(source.id()));
            }
            let index = container.ast().operation_imports.iter().position(|i| i.name == rest)?;
            Some(TargetRef::OperationImport { container: id, index })
        }
        SchemaElementKind::TypeDefinition | SchemaElementKind::Term => None,
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// An annotation applied to a model element.
#[derive(Clone, Copy)]
pub struct VocabularyAnnotation<'m> {
    model: &'m Model,
    id: AnnotationId,
}

impl<'m> VocabularyAnnotation<'m> {
    pub(crate) fn new(model: &'m Model, id: AnnotationId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m AnnotationData {
        self.model.annotation_data(self.id)
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn ast(&self) -> &'m CsdlAnnotation {
        &self.data().ast
    }

    /// Term name as written.
    pub fn term_name(&self) -> &'m str {
        &self.ast().term
    }

    /// The resolved term, or its placeholder.
    pub fn term(&self) -> ElementRef {
        let data = self.data();
        *data.term.get_or_compute(|| {
            self.model.resolve_in(
                data.document,
                &data.ast.term,
                PlaceholderKind::Term,
                |kind| kind == SchemaElementKind::Term,
            )
        })
    }

    pub fn term_definition(&self) -> Option<Term<'m>> {
        self.term().declared().map(|id| Term::new(self.model, id))
    }

    /// The annotation's own qualifier, else its block's.
    pub fn qualifier(&self) -> Option<&'m str> {
        let data = self.data();
        data.ast
            .qualifier
            .as_deref()
            .or(data.block_qualifier.as_deref())
    }

    pub fn expression(&self) -> Option<&'m CsdlExpression> {
        self.ast().expression.as_ref()
    }

    /// Annotations on this annotation.
    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        &self.ast().annotations
    }

    pub fn target_key(&self) -> &'m str {
        &self.data().target
    }

    /// What the target key names, if anything.
    pub fn target(&self) -> Option<TargetRef> {
        self.data()
            .resolved_target
            .get_or_compute(|| self.model.resolve_target(&self.data().target))
            .clone()
    }

    pub fn is_inline(&self) -> bool {
        self.data().inline
    }

    pub fn document(&self) -> DocumentId {
        self.data().document
    }

    pub fn location(&self) -> Location {
        self.ast().location
    }
}

impl PartialEq for VocabularyAnnotation<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id
    }
}

impl Eq for VocabularyAnnotation<'_> {}

impl std::fmt::Debug for VocabularyAnnotation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VocabularyAnnotation")
            .field("term", &self.term_name())
            .field("target", &self.target_key())
            .field("qualifier", &self.qualifier())
            .finish()
    }
}
