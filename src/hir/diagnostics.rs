//! Model validation.
//!
//! The validator is the single authoritative sweep over a model: it forces
//! every lazy fact, then walks documents (main first, then references),
//! schemas and elements in declaration order and reports every referential
//! and structural problem as an [`EdmError`].

use rustc_hash::FxHashSet;

use super::annotations::{VocabularyAnnotation, normalize_target};
use super::container::{EntityContainer, NavigationSource, OperationImport, declared_extends};
use super::elements::{
    EnumType, Operation, SchemaElement, SchemaElementKind, StructuredType, Term, TypeDefinition,
    declared_base,
};
use super::ids::{AnnotationId, ElementId, ElementRef};
use super::lookup::PlaceholderKind;
use super::model::{Model, Schema};
use super::properties::Property;
use super::type_resolver::{facet_problems, parse_bool};
use super::types::{PrimitiveKind, TypeReference, TypeReferenceKind};
use crate::base::{DocumentId, EdmVersion, Location};
use crate::errors::{DiagnosticCollector, EdmError, ErrorCode};
use crate::syntax::{CsdlAnnotation, CsdlFacets, NavigationSourceKind};

/// Validate a model and return every problem found.
pub fn validate(model: &Model) -> Vec<EdmError> {
    let mut validator = Validator::new(model);
    validator.validate_all();
    validator.finish()
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Walks a model and collects validation errors.
pub struct Validator<'m> {
    model: &'m Model,
    collector: DiagnosticCollector,
    /// Sorted member sets of cycles already reported.
    reported_cycles: FxHashSet<Vec<ElementId>>,
    checked_annotations: FxHashSet<AnnotationId>,
    /// `(target, term, qualifier)` of annotations seen so far.
    applied_terms: FxHashSet<(String, String, Option<String>)>,
}

impl<'m> Validator<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            collector: DiagnosticCollector::new(),
            reported_cycles: FxHashSet::default(),
            checked_annotations: FxHashSet::default(),
            applied_terms: FxHashSet::default(),
        }
    }

    /// Force the model, then check every schema of every document.
    pub fn validate_all(&mut self) {
        self.model.force_all();
        for schema in self.model.all_schemas() {
            self.check_schema(schema);
        }
        tracing::debug!(errors = self.collector.len(), "validated model");
    }

    pub fn finish(self) -> Vec<EdmError> {
        self.collector.into_errors()
    }

    fn report(&mut self, code: ErrorCode, location: Location, message: impl Into<std::sync::Arc<str>>) {
        self.collector.report(code, Some(location), message);
    }

    fn check_schema(&mut self, schema: Schema<'m>) {
        let document = schema.document();
        self.check_inline_annotations(schema.namespace(), document);
        for element in schema.elements() {
            self.check_element(element);
        }
        for (block, annotations) in schema.annotation_blocks() {
            let key = normalize_target(self.model, document, &block.target);
            if self.model.resolve_target(&key).is_none() {
                self.report(
                    ErrorCode::UnresolvedTarget,
                    block.location,
                    format!("annotation target '{}' does not exist", block.target),
                );
            }
            for annotation in annotations {
                self.check_annotation(annotation);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------------

    fn check_element(&mut self, element: SchemaElement<'m>) {
        self.check_duplicate_element(element);
        if let Some(ty) = element.as_structured() {
            self.check_structured(ty);
        } else if let Some(e) = element.as_enum() {
            self.check_enum(e);
        } else if let Some(t) = element.as_type_definition() {
            self.check_type_definition(t);
        } else if let Some(t) = element.as_term() {
            self.check_term(t);
        } else if let Some(op) = element.as_operation() {
            self.check_operation(op);
        } else if let Some(c) = element.as_entity_container() {
            self.check_container(c);
        }
        self.check_inline_annotations(element.full_name(), element.document());
    }

    /// Overloaded operations share a name; any other repeat is a duplicate.
    fn check_duplicate_element(&mut self, element: SchemaElement<'m>) {
        let declared = self.model.lookup_table().exact(element.full_name());
        let Some(&first) = declared.first() else {
            return;
        };
        if first == element.id() {
            return;
        }
        let first = self.model.element(first);
        if first.kind().is_operation() && element.kind().is_operation() {
            return;
        }
        self.collector.add(
            EdmError::new(
                ErrorCode::DuplicateName,
                Some(element.location()),
                format!("'{}' is declared more than once", element.full_name()),
            )
            .with_related("first declared here", first.location()),
        );
    }

    fn check_structured(&mut self, ty: StructuredType<'m>) {
        match ty.base_type() {
            Some(ElementRef::Unresolved(id)) => {
                let placeholder = self.model.placeholder(id);
                let declared = self.model.lookup_table().exact(&placeholder.full_name).first().copied();
                if placeholder.kind == PlaceholderKind::CyclicBaseType {
                    self.report_base_cycle(ty);
                } else if let Some(other) = declared {
                    let other = self.model.element(other);
                    self.report(
                        ErrorCode::UnresolvedType,
                        ty.element().location(),
                        format!(
                            "base type '{}' of '{}' is declared as {}, not as a structured type",
                            placeholder.full_name,
                            ty.full_name(),
                            other.kind().as_str()
                        ),
                    );
                } else {
                    self.report(
                        ErrorCode::UnresolvedType,
                        ty.element().location(),
                        format!(
                            "base type '{}' of '{}' is not declared",
                            placeholder.full_name,
                            ty.full_name()
                        ),
                    );
                }
            }
            Some(ElementRef::Declared(base)) => {
                if self.model.element(base).as_structured().map(|b| b.is_entity()) != Some(ty.is_entity()) {
                    self.report(
                        ErrorCode::UnresolvedType,
                        ty.element().location(),
                        format!(
                            "base type '{}' of '{}' is not a {}",
                            self.model.element(base).full_name(),
                            ty.full_name(),
                            if ty.is_entity() { "entity type" } else { "complex type" }
                        ),
                    );
                }
            }
            None => {}
        }

        let inherited: Vec<Property<'m>> = ty
            .base_chain()
            .into_iter()
            .skip(1)
            .flat_map(|t| t.declared_properties())
            .collect();
        let mut seen = FxHashSet::default();
        for property in ty.declared_properties() {
            if !seen.insert(property.name()) || inherited.iter().any(|p| p.name() == property.name()) {
                self.report(
                    ErrorCode::DuplicateName,
                    property.location(),
                    format!("property '{}' is declared more than once in '{}'", property.name(), ty.full_name()),
                );
            }
            if property.is_navigation() {
                self.check_navigation_property(property);
            } else {
                self.check_structural_property(property, ty.element().version());
            }
            self.check_inline_annotations(&property.target_key(), ty.element().document());
        }

        if ty.is_entity() {
            self.check_key(ty);
        }
    }

    fn report_base_cycle(&mut self, ty: StructuredType<'m>) {
        let model = self.model;
        let members = model.cycle_members(ty.id(), |id| declared_base(model, id));
        if !self.reported_cycles.insert(members.clone()) {
            return;
        }
        let names: Vec<&str> = members.iter().map(|id| model.element(*id).full_name()).collect();
        self.report(
            ErrorCode::CyclicBaseType,
            ty.element().location(),
            format!("base types form a cycle: {}", names.join(", ")),
        );
    }

    fn check_key(&mut self, ty: StructuredType<'m>) {
        if let Some(key) = &ty.ast().key {
            for property_ref in &key.property_refs {
                let Some(property) = ty.resolve_property_path(&property_ref.name) else {
                    self.report(
                        ErrorCode::InvalidKey,
                        property_ref.location,
                        format!("key property '{}' does not exist on '{}'", property_ref.name, ty.full_name()),
                    );
                    continue;
                };
                if let Some(problem) = key_property_problem(property) {
                    self.report(
                        ErrorCode::InvalidKey,
                        property_ref.location,
                        format!("key property '{}' {}", property_ref.name, problem),
                    );
                }
            }
            return;
        }

        // An unresolved or cyclic base may have carried the key.
        let chain_is_sound = ty
            .base_chain()
            .last()
            .is_some_and(|root| root.base_type().is_none());
        if ty.key().is_none() && !ty.is_abstract() && chain_is_sound {
            self.report(
                ErrorCode::MissingKeyOnEntityType,
                ty.element().location(),
                format!("entity type '{}' has no key", ty.full_name()),
            );
        }
    }

    fn check_structural_property(&mut self, property: Property<'m>, version: EdmVersion) {
        let Some(ast) = property.structural() else {
            return;
        };
        let type_ref = property.type_ref();
        self.check_type_reference(type_ref, &ast.facets, version, ast.location, property.name());
        if let Some(value) = &ast.default_value {
            self.check_default_value(type_ref, value, version, ast.location, property.name());
        }
    }

    fn check_navigation_property(&mut self, property: Property<'m>) {
        let Some(nav) = property.as_navigation() else {
            return;
        };
        let location = nav.location();
        let type_ref = nav.type_ref();
        if let Some(id) = type_ref.element_type().unresolved() {
            self.report(
                ErrorCode::UnresolvedType,
                location,
                format!("type '{}' of navigation property '{}' is not declared", self.model.placeholder(id).full_name, nav.name()),
            );
            return;
        }
        if nav.target_type().is_none() {
            self.report(
                ErrorCode::InvalidNavigationPropertyType,
                location,
                format!(
                    "navigation property '{}' has type '{}', which is not an entity type",
                    nav.name(),
                    self.model.type_name(type_ref)
                ),
            );
            return;
        }
        if let Some(raw) = &nav.ast().nullable
            && parse_bool(raw).is_none()
        {
            self.report(
                ErrorCode::InvalidFacetValue,
                location,
                format!("'{}' is not a valid Nullable value", raw),
            );
        }

        if let Some(partner_name) = nav.partner_name() {
            match nav.partner() {
                None => self.report(
                    ErrorCode::UnresolvedNavigationPartner,
                    location,
                    format!("partner '{}' of navigation property '{}' does not exist", partner_name, nav.name()),
                ),
                Some(partner) => {
                    let points_back = match partner.partner() {
                        Some(back) => back == nav,
                        None => partner.partner_name().is_none(),
                    };
                    let types_agree = partner
                        .target_type()
                        .is_some_and(|t| nav.owner().is_or_inherits_from(t.id()));
                    if !points_back || !types_agree {
                        self.report(
                            ErrorCode::InconsistentNavigationPartner,
                            location,
                            format!(
                                "navigation property '{}' and its partner '{}' do not point at each other",
                                nav.name(),
                                partner_name
                            ),
                        );
                    }
                }
            }
        }

        let constraints = nav.referential_constraints();
        for (constraint, (dependent, principal)) in constraints.iter().zip(nav.resolved_constraints()) {
            let problem = match (dependent, principal) {
                (None, _) => Some(format!("dependent property '{}' does not exist", constraint.property)),
                (_, None) => Some(format!(
                    "principal property '{}' does not exist",
                    constraint.referenced_property
                )),
                (Some(d), Some(p)) if d.type_ref().primitive_kind() != p.type_ref().primitive_kind() => {
                    Some(format!(
                        "'{}' and '{}' have different types",
                        constraint.property, constraint.referenced_property
                    ))
                }
                _ => None,
            };
            if let Some(problem) = problem {
                self.report(ErrorCode::InvalidReferentialConstraint, constraint.location, problem);
            }
        }
    }

    fn check_enum(&mut self, e: EnumType<'m>) {
        let element = e.element();
        match e.underlying_type() {
            Some(kind) if kind.is_integral() => {}
            _ => self.report(
                ErrorCode::InvalidEnumUnderlyingType,
                element.location(),
                format!(
                    "underlying type '{}' of enum '{}' is not an integral type",
                    e.ast().underlying_type.as_deref().unwrap_or_default(),
                    element.full_name()
                ),
            ),
        }

        let mut seen = FxHashSet::default();
        for member in e.members() {
            if !seen.insert(member.name()) {
                self.report(
                    ErrorCode::DuplicateName,
                    member.location(),
                    format!("member '{}' is declared more than once in '{}'", member.name(), element.full_name()),
                );
            }
            if let Some(raw) = member.declared_value() {
                let in_range = e
                    .underlying_type()
                    .is_none_or(|kind| integral_in_range(kind, member.value()));
                if !member.has_valid_value() || !in_range {
                    self.report(
                        ErrorCode::InvalidAttributeValue,
                        member.location(),
                        format!("value '{}' of member '{}' is not valid for the underlying type", raw, member.name()),
                    );
                }
            }
            let key = format!("{}/{}", element.full_name(), member.name());
            self.check_inline_annotations(&key, element.document());
        }
    }

    fn check_type_definition(&mut self, t: TypeDefinition<'m>) {
        let element = t.element();
        if !element.version().supports_type_definitions() {
            self.report(
                ErrorCode::FeatureNotSupportedInVersion,
                element.location(),
                format!("type definitions require CSDL 4.0, '{}' is declared in {}", element.full_name(), element.version()),
            );
        }
        let Some(kind) = t.underlying_kind() else {
            self.report(
                ErrorCode::UnresolvedType,
                element.location(),
                format!("underlying type '{}' of '{}' is not a primitive type", t.ast().underlying_type, element.full_name()),
            );
            return;
        };
        for problem in facet_problems(Some(kind.facet_class()), &t.ast().facets) {
            self.report(problem.code, element.location(), problem.message);
        }
    }

    fn check_term(&mut self, t: Term<'m>) {
        let element = t.element();
        let ast = t.ast();
        self.check_type_reference(t.type_ref(), &ast.facets, element.version(), ast.location, t.name());
        if let Some(value) = &ast.default_value {
            self.check_default_value(t.type_ref(), value, element.version(), ast.location, t.name());
        }
        if let Some(ElementRef::Unresolved(id)) = t.base_term() {
            self.report(
                ErrorCode::UnresolvedTerm,
                ast.location,
                format!("base term '{}' of '{}' is not declared", self.model.placeholder(id).full_name, t.full_name()),
            );
        }
    }

    fn check_operation(&mut self, op: Operation<'m>) {
        let element = op.element();
        let version = element.version();
        let mut seen = FxHashSet::default();
        for (ast, parameter) in op.ast().parameters.iter().zip(op.parameters()) {
            if !seen.insert(parameter.name()) {
                self.report(
                    ErrorCode::DuplicateName,
                    parameter.location(),
                    format!("parameter '{}' is declared more than once in '{}'", parameter.name(), op.full_name()),
                );
            }
            self.check_type_reference(parameter.type_ref(), &ast.facets, version, parameter.location(), parameter.name());
            let key = format!("{}/{}", op.full_name(), parameter.name());
            self.check_inline_annotations(&key, element.document());
        }
        if op.is_bound() && op.parameters().is_empty() {
            self.report(
                ErrorCode::InvalidAttributeValue,
                element.location(),
                format!("bound operation '{}' has no binding parameter", op.full_name()),
            );
        }
        if let (Some(ret), Some(ast)) = (op.return_type(), &op.ast().return_type) {
            self.check_type_reference(ret, &ast.facets, version, ast.location, "$ReturnType");
            let key = format!("{}/{}", op.full_name(), crate::base::constants::RETURN_TYPE_MEMBER);
            self.check_inline_annotations(&key, element.document());
        }
    }

    fn check_container(&mut self, c: EntityContainer<'m>) {
        let element = c.element();
        let version = element.version();
        match c.extends() {
            Some(ElementRef::Unresolved(id)) => {
                let placeholder = self.model.placeholder(id);
                if placeholder.kind == PlaceholderKind::CyclicEntityContainer {
                    let model = self.model;
                    let members = model.cycle_members(c.id(), |id| declared_extends(model, id));
                    if self.reported_cycles.insert(members.clone()) {
                        let names: Vec<&str> = members.iter().map(|id| model.element(*id).full_name()).collect();
                        self.report(
                            ErrorCode::CyclicEntityContainerExtends,
                            element.location(),
                            format!("entity containers extend each other: {}", names.join(", ")),
                        );
                    }
                } else {
                    self.report(
                        ErrorCode::UnresolvedEntityContainer,
                        element.location(),
                        format!("container '{}' extended by '{}' is not declared", placeholder.full_name, c.full_name()),
                    );
                }
            }
            Some(ElementRef::Declared(_)) | None => {}
        }

        let mut seen = FxHashSet::default();
        for source in c.navigation_sources() {
            if !seen.insert(source.name()) {
                self.report(
                    ErrorCode::DuplicateName,
                    source.location(),
                    format!("'{}' is declared more than once in '{}'", source.name(), c.full_name()),
                );
            }
            self.check_navigation_source(source, version);
        }
        for import in c.operation_imports() {
            if !seen.insert(import.name()) {
                self.report(
                    ErrorCode::DuplicateName,
                    import.location(),
                    format!("'{}' is declared more than once in '{}'", import.name(), c.full_name()),
                );
            }
            self.check_operation_import(import);
        }
    }

    fn check_navigation_source(&mut self, source: NavigationSource<'m>, version: EdmVersion) {
        let location = source.location();
        if source.kind() == NavigationSourceKind::Singleton && !version.supports_singletons() {
            self.report(
                ErrorCode::FeatureNotSupportedInVersion,
                location,
                format!("singleton '{}' requires CSDL 4.0", source.name()),
            );
        }
        match &source.type_ref().kind {
            TypeReferenceKind::Unresolved(id) => {
                self.report(
                    ErrorCode::UnresolvedType,
                    location,
                    format!("entity type '{}' of '{}' is not declared", self.model.placeholder(*id).full_name, source.name()),
                );
                return;
            }
            TypeReferenceKind::Entity(_) => {}
            _ => {
                self.report(
                    ErrorCode::UnresolvedType,
                    location,
                    format!("type '{}' of '{}' is not an entity type", source.ast().type_name, source.name()),
                );
                return;
            }
        }

        for binding in source.bindings() {
            if binding.navigation.is_none() {
                self.report(
                    ErrorCode::UnresolvedNavigationPropertyPath,
                    binding.location,
                    format!("binding path '{}' of '{}' names no navigation property", binding.path, source.name()),
                );
            }
            if binding.target.is_none() {
                self.report(
                    ErrorCode::UnresolvedNavigationTarget,
                    binding.location,
                    format!("binding target '{}' of '{}' does not exist", binding.target_name, source.name()),
                );
            }
        }
        let document = source.container().element().document();
        self.check_inline_annotations(&source.target_key(), document);
    }

    fn check_operation_import(&mut self, import: OperationImport<'m>) {
        let location = import.location();
        if !import.is_resolved() {
            self.report(
                ErrorCode::UnresolvedOperation,
                location,
                format!("'{}' imports undeclared operation '{}'", import.name(), import.operation_name()),
            );
        }
        if let Some(name) = import.entity_set_name()
            && import.entity_set().is_none()
        {
            self.report(
                ErrorCode::UnresolvedNavigationTarget,
                location,
                format!("entity set '{}' of '{}' does not exist", name, import.name()),
            );
        }
        let document = import.container().element().document();
        self.check_inline_annotations(&import.target_key(), document);
    }

    // ------------------------------------------------------------------------
    // Types and values
    // ------------------------------------------------------------------------

    fn check_type_reference(
        &mut self,
        type_ref: &TypeReference,
        facets: &CsdlFacets,
        version: EdmVersion,
        location: Location,
        owner: &str,
    ) {
        let element = type_ref.element_type();
        let class = match &element.kind {
            TypeReferenceKind::Unresolved(id) => {
                self.report(
                    ErrorCode::UnresolvedType,
                    location,
                    format!("type '{}' of '{}' is not declared", self.model.placeholder(*id).full_name, owner),
                );
                return;
            }
            TypeReferenceKind::Primitive(p) => {
                if !p.kind.is_available_in(version) {
                    self.report(
                        ErrorCode::FeatureNotSupportedInVersion,
                        location,
                        format!("{} on '{}' is not available in CSDL {}", p.kind.full_name(), owner, version),
                    );
                }
                Some(p.kind.facet_class())
            }
            TypeReferenceKind::TypeDefinition { id, .. } => self
                .model
                .element(*id)
                .as_type_definition()
                .and_then(|t| t.underlying_kind())
                .map(PrimitiveKind::facet_class),
            TypeReferenceKind::Untyped => {
                if !version.supports_untyped() {
                    self.report(
                        ErrorCode::FeatureNotSupportedInVersion,
                        location,
                        format!("Edm.Untyped on '{}' requires CSDL 4.01", owner),
                    );
                }
                None
            }
            _ => None,
        };
        for problem in facet_problems(class, facets) {
            self.report(problem.code, location, problem.message);
        }
    }

    fn check_default_value(
        &mut self,
        type_ref: &TypeReference,
        value: &str,
        version: EdmVersion,
        location: Location,
        owner: &str,
    ) {
        let valid = match &type_ref.kind {
            TypeReferenceKind::Primitive(p) => literal_matches(p.kind, value),
            TypeReferenceKind::TypeDefinition { id, .. } => self
                .model
                .element(*id)
                .as_type_definition()
                .and_then(|t| t.underlying_kind())
                .is_none_or(|kind| literal_matches(kind, value)),
            TypeReferenceKind::Enum(id) => match self.model.element(*id).as_enum() {
                Some(e) => value
                    .split(',')
                    .map(str::trim)
                    .all(|m| e.find_member(m).is_some() || m.parse::<i64>().is_ok()),
                None => true,
            },
            _ => true,
        };
        if !valid && !version.lenient_primitive_values() {
            self.report(
                ErrorCode::InvalidDefaultValue,
                location,
                format!(
                    "default value '{}' of '{}' is not a valid {}",
                    value,
                    owner,
                    self.model.type_name(type_ref)
                ),
            );
        }
    }

    // ------------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------------

    fn check_inline_annotations(&mut self, target: &str, document: DocumentId) {
        let ids: Vec<AnnotationId> = self.model.annotations_for(target).to_vec();
        for id in ids {
            let annotation = VocabularyAnnotation::new(self.model, id);
            if annotation.is_inline() && annotation.document() == document {
                self.check_annotation(annotation);
            }
        }
    }

    fn check_annotation(&mut self, annotation: VocabularyAnnotation<'m>) {
        if !self.checked_annotations.insert(annotation.id()) {
            return;
        }
        if let ElementRef::Unresolved(id) = annotation.term() {
            self.report(
                ErrorCode::UnresolvedTerm,
                annotation.location(),
                format!("term '{}' is not declared", self.model.placeholder(id).full_name),
            );
        }
        if annotation.target().is_some() {
            let applied = (
                annotation.target_key().to_string(),
                self.model.element_ref_name(annotation.term()).to_string(),
                annotation.qualifier().map(str::to_string),
            );
            if !self.applied_terms.insert(applied) {
                self.report(
                    ErrorCode::DuplicateName,
                    annotation.location(),
                    format!(
                        "term '{}' is applied more than once to '{}'",
                        annotation.term_name(),
                        annotation.target_key()
                    ),
                );
            }
        }
        let document = annotation.document();
        for nested in annotation.annotations() {
            self.check_nested_annotation(nested, document);
        }
    }

    fn check_nested_annotation(&mut self, annotation: &CsdlAnnotation, document: DocumentId) {
        let found = self
            .model
            .lookup_in(document, &annotation.term, |kind| kind == SchemaElementKind::Term);
        if found.is_none() {
            self.report(
                ErrorCode::UnresolvedTerm,
                annotation.location,
                format!("term '{}' is not declared", annotation.term),
            );
        }
        for nested in &annotation.annotations {
            self.check_nested_annotation(nested, document);
        }
    }
}

/// Why a resolved key property is not a valid key, if it is not.
fn key_property_problem(property: Property<'_>) -> Option<&'static str> {
    if property.is_navigation() {
        return Some("is a navigation property");
    }
    let type_ref = property.type_ref();
    if type_ref.is_collection() {
        return Some("is a collection");
    }
    if type_ref.nullable {
        return Some("is nullable");
    }
    match &type_ref.kind {
        TypeReferenceKind::Primitive(_)
        | TypeReferenceKind::Enum(_)
        | TypeReferenceKind::TypeDefinition { .. }
        | TypeReferenceKind::Unresolved(_) => None,
        _ => Some("is not of a primitive or enum type"),
    }
}

// ============================================================================
// LITERALS
// ============================================================================

/// Whether `raw` is a lexically valid value of a primitive kind.
pub(crate) fn literal_matches(kind: PrimitiveKind, raw: &str) -> bool {
    let raw = raw.trim();
    match kind {
        PrimitiveKind::Boolean => parse_bool(raw).is_some(),
        PrimitiveKind::Byte => raw.parse::<u8>().is_ok(),
        PrimitiveKind::SByte => raw.parse::<i8>().is_ok(),
        PrimitiveKind::Int16 => raw.parse::<i16>().is_ok(),
        PrimitiveKind::Int32 => raw.parse::<i32>().is_ok(),
        PrimitiveKind::Int64 => raw.parse::<i64>().is_ok(),
        PrimitiveKind::Decimal => is_decimal(raw),
        PrimitiveKind::Single | PrimitiveKind::Double => {
            matches!(raw, "INF" | "-INF" | "NaN") || raw.parse::<f64>().is_ok()
        }
        PrimitiveKind::Guid => is_guid(raw),
        PrimitiveKind::Date => is_date(raw),
        PrimitiveKind::DateTimeOffset | PrimitiveKind::DateTime => raw
            .split_once('T')
            .is_some_and(|(date, time)| is_date(date) && time.len() >= 5),
        PrimitiveKind::TimeOfDay => is_time_of_day(raw),
        PrimitiveKind::Duration => raw.trim_start_matches('-').starts_with('P'),
        _ => true,
    }
}

fn is_decimal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn is_guid(raw: &str) -> bool {
    let groups: Vec<&str> = raw.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_date(raw: &str) -> bool {
    let raw = raw.strip_prefix('-').unwrap_or(raw);
    let parts: Vec<&str> = raw.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    year.len() >= 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m))
        && day.parse::<u8>().is_ok_and(|d| (1..=31).contains(&d))
}

fn is_time_of_day(raw: &str) -> bool {
    let mut parts = raw.splitn(3, ':');
    let hour = parts.next().and_then(|h| h.parse::<u8>().ok());
    let minute = parts.next().and_then(|m| m.parse::<u8>().ok());
    let second = match parts.next() {
        None => Some(0.0),
        Some(s) => s.parse::<f64>().ok(),
    };
    matches!((hour, minute, second), (Some(h), Some(m), Some(s)) if h < 24 && m < 60 && s < 60.0)
}

fn integral_in_range(kind: PrimitiveKind, value: i64) -> bool {
    match kind {
        PrimitiveKind::Byte => u8::try_from(value).is_ok(),
        PrimitiveKind::SByte => i8::try_from(value).is_ok(),
        PrimitiveKind::Int16 => i16::try_from(value).is_ok(),
        PrimitiveKind::Int32 => i32::try_from(value).is_ok(),
        _ => true,
    }
}
