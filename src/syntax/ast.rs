//! CSDL syntax tree.
//!
//! Plain data mirroring the constructs of a CSDL document. Type names and
//! facets are kept exactly as written; nothing here is resolved or checked.
//! Nodes that the semantic layer wraps one-to-one are held in `Arc` so the
//! model can share them without copying.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{EdmVersion, EdmxVersion, Location};

// ============================================================================
// DOCUMENT
// ============================================================================

/// A single CSDL document: one EDMX envelope, or a bare `Schema`.
#[derive(Debug, Clone, Default)]
pub struct CsdlDocument {
    /// Envelope version, `None` for bare schemas or an unknown envelope.
    pub edmx_version: Option<EdmxVersion>,
    /// The `Version` attribute of the envelope as written.
    pub edmx_version_literal: Option<String>,
    /// CSDL version taken from the schema namespace (or the envelope).
    pub edm_version: Option<EdmVersion>,
    pub references: Vec<CsdlReference>,
    pub schemas: Vec<Arc<CsdlSchema>>,
    pub location: Location,
}

/// An `edmx:Reference` to another document.
#[derive(Debug, Clone, Default)]
pub struct CsdlReference {
    pub uri: String,
    pub includes: Vec<CsdlInclude>,
    pub include_annotations: Vec<CsdlIncludeAnnotations>,
    pub location: Location,
}

/// An `edmx:Include` of a referenced namespace, optionally aliased.
#[derive(Debug, Clone, Default)]
pub struct CsdlInclude {
    pub namespace: SmolStr,
    pub alias: Option<SmolStr>,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlIncludeAnnotations {
    pub term_namespace: SmolStr,
    pub qualifier: Option<SmolStr>,
    pub target_namespace: Option<SmolStr>,
}

// ============================================================================
// SCHEMA
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CsdlSchema {
    pub namespace: SmolStr,
    pub alias: Option<SmolStr>,
    /// Elements in declaration order.
    pub elements: Vec<CsdlSchemaElement>,
    /// Out-of-line `Annotations` blocks.
    pub out_of_line_annotations: Vec<Arc<CsdlAnnotations>>,
    /// Annotations applied to the schema itself.
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

/// A top-level schema element.
#[derive(Debug, Clone)]
pub enum CsdlSchemaElement {
    EntityType(Arc<CsdlStructuredType>),
    ComplexType(Arc<CsdlStructuredType>),
    EnumType(Arc<CsdlEnumType>),
    TypeDefinition(Arc<CsdlTypeDefinition>),
    Term(Arc<CsdlTerm>),
    Action(Arc<CsdlOperation>),
    Function(Arc<CsdlOperation>),
    EntityContainer(Arc<CsdlEntityContainer>),
}

impl CsdlSchemaElement {
    pub fn name(&self) -> &SmolStr {
        match self {
            CsdlSchemaElement::EntityType(t) | CsdlSchemaElement::ComplexType(t) => &t.name,
            CsdlSchemaElement::EnumType(t) => &t.name,
            CsdlSchemaElement::TypeDefinition(t) => &t.name,
            CsdlSchemaElement::Term(t) => &t.name,
            CsdlSchemaElement::Action(o) | CsdlSchemaElement::Function(o) => &o.name,
            CsdlSchemaElement::EntityContainer(c) => &c.name,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            CsdlSchemaElement::EntityType(t) | CsdlSchemaElement::ComplexType(t) => t.location,
            CsdlSchemaElement::EnumType(t) => t.location,
            CsdlSchemaElement::TypeDefinition(t) => t.location,
            CsdlSchemaElement::Term(t) => t.location,
            CsdlSchemaElement::Action(o) | CsdlSchemaElement::Function(o) => o.location,
            CsdlSchemaElement::EntityContainer(c) => c.location,
        }
    }

    pub fn annotations(&self) -> &[Arc<CsdlAnnotation>] {
        match self {
            CsdlSchemaElement::EntityType(t) | CsdlSchemaElement::ComplexType(t) => &t.annotations,
            CsdlSchemaElement::EnumType(t) => &t.annotations,
            CsdlSchemaElement::TypeDefinition(t) => &t.annotations,
            CsdlSchemaElement::Term(t) => &t.annotations,
            CsdlSchemaElement::Action(o) | CsdlSchemaElement::Function(o) => &o.annotations,
            CsdlSchemaElement::EntityContainer(c) => &c.annotations,
        }
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// Type facets exactly as written on a property, parameter, term, ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsdlFacets {
    pub nullable: Option<String>,
    pub max_length: Option<String>,
    pub unicode: Option<String>,
    pub precision: Option<String>,
    pub scale: Option<String>,
    pub srid: Option<String>,
}

impl CsdlFacets {
    /// True if any facet other than `Nullable` was written.
    pub fn has_type_facets(&self) -> bool {
        self.max_length.is_some()
            || self.unicode.is_some()
            || self.precision.is_some()
            || self.scale.is_some()
            || self.srid.is_some()
    }
}

/// `EntityType` or `ComplexType`.
#[derive(Debug, Clone, Default)]
pub struct CsdlStructuredType {
    pub name: SmolStr,
    pub base_type: Option<String>,
    pub is_abstract: bool,
    pub is_open: bool,
    pub has_stream: bool,
    pub key: Option<CsdlKey>,
    /// Structural and navigation properties in declaration order.
    pub properties: Vec<CsdlPropertyItem>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlKey {
    pub property_refs: Vec<CsdlPropertyRef>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlPropertyRef {
    /// Property name or path (`Address/Zip`).
    pub name: String,
    pub alias: Option<SmolStr>,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub enum CsdlPropertyItem {
    Structural(Arc<CsdlProperty>),
    Navigation(Arc<CsdlNavigationProperty>),
}

impl CsdlPropertyItem {
    pub fn name(&self) -> &SmolStr {
        match self {
            CsdlPropertyItem::Structural(p) => &p.name,
            CsdlPropertyItem::Navigation(p) => &p.name,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            CsdlPropertyItem::Structural(p) => p.location,
            CsdlPropertyItem::Navigation(p) => p.location,
        }
    }

    pub fn annotations(&self) -> &[Arc<CsdlAnnotation>] {
        match self {
            CsdlPropertyItem::Structural(p) => &p.annotations,
            CsdlPropertyItem::Navigation(p) => &p.annotations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    #[default]
    None,
    Fixed,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlProperty {
    pub name: SmolStr,
    pub type_name: String,
    pub facets: CsdlFacets,
    pub default_value: Option<String>,
    pub concurrency_mode: ConcurrencyMode,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDeleteAction {
    #[default]
    None,
    Cascade,
    SetNull,
    SetDefault,
}

impl OnDeleteAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "None" => Some(Self::None),
            "Cascade" => Some(Self::Cascade),
            "SetNull" => Some(Self::SetNull),
            "SetDefault" => Some(Self::SetDefault),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Cascade => "Cascade",
            Self::SetNull => "SetNull",
            Self::SetDefault => "SetDefault",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsdlNavigationProperty {
    pub name: SmolStr,
    pub type_name: String,
    pub nullable: Option<String>,
    pub partner: Option<String>,
    pub contains_target: bool,
    pub on_delete: Option<OnDeleteAction>,
    pub referential_constraints: Vec<CsdlReferentialConstraint>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

/// Dependent property → principal property.
#[derive(Debug, Clone, Default)]
pub struct CsdlReferentialConstraint {
    pub property: String,
    pub referenced_property: String,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlEnumType {
    pub name: SmolStr,
    pub underlying_type: Option<String>,
    pub is_flags: bool,
    pub members: Vec<CsdlEnumMember>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlEnumMember {
    pub name: SmolStr,
    pub value: Option<String>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlTypeDefinition {
    pub name: SmolStr,
    pub underlying_type: String,
    pub facets: CsdlFacets,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlTerm {
    pub name: SmolStr,
    pub type_name: String,
    pub facets: CsdlFacets,
    pub default_value: Option<String>,
    pub base_term: Option<String>,
    pub applies_to: Vec<SmolStr>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// `Action` or `Function`.
#[derive(Debug, Clone, Default)]
pub struct CsdlOperation {
    pub name: SmolStr,
    pub is_bound: bool,
    /// Functions only.
    pub is_composable: bool,
    pub entity_set_path: Option<String>,
    pub parameters: Vec<CsdlParameter>,
    pub return_type: Option<CsdlReturnType>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlParameter {
    pub name: SmolStr,
    pub type_name: String,
    pub facets: CsdlFacets,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlReturnType {
    pub type_name: String,
    pub facets: CsdlFacets,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

// ============================================================================
// ENTITY CONTAINER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CsdlEntityContainer {
    pub name: SmolStr,
    pub extends: Option<String>,
    pub entity_sets: Vec<Arc<CsdlNavigationSource>>,
    pub singletons: Vec<Arc<CsdlNavigationSource>>,
    pub operation_imports: Vec<Arc<CsdlOperationImport>>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationSourceKind {
    EntitySet,
    Singleton,
}

impl NavigationSourceKind {
    pub fn element_name(self) -> &'static str {
        match self {
            NavigationSourceKind::EntitySet => "EntitySet",
            NavigationSourceKind::Singleton => "Singleton",
        }
    }
}

/// `EntitySet` or `Singleton`.
#[derive(Debug, Clone)]
pub struct CsdlNavigationSource {
    pub kind: NavigationSourceKind,
    pub name: SmolStr,
    /// `EntityType` of an entity set, `Type` of a singleton.
    pub type_name: String,
    pub include_in_service_document: bool,
    pub bindings: Vec<CsdlNavigationPropertyBinding>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct CsdlNavigationPropertyBinding {
    pub path: String,
    pub target: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationImportKind {
    ActionImport,
    FunctionImport,
}

impl OperationImportKind {
    pub fn element_name(self) -> &'static str {
        match self {
            OperationImportKind::ActionImport => "ActionImport",
            OperationImportKind::FunctionImport => "FunctionImport",
        }
    }

    /// Name of the attribute pointing at the imported operation.
    pub fn operation_attribute(self) -> &'static str {
        match self {
            OperationImportKind::ActionImport => "Action",
            OperationImportKind::FunctionImport => "Function",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsdlOperationImport {
    pub kind: OperationImportKind,
    pub name: SmolStr,
    pub operation: String,
    pub entity_set: Option<String>,
    pub include_in_service_document: bool,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// An out-of-line `Annotations` block.
#[derive(Debug, Clone, Default)]
pub struct CsdlAnnotations {
    pub target: String,
    pub qualifier: Option<SmolStr>,
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

/// A single `Annotation`.
#[derive(Debug, Clone, Default)]
pub struct CsdlAnnotation {
    pub term: String,
    pub qualifier: Option<SmolStr>,
    pub expression: Option<CsdlExpression>,
    /// Annotations on the annotation.
    pub annotations: Vec<Arc<CsdlAnnotation>>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    String,
    Int,
    Bool,
    Decimal,
    Float,
    Date,
    DateTimeOffset,
    Duration,
    Guid,
    TimeOfDay,
    Binary,
    EnumMember,
}

impl ConstantKind {
    pub const ALL: [ConstantKind; 12] = [
        ConstantKind::String,
        ConstantKind::Int,
        ConstantKind::Bool,
        ConstantKind::Decimal,
        ConstantKind::Float,
        ConstantKind::Date,
        ConstantKind::DateTimeOffset,
        ConstantKind::Duration,
        ConstantKind::Guid,
        ConstantKind::TimeOfDay,
        ConstantKind::Binary,
        ConstantKind::EnumMember,
    ];

    /// Element / attribute name used for this constant in CSDL XML.
    pub fn name(self) -> &'static str {
        match self {
            ConstantKind::String => "String",
            ConstantKind::Int => "Int",
            ConstantKind::Bool => "Bool",
            ConstantKind::Decimal => "Decimal",
            ConstantKind::Float => "Float",
            ConstantKind::Date => "Date",
            ConstantKind::DateTimeOffset => "DateTimeOffset",
            ConstantKind::Duration => "Duration",
            ConstantKind::Guid => "Guid",
            ConstantKind::TimeOfDay => "TimeOfDay",
            ConstantKind::Binary => "Binary",
            ConstantKind::EnumMember => "EnumMember",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathExpressionKind {
    Path,
    PropertyPath,
    NavigationPropertyPath,
    AnnotationPath,
    ModelElementPath,
}

impl PathExpressionKind {
    pub const ALL: [PathExpressionKind; 5] = [
        PathExpressionKind::Path,
        PathExpressionKind::PropertyPath,
        PathExpressionKind::NavigationPropertyPath,
        PathExpressionKind::AnnotationPath,
        PathExpressionKind::ModelElementPath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathExpressionKind::Path => "Path",
            PathExpressionKind::PropertyPath => "PropertyPath",
            PathExpressionKind::NavigationPropertyPath => "NavigationPropertyPath",
            PathExpressionKind::AnnotationPath => "AnnotationPath",
            PathExpressionKind::ModelElementPath => "ModelElementPath",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// An annotation expression, unevaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum CsdlExpression {
    Constant { kind: ConstantKind, value: String },
    Null,
    Path { kind: PathExpressionKind, path: String },
    If {
        test: Box<CsdlExpression>,
        then: Box<CsdlExpression>,
        otherwise: Option<Box<CsdlExpression>>,
    },
    Cast {
        type_name: String,
        facets: CsdlFacets,
        operand: Box<CsdlExpression>,
    },
    IsType {
        type_name: String,
        facets: CsdlFacets,
        operand: Box<CsdlExpression>,
    },
    Record {
        type_name: Option<String>,
        properties: Vec<CsdlPropertyValue>,
    },
    Collection(Vec<CsdlExpression>),
    Apply {
        function: String,
        arguments: Vec<CsdlExpression>,
    },
    LabeledElement {
        name: SmolStr,
        value: Box<CsdlExpression>,
    },
    LabeledElementReference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsdlPropertyValue {
    pub property: SmolStr,
    pub value: CsdlExpression,
}
