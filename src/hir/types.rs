//! Resolved type references.
//!
//! A [`TypeReference`] is what a property, parameter, return type or term
//! points at once its raw type name has been resolved: a primitive with the
//! facets that apply to its kind, a declared schema type, a collection, a
//! path type, or an unresolved placeholder.

use super::ids::{ElementId, PlaceholderId};
use crate::base::EdmVersion;
use crate::base::constants::{DEFAULT_GEOGRAPHY_SRID, DEFAULT_GEOMETRY_SRID};

// ============================================================================
// PRIMITIVE KINDS
// ============================================================================

/// Built-in `Edm.*` primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    /// CSDL 1.0 to 3.0 only.
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    /// CSDL 3.0 only.
    Time,
    TimeOfDay,
    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyMultiPoint,
    GeographyMultiLineString,
    GeographyMultiPolygon,
    GeographyCollection,
    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryMultiPoint,
    GeometryMultiLineString,
    GeometryMultiPolygon,
    GeometryCollection,
}

/// Which facets a primitive kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetClass {
    String,
    Binary,
    Decimal,
    Temporal,
    Spatial,
    None,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 35] = [
        PrimitiveKind::Binary,
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Date,
        PrimitiveKind::DateTime,
        PrimitiveKind::DateTimeOffset,
        PrimitiveKind::Decimal,
        PrimitiveKind::Double,
        PrimitiveKind::Duration,
        PrimitiveKind::Guid,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::SByte,
        PrimitiveKind::Single,
        PrimitiveKind::Stream,
        PrimitiveKind::String,
        PrimitiveKind::Time,
        PrimitiveKind::TimeOfDay,
        PrimitiveKind::Geography,
        PrimitiveKind::GeographyPoint,
        PrimitiveKind::GeographyLineString,
        PrimitiveKind::GeographyPolygon,
        PrimitiveKind::GeographyMultiPoint,
        PrimitiveKind::GeographyMultiLineString,
        PrimitiveKind::GeographyMultiPolygon,
        PrimitiveKind::GeographyCollection,
        PrimitiveKind::Geometry,
        PrimitiveKind::GeometryPoint,
        PrimitiveKind::GeometryLineString,
        PrimitiveKind::GeometryPolygon,
        PrimitiveKind::GeometryMultiPoint,
        PrimitiveKind::GeometryMultiLineString,
        PrimitiveKind::GeometryMultiPolygon,
        PrimitiveKind::GeometryCollection,
    ];

    /// Unqualified name (`Int32`).
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Binary => "Binary",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTime => "DateTime",
            PrimitiveKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Duration => "Duration",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Stream => "Stream",
            PrimitiveKind::String => "String",
            PrimitiveKind::Time => "Time",
            PrimitiveKind::TimeOfDay => "TimeOfDay",
            PrimitiveKind::Geography => "Geography",
            PrimitiveKind::GeographyPoint => "GeographyPoint",
            PrimitiveKind::GeographyLineString => "GeographyLineString",
            PrimitiveKind::GeographyPolygon => "GeographyPolygon",
            PrimitiveKind::GeographyMultiPoint => "GeographyMultiPoint",
            PrimitiveKind::GeographyMultiLineString => "GeographyMultiLineString",
            PrimitiveKind::GeographyMultiPolygon => "GeographyMultiPolygon",
            PrimitiveKind::GeographyCollection => "GeographyCollection",
            PrimitiveKind::Geometry => "Geometry",
            PrimitiveKind::GeometryPoint => "GeometryPoint",
            PrimitiveKind::GeometryLineString => "GeometryLineString",
            PrimitiveKind::GeometryPolygon => "GeometryPolygon",
            PrimitiveKind::GeometryMultiPoint => "GeometryMultiPoint",
            PrimitiveKind::GeometryMultiLineString => "GeometryMultiLineString",
            PrimitiveKind::GeometryMultiPolygon => "GeometryMultiPolygon",
            PrimitiveKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// Qualified name (`Edm.Int32`).
    pub fn full_name(self) -> String {
        format!("Edm.{}", self.name())
    }

    /// Kind for an unqualified name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn facet_class(self) -> FacetClass {
        match self {
            PrimitiveKind::String => FacetClass::String,
            PrimitiveKind::Binary | PrimitiveKind::Stream => FacetClass::Binary,
            PrimitiveKind::Decimal => FacetClass::Decimal,
            PrimitiveKind::DateTime
            | PrimitiveKind::DateTimeOffset
            | PrimitiveKind::Duration
            | PrimitiveKind::Time
            | PrimitiveKind::TimeOfDay => FacetClass::Temporal,
            k if k.is_spatial() => FacetClass::Spatial,
            _ => FacetClass::None,
        }
    }

    pub fn is_spatial(self) -> bool {
        self.is_geography() || self.is_geometry()
    }

    pub fn is_geography(self) -> bool {
        self.name().starts_with("Geography")
    }

    pub fn is_geometry(self) -> bool {
        self.name().starts_with("Geometry")
    }

    /// Valid underlying types of an enum.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::SByte
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
        )
    }

    /// Whether a document of `version` may use this kind.
    pub fn is_available_in(self, version: EdmVersion) -> bool {
        match self {
            PrimitiveKind::DateTime => version.supports_datetime(),
            PrimitiveKind::Time => version.supports_time(),
            _ => true,
        }
    }
}

/// Abstract path types usable as term and property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    AnnotationPath,
    PropertyPath,
    NavigationPropertyPath,
    AnyPropertyPath,
    ModelElementPath,
}

impl PathKind {
    pub const ALL: [PathKind; 5] = [
        PathKind::AnnotationPath,
        PathKind::PropertyPath,
        PathKind::NavigationPropertyPath,
        PathKind::AnyPropertyPath,
        PathKind::ModelElementPath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathKind::AnnotationPath => "AnnotationPath",
            PathKind::PropertyPath => "PropertyPath",
            PathKind::NavigationPropertyPath => "NavigationPropertyPath",
            PathKind::AnyPropertyPath => "AnyPropertyPath",
            PathKind::ModelElementPath => "ModelElementPath",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

// ============================================================================
// FACETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaxLength {
    #[default]
    Unspecified,
    /// `MaxLength="max"`.
    Unbounded,
    Bounded(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Value(u32),
    Variable,
    /// CSDL 4.01 floating-point decimals.
    Floating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Srid {
    Value(i32),
    Variable,
}

/// Facets of a primitive reference, shaped by the kind's [`FacetClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveFacets {
    #[default]
    None,
    String {
        max_length: MaxLength,
        unicode: Option<bool>,
    },
    Binary {
        max_length: MaxLength,
    },
    Decimal {
        precision: Option<u32>,
        scale: Option<Scale>,
    },
    Temporal {
        precision: Option<u32>,
    },
    Spatial {
        srid: Option<Srid>,
    },
}

impl PrimitiveFacets {
    /// Empty facets of the right shape for a kind.
    pub fn empty(class: FacetClass) -> Self {
        match class {
            FacetClass::String => PrimitiveFacets::String {
                max_length: MaxLength::Unspecified,
                unicode: None,
            },
            FacetClass::Binary => PrimitiveFacets::Binary {
                max_length: MaxLength::Unspecified,
            },
            FacetClass::Decimal => PrimitiveFacets::Decimal {
                precision: None,
                scale: None,
            },
            FacetClass::Temporal => PrimitiveFacets::Temporal { precision: None },
            FacetClass::Spatial => PrimitiveFacets::Spatial { srid: None },
            FacetClass::None => PrimitiveFacets::None,
        }
    }
}

/// A primitive type plus its facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveTypeReference {
    pub kind: PrimitiveKind,
    pub facets: PrimitiveFacets,
}

impl PrimitiveTypeReference {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            facets: PrimitiveFacets::empty(kind.facet_class()),
        }
    }

    /// `None` for kinds without a `MaxLength` facet.
    pub fn max_length(&self) -> Option<MaxLength> {
        match self.facets {
            PrimitiveFacets::String { max_length, .. } | PrimitiveFacets::Binary { max_length } => {
                Some(max_length)
            }
            _ => None,
        }
    }

    pub fn unicode(&self) -> Option<bool> {
        match self.facets {
            PrimitiveFacets::String { unicode, .. } => unicode,
            _ => None,
        }
    }

    pub fn precision(&self) -> Option<u32> {
        match self.facets {
            PrimitiveFacets::Decimal { precision, .. } | PrimitiveFacets::Temporal { precision } => {
                precision
            }
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<Scale> {
        match self.facets {
            PrimitiveFacets::Decimal { scale, .. } => scale,
            _ => None,
        }
    }

    pub fn srid(&self) -> Option<Srid> {
        match self.facets {
            PrimitiveFacets::Spatial { srid } => srid,
            _ => None,
        }
    }

    /// The SRID in effect, falling back to the kind's default.
    pub fn effective_srid(&self) -> Option<Srid> {
        if !self.kind.is_spatial() {
            return None;
        }
        Some(self.srid().unwrap_or(if self.kind.is_geography() {
            Srid::Value(DEFAULT_GEOGRAPHY_SRID)
        } else {
            Srid::Value(DEFAULT_GEOMETRY_SRID)
        }))
    }
}

// ============================================================================
// TYPE REFERENCES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReferenceKind {
    Primitive(PrimitiveTypeReference),
    Entity(ElementId),
    Complex(ElementId),
    Enum(ElementId),
    /// A type definition; facets follow its underlying primitive kind.
    TypeDefinition {
        id: ElementId,
        facets: PrimitiveFacets,
    },
    /// `Ref(EntityType)`.
    EntityReference(ElementId),
    Collection(Box<TypeReference>),
    Path(PathKind),
    Untyped,
    /// A name that did not resolve to any type.
    Unresolved(PlaceholderId),
}

/// A resolved type with its nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    pub nullable: bool,
    pub kind: TypeReferenceKind,
}

impl TypeReference {
    pub fn new(kind: TypeReferenceKind, nullable: bool) -> Self {
        Self { nullable, kind }
    }

    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        Self::new(
            TypeReferenceKind::Primitive(PrimitiveTypeReference::new(kind)),
            nullable,
        )
    }

    /// A collection of `element`. Collections themselves are never nullable.
    pub fn collection(element: TypeReference) -> Self {
        Self::new(TypeReferenceKind::Collection(Box::new(element)), false)
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveTypeReference> {
        match &self.kind {
            TypeReferenceKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.as_primitive().map(|p| p.kind)
    }

    /// Shortcut for the `MaxLength` facet; `None` when the type has none.
    pub fn max_length(&self) -> Option<MaxLength> {
        self.as_primitive().and_then(PrimitiveTypeReference::max_length)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, TypeReferenceKind::Collection(_))
    }

    /// The element type of a collection, or the reference itself.
    pub fn element_type(&self) -> &TypeReference {
        match &self.kind {
            TypeReferenceKind::Collection(element) => element,
            _ => self,
        }
    }

    /// The declared schema type behind this reference (through collections).
    pub fn definition_id(&self) -> Option<ElementId> {
        match &self.element_type().kind {
            TypeReferenceKind::Entity(id)
            | TypeReferenceKind::Complex(id)
            | TypeReferenceKind::Enum(id)
            | TypeReferenceKind::EntityReference(id)
            | TypeReferenceKind::TypeDefinition { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn unresolved(&self) -> Option<PlaceholderId> {
        match &self.element_type().kind {
            TypeReferenceKind::Unresolved(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.unresolved().is_some()
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.element_type().kind, TypeReferenceKind::Entity(_))
    }
}
