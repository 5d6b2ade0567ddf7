//! Type reference resolution.
//!
//! Turns a raw type name plus its written facets into a [`TypeReference`].
//! Name lookup goes through the [`TypeLookup`] seam, so the resolver runs the
//! same against a full model or a test table.

use std::borrow::Cow;

use super::ids::{ElementId, PlaceholderId};
use super::types::*;
use crate::base::constants::{
    COLLECTION_PREFIX, EDM_PREFIX, FLOATING, MAX_LENGTH_UNBOUNDED, REF_PREFIX, VARIABLE,
};
use crate::errors::ErrorCode;
use crate::syntax::CsdlFacets;

/// What a declared type name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Entity,
    Complex,
    Enum,
    /// A type definition with its underlying primitive kind, if that parsed.
    TypeDefinition(Option<PrimitiveKind>),
}

/// Name lookup used while resolving type references.
pub trait TypeLookup {
    /// Expand an alias-qualified name to its namespace-qualified form.
    fn qualify<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    /// Find a declared schema type by qualified name.
    fn lookup_type(&self, qualified_name: &str) -> Option<(ElementId, TypeClass)>;

    /// The stable placeholder for a type name that did not resolve.
    fn unresolved_type(&self, qualified_name: &str) -> PlaceholderId;
}

/// Resolve a raw type name such as `Collection(NS.Order)` or `Edm.String`.
pub fn resolve_type_reference<L>(raw: &str, facets: &CsdlFacets, lookup: &L) -> TypeReference
where
    L: TypeLookup + ?Sized,
{
    let nullable = parse_nullable(facets.nullable.as_deref()).unwrap_or(true);
    let raw = raw.trim();
    match strip_wrapper(raw, COLLECTION_PREFIX) {
        Some(inner) => TypeReference::collection(resolve_single(inner, facets, nullable, lookup)),
        None => resolve_single(raw, facets, nullable, lookup),
    }
}

fn resolve_single<L>(name: &str, facets: &CsdlFacets, nullable: bool, lookup: &L) -> TypeReference
where
    L: TypeLookup + ?Sized,
{
    if let Some(inner) = strip_wrapper(name, REF_PREFIX) {
        let qualified = lookup.qualify(inner);
        let kind = match lookup.lookup_type(&qualified) {
            Some((id, TypeClass::Entity)) => TypeReferenceKind::EntityReference(id),
            // Declared, but not an entity type.
            Some(_) => TypeReferenceKind::Unresolved(
                lookup.unresolved_type(&format!("{}{})", REF_PREFIX, qualified)),
            ),
            None => TypeReferenceKind::Unresolved(lookup.unresolved_type(&qualified)),
        };
        return TypeReference::new(kind, nullable);
    }

    if let Some(local) = name.strip_prefix(EDM_PREFIX) {
        if let Some(kind) = PrimitiveKind::from_name(local) {
            return TypeReference::new(
                TypeReferenceKind::Primitive(PrimitiveTypeReference {
                    kind,
                    facets: resolve_facets(kind, facets),
                }),
                nullable,
            );
        }
        if local == "Untyped" {
            return TypeReference::new(TypeReferenceKind::Untyped, nullable);
        }
        if let Some(path) = PathKind::from_name(local) {
            return TypeReference::new(TypeReferenceKind::Path(path), nullable);
        }
    }

    let qualified = lookup.qualify(name);
    let kind = match lookup.lookup_type(&qualified) {
        Some((id, TypeClass::Entity)) => TypeReferenceKind::Entity(id),
        Some((id, TypeClass::Complex)) => TypeReferenceKind::Complex(id),
        Some((id, TypeClass::Enum)) => TypeReferenceKind::Enum(id),
        Some((id, TypeClass::TypeDefinition(underlying))) => TypeReferenceKind::TypeDefinition {
            id,
            facets: underlying
                .map(|kind| resolve_facets(kind, facets))
                .unwrap_or_default(),
        },
        None => {
            tracing::trace!("type '{}' did not resolve", qualified);
            TypeReferenceKind::Unresolved(lookup.unresolved_type(&qualified))
        }
    };
    TypeReference::new(kind, nullable)
}

/// `Collection(X)` → `X`.
pub fn strip_wrapper<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    raw.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim)
}

/// The innermost named type of a raw type name, without `Collection(` / `Ref(`.
pub fn named_type(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = strip_wrapper(raw, COLLECTION_PREFIX).unwrap_or(raw);
    strip_wrapper(raw, REF_PREFIX).unwrap_or(raw)
}

/// Whether `raw` names a built-in `Edm.*` type: a primitive, `Edm.Untyped` or a path kind.
///
/// Other `Edm.*` names resolve like any schema type name and get placeholders.
pub fn is_builtin_type(raw: &str) -> bool {
    raw.trim().strip_prefix(EDM_PREFIX).is_some_and(|local| {
        PrimitiveKind::from_name(local).is_some()
            || local == "Untyped"
            || PathKind::from_name(local).is_some()
    })
}

/// A primitive kind named `Edm.X`, if the raw name is one.
pub fn primitive_kind(raw: &str) -> Option<PrimitiveKind> {
    raw.trim()
        .strip_prefix(EDM_PREFIX)
        .and_then(PrimitiveKind::from_name)
}

// ============================================================================
// FACETS
// ============================================================================

/// Facets applicable to `kind`. Inapplicable or unparseable values are dropped.
pub fn resolve_facets(kind: PrimitiveKind, facets: &CsdlFacets) -> PrimitiveFacets {
    let max_length = || parse_max_length(facets.max_length.as_deref()).unwrap_or_default();
    let precision = || facets.precision.as_deref().and_then(|s| s.trim().parse().ok());
    match kind.facet_class() {
        FacetClass::String => PrimitiveFacets::String {
            max_length: max_length(),
            unicode: facets.unicode.as_deref().and_then(parse_bool),
        },
        FacetClass::Binary => PrimitiveFacets::Binary {
            max_length: max_length(),
        },
        FacetClass::Decimal => PrimitiveFacets::Decimal {
            precision: precision(),
            scale: facets.scale.as_deref().and_then(parse_scale),
        },
        FacetClass::Temporal => PrimitiveFacets::Temporal {
            precision: precision(),
        },
        FacetClass::Spatial => PrimitiveFacets::Spatial {
            srid: facets.srid.as_deref().and_then(parse_srid),
        },
        FacetClass::None => PrimitiveFacets::None,
    }
}

/// A facet written where it does not apply, or with a value that does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetProblem {
    pub code: ErrorCode,
    pub message: String,
}

impl FacetProblem {
    fn new(code: ErrorCode, message: String) -> Self {
        Self { code, message }
    }
}

/// Check written facets against a facet class.
///
/// `class` is `None` for non-primitive types, which accept no type facets.
pub fn facet_problems(class: Option<FacetClass>, facets: &CsdlFacets) -> Vec<FacetProblem> {
    let mut problems = Vec::new();

    if let Some(raw) = &facets.nullable
        && parse_bool(raw).is_none()
    {
        problems.push(FacetProblem::new(
            ErrorCode::InvalidFacetValue,
            format!("'{}' is not a valid Nullable value", raw),
        ));
    }

    let class_name = |class: Option<FacetClass>| match class {
        Some(class) => format!("{:?}", class),
        None => "non-primitive".to_string(),
    };

    let checks: [(&str, &Option<String>, &[FacetClass], fn(&str) -> bool); 5] = [
        ("MaxLength", &facets.max_length, &[FacetClass::String, FacetClass::Binary], |s| {
            parse_max_length(Some(s)).is_some()
        }),
        ("Unicode", &facets.unicode, &[FacetClass::String], |s| parse_bool(s).is_some()),
        ("Precision", &facets.precision, &[FacetClass::Decimal, FacetClass::Temporal], |s| {
            s.trim().parse::<u32>().is_ok()
        }),
        ("Scale", &facets.scale, &[FacetClass::Decimal], |s| parse_scale(s).is_some()),
        ("SRID", &facets.srid, &[FacetClass::Spatial], |s| parse_srid(s).is_some()),
    ];

    for (name, value, applies_to, is_valid) in checks {
        let Some(value) = value else { continue };
        match class {
            Some(c) if applies_to.contains(&c) => {
                if !is_valid(value) {
                    problems.push(FacetProblem::new(
                        ErrorCode::InvalidFacetValue,
                        format!("'{}' is not a valid {} value", value, name),
                    ));
                }
            }
            _ => problems.push(FacetProblem::new(
                ErrorCode::InvalidFacetCombination,
                format!("facet {} does not apply to {} types", name, class_name(class)),
            )),
        }
    }

    if class == Some(FacetClass::Decimal) {
        let precision = facets.precision.as_deref().and_then(|s| s.trim().parse::<u32>().ok());
        let scale = facets.scale.as_deref().and_then(parse_scale);
        if let (Some(precision), Some(Scale::Value(scale))) = (precision, scale)
            && scale > precision
        {
            problems.push(FacetProblem::new(
                ErrorCode::InvalidFacetCombination,
                format!("scale {} exceeds precision {}", scale, precision),
            ));
        }
    }

    problems
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_nullable(raw: Option<&str>) -> Option<bool> {
    raw.and_then(parse_bool)
}

fn parse_max_length(raw: Option<&str>) -> Option<MaxLength> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case(MAX_LENGTH_UNBOUNDED) {
        return Some(MaxLength::Unbounded);
    }
    raw.parse().ok().map(MaxLength::Bounded)
}

fn parse_scale(raw: &str) -> Option<Scale> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case(VARIABLE) {
        Some(Scale::Variable)
    } else if raw.eq_ignore_ascii_case(FLOATING) {
        Some(Scale::Floating)
    } else {
        raw.parse().ok().map(Scale::Value)
    }
}

fn parse_srid(raw: &str) -> Option<Srid> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case(VARIABLE) {
        Some(Srid::Variable)
    } else {
        raw.parse().ok().map(Srid::Value)
    }
}
