//! Semantic model: lazily resolved views over CSDL syntax.
//!
//! ## Key Types
//!
//! - [`Model`] owns one arena of element records plus the name and
//!   annotation indices
//! - Handles ([`SchemaElement`], [`StructuredType`], [`Property`], ...) are
//!   `Copy` views of `(&Model, id)`
//! - [`ResolverPolicy`] decides how names match
//! - [`validate`] forces the model and reports every problem
//!
//! ## Layers
//!
//! ```text
//! CsdlDocument                ← syntax, unresolved strings
//!     │
//!     ▼
//! Model::builder().build()   ← index names and annotation targets
//!     │
//!     ▼
//! handles                     ← derived facts computed on first access
//!     │
//!     ▼
//! validate(&model)            ← force everything, collect EdmErrors
//! ```

/// Identity and `Debug` for a `Copy` handle over `(&Model, id)`.
///
/// Two handles are equal when they view the same model and the same id.
macro_rules! handle_impls {
    ($handle:ident, $field:ident) => {
        impl PartialEq for $handle<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.model, other.model) && self.$field == other.$field
            }
        }

        impl Eq for $handle<'_> {}

        impl std::fmt::Debug for $handle<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field(stringify!($field), &self.$field)
                    .field("name", &self.name())
                    .finish()
            }
        }
    };
}

mod annotations;
mod container;
mod diagnostics;
mod elements;
mod ids;
mod lazy;
mod lookup;
mod model;
mod properties;
mod type_resolver;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;

pub use annotations::{TargetRef, VocabularyAnnotation};
pub use container::{
    ContainedEntitySet, EntityContainer, NavigationPropertyBinding, NavigationSource,
    NavigationTarget, OperationImport,
};
pub use diagnostics::{Validator, validate};
pub use elements::{
    EnumMember, EnumType, Operation, Parameter, SchemaElement, SchemaElementKind, StructuredType,
    Term, TypeDefinition,
};
pub use ids::{AnnotationId, ElementId, ElementRef, NavigationSourceId, PlaceholderId, PropertyId};
pub use lazy::{DelayLoaded, Memo};
pub use lookup::{
    CaseInsensitivePolicy, LenientPolicy, LookupTable, Placeholder, PlaceholderKind,
    PlaceholderTable, ResolverPolicy, StrictPolicy, UnqualifiedNamePolicy,
};
pub use model::{Model, ModelBuilder, Schema};
pub use properties::{NavigationProperty, Property};
pub use type_resolver::{
    FacetProblem, TypeClass, TypeLookup, facet_problems, named_type, primitive_kind,
    resolve_facets, resolve_type_reference,
};
pub use types::{
    FacetClass, MaxLength, PathKind, PrimitiveFacets, PrimitiveKind, PrimitiveTypeReference, Scale,
    Srid, TypeReference, TypeReferenceKind,
};
