//! Domain constants shared across the crate.

/// Namespace of the built-in primitive and path types.
pub const EDM_NAMESPACE: &str = "Edm";

/// Prefix used by qualified built-in type names.
pub const EDM_PREFIX: &str = "Edm.";

/// Wrapper used for collection-valued type names.
pub const COLLECTION_PREFIX: &str = "Collection(";

/// Wrapper used for entity-reference type names.
pub const REF_PREFIX: &str = "Ref(";

/// Sentinel for an unbounded `MaxLength`.
pub const MAX_LENGTH_UNBOUNDED: &str = "max";

/// Sentinel for a variable `SRID` or `Scale`.
pub const VARIABLE: &str = "variable";

/// Sentinel for a floating `Scale` (CSDL 4.01).
pub const FLOATING: &str = "floating";

/// Default SRID for geography types.
pub const DEFAULT_GEOGRAPHY_SRID: i32 = 4326;

/// Default SRID for geometry types.
pub const DEFAULT_GEOMETRY_SRID: i32 = 0;

/// Member name used to address an operation's return type in annotation targets.
pub const RETURN_TYPE_MEMBER: &str = "$ReturnType";

/// Upper bound on chain walks (base types, container `Extends`).
///
/// Cycles are caught by visited sets first; the cap only bounds pathological
/// but acyclic inputs.
pub const MAX_CHAIN_DEPTH: usize = 1024;
