//! Model-wide name lookup.
//!
//! - [`ResolverPolicy`] decides how a name matches (exact, case-insensitive,
//!   unqualified).
//! - [`LookupTable`] indexes every declared element once at construction.
//! - [`PlaceholderTable`] hands out one stable placeholder per unresolved
//!   `(kind, name)`; it is the only table that grows after construction.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::ids::{ElementId, PlaceholderId};

// ============================================================================
// RESOLVER POLICIES
// ============================================================================

/// How names are matched during lookup.
///
/// Policies are fixed per model and may be overridden per call
/// (see [`Model::find_type_with`](super::Model::find_type_with)).
pub trait ResolverPolicy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Match names exactly when true; fall back to ASCII case folding otherwise.
    fn case_sensitive(&self) -> bool {
        true
    }

    /// Let a bare name (`Customer`) match a qualified one (`NS.Customer`).
    fn allow_unqualified(&self) -> bool {
        false
    }
}

/// Exact, fully qualified matches only.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPolicy;

impl ResolverPolicy for StrictPolicy {
    fn name(&self) -> &'static str {
        "strict"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitivePolicy;

impl ResolverPolicy for CaseInsensitivePolicy {
    fn name(&self) -> &'static str {
        "case-insensitive"
    }

    fn case_sensitive(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnqualifiedNamePolicy;

impl ResolverPolicy for UnqualifiedNamePolicy {
    fn name(&self) -> &'static str {
        "unqualified"
    }

    fn allow_unqualified(&self) -> bool {
        true
    }
}

/// Case-insensitive and unqualified matching together.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientPolicy;

impl ResolverPolicy for LenientPolicy {
    fn name(&self) -> &'static str {
        "lenient"
    }

    fn case_sensitive(&self) -> bool {
        false
    }

    fn allow_unqualified(&self) -> bool {
        true
    }
}

// ============================================================================
// LOOKUP TABLE
// ============================================================================

/// Name indices over every declared element, references included.
///
/// Each index keeps declaration order, so duplicates resolve to the first
/// declaration and later ones are left for the validator.
#[derive(Debug, Default)]
pub struct LookupTable {
    by_name: FxHashMap<Arc<str>, Vec<ElementId>>,
    by_lowercase: FxHashMap<String, Vec<ElementId>>,
    by_simple_name: FxHashMap<SmolStr, Vec<ElementId>>,
}

impl LookupTable {
    pub fn insert(&mut self, full_name: Arc<str>, simple_name: SmolStr, id: ElementId) {
        self.by_lowercase
            .entry(full_name.to_lowercase())
            .or_default()
            .push(id);
        self.by_simple_name.entry(simple_name).or_default().push(id);
        self.by_name.entry(full_name).or_default().push(id);
    }

    /// Every element declared under exactly this full name.
    pub fn exact(&self, full_name: &str) -> &[ElementId] {
        self.by_name.get(full_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate groups in the order the policy tries them.
    fn stages(&self, name: &str, policy: &dyn ResolverPolicy) -> Vec<&[ElementId]> {
        let mut stages = Vec::with_capacity(3);
        if let Some(ids) = self.by_name.get(name) {
            stages.push(ids.as_slice());
        }
        if !policy.case_sensitive()
            && let Some(ids) = self.by_lowercase.get(&name.to_lowercase())
        {
            stages.push(ids.as_slice());
        }
        if policy.allow_unqualified()
            && !name.contains('.')
            && let Some(ids) = self.by_simple_name.get(name)
        {
            stages.push(ids.as_slice());
        }
        stages
    }

    /// First element matching `name` that `accept` takes.
    pub fn find(
        &self,
        name: &str,
        policy: &dyn ResolverPolicy,
        accept: impl Fn(ElementId) -> bool,
    ) -> Option<ElementId> {
        self.stages(name, policy)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
            .find(|id| accept(*id))
    }

    /// All accepted elements of the first stage that has any.
    pub fn find_all(
        &self,
        name: &str,
        policy: &dyn ResolverPolicy,
        accept: impl Fn(ElementId) -> bool,
    ) -> Vec<ElementId> {
        for ids in self.stages(name, policy) {
            let found: Vec<_> = ids.iter().copied().filter(|id| accept(*id)).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ============================================================================
// PLACEHOLDERS
// ============================================================================

/// What an unresolved name was expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Type,
    EntityContainer,
    Term,
    Operation,
    /// Stand-in base type for members of an inheritance cycle.
    CyclicBaseType,
    /// Stand-in `Extends` target for members of a container cycle.
    CyclicEntityContainer,
}

/// An unresolved name. Identity is `(kind, full_name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub id: PlaceholderId,
    pub kind: PlaceholderKind,
    pub full_name: Arc<str>,
    pub namespace: SmolStr,
    pub name: SmolStr,
}

#[derive(Debug, Default)]
struct PlaceholderEntries {
    by_key: FxHashMap<(PlaceholderKind, Arc<str>), PlaceholderId>,
    entries: Vec<Arc<Placeholder>>,
}

/// Append-only placeholder registry.
#[derive(Debug, Default)]
pub struct PlaceholderTable {
    inner: RwLock<PlaceholderEntries>,
}

impl PlaceholderTable {
    /// The placeholder for `(kind, full_name)`, created on first request.
    pub fn get_or_create(&self, kind: PlaceholderKind, full_name: &str) -> PlaceholderId {
        let key = (kind, Arc::<str>::from(full_name));
        if let Some(id) = self.inner.read().by_key.get(&key) {
            return *id;
        }

        let mut inner = self.inner.write();
        if let Some(id) = inner.by_key.get(&key) {
            return *id;
        }
        let id = PlaceholderId(inner.entries.len() as u32);
        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((namespace, name)) => (namespace.into(), name.into()),
            None => (SmolStr::default(), full_name.into()),
        };
        tracing::trace!(?kind, "new placeholder '{}'", full_name);
        inner.entries.push(Arc::new(Placeholder {
            id,
            kind,
            full_name: key.1.clone(),
            namespace,
            name,
        }));
        inner.by_key.insert(key, id);
        id
    }

    /// Look up an existing placeholder without creating one.
    pub fn existing(&self, kind: PlaceholderKind, full_name: &str) -> Option<PlaceholderId> {
        let key = (kind, Arc::<str>::from(full_name));
        self.inner.read().by_key.get(&key).copied()
    }

    /// Panics if `id` was issued by another model's table.
    pub fn get(&self, id: PlaceholderId) -> Arc<Placeholder> {
        let inner = self.inner.read();
        match inner.entries.get(id.index()) {
            Some(placeholder) => Arc::clone(placeholder),
            None => panic!("placeholder {:?} does not belong to this model", id),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
