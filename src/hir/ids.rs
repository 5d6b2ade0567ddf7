//! Arena identifiers.
//!
//! Semantic records live in arenas owned by the [`Model`](super::Model);
//! relations between them are ids, never pointers, so the cyclic graph needs
//! no reference counting or interior back-links.

/// A declared schema element (type, term, operation, container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stable placeholder for a name that did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaceholderId(pub(crate) u32);

impl PlaceholderId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A property (structural or navigation) of a structured type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId {
    pub owner: ElementId,
    pub index: u32,
}

/// An entity set or singleton of an entity container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationSourceId {
    pub container: ElementId,
    pub index: u32,
}

/// A vocabulary annotation, inline or out-of-line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId(pub(crate) u32);

impl AnnotationId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The result of a name lookup: a declared element or its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Declared(ElementId),
    Unresolved(PlaceholderId),
}

impl ElementRef {
    pub fn declared(self) -> Option<ElementId> {
        match self {
            ElementRef::Declared(id) => Some(id),
            ElementRef::Unresolved(_) => None,
        }
    }

    pub fn is_unresolved(self) -> bool {
        matches!(self, ElementRef::Unresolved(_))
    }
}
