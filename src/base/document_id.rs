/// Identifier of a CSDL document loaded into a model.
///
/// Document 0 is always the main document; referenced documents follow in
/// the order they were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub struct DocumentId(u32);

impl DocumentId {
    /// The main document of a model.
    pub const MAIN: DocumentId = DocumentId(0);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_main(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc{}", self.0)
    }
}
