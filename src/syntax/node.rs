//! The abstract input stream consumed by the builder.
//!
//! Readers (XML, JSON, or tests building trees by hand) produce a tree of
//! `(ElementName, Attributes, Children)` nodes. Nothing below this layer
//! tokenizes characters.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Location;

/// One element of a CSDL document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsdlNode {
    /// Local element name (`EntityType`, `Edmx`, ...).
    pub name: SmolStr,
    /// Namespace prefix as written (`edmx` in `edmx:Edmx`).
    pub prefix: Option<SmolStr>,
    /// Attributes in document order, keyed by their name as written.
    pub attributes: IndexMap<SmolStr, String>,
    pub children: Vec<CsdlNode>,
    /// Character content, trimmed. Only meaningful for constant expressions.
    pub text: Option<String>,
    pub location: Location,
}

impl CsdlNode {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a node from a possibly prefixed name like `edmx:Edmx`.
    pub fn qualified(qname: &str) -> Self {
        match qname.split_once(':') {
            Some((prefix, local)) => Self {
                name: local.into(),
                prefix: Some(prefix.into()),
                ..Default::default()
            },
            None => Self::new(qname),
        }
    }

    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: CsdlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = CsdlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a CsdlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&CsdlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// The element name as written, including its prefix.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.to_string(),
        }
    }
}
