//! Structural and navigation properties.

use std::sync::Arc;

use super::annotations::VocabularyAnnotation;
use super::elements::{ElementBody, StructuredType};
use super::ids::{AnnotationId, PropertyId};
use super::lazy::Memo;
use super::model::Model;
use super::types::TypeReference;
use crate::base::Location;
use crate::syntax::{
    ConcurrencyMode, CsdlAnnotation, CsdlFacets, CsdlNavigationProperty, CsdlProperty,
    CsdlPropertyItem, CsdlReferentialConstraint, OnDeleteAction,
};

pub(crate) struct PropertyData {
    pub ast: CsdlPropertyItem,
    pub type_ref: Memo<TypeReference>,
    pub partner: Memo<Option<PropertyId>>,
    pub annotations: Memo<Vec<AnnotationId>>,
}

impl PropertyData {
    pub fn new(ast: CsdlPropertyItem) -> Self {
        Self {
            ast,
            type_ref: Memo::new(),
            partner: Memo::new(),
            annotations: Memo::new(),
        }
    }
}

/// A property of a structured type.
#[derive(Clone, Copy)]
pub struct Property<'m> {
    model: &'m Model,
    id: PropertyId,
}

handle_impls!(Property, id);

impl<'m> Property<'m> {
    pub(crate) fn new(model: &'m Model, id: PropertyId) -> Self {
        Self { model, id }
    }

    fn data(&self) -> &'m PropertyData {
        match &self.model.element_data(self.id.owner).body {
            ElementBody::Structured(s) => &s.properties.get()[self.id.index as usize],
            _ => unreachable!("property owned by a non-structured element"),
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn owner(&self) -> StructuredType<'m> {
        StructuredType::new(self.model, self.id.owner)
    }

    pub fn name(&self) -> &'m str {
        self.data().ast.name()
    }

    pub fn ast(&self) -> &'m CsdlPropertyItem {
        &self.data().ast
    }

    pub fn location(&self) -> Location {
        self.data().ast.location()
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self.data().ast, CsdlPropertyItem::Navigation(_))
    }

    /// The structural property node, if this is one.
    pub fn structural(&self) -> Option<&'m CsdlProperty> {
        match &self.data().ast {
            CsdlPropertyItem::Structural(p) => Some(p),
            CsdlPropertyItem::Navigation(_) => None,
        }
    }

    pub fn as_navigation(&self) -> Option<NavigationProperty<'m>> {
        self.is_navigation()
            .then_some(NavigationProperty { property: *self })
    }

    pub fn default_value(&self) -> Option<&'m str> {
        self.structural()?.default_value.as_deref()
    }

    pub fn concurrency_mode(&self) -> ConcurrencyMode {
        self.structural()
            .map(|p| p.concurrency_mode)
            .unwrap_or_default()
    }

    /// The resolved type, computed on first access.
    pub fn type_ref(&self) -> &'m TypeReference {
        let data = self.data();
        data.type_ref.get_or_compute(|| {
            let document = self.owner().element().document();
            match &data.ast {
                CsdlPropertyItem::Structural(p) => {
                    self.model.resolve_type_in(document, &p.type_name, &p.facets)
                }
                CsdlPropertyItem::Navigation(n) => {
                    let facets = CsdlFacets {
                        nullable: n.nullable.clone(),
                        ..Default::default()
                    };
                    self.model.resolve_type_in(document, &n.type_name, &facets)
                }
            }
        })
    }

    /// Annotation target key, `NS.Type/Property`.
    pub fn target_key(&self) -> String {
        format!("{}/{}", self.owner().full_name(), self.name())
    }

    pub fn annotations(&self) -> &'m [Arc<CsdlAnnotation>] {
        self.data().ast.annotations()
    }

    pub fn vocabulary_annotations(&self) -> Vec<VocabularyAnnotation<'m>> {
        self.data()
            .annotations
            .get_or_compute(|| self.model.annotations_for(&self.target_key()).to_vec())
            .iter()
            .map(|id| VocabularyAnnotation::new(self.model, *id))
            .collect()
    }

    pub(crate) fn force(&self) {
        self.type_ref();
        self.vocabulary_annotations();
        if let Some(nav) = self.as_navigation() {
            nav.partner();
        }
    }
}

/// A navigation property.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NavigationProperty<'m> {
    property: Property<'m>,
}

impl<'m> NavigationProperty<'m> {
    pub fn property(&self) -> Property<'m> {
        self.property
    }

    pub fn id(&self) -> PropertyId {
        self.property.id
    }

    pub fn name(&self) -> &'m str {
        self.property.name()
    }

    pub fn ast(&self) -> &'m CsdlNavigationProperty {
        match self.property.ast() {
            CsdlPropertyItem::Navigation(n) => n,
            CsdlPropertyItem::Structural(_) => unreachable!("navigation handle over a structural property"),
        }
    }

    pub fn owner(&self) -> StructuredType<'m> {
        self.property.owner()
    }

    pub fn type_ref(&self) -> &'m TypeReference {
        self.property.type_ref()
    }

    pub fn is_collection(&self) -> bool {
        self.type_ref().is_collection()
    }

    /// The entity type navigated to, if it resolved to one.
    pub fn target_type(&self) -> Option<StructuredType<'m>> {
        let id = self.type_ref().definition_id()?;
        self.property.model.element(id).as_entity_type()
    }

    pub fn contains_target(&self) -> bool {
        self.ast().contains_target
    }

    pub fn on_delete(&self) -> Option<OnDeleteAction> {
        self.ast().on_delete
    }

    pub fn partner_name(&self) -> Option<&'m str> {
        self.ast().partner.as_deref()
    }

    /// The partner navigation property on the target type.
    pub fn partner(&self) -> Option<NavigationProperty<'m>> {
        let model = self.property.model;
        let id = self.property.data().partner.get_or_compute(|| {
            let name = self.partner_name()?;
            let partner = self.target_type()?.resolve_property_path(name)?;
            partner.is_navigation().then(|| partner.id())
        });
        Property::new(model, (*id)?).as_navigation()
    }

    pub fn referential_constraints(&self) -> &'m [CsdlReferentialConstraint] {
        &self.ast().referential_constraints
    }

    /// Each constraint as (dependent property on the owner, principal property on the target).
    pub fn resolved_constraints(&self) -> Vec<(Option<Property<'m>>, Option<Property<'m>>)> {
        let owner = self.owner();
        let target = self.target_type();
        self.referential_constraints()
            .iter()
            .map(|c| {
                (
                    owner.resolve_property_path(&c.property),
                    target.and_then(|t| t.resolve_property_path(&c.referenced_property)),
                )
            })
            .collect()
    }

    pub fn location(&self) -> Location {
        self.property.location()
    }
}

impl std::fmt::Debug for NavigationProperty<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationProperty")
            .field("owner", &self.owner().full_name())
            .field("name", &self.name())
            .finish()
    }
}
