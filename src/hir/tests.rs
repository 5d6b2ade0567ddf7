//! Tests for the semantic model and the validator

use std::sync::Arc;

use super::fixtures::*;
use super::*;
use crate::errors::ErrorCode;
use crate::syntax::CsdlNode;

fn find_entity<'m>(model: &'m Model, name: &str) -> StructuredType<'m> {
    match model.find_type(name) {
        Some(ElementRef::Declared(id)) => model.element(id).as_structured().expect("structured"),
        other => panic!("'{}' did not resolve: {:?}", name, other),
    }
}

fn dog_and_person() -> CsdlNode {
    schema("NS")
        .with_child(
            entity("Dog", &["Id"])
                .with_child(id_property("Id"))
                .with_child(nav("Owner", "NS.Person").with_attr("Partner", "Dogs")),
        )
        .with_child(
            entity("Person", &["Id"])
                .with_child(id_property("Id"))
                .with_child(nav("Dogs", "Collection(NS.Dog)").with_attr("Partner", "Owner")),
        )
}

// ============================================================================
// LAZY RESOLUTION
// ============================================================================

#[test]
fn test_forward_reference_resolves() {
    let model = model(dog_and_person());
    let dog = find_entity(&model, "NS.Dog");
    let person = find_entity(&model, "NS.Person");

    let owner = dog.find_property("Owner").and_then(|p| p.as_navigation()).expect("Owner");
    assert_eq!(owner.target_type(), Some(person));
    assert!(!owner.is_collection());

    let dogs = person.find_property("Dogs").and_then(|p| p.as_navigation()).expect("Dogs");
    assert!(dogs.is_collection());
    assert_eq!(owner.partner(), Some(dogs));
    assert_eq!(dogs.partner(), Some(owner));

    assert!(validate(&model).is_empty());
}

#[test]
fn test_derived_facts_are_computed_once() {
    let model = model(dog_and_person());
    let dog = find_entity(&model, "NS.Dog");
    let id = dog.find_property("Id").expect("Id");

    let first = id.type_ref();
    let second = id.type_ref();
    assert!(std::ptr::eq(first, second));
    assert_eq!(dog.key(), dog.key());
    assert_eq!(dog.base_type(), None);
}

#[test]
fn test_inherited_key_and_properties() {
    let model = model(
        schema("NS")
            .with_child(
                entity("Animal", &["Id"])
                    .with_attr("Abstract", "true")
                    .with_child(id_property("Id"))
                    .with_child(property("Name", "Edm.String")),
            )
            .with_child(
                entity("Dog", &[])
                    .with_attr("BaseType", "NS.Animal")
                    .with_child(property("Breed", "Edm.String")),
            ),
    );
    let animal = find_entity(&model, "NS.Animal");
    let dog = find_entity(&model, "NS.Dog");

    assert_eq!(dog.base_structured(), Some(animal));
    assert!(dog.is_or_inherits_from(animal.id()));
    assert!(!animal.is_or_inherits_from(dog.id()));
    let names: Vec<_> = dog.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Id", "Name", "Breed"]);
    let key: Vec<_> = dog.key().expect("key").iter().map(|p| p.name()).collect();
    assert_eq!(key, ["Id"]);
    assert_eq!(animal.derived_types(), vec![dog]);
    assert!(validate(&model).is_empty());
}

#[test]
fn test_cyclic_base_types_terminate_and_report_once() {
    let model = model(
        schema("NS")
            .with_child(
                entity("A", &["Id"])
                    .with_attr("BaseType", "NS.B")
                    .with_child(id_property("Id")),
            )
            .with_child(
                entity("B", &["Id"])
                    .with_attr("BaseType", "NS.A")
                    .with_child(id_property("Id")),
            ),
    );
    let a = find_entity(&model, "NS.A");
    let b = find_entity(&model, "NS.B");

    assert!(!a.is_or_inherits_from(b.id()));
    assert!(!b.is_or_inherits_from(a.id()));
    assert!(a.has_cyclic_base());
    assert!(b.has_cyclic_base());

    let errors = validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::CyclicBaseType]);
}

#[test]
fn test_self_referencing_base_type() {
    let model = model(
        schema("NS").with_child(
            entity("Loop", &["Id"])
                .with_attr("BaseType", "NS.Loop")
                .with_child(id_property("Id")),
        ),
    );
    let errors = validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::CyclicBaseType]);
}

#[test]
fn test_concurrent_forcing_agrees() {
    let model = model(dog_and_person());
    let pointers: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    model.force_all();
                    let dog = find_entity(&model, "NS.Dog");
                    let owner = dog.find_property("Owner").expect("Owner");
                    owner.type_ref() as *const TypeReference as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("thread")).collect()
    });
    assert!(pointers.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Model>();
}

// ============================================================================
// LOOKUP AND PLACEHOLDERS
// ============================================================================

#[test]
fn test_placeholders_are_stable() {
    let model = model(
        schema("NS").with_child(
            entity("Customer", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Pet", "NS.Ghost"))
                .with_child(property("Pets", "Collection(NS.Ghost)")),
        ),
    );
    let found = model.find_type("NS.Ghost");
    let customer = find_entity(&model, "NS.Customer");
    let pet = customer.find_property("Pet").expect("Pet").type_ref().unresolved();
    let pets = customer
        .find_property("Pets")
        .expect("Pets")
        .type_ref()
        .element_type()
        .unresolved();

    assert!(pet.is_some());
    assert_eq!(pet, pets);
    assert_eq!(found, pet.map(ElementRef::Unresolved));
    assert_eq!(&*model.placeholder(pet.expect("placeholder")).full_name, "NS.Ghost");

    assert_eq!(model.find_type("NS.Nowhere"), None);
}

#[test]
fn test_unknown_edm_names_get_placeholders_before_forcing() {
    let model = model(
        schema("NS").with_child(
            entity("Customer", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Name", "Edm.Strin")),
        ),
    );
    let before = model.find_type("Edm.Strin");
    assert!(matches!(before, Some(ElementRef::Unresolved(_))));
    assert_eq!(model.find_type("Edm.String"), None);

    assert_eq!(codes(&validate(&model)), [ErrorCode::UnresolvedType]);
    assert_eq!(model.find_type("Edm.Strin"), before);
}

#[test]
fn test_resolver_policies() {
    let document = || crate::syntax::build_document(&schema("NS").with_child(complex("Address"))).document;

    let strict = Model::new(document());
    assert_eq!(strict.find_type("ns.address"), None);
    assert_eq!(strict.find_type("Address"), None);
    assert!(matches!(
        strict.find_type_with("Address", &UnqualifiedNamePolicy),
        Some(ElementRef::Declared(_))
    ));

    let relaxed = Model::builder()
        .policy(CaseInsensitivePolicy)
        .document(document())
        .build();
    assert!(matches!(relaxed.find_type("ns.ADDRESS"), Some(ElementRef::Declared(_))));
    assert_eq!(relaxed.policy().name(), "case-insensitive");

    let shared: Arc<dyn ResolverPolicy> = Arc::new(LenientPolicy);
    let lenient = Model::builder().shared_policy(shared).document(document()).build();
    assert!(matches!(lenient.find_type("address"), Some(ElementRef::Declared(_))));
}

#[test]
fn test_alias_qualified_names_expand() {
    let model = model(
        schema("Org.Sales")
            .with_attr("Alias", "self")
            .with_child(complex("Address").with_child(property("City", "Edm.String")))
            .with_child(
                entity("Customer", &["Id"])
                    .with_child(id_property("Id"))
                    .with_child(property("Home", "self.Address")),
            ),
    );
    let customer = find_entity(&model, "Org.Sales.Customer");
    let home = customer.find_property("Home").expect("Home");
    let address = model.find_type("self.Address").and_then(|r| r.declared());
    assert_eq!(home.type_ref().definition_id(), address);
    assert_eq!(model.type_name(home.type_ref()), "Org.Sales.Address");
    assert!(customer.resolve_property_path("Home/City").is_some());
    assert!(validate(&model).is_empty());
}

#[test]
fn test_find_operations_and_bound_operations() {
    let approve = CsdlNode::new("Action")
        .with_attr("Name", "Approve")
        .with_attr("IsBound", "true")
        .with_child(
            CsdlNode::new("Parameter")
                .with_attr("Name", "order")
                .with_attr("Type", "NS.Order"),
        );
    let top = |parameter: &str| {
        CsdlNode::new("Function")
            .with_attr("Name", "Top")
            .with_child(
                CsdlNode::new("Parameter")
                    .with_attr("Name", parameter)
                    .with_attr("Type", "Edm.Int32"),
            )
            .with_child(CsdlNode::new("ReturnType").with_attr("Type", "Collection(NS.Order)"))
    };
    let model = model(
        schema("NS")
            .with_child(entity("Order", &["Id"]).with_child(id_property("Id")))
            .with_child(entity("RushOrder", &[]).with_attr("BaseType", "NS.Order"))
            .with_child(approve)
            .with_child(top("count"))
            .with_child(top("limit"))
            .with_child(
                container("Service").with_child(
                    CsdlNode::new("FunctionImport")
                        .with_attr("Name", "TopOrders")
                        .with_attr("Function", "NS.Top"),
                ),
            ),
    );

    let overloads = model.find_operations("NS.Top");
    assert_eq!(overloads.len(), 2);
    assert!(overloads.iter().all(|op| op.returns_entities()));

    let bound = model.find_bound_operations(&model.resolve_type("NS.Order"));
    assert_eq!(bound.iter().map(|op| op.name()).collect::<Vec<_>>(), ["Approve"]);
    let derived = model.find_bound_operations(&model.resolve_type("NS.RushOrder"));
    assert_eq!(derived.len(), 1);
    assert!(model.find_bound_operations(&model.resolve_type("Collection(NS.Order)")).is_empty());

    let service = model.entity_container().expect("container");
    let import = service.find_operation_import("TopOrders").expect("import");
    assert_eq!(import.resolved_operations().len(), 2);
    assert!(validate(&model).is_empty());
}

#[test]
fn test_enum_members_auto_assign_values() {
    let model = model(
        schema("NS").with_child(
            CsdlNode::new("EnumType")
                .with_attr("Name", "Color")
                .with_child(CsdlNode::new("Member").with_attr("Name", "Red"))
                .with_child(CsdlNode::new("Member").with_attr("Name", "Green").with_attr("Value", "5"))
                .with_child(CsdlNode::new("Member").with_attr("Name", "Blue")),
        ),
    );
    let color = model
        .find_type("NS.Color")
        .and_then(|r| r.declared())
        .and_then(|id| model.element(id).as_enum())
        .expect("enum");
    let values: Vec<_> = color.members().iter().map(|m| (m.name(), m.value())).collect();
    assert_eq!(values, [("Red", 0), ("Green", 5), ("Blue", 6)]);
    assert_eq!(color.underlying_type(), Some(PrimitiveKind::Int32));
}

// ============================================================================
// CONTAINERS
// ============================================================================

fn shop() -> CsdlNode {
    schema("NS")
        .with_child(
            entity("Customer", &["Id"])
                .with_child(id_property("Id"))
                .with_child(nav("Orders", "Collection(NS.Order)"))
                .with_child(nav("Favorite", "NS.Order")),
        )
        .with_child(
            entity("Order", &["Id"])
                .with_child(id_property("Id"))
                .with_child(nav("Items", "Collection(NS.Item)").with_attr("ContainsTarget", "true")),
        )
        .with_child(entity("Item", &["Id"]).with_child(id_property("Id")))
        .with_child(container("Base").with_child(entity_set("Orders", "NS.Order")))
        .with_child(
            container("Shop")
                .with_attr("Extends", "NS.Base")
                .with_child(entity_set("Customers", "NS.Customer").with_child(binding("Orders", "Orders"))),
        )
}

#[test]
fn test_navigation_targets() {
    let model = model(shop());
    let shop = match model.find_entity_container("NS.Shop") {
        Some(ElementRef::Declared(id)) => model.element(id).as_entity_container().expect("container"),
        other => panic!("unexpected {:?}", other),
    };
    let customers = shop.find_entity_set("Customers").expect("Customers");
    let orders = shop.find_entity_set("Orders").expect("Orders inherited from Base");
    assert_eq!(orders.container().name(), "Base");

    let customer = find_entity(&model, "NS.Customer");
    let to_orders = customer.find_property("Orders").and_then(|p| p.as_navigation()).expect("nav");
    assert_eq!(customers.find_navigation_target(to_orders), NavigationTarget::Source(orders));

    let favorite = customer.find_property("Favorite").and_then(|p| p.as_navigation()).expect("nav");
    assert_eq!(customers.find_navigation_target(favorite), NavigationTarget::Unbound);

    let order = find_entity(&model, "NS.Order");
    let items = order.find_property("Items").and_then(|p| p.as_navigation()).expect("nav");
    match orders.find_navigation_target(items) {
        NavigationTarget::Contained(contained) => {
            assert_eq!(contained.name(), "Items");
            assert_eq!(contained.parent(), orders);
            assert_eq!(contained.entity_type(), Some(find_entity(&model, "NS.Item")));
        }
        other => panic!("expected a contained set, got {:?}", other),
    }
    assert_eq!(shop.extends_chain().len(), 2);
    assert!(validate(&model).is_empty());
}

#[test]
fn test_cyclic_container_extends() {
    let model = model(
        schema("NS")
            .with_child(container("One").with_attr("Extends", "NS.Two"))
            .with_child(container("Two").with_attr("Extends", "NS.One")),
    );
    let one = model.elements().find_map(|e| e.as_entity_container()).expect("container");
    assert!(one.has_cyclic_extends());
    assert!(one.find_navigation_source("Missing").is_none());
    assert_eq!(codes(&validate(&model)), [ErrorCode::CyclicEntityContainerExtends]);
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

#[test]
fn test_inline_and_out_of_line_annotations() {
    let model = model(
        schema("NS")
            .with_child(
                CsdlNode::new("Term")
                    .with_attr("Name", "Description")
                    .with_attr("Type", "Edm.String"),
            )
            .with_child(
                entity("Customer", &["Id"])
                    .with_child(id_property("Id"))
                    .with_child(annotation("NS.Description").with_attr("String", "A customer")),
            )
            .with_child(
                CsdlNode::new("Annotations")
                    .with_attr("Target", "NS.Customer/Id")
                    .with_child(annotation("NS.Description").with_attr("String", "Identity")),
            ),
    );
    let customer = find_entity(&model, "NS.Customer");
    let inline = customer.element().vocabulary_annotations();
    assert_eq!(inline.len(), 1);
    assert!(inline[0].is_inline());
    assert_eq!(inline[0].target(), Some(TargetRef::Element(customer.id())));

    let id = customer.find_property("Id").expect("Id");
    let on_id = model.find_vocabulary_annotations("NS.Customer/Id");
    assert_eq!(on_id.len(), 1);
    assert_eq!(on_id, id.vocabulary_annotations());
    assert!(!on_id[0].is_inline());
    assert_eq!(on_id[0].target(), Some(TargetRef::Property(id.id())));
    assert_eq!(on_id[0].term_definition().map(|t| t.name()), Some("Description"));
    assert!(validate(&model).is_empty());
}

#[test]
fn test_unresolved_terms_and_targets() {
    let model = model(
        schema("NS")
            .with_child(
                entity("Customer", &["Id"])
                    .with_child(id_property("Id"))
                    .with_child(annotation("NS.Missing")),
            )
            .with_child(
                CsdlNode::new("Annotations")
                    .with_attr("Target", "NS.Nobody")
                    .with_child(annotation("NS.Missing").with_attr("Qualifier", "q")),
            ),
    );
    let found = codes(&validate(&model));
    assert_eq!(found.len(), 3);
    assert_eq!(found.iter().filter(|c| **c == ErrorCode::UnresolvedTerm).count(), 2);
    assert!(found.contains(&ErrorCode::UnresolvedTarget));
    assert!(model.find_term("NS.Missing").is_some_and(|r| r.is_unresolved()));
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_clean_customer_validates() {
    let model = model(
        schema("NS").with_child(
            entity("Customer", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Name", "Edm.String").with_attr("MaxLength", "50")),
        ),
    );
    assert!(validate(&model).is_empty());
    let customer = find_entity(&model, "NS.Customer");
    let key: Vec<_> = customer.declared_key().expect("key").iter().map(|p| p.name()).collect();
    assert_eq!(key, ["Id"]);
    let name = customer.find_property("Name").expect("Name");
    assert_eq!(name.type_ref().max_length(), Some(MaxLength::Bounded(50)));
}

#[test]
fn test_undeclared_type_reports_once() {
    let model = model(
        schema("NS").with_child(
            entity("Customer", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Pet", "NS.Ghost")),
        ),
    );
    let errors = validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::UnresolvedType]);
    assert!(errors[0].message.contains("NS.Ghost"));

    let pet = find_entity(&model, "NS.Customer").find_property("Pet").expect("Pet");
    let placeholder = model.placeholder(pet.type_ref().unresolved().expect("placeholder"));
    assert_eq!(&*placeholder.full_name, "NS.Ghost");
}

#[test]
fn test_duplicate_types_report_once_and_stay_walkable() {
    let customer = || entity("Customer", &["Id"]).with_child(id_property("Id"));
    let model = model(schema("NS").with_child(customer()).with_child(customer()));
    for element in model.elements() {
        let ty = element.as_structured().expect("structured");
        assert_eq!(ty.properties().len(), 1);
    }
    let errors = validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::DuplicateName]);
    assert_eq!(errors[0].related.len(), 1);
}

#[test]
fn test_key_problems() {
    let model = model(
        schema("NS")
            .with_child(entity("NoKey", &[]).with_child(id_property("Id")))
            .with_child(entity("Abstract", &[]).with_attr("Abstract", "true"))
            .with_child(entity("Nullable", &["Id"]).with_child(property("Id", "Edm.Int32")))
            .with_child(entity("Missing", &["Nope"]).with_child(id_property("Id"))),
    );
    assert_eq!(
        codes(&validate(&model)),
        [ErrorCode::MissingKeyOnEntityType, ErrorCode::InvalidKey, ErrorCode::InvalidKey]
    );
}

#[test]
fn test_facet_problems() {
    let model = model(
        schema("NS").with_child(
            entity("Thing", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Token", "Edm.Guid").with_attr("MaxLength", "10"))
                .with_child(
                    property("Price", "Edm.Decimal")
                        .with_attr("Precision", "2")
                        .with_attr("Scale", "5"),
                )
                .with_child(property("Label", "Edm.String").with_attr("MaxLength", "lots")),
        ),
    );
    assert_eq!(
        codes(&validate(&model)),
        [
            ErrorCode::InvalidFacetCombination,
            ErrorCode::InvalidFacetCombination,
            ErrorCode::InvalidFacetValue,
        ]
    );
    let token = find_entity(&model, "NS.Thing").find_property("Token").expect("Token");
    assert_eq!(token.type_ref().max_length(), None);
}

#[test]
fn test_default_values_are_lenient_before_v3() {
    let thing = |xmlns: &str| {
        schema("NS").with_attr("xmlns", xmlns).with_child(
            entity("Thing", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("Count", "Edm.Int32").with_attr("DefaultValue", "3.2")),
        )
    };
    assert_eq!(codes(&validate(&model(thing(EDM_V4)))), [ErrorCode::InvalidDefaultValue]);
    assert!(validate(&model(thing(EDM_V2))).is_empty());
}

#[test]
fn test_navigation_problems() {
    let model = model(
        schema("NS")
            .with_child(complex("Address"))
            .with_child(
                entity("Customer", &["Id"])
                    .with_child(id_property("Id"))
                    .with_child(nav("Home", "NS.Address"))
                    .with_child(nav("Orders", "Collection(NS.Order)").with_attr("Partner", "Nope")),
            )
            .with_child(
                entity("Order", &["Id"])
                    .with_child(id_property("Id"))
                    .with_child(property("CustomerId", "Edm.Int32"))
                    .with_child(
                        nav("Customer", "NS.Customer").with_child(
                            CsdlNode::new("ReferentialConstraint")
                                .with_attr("Property", "BuyerId")
                                .with_attr("ReferencedProperty", "Id"),
                        ),
                    ),
            ),
    );
    assert_eq!(
        codes(&validate(&model)),
        [
            ErrorCode::InvalidNavigationPropertyType,
            ErrorCode::UnresolvedNavigationPartner,
            ErrorCode::InvalidReferentialConstraint,
        ]
    );
}

#[test]
fn test_container_problems() {
    let model = model(
        schema("NS")
            .with_child(entity("Customer", &["Id"]).with_child(id_property("Id")))
            .with_child(
                container("Shop")
                    .with_attr("Extends", "NS.Elsewhere")
                    .with_child(
                        entity_set("Customers", "NS.Customer")
                            .with_child(binding("Orders", "Customers"))
                            .with_child(binding("Orders", "Nowhere")),
                    )
                    .with_child(
                        CsdlNode::new("ActionImport")
                            .with_attr("Name", "Reset")
                            .with_attr("Action", "NS.Reset"),
                    ),
            ),
    );
    assert_eq!(
        codes(&validate(&model)),
        [
            ErrorCode::UnresolvedEntityContainer,
            ErrorCode::UnresolvedNavigationPropertyPath,
            ErrorCode::UnresolvedNavigationPropertyPath,
            ErrorCode::UnresolvedNavigationTarget,
            ErrorCode::UnresolvedOperation,
        ]
    );
}

#[test]
fn test_version_features() {
    let v2 = schema("NS")
        .with_attr("xmlns", EDM_V2)
        .with_child(entity("Customer", &["Id"]).with_child(id_property("Id")))
        .with_child(
            container("Shop").with_child(
                CsdlNode::new("Singleton")
                    .with_attr("Name", "Me")
                    .with_attr("Type", "NS.Customer"),
            ),
        );
    assert_eq!(codes(&validate(&model(v2))), [ErrorCode::FeatureNotSupportedInVersion]);

    let v4 = schema("NS").with_child(
        entity("Bag", &["Id"])
            .with_child(id_property("Id"))
            .with_child(property("Anything", "Edm.Untyped")),
    );
    assert_eq!(codes(&validate(&model(v4))), [ErrorCode::FeatureNotSupportedInVersion]);
}

#[test]
fn test_legacy_temporal_types_need_an_older_version() {
    let v4 = schema("NS").with_child(
        entity("Event", &["Id"])
            .with_child(id_property("Id"))
            .with_child(property("At", "Edm.DateTime"))
            .with_child(property("Slot", "Edm.Time")),
    );
    let errors = validate(&model(v4));
    assert_eq!(
        codes(&errors),
        [ErrorCode::FeatureNotSupportedInVersion, ErrorCode::FeatureNotSupportedInVersion]
    );
    assert!(errors[0].message.contains("Edm.DateTime"));

    let v2 = schema("NS")
        .with_attr("xmlns", EDM_V2)
        .with_child(
            entity("Event", &["Id"])
                .with_child(id_property("Id"))
                .with_child(property("At", "Edm.DateTime")),
        );
    assert!(validate(&model(v2)).is_empty());
}

#[test]
fn test_base_type_of_the_wrong_kind() {
    let model = model(
        schema("NS")
            .with_child(
                CsdlNode::new("EnumType")
                    .with_attr("Name", "Mood")
                    .with_child(CsdlNode::new("Member").with_attr("Name", "Happy")),
            )
            .with_child(complex("Feeling").with_attr("BaseType", "NS.Mood")),
    );
    let errors = validate(&model);
    assert_eq!(codes(&errors), [ErrorCode::UnresolvedType]);
    assert!(errors[0].message.contains("declared as EnumType"), "{}", errors[0].message);
    assert!(!errors[0].message.contains("not declared"));
}

#[test]
fn test_enum_underlying_type_must_be_integral() {
    let model = model(
        schema("NS").with_child(
            CsdlNode::new("EnumType")
                .with_attr("Name", "Mood")
                .with_attr("UnderlyingType", "Edm.String")
                .with_child(CsdlNode::new("Member").with_attr("Name", "Happy")),
        ),
    );
    assert_eq!(codes(&validate(&model)), [ErrorCode::InvalidEnumUnderlyingType]);
}
