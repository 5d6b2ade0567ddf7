//! Validation of complete documents.
//!
//! Each case is one small schema with a single kind of problem.

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;
use edm::ErrorCode;
use edm::errors::ErrorCategory;
use rstest::rstest;

/// An entity keyed on `Id` with extra members.
fn thing(members: &str) -> String {
    format!(
        r#"<EntityType Name="Thing">
  <Key><PropertyRef Name="Id"/></Key>
  <Property Name="Id" Type="Edm.Int32" Nullable="false"/>
  {members}
</EntityType>"#
    )
}

fn validate_body(body: &str) -> Vec<ErrorCode> {
    validation_codes(&model_from_xml(&edmx(&schema("NS", body))))
}

#[rstest]
#[case(r#"<Property Name="Pet" Type="NS.Ghost"/>"#, &[ErrorCode::UnresolvedType])]
#[case(r#"<Property Name="Token" Type="Edm.Guid" MaxLength="10"/>"#, &[ErrorCode::InvalidFacetCombination])]
#[case(r#"<Property Name="Label" Type="Edm.String" MaxLength="lots"/>"#, &[ErrorCode::InvalidFacetValue])]
#[case(r#"<Property Name="Count" Type="Edm.Int32" DefaultValue="3.2"/>"#, &[ErrorCode::InvalidDefaultValue])]
#[case(r#"<Property Name="Anything" Type="Edm.Untyped"/>"#, &[ErrorCode::FeatureNotSupportedInVersion])]
#[case(r#"<Property Name="Id" Type="Edm.String"/>"#, &[ErrorCode::DuplicateName])]
#[case(r#"<Property Name="Loose" Type="Edm.String"/>"#, &[])]
fn test_property_problems(#[case] member: &str, #[case] expected: &[ErrorCode]) {
    assert_eq!(validate_body(&thing(member)), expected);
}

#[test]
fn test_missing_key() {
    let body = r#"<EntityType Name="Keyless"><Property Name="Id" Type="Edm.Int32"/></EntityType>"#;
    assert_eq!(validate_body(body), [ErrorCode::MissingKeyOnEntityType]);

    let body = r#"<EntityType Name="Base" Abstract="true"/>"#;
    assert!(validate_body(body).is_empty());
}

#[test]
fn test_enum_underlying_type() {
    let body = r#"<EnumType Name="Mood" UnderlyingType="Edm.String"><Member Name="Happy"/></EnumType>"#;
    assert_eq!(validate_body(body), [ErrorCode::InvalidEnumUnderlyingType]);
}

#[test]
fn test_cyclic_base_types() {
    let body = r#"
<ComplexType Name="A" BaseType="NS.B"/>
<ComplexType Name="B" BaseType="NS.A"/>"#;
    let codes = validate_body(body);
    assert!(!codes.is_empty());
    assert!(codes.iter().all(|c| *c == ErrorCode::CyclicBaseType));
}

#[test]
fn test_unresolved_container_references() {
    let body = format!(
        r#"{thing}
<EntityContainer Name="Default" Extends="NS.Missing">
  <EntitySet Name="Things" EntityType="NS.Thing">
    <NavigationPropertyBinding Path="Nope" Target="Things"/>
  </EntitySet>
  <FunctionImport Name="Top" Function="NS.Top"/>
</EntityContainer>"#,
        thing = thing("")
    );
    let errors = validate_body(&body);
    assert!(errors.contains(&ErrorCode::UnresolvedEntityContainer));
    assert!(errors.contains(&ErrorCode::UnresolvedNavigationPropertyPath));
    assert!(errors.contains(&ErrorCode::UnresolvedOperation));
    assert!(errors.iter().all(|c| c.category() == ErrorCategory::Referential));
}

#[test]
fn test_errors_serialize_with_their_codes() {
    let model = model_from_xml(&edmx(&schema("NS", &thing(r#"<Property Name="Pet" Type="NS.Ghost"/>"#))));
    let errors = edm::validate(&model);
    let json = serde_json::to_value(&errors).expect("serializable");
    assert_eq!(json[0]["code"], "UnresolvedType");
    assert_eq!(json[0]["location"]["document"], 0);
}
