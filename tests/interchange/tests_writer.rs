//! Writing models back to CSDL XML.

use std::fs::{self, File};

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;
use edm::hir::{MaxLength, PrimitiveFacets, Scale, Srid};
use edm::interchange::{
    CsdlReader, CsdlSink, WriteError, XmlSink, try_write_csdl, try_write_csdl_single, try_write_edmx,
};
use edm::{EdmxVersion, ErrorCode, Model};
use tempfile::TempDir;

const FACETED: &str = r#"
<ComplexType Name="Faceted">
  <Property Name="Code" Type="Edm.String" MaxLength="20" Unicode="false"/>
  <Property Name="Notes" Type="Edm.String" MaxLength="max"/>
  <Property Name="Price" Type="Edm.Decimal" Precision="10" Scale="2"/>
  <Property Name="Stamp" Type="Edm.DateTimeOffset" Precision="3"/>
  <Property Name="Where" Type="Edm.GeographyPoint" SRID="variable"/>
  <Property Name="Token" Type="Edm.Guid" Nullable="false"/>
</ComplexType>"#;

fn write_single(model: &Model) -> String {
    let mut sink = XmlSink::new(Vec::new());
    try_write_csdl_single(model, &mut sink).expect("writes");
    String::from_utf8(sink.into_inner()).expect("utf-8")
}

fn write_edmx(model: &Model) -> String {
    let mut sink = XmlSink::new(Vec::new());
    try_write_edmx(model, &mut sink).expect("writes");
    String::from_utf8(sink.into_inner()).expect("utf-8")
}

fn facets(model: &Model, property: &str) -> PrimitiveFacets {
    structured(model, "NS.Faceted")
        .find_property(property)
        .and_then(|p| p.type_ref().as_primitive().map(|p| p.facets))
        .unwrap_or_else(|| panic!("primitive property '{}'", property))
}

#[test]
fn test_facets_survive_a_round_trip() {
    let original = model_from_xml(&schema("NS", FACETED));
    let written = write_single(&original);
    let reread = model_from_xml(&written);
    assert!(edm::validate(&reread).is_empty());

    for name in ["Code", "Notes", "Price", "Stamp", "Where", "Token"] {
        assert_eq!(facets(&reread, name), facets(&original, name), "facets of {}", name);
    }
    assert_eq!(
        facets(&reread, "Code"),
        PrimitiveFacets::String {
            max_length: MaxLength::Bounded(20),
            unicode: Some(false),
        }
    );
    assert_eq!(facets(&reread, "Notes"), PrimitiveFacets::String { max_length: MaxLength::Unbounded, unicode: None });
    assert_eq!(
        facets(&reread, "Price"),
        PrimitiveFacets::Decimal {
            precision: Some(10),
            scale: Some(Scale::Value(2)),
        }
    );
    assert_eq!(facets(&reread, "Where"), PrimitiveFacets::Spatial { srid: Some(Srid::Variable) });
}

#[test]
fn test_guid_is_written_without_length_facets() {
    let written = write_single(&model_from_xml(&schema("NS", FACETED)));
    let token = written
        .lines()
        .find(|line| line.contains(r#"Name="Token""#))
        .expect("Token line");
    assert!(token.contains(r#"Type="Edm.Guid""#));
    assert!(token.contains(r#"Nullable="false""#));
    assert!(!token.contains("MaxLength"));
}

#[test]
fn test_storefront_round_trips_through_edmx() {
    let written = write_edmx(&SHOP);
    assert!(written.starts_with("<?xml"));
    assert!(written.contains(r#"<edmx:Edmx Version="4.0""#));

    let reread = model_from_xml(&written);
    assert!(edm::validate(&reread).is_empty());
    let names = |model: &Model| -> Vec<String> {
        model.elements().map(|e| e.full_name().to_string()).collect()
    };
    assert_eq!(names(&reread), names(&*SHOP));
    assert_eq!(reread.find_vocabulary_annotations("Shop.Customer/Name").len(), 1);
}

#[test]
fn test_envelope_keeps_the_read_version() {
    let text = edmx(&schema("NS", CUSTOMER)).replace(r#"Version="4.0""#, r#"Version="4.01""#);
    let written = write_edmx(&model_from_xml(&text));
    assert!(written.contains(r#"Version="4.01""#));
    assert_eq!(model_from_xml(&written).edmx_version(), Some(EdmxVersion::V4_01));
}

#[test]
fn test_one_file_per_schema() {
    let text = edmx(&format!(
        "{}{}",
        schema("NS", CUSTOMER),
        schema("Common", r#"<ComplexType Name="Address"/>"#)
    ));
    let model = model_from_xml(&text);
    let dir = TempDir::new().expect("temp dir");

    let mut namespaces = Vec::new();
    try_write_csdl(&model, |namespace| {
        namespaces.push(namespace.to_string());
        let file = File::create(dir.path().join(format!("{namespace}.xml")))?;
        Ok::<_, WriteError>(XmlSink::new(file))
    })
    .expect("writes");
    assert_eq!(namespaces, ["NS", "Common"]);

    let common = fs::read_to_string(dir.path().join("Common.xml")).expect("Common.xml");
    let ns = fs::read_to_string(dir.path().join("NS.xml")).expect("NS.xml");
    let model = CsdlReader::new().reference_xml(common).parse_xml(&ns).expect("readable");
    assert!(edm::validate(&model).is_empty());
    assert!(model.find_type("Common.Address").is_some());
}

#[test]
fn test_single_file_needs_one_schema() {
    let text = edmx(&format!("{}{}", schema("A", ""), schema("B", "")));
    let model = model_from_xml(&text);
    let errors = try_write_csdl_single(&model, XmlSink::new(Vec::new())).expect_err("two schemas");
    assert_eq!(codes(&errors), [ErrorCode::SingleFileExpected]);
}

#[test]
fn test_empty_model_produces_nothing() {
    let model = Model::builder().build();
    let errors = try_write_edmx(&model, XmlSink::new(Vec::new())).expect_err("no schemas");
    assert_eq!(codes(&errors), [ErrorCode::NoSchemasProduced]);
}

/// Counts elements; fails on the first `EntityType`.
#[derive(Default)]
struct Picky {
    elements: usize,
}

impl CsdlSink for Picky {
    fn start_element(&mut self, name: &str) -> Result<(), WriteError> {
        if name == "EntityType" {
            return Err(WriteError::sink("no entity types here"));
        }
        self.elements += 1;
        Ok(())
    }

    fn attribute(&mut self, _name: &str, _value: &str) -> Result<(), WriteError> {
        Ok(())
    }

    fn text(&mut self, _text: &str) -> Result<(), WriteError> {
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), WriteError> {
        Ok(())
    }
}

#[test]
fn test_sink_failures_become_writer_errors() {
    let mut sink = Picky::default();
    let errors = try_write_edmx(&SHOP, &mut sink).expect_err("sink refuses");
    assert_eq!(codes(&errors), [ErrorCode::WriterError]);
    assert!(errors[0].message.contains("no entity types here"));
    assert!(sink.elements > 0);
}
