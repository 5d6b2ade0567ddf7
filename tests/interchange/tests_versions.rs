//! Version tables and how documents pick their version.

use crate::helpers::model_helpers::*;
use crate::helpers::source_fixtures::*;
use edm::{EdmVersion, EdmxVersion, ErrorCode};
use rstest::rstest;

#[rstest]
#[case(EdmVersion::V1, "http://schemas.microsoft.com/ado/2006/04/edm")]
#[case(EdmVersion::V1_1, "http://schemas.microsoft.com/ado/2007/05/edm")]
#[case(EdmVersion::V1_2, "http://schemas.microsoft.com/ado/2008/01/edm")]
#[case(EdmVersion::V2, "http://schemas.microsoft.com/ado/2008/09/edm")]
#[case(EdmVersion::V3, "http://schemas.microsoft.com/ado/2009/11/edm")]
#[case(EdmVersion::V4, "http://docs.oasis-open.org/odata/ns/edm")]
fn test_csdl_namespaces(#[case] version: EdmVersion, #[case] namespace: &str) {
    assert_eq!(version.csdl_namespace(), namespace);
    assert_eq!(EdmVersion::from_csdl_namespace(namespace), Some(version));
}

#[rstest]
#[case("http://schemas.microsoft.com/ado/2007/06/edmx", None, Some(EdmxVersion::V1))]
#[case("http://schemas.microsoft.com/ado/2008/10/edmx", Some("2.0"), Some(EdmxVersion::V2))]
#[case("http://schemas.microsoft.com/ado/2009/11/edmx", None, Some(EdmxVersion::V3))]
#[case(EDMX_V4, Some("4.0"), Some(EdmxVersion::V4))]
#[case(EDMX_V4, Some("4.01"), Some(EdmxVersion::V4_01))]
#[case(EDMX_V4, Some("5.0"), None)]
#[case("urn:unknown", None, None)]
fn test_edmx_versions(
    #[case] namespace: &str,
    #[case] version: Option<&str>,
    #[case] expected: Option<EdmxVersion>,
) {
    assert_eq!(EdmxVersion::from_namespace(namespace, version), expected);
}

#[rstest]
#[case(EdmVersion::V1_1, None)]
#[case(EdmVersion::V1_2, None)]
#[case(EdmVersion::V3, Some(EdmxVersion::V3))]
#[case(EdmVersion::V4_01, Some(EdmxVersion::V4_01))]
fn test_envelope_for_csdl_version(#[case] version: EdmVersion, #[case] expected: Option<EdmxVersion>) {
    assert_eq!(EdmxVersion::for_edm_version(version), expected);
}

#[test]
fn test_envelope_version_decides_the_model_version() {
    let text = edmx(&schema("NS", CUSTOMER)).replace(r#"Version="4.0""#, r#"Version="4.01""#);
    let model = model_from_xml(&text);
    assert_eq!(model.edmx_version(), Some(EdmxVersion::V4_01));
    assert_eq!(model.edm_version(), EdmVersion::V4_01);
}

#[test]
fn test_unknown_envelope_version_is_a_read_error() {
    let text = edmx(&schema("NS", CUSTOMER)).replace(r#"Version="4.0""#, r#"Version="5.0""#);
    let (_, errors) = edm::try_parse(&text);
    assert_eq!(codes(&errors), [ErrorCode::UnknownEdmxVersion]);
}
