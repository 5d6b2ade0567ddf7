//! Fixed EDM / EDMX version tables.
//!
//! Versions are a closed set. Each version maps to exactly one namespace URI
//! and a fixed set of available features; nothing here is computed.

/// Version of the CSDL (`Schema`) grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub enum EdmVersion {
    V1,
    V1_1,
    V1_2,
    V2,
    V3,
    V4,
    V4_01,
}

impl EdmVersion {
    pub const ALL: [EdmVersion; 7] = [
        EdmVersion::V1,
        EdmVersion::V1_1,
        EdmVersion::V1_2,
        EdmVersion::V2,
        EdmVersion::V3,
        EdmVersion::V4,
        EdmVersion::V4_01,
    ];

    /// Newest version; used when a document does not declare one.
    pub const LATEST: EdmVersion = EdmVersion::V4_01;

    /// Default XML namespace of `Schema` elements for this version.
    pub fn csdl_namespace(self) -> &'static str {
        match self {
            EdmVersion::V1 => "http://schemas.microsoft.com/ado/2006/04/edm",
            EdmVersion::V1_1 => "http://schemas.microsoft.com/ado/2007/05/edm",
            EdmVersion::V1_2 => "http://schemas.microsoft.com/ado/2008/01/edm",
            EdmVersion::V2 => "http://schemas.microsoft.com/ado/2008/09/edm",
            EdmVersion::V3 => "http://schemas.microsoft.com/ado/2009/11/edm",
            EdmVersion::V4 | EdmVersion::V4_01 => "http://docs.oasis-open.org/odata/ns/edm",
        }
    }

    /// Version for a `Schema` namespace URI.
    ///
    /// 4.0 and 4.01 share a namespace; the EDMX `Version` attribute tells
    /// them apart, so this returns [`EdmVersion::V4`] for the shared URI.
    pub fn from_csdl_namespace(uri: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.csdl_namespace() == uri)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdmVersion::V1 => "1.0",
            EdmVersion::V1_1 => "1.1",
            EdmVersion::V1_2 => "1.2",
            EdmVersion::V2 => "2.0",
            EdmVersion::V3 => "3.0",
            EdmVersion::V4 => "4.0",
            EdmVersion::V4_01 => "4.01",
        }
    }

    pub fn from_version_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// `Singleton` children of an entity container.
    pub fn supports_singletons(self) -> bool {
        self >= EdmVersion::V4
    }

    /// `TypeDefinition` schema elements.
    pub fn supports_type_definitions(self) -> bool {
        self >= EdmVersion::V4
    }

    /// The `Edm.Untyped` type.
    pub fn supports_untyped(self) -> bool {
        self >= EdmVersion::V4_01
    }

    /// The `Edm.DateTime` primitive, replaced by `Edm.DateTimeOffset` in 4.0.
    pub fn supports_datetime(self) -> bool {
        self < EdmVersion::V4
    }

    /// The `Edm.Time` primitive.
    pub fn supports_time(self) -> bool {
        self == EdmVersion::V3
    }

    /// Whether values whose lexical form mismatches the declared primitive type
    /// (e.g. `3.2` for an `Edm.Int32` default) are accepted.
    pub fn lenient_primitive_values(self) -> bool {
        self <= EdmVersion::V2
    }
}

impl std::fmt::Display for EdmVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version of the EDMX envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub enum EdmxVersion {
    V1,
    V2,
    V3,
    V4,
    V4_01,
}

impl EdmxVersion {
    pub const ALL: [EdmxVersion; 5] = [
        EdmxVersion::V1,
        EdmxVersion::V2,
        EdmxVersion::V3,
        EdmxVersion::V4,
        EdmxVersion::V4_01,
    ];

    /// XML namespace of the `edmx:Edmx` root element.
    pub fn namespace(self) -> &'static str {
        match self {
            EdmxVersion::V1 => "http://schemas.microsoft.com/ado/2007/06/edmx",
            EdmxVersion::V2 => "http://schemas.microsoft.com/ado/2008/10/edmx",
            EdmxVersion::V3 => "http://schemas.microsoft.com/ado/2009/11/edmx",
            EdmxVersion::V4 | EdmxVersion::V4_01 => "http://docs.oasis-open.org/odata/ns/edmx",
        }
    }

    /// Value of the `Version` attribute on `edmx:Edmx`.
    pub fn as_str(self) -> &'static str {
        match self {
            EdmxVersion::V1 => "1.0",
            EdmxVersion::V2 => "2.0",
            EdmxVersion::V3 => "3.0",
            EdmxVersion::V4 => "4.0",
            EdmxVersion::V4_01 => "4.01",
        }
    }

    /// Resolve an envelope version from its namespace and `Version` attribute.
    ///
    /// The OASIS namespace is shared by 4.0 and 4.01, so the attribute decides
    /// there; for the older namespaces the URI alone is authoritative.
    pub fn from_namespace(uri: &str, version: Option<&str>) -> Option<Self> {
        if uri == EdmxVersion::V4.namespace() {
            return match version {
                Some("4.01") => Some(EdmxVersion::V4_01),
                Some("4.0") | None => Some(EdmxVersion::V4),
                Some(_) => None,
            };
        }
        Self::ALL.into_iter().find(|v| v.namespace() == uri)
    }

    /// Resolve from the `Version` attribute only (CSDL JSON `$Version`).
    pub fn from_version_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// The CSDL version written inside an envelope of this version.
    pub fn edm_version(self) -> EdmVersion {
        match self {
            EdmxVersion::V1 => EdmVersion::V1,
            EdmxVersion::V2 => EdmVersion::V2,
            EdmxVersion::V3 => EdmVersion::V3,
            EdmxVersion::V4 => EdmVersion::V4,
            EdmxVersion::V4_01 => EdmVersion::V4_01,
        }
    }

    /// The envelope version that carries a given CSDL version.
    ///
    /// CSDL 1.1 and 1.2 have no envelope of their own and return `None`.
    pub fn for_edm_version(version: EdmVersion) -> Option<Self> {
        match version {
            EdmVersion::V1 => Some(EdmxVersion::V1),
            EdmVersion::V2 => Some(EdmxVersion::V2),
            EdmVersion::V3 => Some(EdmxVersion::V3),
            EdmVersion::V4 => Some(EdmxVersion::V4),
            EdmVersion::V4_01 => Some(EdmxVersion::V4_01),
            EdmVersion::V1_1 | EdmVersion::V1_2 => None,
        }
    }
}

impl std::fmt::Display for EdmxVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
