//! Error code definitions
//!
//! The set is closed: every data-driven problem the crate can report has a
//! code here. Codes are grouped by the layer that detects them.

use std::fmt;

/// Error codes for read, validation and write diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize))]
pub enum ErrorCode {
    // =========================================================================
    // Syntactic: detected while reading a document
    // =========================================================================
    /// Malformed XML
    XmlError,
    /// Malformed JSON
    JsonError,
    /// A required attribute is absent
    MissingAttribute,
    /// An attribute value has the wrong lexical form
    InvalidAttributeValue,
    /// An element appears where it is not allowed
    UnexpectedElement,
    /// The EDMX namespace or `Version` is not a known version
    UnknownEdmxVersion,
    /// A document produced no schemas
    NoSchemasProduced,

    // =========================================================================
    // Referential: a name did not resolve
    // =========================================================================
    /// A type name did not resolve
    UnresolvedType,
    /// A `Partner` did not name a navigation property on the target type
    UnresolvedNavigationPartner,
    /// A container `Extends` did not resolve
    UnresolvedEntityContainer,
    /// A navigation property binding target did not resolve
    UnresolvedNavigationTarget,
    /// A navigation property binding path did not resolve
    UnresolvedNavigationPropertyPath,
    /// An operation import names no operation
    UnresolvedOperation,
    /// An annotation's term did not resolve
    UnresolvedTerm,
    /// An out-of-line annotation target did not resolve
    UnresolvedTarget,

    // =========================================================================
    // Structural: detected by the validator
    // =========================================================================
    /// Two elements share a fully qualified name (or a member name in one scope)
    DuplicateName,
    /// A base type chain loops back on itself
    CyclicBaseType,
    /// A container `Extends` chain loops back on itself
    CyclicEntityContainerExtends,
    /// A facet is not applicable to the type, or facets contradict each other
    InvalidFacetCombination,
    /// A facet value has the wrong lexical form
    InvalidFacetValue,
    /// A non-abstract entity type has no key
    MissingKeyOnEntityType,
    /// A key refers to a missing, nullable or non-primitive property
    InvalidKey,
    /// Partners do not point back at each other
    InconsistentNavigationPartner,
    /// A navigation property's type is not an entity type
    InvalidNavigationPropertyType,
    /// A referential constraint names a missing property
    InvalidReferentialConstraint,
    /// An enum type's underlying type is not integral
    InvalidEnumUnderlyingType,
    /// A default value does not match its declared type
    InvalidDefaultValue,
    /// A construct is not available in the model's version
    FeatureNotSupportedInVersion,

    // =========================================================================
    // Serialization
    // =========================================================================
    /// Single-file output was requested for a multi-schema model
    SingleFileExpected,
    /// The destination sink failed
    WriterError,
}

/// Which layer detects a class of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntactic,
    Referential,
    Structural,
    Serialization,
}

impl ErrorCode {
    /// Stable name used in messages and machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XmlError => "XmlError",
            Self::JsonError => "JsonError",
            Self::MissingAttribute => "MissingAttribute",
            Self::InvalidAttributeValue => "InvalidAttributeValue",
            Self::UnexpectedElement => "UnexpectedElement",
            Self::UnknownEdmxVersion => "UnknownEdmxVersion",
            Self::NoSchemasProduced => "NoSchemasProduced",
            Self::UnresolvedType => "UnresolvedType",
            Self::UnresolvedNavigationPartner => "UnresolvedNavigationPartner",
            Self::UnresolvedEntityContainer => "UnresolvedEntityContainer",
            Self::UnresolvedNavigationTarget => "UnresolvedNavigationTarget",
            Self::UnresolvedNavigationPropertyPath => "UnresolvedNavigationPropertyPath",
            Self::UnresolvedOperation => "UnresolvedOperation",
            Self::UnresolvedTerm => "UnresolvedTerm",
            Self::UnresolvedTarget => "UnresolvedTarget",
            Self::DuplicateName => "DuplicateName",
            Self::CyclicBaseType => "CyclicBaseType",
            Self::CyclicEntityContainerExtends => "CyclicEntityContainerExtends",
            Self::InvalidFacetCombination => "InvalidFacetCombination",
            Self::InvalidFacetValue => "InvalidFacetValue",
            Self::MissingKeyOnEntityType => "MissingKeyOnEntityType",
            Self::InvalidKey => "InvalidKey",
            Self::InconsistentNavigationPartner => "InconsistentNavigationPartner",
            Self::InvalidNavigationPropertyType => "InvalidNavigationPropertyType",
            Self::InvalidReferentialConstraint => "InvalidReferentialConstraint",
            Self::InvalidEnumUnderlyingType => "InvalidEnumUnderlyingType",
            Self::InvalidDefaultValue => "InvalidDefaultValue",
            Self::FeatureNotSupportedInVersion => "FeatureNotSupportedInVersion",
            Self::SingleFileExpected => "SingleFileExpected",
            Self::WriterError => "WriterError",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::XmlError
            | Self::JsonError
            | Self::MissingAttribute
            | Self::InvalidAttributeValue
            | Self::UnexpectedElement
            | Self::UnknownEdmxVersion
            | Self::NoSchemasProduced => ErrorCategory::Syntactic,
            Self::UnresolvedType
            | Self::UnresolvedNavigationPartner
            | Self::UnresolvedEntityContainer
            | Self::UnresolvedNavigationTarget
            | Self::UnresolvedNavigationPropertyPath
            | Self::UnresolvedOperation
            | Self::UnresolvedTerm
            | Self::UnresolvedTarget => ErrorCategory::Referential,
            Self::SingleFileExpected | Self::WriterError => ErrorCategory::Serialization,
            _ => ErrorCategory::Structural,
        }
    }

    /// Default message when none is supplied
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::XmlError => "malformed XML",
            Self::JsonError => "malformed JSON",
            Self::MissingAttribute => "missing required attribute",
            Self::InvalidAttributeValue => "invalid attribute value",
            Self::UnexpectedElement => "unexpected element",
            Self::UnknownEdmxVersion => "unknown EDMX version",
            Self::NoSchemasProduced => "no schemas produced",
            Self::UnresolvedType => "type could not be resolved",
            Self::UnresolvedNavigationPartner => "navigation partner could not be resolved",
            Self::UnresolvedEntityContainer => "entity container could not be resolved",
            Self::UnresolvedNavigationTarget => "navigation target could not be resolved",
            Self::UnresolvedNavigationPropertyPath => "navigation property path could not be resolved",
            Self::UnresolvedOperation => "operation could not be resolved",
            Self::UnresolvedTerm => "term could not be resolved",
            Self::UnresolvedTarget => "annotation target could not be resolved",
            Self::DuplicateName => "duplicate name",
            Self::CyclicBaseType => "base type chain is cyclic",
            Self::CyclicEntityContainerExtends => "entity container extends chain is cyclic",
            Self::InvalidFacetCombination => "invalid facet combination",
            Self::InvalidFacetValue => "invalid facet value",
            Self::MissingKeyOnEntityType => "entity type has no key",
            Self::InvalidKey => "invalid key",
            Self::InconsistentNavigationPartner => "navigation partners are inconsistent",
            Self::InvalidNavigationPropertyType => "navigation property type must be an entity type",
            Self::InvalidReferentialConstraint => "invalid referential constraint",
            Self::InvalidEnumUnderlyingType => "invalid enum underlying type",
            Self::InvalidDefaultValue => "invalid default value",
            Self::FeatureNotSupportedInVersion => "feature not supported in this version",
            Self::SingleFileExpected => "single file expected",
            Self::WriterError => "writer error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
