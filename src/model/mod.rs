//! Submodel element records consumed by the validator
//!
//! Architecture: Closed sum type - the metamodel's element variants are fixed and known
//! - SubmodelElement carries an explicit ElementKind discriminant
//! - Typed constructors reject missing required fields; optional ones attach with `with_*`
//! - Constructors never run semantic constraints, that is the engine's job

pub mod facts;

use crate::domain::violations::{ValidatorError, ValidatorResult};
use std::fmt;

pub use facts::{ModelFacts, RawValue};

/// Discriminant of a submodel element variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Property,
    MultiLanguageProperty,
    Range,
    ReferenceElement,
    File,
    Blob,
    SubmodelElementCollection,
}

impl ElementKind {
    /// All kinds, in declaration order
    pub const ALL: [ElementKind; 7] = [
        Self::Property,
        Self::MultiLanguageProperty,
        Self::Range,
        Self::ReferenceElement,
        Self::File,
        Self::Blob,
        Self::SubmodelElementCollection,
    ];

    /// Whether this kind is a leaf value-bearing data element
    pub fn is_data_element(self) -> bool {
        !matches!(self, Self::SubmodelElementCollection)
    }

    /// Metamodel class name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "Property",
            Self::MultiLanguageProperty => "MultiLanguageProperty",
            Self::Range => "Range",
            Self::ReferenceElement => "ReferenceElement",
            Self::File => "File",
            Self::Blob => "Blob",
            Self::SubmodelElementCollection => "SubmodelElementCollection",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XML Schema value types a value-bearing element can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeDefXsd {
    AnyUri,
    Base64Binary,
    Boolean,
    Byte,
    Date,
    DateTime,
    Decimal,
    Double,
    Duration,
    Float,
    HexBinary,
    Int,
    Integer,
    Long,
    NegativeInteger,
    NonNegativeInteger,
    NonPositiveInteger,
    PositiveInteger,
    Short,
    String,
    Time,
    UnsignedByte,
    UnsignedInt,
    UnsignedLong,
    UnsignedShort,
}

impl DataTypeDefXsd {
    /// Prefixed XSD name, e.g. `xs:string`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnyUri => "xs:anyURI",
            Self::Base64Binary => "xs:base64Binary",
            Self::Boolean => "xs:boolean",
            Self::Byte => "xs:byte",
            Self::Date => "xs:date",
            Self::DateTime => "xs:dateTime",
            Self::Decimal => "xs:decimal",
            Self::Double => "xs:double",
            Self::Duration => "xs:duration",
            Self::Float => "xs:float",
            Self::HexBinary => "xs:hexBinary",
            Self::Int => "xs:int",
            Self::Integer => "xs:integer",
            Self::Long => "xs:long",
            Self::NegativeInteger => "xs:negativeInteger",
            Self::NonNegativeInteger => "xs:nonNegativeInteger",
            Self::NonPositiveInteger => "xs:nonPositiveInteger",
            Self::PositiveInteger => "xs:positiveInteger",
            Self::Short => "xs:short",
            Self::String => "xs:string",
            Self::Time => "xs:time",
            Self::UnsignedByte => "xs:unsignedByte",
            Self::UnsignedInt => "xs:unsignedInt",
            Self::UnsignedLong => "xs:unsignedLong",
            Self::UnsignedShort => "xs:unsignedShort",
        }
    }
}

impl fmt::Display for DataTypeDefXsd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text in a given language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

impl LangString {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Attributes shared by every referable element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referable {
    pub id_short: String,
    pub category: Option<String>,
}

impl Referable {
    fn new(kind: ElementKind, id_short: impl Into<String>) -> ValidatorResult<Self> {
        let id_short = id_short.into();
        if id_short.is_empty() {
            return Err(ValidatorError::model(format!("{kind} requires an idShort")));
        }
        Ok(Self {
            id_short,
            category: None,
        })
    }
}

fn require(kind: ElementKind, field: &str, value: String) -> ValidatorResult<String> {
    if value.is_empty() {
        Err(ValidatorError::model(format!("{kind} requires a {field}")))
    } else {
        Ok(value)
    }
}

/// Generates the shared `with_category` setter for a variant record
macro_rules! referable_setters {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// Set the element category
                pub fn with_category(mut self, category: impl Into<String>) -> Self {
                    self.referable.category = Some(category.into());
                    self
                }

                pub fn id_short(&self) -> &str {
                    &self.referable.id_short
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub referable: Referable,
    pub value_type: DataTypeDefXsd,
    pub value: Option<String>,
}

impl Property {
    pub fn new(id_short: impl Into<String>, value_type: DataTypeDefXsd) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::Property, id_short)?,
            value_type,
            value: None,
        })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLanguageProperty {
    pub referable: Referable,
    pub value: Vec<LangString>,
}

impl MultiLanguageProperty {
    pub fn new(id_short: impl Into<String>) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::MultiLanguageProperty, id_short)?,
            value: Vec::new(),
        })
    }

    pub fn with_text(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.value.push(LangString::new(language, text));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub referable: Referable,
    pub value_type: DataTypeDefXsd,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl Range {
    pub fn new(id_short: impl Into<String>, value_type: DataTypeDefXsd) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::Range, id_short)?,
            value_type,
            min: None,
            max: None,
        })
    }

    pub fn with_bounds(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self.max = Some(max.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceElement {
    pub referable: Referable,
    /// Serialized reference target
    pub value: Option<String>,
}

impl ReferenceElement {
    pub fn new(id_short: impl Into<String>) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::ReferenceElement, id_short)?,
            value: None,
        })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub referable: Referable,
    pub content_type: String,
    /// Path or URI of the file
    pub value: Option<String>,
}

impl File {
    pub fn new(id_short: impl Into<String>, content_type: impl Into<String>) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::File, id_short)?,
            content_type: require(ElementKind::File, "contentType", content_type.into())?,
            value: None,
        })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub referable: Referable,
    pub content_type: String,
    pub value: Option<Vec<u8>>,
}

impl Blob {
    pub fn new(id_short: impl Into<String>, content_type: impl Into<String>) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::Blob, id_short)?,
            content_type: require(ElementKind::Blob, "contentType", content_type.into())?,
            value: None,
        })
    }

    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmodelElementCollection {
    pub referable: Referable,
    pub value: Vec<SubmodelElement>,
}

impl SubmodelElementCollection {
    pub fn new(id_short: impl Into<String>) -> ValidatorResult<Self> {
        Ok(Self {
            referable: Referable::new(ElementKind::SubmodelElementCollection, id_short)?,
            value: Vec::new(),
        })
    }

    /// Append a child element
    pub fn with_element(mut self, element: impl Into<SubmodelElement>) -> Self {
        self.value.push(element.into());
        self
    }
}

referable_setters!(
    Property,
    MultiLanguageProperty,
    Range,
    ReferenceElement,
    File,
    Blob,
    SubmodelElementCollection,
);

/// Any submodel element the validator understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmodelElement {
    Property(Property),
    MultiLanguageProperty(MultiLanguageProperty),
    Range(Range),
    ReferenceElement(ReferenceElement),
    File(File),
    Blob(Blob),
    SubmodelElementCollection(SubmodelElementCollection),
}

impl SubmodelElement {
    pub fn referable(&self) -> &Referable {
        match self {
            Self::Property(e) => &e.referable,
            Self::MultiLanguageProperty(e) => &e.referable,
            Self::Range(e) => &e.referable,
            Self::ReferenceElement(e) => &e.referable,
            Self::File(e) => &e.referable,
            Self::Blob(e) => &e.referable,
            Self::SubmodelElementCollection(e) => &e.referable,
        }
    }
}

macro_rules! submodel_element_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for SubmodelElement {
                fn from(element: $variant) -> Self {
                    Self::$variant(element)
                }
            }
        )*
    };
}

submodel_element_from!(
    Property,
    MultiLanguageProperty,
    Range,
    ReferenceElement,
    File,
    Blob,
    SubmodelElementCollection,
);
