//! Read-only view over the fields constraints inspect

use super::{
    Blob, DataTypeDefXsd, ElementKind, File, MultiLanguageProperty, Property, Range,
    ReferenceElement, SubmodelElement, SubmodelElementCollection,
};

/// Raw payload of a value-bearing element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> RawValue<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

/// Uniform accessors over any submodel element.
///
/// Absent fields are `None`; no accessor fails.
pub trait ModelFacts {
    fn kind(&self) -> ElementKind;

    /// The element's idShort
    fn identifier(&self) -> &str;

    fn category(&self) -> Option<&str>;

    fn value_type(&self) -> Option<DataTypeDefXsd> {
        None
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        None
    }

    fn content_type(&self) -> Option<&str> {
        None
    }

    /// Every textual value the element carries: the text payload, language
    /// strings and range bounds
    fn text_values(&self) -> Vec<&str> {
        self.raw_value().and_then(|value| value.as_text()).into_iter().collect()
    }

    /// Contained elements, in document order
    fn children(&self) -> &[SubmodelElement] {
        &[]
    }
}

impl ModelFacts for Property {
    fn kind(&self) -> ElementKind {
        ElementKind::Property
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn value_type(&self) -> Option<DataTypeDefXsd> {
        Some(self.value_type)
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.value.as_deref().map(RawValue::Text)
    }
}

impl ModelFacts for MultiLanguageProperty {
    fn kind(&self) -> ElementKind {
        ElementKind::MultiLanguageProperty
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn text_values(&self) -> Vec<&str> {
        self.value
            .iter()
            .flat_map(|lang| [lang.language.as_str(), lang.text.as_str()])
            .collect()
    }
}

impl ModelFacts for Range {
    fn kind(&self) -> ElementKind {
        ElementKind::Range
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn value_type(&self) -> Option<DataTypeDefXsd> {
        Some(self.value_type)
    }

    fn text_values(&self) -> Vec<&str> {
        [self.min.as_deref(), self.max.as_deref()].into_iter().flatten().collect()
    }
}

impl ModelFacts for ReferenceElement {
    fn kind(&self) -> ElementKind {
        ElementKind::ReferenceElement
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.value.as_deref().map(RawValue::Text)
    }
}

impl ModelFacts for File {
    fn kind(&self) -> ElementKind {
        ElementKind::File
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.value.as_deref().map(RawValue::Text)
    }

    fn content_type(&self) -> Option<&str> {
        Some(&self.content_type)
    }
}

impl ModelFacts for Blob {
    fn kind(&self) -> ElementKind {
        ElementKind::Blob
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.value.as_deref().map(RawValue::Bytes)
    }

    fn content_type(&self) -> Option<&str> {
        Some(&self.content_type)
    }
}

impl ModelFacts for SubmodelElementCollection {
    fn kind(&self) -> ElementKind {
        ElementKind::SubmodelElementCollection
    }

    fn identifier(&self) -> &str {
        &self.referable.id_short
    }

    fn category(&self) -> Option<&str> {
        self.referable.category.as_deref()
    }

    fn children(&self) -> &[SubmodelElement] {
        &self.value
    }
}

impl SubmodelElement {
    fn facts(&self) -> &dyn ModelFacts {
        match self {
            Self::Property(e) => e,
            Self::MultiLanguageProperty(e) => e,
            Self::Range(e) => e,
            Self::ReferenceElement(e) => e,
            Self::File(e) => e,
            Self::Blob(e) => e,
            Self::SubmodelElementCollection(e) => e,
        }
    }
}

impl ModelFacts for SubmodelElement {
    fn kind(&self) -> ElementKind {
        self.facts().kind()
    }

    fn identifier(&self) -> &str {
        self.facts().identifier()
    }

    fn category(&self) -> Option<&str> {
        self.facts().category()
    }

    fn value_type(&self) -> Option<DataTypeDefXsd> {
        self.facts().value_type()
    }

    fn raw_value(&self) -> Option<RawValue<'_>> {
        self.facts().raw_value()
    }

    fn content_type(&self) -> Option<&str> {
        self.facts().content_type()
    }

    fn text_values(&self) -> Vec<&str> {
        self.facts().text_values()
    }

    fn children(&self) -> &[SubmodelElement] {
        self.facts().children()
    }
}
