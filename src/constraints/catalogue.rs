//! Built-in AAS constraints
//!
//! Rule texts are reported verbatim; callers match on them as message suffixes.

use super::{CheckOutcome, ConstraintDescriptor};
use crate::model::{ElementKind, ModelFacts};
use lazy_static::lazy_static;
use regex::Regex;

pub const AASD_002: &str = "AASd-002";
pub const AASD_090: &str = "AASd-090";
pub const AASD_100: &str = "AASd-100";
pub const AASD_130: &str = "AASd-130";

pub const AASD_002_MESSAGE: &str = "idShort of Referables shall only feature letters, digits, \
underscore (\"_\"); starting mandatory with a letter, i.e. [a-zA-Z][a-zA-Z0-9_]*.";

pub const AASD_090_MESSAGE: &str = "For data elements Referable/category shall be one of the \
following values: CONSTANT, PARAMETER or VARIABLE. Exception: File and Blob data elements.";

pub const AASD_100_MESSAGE: &str = "An attribute with data type \"string\" shall not be empty.";

pub const AASD_130_MESSAGE: &str = "An attribute with data type \"string\" shall consist of \
these characters only: ^[\\x09\\x0A\\x0D\\x20-\\uD7FF\\uE000-\\uFFFD\\u00010000-\\u0010FFFF]*$.";

/// Categories allowed on data elements other than File and Blob
pub const DATA_ELEMENT_CATEGORIES: [&str; 3] = ["CONSTANT", "PARAMETER", "VARIABLE"];

lazy_static! {
    static ref ID_SHORT_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("idShort pattern is a valid regex");
}

/// The built-in catalogue, in evaluation order.
///
/// Only AASd-090 runs by default; the others must be enabled explicitly.
pub fn descriptors() -> Vec<ConstraintDescriptor> {
    vec![
        ConstraintDescriptor::new(AASD_002, AASD_002_MESSAGE, any_referable, check_id_short)
            .opt_in(),
        ConstraintDescriptor::new(
            AASD_090,
            AASD_090_MESSAGE,
            categorized_data_element,
            check_data_element_category,
        ),
        ConstraintDescriptor::new(AASD_100, AASD_100_MESSAGE, any_referable, check_non_empty_strings)
            .opt_in(),
        ConstraintDescriptor::new(AASD_130, AASD_130_MESSAGE, any_referable, check_xml_characters)
            .opt_in(),
    ]
}

fn any_referable(_: ElementKind) -> bool {
    true
}

/// Data elements except File and Blob
fn categorized_data_element(kind: ElementKind) -> bool {
    kind.is_data_element() && !matches!(kind, ElementKind::File | ElementKind::Blob)
}

/// Category of an element whose category is constrained at all.
///
/// File and Blob accept any category string, so no string rule inspects theirs.
fn constrained_category(facts: &dyn ModelFacts) -> Option<&str> {
    match facts.kind() {
        ElementKind::File | ElementKind::Blob => None,
        _ => facts.category(),
    }
}

fn check_id_short(facts: &dyn ModelFacts) -> CheckOutcome {
    let id_short = facts.identifier();
    if ID_SHORT_PATTERN.is_match(id_short) {
        CheckOutcome::Pass
    } else {
        CheckOutcome::fail_with(id_short)
    }
}

// An absent category passes; only a present one is constrained.
fn check_data_element_category(facts: &dyn ModelFacts) -> CheckOutcome {
    match facts.category() {
        Some(category) if !DATA_ELEMENT_CATEGORIES.contains(&category) => {
            CheckOutcome::fail_with(category)
        }
        _ => CheckOutcome::Pass,
    }
}

fn check_non_empty_strings(facts: &dyn ModelFacts) -> CheckOutcome {
    let empty = [
        ("category", constrained_category(facts)),
        ("contentType", facts.content_type()),
    ]
    .into_iter()
    .find(|(_, value)| value.is_some_and(str::is_empty));

    match empty {
        Some((attribute, _)) => CheckOutcome::fail_with(attribute),
        None => CheckOutcome::Pass,
    }
}

fn check_xml_characters(facts: &dyn ModelFacts) -> CheckOutcome {
    let attributes = [
        Some(facts.identifier()),
        constrained_category(facts),
        facts.content_type(),
    ];

    match attributes
        .into_iter()
        .flatten()
        .chain(facts.text_values())
        .find(|text| !text.chars().all(is_xml_char))
    {
        Some(text) => CheckOutcome::fail_with(text.escape_debug().to_string()),
        None => CheckOutcome::Pass,
    }
}

/// XML 1.0 `Char` production. Rust strings never hold surrogates.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{09}' | '\u{0A}' | '\u{0D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
