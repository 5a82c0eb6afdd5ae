// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reading GDML back: flat element records and reference checking

use super::document::Section;
use crate::error::ExportResult;
use ahash::AHashSet;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One element of a parsed GDML document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Top-level section the element sits in, if any
    pub section: Option<Section>,
    /// Nesting depth below the `gdml` root (sections are at 1)
    pub depth: usize,
}

impl ParsedElement {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as a number.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }
}

fn record(e: &BytesStart<'_>, stack: &[String]) -> ParsedElement {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attributes = e
        .attributes()
        .flatten()
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect();
    let section = match stack.get(1) {
        Some(parent) => Section::from_tag(parent),
        None if stack.len() == 1 => Section::from_tag(&tag),
        None => None,
    };

    ParsedElement {
        tag,
        attributes,
        section,
        depth: stack.len(),
    }
}

/// Parse `xml` into elements in document order.
pub fn parse_elements(xml: &str) -> ExportResult<Vec<ParsedElement>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut elements = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let element = record(e, &stack);
                stack.push(element.tag.clone());
                elements.push(element);
            }
            Event::Empty(ref e) => elements.push(record(e, &stack)),
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(elements)
}

/// First element with tag `tag` whose `name` attribute is `name`.
pub fn find_named<'e>(
    elements: &'e [ParsedElement],
    tag: &str,
    name: &str,
) -> Option<&'e ParsedElement> {
    elements
        .iter()
        .find(|e| e.tag == tag && e.get("name") == Some(name))
}

/// Attributes that point at another element by name.
const REFERENCE_ATTRIBUTES: [&str; 5] = ["ref", "vertex1", "vertex2", "vertex3", "vertex4"];

/// A name used by one element's attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub element: String,
    pub attribute: String,
    pub target: String,
}

/// Outcome of [`check_references`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceReport {
    /// References to names defined only further down the document
    pub forward: Vec<Reference>,
    /// References to names the document never defines
    pub unresolved: Vec<Reference>,
}

impl ReferenceReport {
    /// No reference points ahead of its target.
    pub fn is_ordered(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Check that every reference names an element defined earlier.
///
/// Unresolved names are reported separately; materials from an external
/// database are a legitimate source of them.
pub fn check_references(xml: &str) -> ExportResult<ReferenceReport> {
    let elements = parse_elements(xml)?;
    let all_names: AHashSet<&str> = elements.iter().filter_map(|e| e.get("name")).collect();

    let mut defined: AHashSet<&str> = AHashSet::new();
    let mut report = ReferenceReport::default();

    for element in &elements {
        for (key, value) in &element.attributes {
            if !REFERENCE_ATTRIBUTES.contains(&key.as_str()) || defined.contains(value.as_str()) {
                continue;
            }
            let reference = Reference {
                element: element.tag.clone(),
                attribute: key.clone(),
                target: value.clone(),
            };
            if all_names.contains(value.as_str()) {
                report.forward.push(reference);
            } else {
                report.unresolved.push(reference);
            }
        }
        if let Some(name) = element.get("name") {
            defined.insert(name);
        }
    }
    Ok(report)
}
