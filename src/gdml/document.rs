// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory GDML tree and its pretty-printed serialization

use crate::error::ExportResult;
use crate::utils::math::format_number;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const GDML_SCHEMA: &str =
    "http://service-spi.web.cern.ch/service-spi/app/releases/GDML/schema/gdml.xsd";

/// Name of the volume the `setup` section points at.
pub const WORLD_VOLUME: &str = "worldVOL";

/// XML element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Numeric attribute in plain decimal form.
    pub fn num(self, key: impl Into<String>, value: f64) -> Self {
        self.attr(key, format_number(value))
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with tag `name`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'e>(&'e self, name: &'e str) -> impl Iterator<Item = &'e Element> + 'e {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> ExportResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Top-level sections of a GDML document, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Define,
    Materials,
    Solids,
    Structure,
    Setup,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Define,
        Section::Materials,
        Section::Solids,
        Section::Structure,
        Section::Setup,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Section::Define => "define",
            Section::Materials => "materials",
            Section::Solids => "solids",
            Section::Structure => "structure",
            Section::Setup => "setup",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }
}

/// GDML document skeleton with its five fixed sections.
#[derive(Debug, Clone, PartialEq)]
pub struct GdmlDocument {
    sections: [Element; 5],
}

impl GdmlDocument {
    pub fn new() -> Self {
        let mut sections = Section::ALL.map(|s| Element::new(s.tag()));
        sections[Section::Setup.slot()] = Element::new(Section::Setup.tag())
            .attr("name", "Default")
            .attr("version", "1.0")
            .child(Element::new("world").attr("ref", WORLD_VOLUME));
        Self { sections }
    }

    pub fn section(&self, section: Section) -> &Element {
        &self.sections[section.slot()]
    }

    pub fn append(&mut self, section: Section, element: Element) {
        self.sections[section.slot()].push(element);
    }

    /// Number of entries written to `section` so far.
    pub fn len(&self, section: Section) -> usize {
        self.sections[section.slot()].children.len()
    }

    /// Child of `section` whose `name` attribute is `name`.
    pub fn find_named(&self, section: Section, name: &str) -> Option<&Element> {
        self.section(section)
            .children
            .iter()
            .find(|e| e.get("name") == Some(name))
    }

    /// Write the document with an XML declaration and two-space indentation.
    pub fn write_to<W: Write>(&self, out: W) -> ExportResult<()> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("gdml");
        root.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
        root.push_attribute(("xsi:noNamespaceSchemaLocation", GDML_SCHEMA));
        writer.write_event(Event::Start(root))?;

        for section in &self.sections {
            section.write(&mut writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("gdml")))?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    pub fn to_xml_string(&self) -> ExportResult<String> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer.into_inner()).into_owned())
    }
}

impl Default for GdmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_layout() {
        let xml = GdmlDocument::new().to_xml_string().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let order = ["<define/>", "<materials/>", "<solids/>", "<structure/>", "<setup "];
        let positions: Vec<usize> = order
            .iter()
            .map(|tag| xml.find(tag).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(xml.contains("<setup name=\"Default\" version=\"1.0\">"));
        assert!(xml.contains("<world ref=\"worldVOL\"/>"));
    }

    #[test]
    fn test_nested_elements_are_indented() {
        let mut doc = GdmlDocument::new();
        doc.append(
            Section::Solids,
            Element::new("box")
                .attr("name", "BoxA")
                .num("x", 10.0)
                .num("y", 2.5)
                .attr("lunit", "mm"),
        );
        let xml = doc.to_xml_string().unwrap();

        assert!(xml.contains(concat!(
            "\n  <solids>",
            "\n    <box name=\"BoxA\" x=\"10\" y=\"2.5\" lunit=\"mm\"/>",
            "\n  </solids>"
        )));
        assert_eq!(doc.len(Section::Solids), 1);
        assert!(doc.find_named(Section::Solids, "BoxA").is_some());
    }

    #[test]
    fn test_set_replaces_attribute() {
        let mut element = Element::new("position").attr("x", "1");
        element.set("x", "2");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.get("x"), Some("2"));
    }

    #[test]
    fn test_section_from_tag() {
        assert_eq!(Section::from_tag("solids"), Some(Section::Solids));
        assert_eq!(Section::from_tag("gdml"), None);
    }
}
