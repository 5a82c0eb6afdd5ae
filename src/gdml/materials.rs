// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Constants, isotopes, elements and materials
//!
//! The material graph is written in dependency order: every constituent a
//! material or element references is emitted before it. References to
//! names outside the scene (NIST `G4_*` materials, for instance) are left
//! for the consumer to resolve.

use super::document::{Element, Section};
use super::session::Session;
use crate::error::{ExportError, ExportResult};
use crate::scene::{
    fraction_sum, Component, ElementParams, IsotopeParams, MaterialParams, NodeKind, Quantity,
    SceneNode,
};
use crate::utils::math::format_number;
use ahash::AHashSet;
use tracing::debug;

const FRACTION_TOLERANCE: f64 = 1e-6;

fn quantity(tag: &str, q: &Quantity) -> Element {
    let element = Element::new(tag).attr("unit", q.unit.as_str());
    match q.value {
        Some(value) => element.num("value", value),
        None => element,
    }
}

fn component(c: &Component) -> Element {
    match c {
        Component::Fraction { n, reference } => Element::new("fraction")
            .num("n", *n)
            .attr("ref", reference.as_str()),
        Component::Composite { n, reference } => Element::new("composite")
            .attr("n", n.to_string())
            .attr("ref", reference.as_str()),
    }
}

fn with_optional(element: Element, key: &str, value: Option<&str>) -> Element {
    match value {
        Some(value) => element.attr(key, value),
        None => element,
    }
}

fn material_element(name: &str, params: &MaterialParams) -> Element {
    let mut element = with_optional(
        Element::new("material").attr("name", name),
        "formula",
        params.formula.as_deref(),
    );
    if let Some(z) = params.z {
        element = element.num("Z", z);
    }

    let properties = [
        ("T", &params.temperature),
        ("MEE", &params.mean_excitation),
        ("D", &params.density),
        ("atom", &params.atom),
    ];
    for (tag, property) in properties {
        if let Some(q) = property {
            element.push(quantity(tag, q));
        }
    }
    for c in &params.components {
        element.push(component(c));
    }
    element
}

fn element_element(name: &str, params: &ElementParams) -> Element {
    let mut element = with_optional(
        Element::new("element").attr("name", name),
        "formula",
        params.formula.as_deref(),
    );
    if let Some(z) = params.z {
        element = element.num("Z", z);
    }
    if let Some(atom) = &params.atom {
        element.push(quantity("atom", atom));
    }
    for c in &params.components {
        element.push(component(c));
    }
    element
}

fn isotope_element(name: &str, params: &IsotopeParams) -> Element {
    Element::new("isotope")
        .attr("name", name)
        .attr("N", params.n.to_string())
        .attr("Z", format_number(params.z))
        .child(quantity("atom", &params.atom))
}

fn components(node: &SceneNode) -> &[Component] {
    match &node.kind {
        NodeKind::Material(params) => &params.components,
        NodeKind::Element(params) => &params.components,
        _ => &[],
    }
}

#[derive(Default)]
struct Walk<'a> {
    done: AHashSet<&'a str>,
    visiting: AHashSet<&'a str>,
}

impl<'a> Session<'a> {
    /// Write every constant and the whole material graph.
    pub(crate) fn emit_materials(&mut self) -> ExportResult<()> {
        for node in self.index.nodes().to_vec() {
            if let NodeKind::Constant(constant) = &node.kind {
                self.registry.claim(&node.name)?;
                self.document.append(
                    Section::Define,
                    Element::new("constant")
                        .attr("name", node.name.as_str())
                        .attr("value", constant.value.as_str()),
                );
            }
        }

        let mut walk = Walk::default();
        for node in self.index.material_nodes() {
            self.visit_material(node, &mut walk)?;
        }
        Ok(())
    }

    fn visit_material(&mut self, node: &'a SceneNode, walk: &mut Walk<'a>) -> ExportResult<()> {
        let name = node.name.as_str();
        if walk.done.contains(name) {
            return Ok(());
        }
        if !walk.visiting.insert(name) {
            return Err(ExportError::CyclicReference {
                name: name.to_string(),
            });
        }

        for c in components(node) {
            match self.index.get(c.reference()) {
                Some(constituent) if constituent.kind.is_material_graph() => {
                    self.visit_material(constituent, walk)?;
                }
                Some(other) => {
                    return Err(ExportError::invalid_parameter(
                        name,
                        format!(
                            "component '{}' is a {}, not a material, element or isotope",
                            other.name,
                            other.kind.type_tag()
                        ),
                    ));
                }
                None => debug!(material = name, reference = c.reference(), "external reference"),
            }
        }

        self.emit_material_node(node)?;
        walk.visiting.remove(name);
        walk.done.insert(name);
        Ok(())
    }

    fn emit_material_node(&mut self, node: &SceneNode) -> ExportResult<()> {
        let element = match &node.kind {
            NodeKind::Material(params) => {
                self.check_fractions(node, &params.components);
                material_element(&node.name, params)
            }
            NodeKind::Element(params) => {
                if params
                    .components
                    .iter()
                    .any(|c| matches!(c, Component::Composite { .. }))
                {
                    return Err(ExportError::invalid_parameter(
                        &node.name,
                        "elements can only hold isotope fractions",
                    ));
                }
                self.check_fractions(node, &params.components);
                element_element(&node.name, params)
            }
            NodeKind::Isotope(params) => isotope_element(&node.name, params),
            _ => return Ok(()),
        };
        self.document.append(Section::Materials, element);
        Ok(())
    }

    /// Fractions should sum to one; this is the input's responsibility.
    fn check_fractions(&mut self, node: &SceneNode, components: &[Component]) {
        if let Some(sum) = fraction_sum(components) {
            if (sum - 1.0).abs() > FRACTION_TOLERANCE {
                self.warn(format!(
                    "'{}': fractions sum to {}, expected 1",
                    node.name,
                    format_number(sum)
                ));
            }
        }
    }
}
