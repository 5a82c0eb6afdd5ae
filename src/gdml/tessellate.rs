// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tessellated solids from boundary shapes, meshes and explicit facets

use super::document::Element;
use super::registry::NameKind;
use super::session::{ResolvedSolid, Session};
use crate::error::{ExportError, ExportResult};
use crate::geometry::{BoundingBox, Mesh, Shape};
use crate::scene::{SceneNode, TessellatedParams};
use nalgebra::{Point3, Vector3};
use tracing::debug;

const PREFIX: &str = "Tess";

fn facet(tag: &str, names: &[&String]) -> Element {
    let mut element = Element::new(tag);
    for (i, name) in names.iter().enumerate() {
        element.set(format!("vertex{}", i + 1), name.as_str());
    }
    element.attr("type", "ABSOLUTE")
}

/// Facet elements over already defined vertex names. Loops of more than
/// four vertices are split into a triangle fan.
fn facets(vertices: &[String]) -> Vec<Element> {
    match vertices.len() {
        3 => vec![facet("triangular", &[&vertices[0], &vertices[1], &vertices[2]])],
        4 => vec![facet(
            "quadrangular",
            &[&vertices[0], &vertices[1], &vertices[2], &vertices[3]],
        )],
        n if n > 4 => (1..n - 1)
            .map(|i| facet("triangular", &[&vertices[0], &vertices[i], &vertices[i + 1]]))
            .collect(),
        _ => Vec::new(),
    }
}

impl<'a> Session<'a> {
    fn define_vertex(&mut self, p: &Point3<f64>) -> String {
        self.define_position(NameKind::Vertex, "", &p.coords)
    }

    fn begin_tessellated(&mut self, node: &SceneNode) -> ExportResult<(String, Element)> {
        let name = format!("{}{}", PREFIX, node.name);
        self.registry.claim(&name)?;
        let element = Element::new("tessellated").attr("name", name.as_str());
        Ok((name, element))
    }

    fn finish_tessellated(
        &mut self,
        node: &SceneNode,
        name: String,
        element: Element,
        extent: BoundingBox,
    ) -> ExportResult<ResolvedSolid> {
        if element.children.is_empty() {
            return Err(ExportError::invalid_parameter(
                &node.name,
                "no facets to tessellate",
            ));
        }
        debug!(object = %node.name, facets = element.children.len(), "tessellated");
        self.append_solid(element);
        Ok(ResolvedSolid {
            name,
            delta: Vector3::zeros(),
            extent,
        })
    }

    /// Planar shapes keep their faces; anything curved goes through the
    /// mesher.
    pub(crate) fn tessellate_shape(
        &mut self,
        node: &SceneNode,
        shape: &Shape,
    ) -> ExportResult<ResolvedSolid> {
        if !shape.is_all_planar() {
            let mesh = self.mesher.discretize(&node.name, shape)?;
            return self.tessellate_mesh(node, &mesh);
        }

        let (name, mut element) = self.begin_tessellated(node)?;
        for (i, face) in shape.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                self.warn(format!(
                    "'{}': face {} has {} vertices, skipped",
                    node.name,
                    i,
                    face.vertices.len()
                ));
                continue;
            }
            // One position per vertex occurrence
            let names: Vec<String> = face.vertices.iter().map(|p| self.define_vertex(p)).collect();
            for facet in facets(&names) {
                element.push(facet);
            }
        }
        self.finish_tessellated(node, name, element, shape.bounding_box())
    }

    /// One position per mesh vertex, one triangle per mesh triangle.
    pub(crate) fn tessellate_mesh(
        &mut self,
        node: &SceneNode,
        mesh: &Mesh,
    ) -> ExportResult<ResolvedSolid> {
        if let Some(index) = mesh.find_invalid_index() {
            return Err(ExportError::mesher(
                &node.name,
                format!("triangle refers to vertex {} of {}", index, mesh.vertex_count()),
            ));
        }

        let (name, mut element) = self.begin_tessellated(node)?;
        let names: Vec<String> = mesh.vertices.iter().map(|p| self.define_vertex(p)).collect();
        for [a, b, c] in &mesh.triangles {
            let triangle = [names[*a].clone(), names[*b].clone(), names[*c].clone()];
            element.children.extend(facets(&triangle));
        }
        self.finish_tessellated(node, name, element, mesh.bounding_box())
    }

    /// Explicit triangle and quadrangle facets.
    pub(crate) fn tessellate_facets(
        &mut self,
        node: &SceneNode,
        params: &TessellatedParams,
    ) -> ExportResult<ResolvedSolid> {
        for (i, facet) in params.facets.iter().enumerate() {
            let count = facet.vertices.len();
            if !(3..=4).contains(&count) {
                return Err(ExportError::invalid_parameter(
                    &node.name,
                    format!("facet {} has {} vertices, expected 3 or 4", i, count),
                ));
            }
        }

        let (name, mut element) = self.begin_tessellated(node)?;
        let mut extent = BoundingBox::empty();
        for facet in &params.facets {
            let names: Vec<String> = facet
                .vertices
                .iter()
                .map(|p| {
                    extent.expand_to_include(p);
                    self.define_vertex(p)
                })
                .collect();
            element.children.extend(facets(&names));
        }
        self.finish_tessellated(node, name, element, extent)
    }
}
