// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! State of one export run and the per-kind dispatcher

use super::boolean::BooleanKind;
use super::document::{Element, GdmlDocument, Section};
use super::registry::{NameKind, NameRegistry};
use super::solids::Encode;
use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::exporter::ExportReport;
use crate::geometry::{BoundingBox, Mesher};
use crate::scene::{NodeKind, SceneIndex, SceneNode};
use ahash::{AHashMap, AHashSet};
use nalgebra::Vector3;
use tracing::{debug, warn};

/// A solid already written to the `solids` section.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedSolid {
    pub name: String,
    /// Host anchor to GDML origin, in the object's local frame.
    pub delta: Vector3<f64>,
    /// Extent around the GDML origin.
    pub extent: BoundingBox,
}

/// Everything mutable during one export: registry, document, world volume
/// and the memo of resolved objects. Dropped when the export returns.
pub(crate) struct Session<'a> {
    pub(crate) config: &'a ExportConfig,
    pub(crate) mesher: &'a dyn Mesher,
    pub(crate) index: SceneIndex<'a>,
    pub(crate) registry: NameRegistry,
    pub(crate) document: GdmlDocument,
    pub(crate) world: Element,
    pub(crate) world_extent: BoundingBox,
    pub(crate) report: ExportReport,
    resolved: AHashMap<&'a str, Option<ResolvedSolid>>,
    in_progress: AHashSet<&'a str>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        config: &'a ExportConfig,
        mesher: &'a dyn Mesher,
        index: SceneIndex<'a>,
        world: Element,
    ) -> Self {
        Self {
            config,
            mesher,
            index,
            registry: NameRegistry::new(),
            document: GdmlDocument::new(),
            world,
            world_extent: BoundingBox::empty(),
            report: ExportReport::default(),
            resolved: AHashMap::new(),
            in_progress: AHashSet::new(),
        }
    }

    /// Resolve every object that no boolean consumes, placing each solid
    /// in the world volume.
    pub(crate) fn resolve_top_level(&mut self) -> ExportResult<()> {
        for node in self.index.top_level() {
            self.resolve(node, true)?;
        }

        // Booleans that only consume each other are unreachable from the
        // top level; resolving them surfaces the cycle.
        for node in self.index.nodes().to_vec() {
            if !node.kind.operands().is_empty() && !self.resolved.contains_key(node.name.as_str()) {
                self.resolve(node, false)?;
            }
        }
        Ok(())
    }

    /// Write `node`'s solid (once) and, with `add_volumes`, its logical and
    /// physical volume. Returns `None` for nodes without a solid.
    pub(crate) fn resolve(
        &mut self,
        node: &'a SceneNode,
        add_volumes: bool,
    ) -> ExportResult<Option<ResolvedSolid>> {
        let name = node.name.as_str();
        let solid = match self.resolved.get(name) {
            Some(done) => done.clone(),
            None => {
                if !self.in_progress.insert(name) {
                    return Err(ExportError::CyclicReference {
                        name: name.to_string(),
                    });
                }
                let solid = self.dispatch(node, add_volumes)?;
                self.in_progress.remove(name);
                self.resolved.insert(name, solid.clone());
                solid
            }
        };

        if add_volumes {
            if let Some(solid) = &solid {
                self.place_volume(node, solid)?;
            }
        }
        Ok(solid)
    }

    fn dispatch(
        &mut self,
        node: &'a SceneNode,
        add_volumes: bool,
    ) -> ExportResult<Option<ResolvedSolid>> {
        debug!(object = %node.name, kind = node.kind.type_tag(), "resolving");

        let solid = match &node.kind {
            NodeKind::Box(p) => self.emit_primitive(node, p)?,
            NodeKind::Cylinder(p) => self.emit_primitive(node, p)?,
            NodeKind::PartSphere(p) => self.emit_primitive(node, p)?,
            NodeKind::Cone(p) => self.emit_primitive(node, p)?,
            NodeKind::EllipticalCone(p) => self.emit_primitive(node, p)?,
            NodeKind::Ellipsoid(p) => self.emit_primitive(node, p)?,
            NodeKind::EllipticalTube(p) => self.emit_primitive(node, p)?,
            NodeKind::Polycone(p) => self.emit_primitive(node, p)?,
            NodeKind::Sphere(p) => self.emit_primitive(node, p)?,
            NodeKind::Trapezoid(p) => self.emit_primitive(node, p)?,
            NodeKind::TrapezoidDual(p) => self.emit_primitive(node, p)?,
            NodeKind::Tube(p) => self.emit_primitive(node, p)?,
            NodeKind::Extrusion(p) => self.emit_primitive(node, p)?,
            NodeKind::Tessellated(p) => self.tessellate_facets(node, p)?,

            NodeKind::BooleanCut(ops) => {
                self.resolve_boolean(node, BooleanKind::Subtraction, ops)?
            }
            NodeKind::BooleanUnion(ops) => {
                self.resolve_boolean(node, BooleanKind::Union, ops)?
            }
            NodeKind::BooleanIntersection(ops) => {
                self.resolve_boolean(node, BooleanKind::Intersection, ops)?
            }
            NodeKind::BooleanMultiUnion(ops) => self.resolve_multi_union(node, ops)?,
            NodeKind::BooleanMultiCommon(_) => {
                return Err(ExportError::unsupported(
                    &node.name,
                    "intersection of more than two solids has no GDML representation",
                ))
            }

            NodeKind::MeshFeature(p) => self.tessellate_mesh(node, &p.mesh)?,
            NodeKind::GenericShape(p) => match p.shape.as_ref().filter(|s| s.has_facets()) {
                Some(shape) => self.tessellate_shape(node, shape)?,
                None => {
                    if add_volumes {
                        let reason = match p.shape {
                            Some(_) => "no face with three or more vertices",
                            None => "no shape data",
                        };
                        self.warn(format!("'{}' has {}, skipped", node.name, reason));
                        self.report.skipped.push(node.name.clone());
                    }
                    return Ok(None);
                }
            },

            NodeKind::Group(group) => {
                for child in &group.children {
                    if !self.index.is_operand(&child.name) {
                        self.resolve(child, add_volumes)?;
                    }
                }
                return Ok(None);
            }

            // Written by the material walker
            NodeKind::Material(_)
            | NodeKind::Element(_)
            | NodeKind::Isotope(_)
            | NodeKind::Constant(_) => return Ok(None),
        };
        Ok(Some(solid))
    }

    fn emit_primitive<P: Encode>(
        &mut self,
        node: &SceneNode,
        params: &P,
    ) -> ExportResult<ResolvedSolid> {
        let encoded = params.encode(&node.name)?;
        self.registry.claim(&encoded.name)?;
        self.append_solid(encoded.element);
        Ok(ResolvedSolid {
            name: encoded.name,
            delta: encoded.delta,
            extent: encoded.extent,
        })
    }

    pub(crate) fn append_solid(&mut self, element: Element) {
        self.document.append(Section::Solids, element);
        self.report.solids += 1;
    }

    /// Named `position` define in mm; returns its name.
    pub(crate) fn define_position(
        &mut self,
        kind: NameKind,
        base: &str,
        v: &Vector3<f64>,
    ) -> String {
        let name = self.registry.next_name(kind, base);
        self.document.append(
            Section::Define,
            Element::new("position")
                .attr("name", name.as_str())
                .attr("unit", "mm")
                .num("x", v.x)
                .num("y", v.y)
                .num("z", v.z),
        );
        name
    }

    /// Advisory diagnostic: logged and kept in the report.
    pub(crate) fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.report.warnings.push(message);
    }

    /// Document, world physical volumes, their extent and the report.
    pub(crate) fn into_parts(self) -> (GdmlDocument, Element, BoundingBox, ExportReport) {
        (self.document, self.world, self.world_extent, self.report)
    }
}

pub(crate) fn reference(tag: &str, name: &str) -> Element {
    Element::new(tag).attr("ref", name)
}
