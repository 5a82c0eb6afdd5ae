// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean solids: subtraction, union, intersection and multi-union

use super::document::Element;
use super::registry::NameKind;
use super::session::{reference, ResolvedSolid, Session};
use crate::error::{ExportError, ExportResult};
use crate::geometry::BoundingBox;
use crate::scene::{BooleanOperands, MultiOperands, SceneNode};
use crate::utils::math::is_zero_vector;

/// Two-operand boolean operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Subtraction,
    Union,
    Intersection,
}

impl BooleanKind {
    pub fn tag(self) -> &'static str {
        match self {
            BooleanKind::Subtraction => "subtraction",
            BooleanKind::Union => "union",
            BooleanKind::Intersection => "intersection",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            BooleanKind::Subtraction => "Cut",
            BooleanKind::Union => "Union",
            BooleanKind::Intersection => "Intersect",
        }
    }
}

const MULTI_UNION_PREFIX: &str = "MultiFuse";

impl<'a> Session<'a> {
    /// Resolve an operand by name, without giving it a volume.
    fn resolve_operand(
        &mut self,
        owner: &SceneNode,
        name: &str,
    ) -> ExportResult<(&'a SceneNode, ResolvedSolid)> {
        let operand = self
            .index
            .get(name)
            .ok_or_else(|| ExportError::MissingOperand {
                object: owner.name.clone(),
                operand: name.to_string(),
            })?;

        match self.resolve(operand, false)? {
            Some(solid) => Ok((operand, solid)),
            None => Err(ExportError::MissingGeometry {
                object: operand.name.clone(),
            }),
        }
    }

    /// Operand rotations are not carried into the boolean; flag them.
    fn check_relative_rotation(&mut self, owner: &SceneNode, first: &SceneNode, other: &SceneNode) {
        if !self.config.report_boolean_rotation {
            return;
        }
        let relative = first.placement.rotation.relative_to(&other.placement.rotation);
        if !relative.is_identity(self.config.zero_tolerance) {
            self.warn(format!(
                "'{}': rotation of '{}' relative to '{}' ({:.3} deg) is not exported",
                owner.name, other.name, first.name, relative.angle
            ));
        }
    }

    pub(crate) fn resolve_boolean(
        &mut self,
        node: &'a SceneNode,
        kind: BooleanKind,
        operands: &BooleanOperands,
    ) -> ExportResult<ResolvedSolid> {
        let (base_node, base) = self.resolve_operand(node, &operands.base)?;
        let (tool_node, tool) = self.resolve_operand(node, &operands.tool)?;

        let name = format!("{}{}", kind.prefix(), node.name);
        self.registry.claim(&name)?;

        self.check_relative_rotation(node, base_node, tool_node);
        let offset = tool_node.placement.base - base_node.placement.base;
        let position = self.define_position(NameKind::RelativePosition, &node.name, &offset);

        let element = Element::new(kind.tag())
            .attr("name", name.as_str())
            .child(reference("first", &base.name))
            .child(reference("second", &tool.name))
            .child(reference("positionref", &position));
        self.append_solid(element);

        let extent = match kind {
            BooleanKind::Union => {
                let mut extent = base.extent;
                extent.merge(&tool.extent.translated(&offset));
                extent
            }
            BooleanKind::Subtraction | BooleanKind::Intersection => base.extent,
        };

        Ok(ResolvedSolid {
            name,
            delta: base.delta,
            extent,
        })
    }

    pub(crate) fn resolve_multi_union(
        &mut self,
        node: &'a SceneNode,
        operands: &MultiOperands,
    ) -> ExportResult<ResolvedSolid> {
        if operands.shapes.is_empty() {
            return Err(ExportError::invalid_parameter(
                &node.name,
                "multi-union has no operands",
            ));
        }

        let mut resolved = Vec::with_capacity(operands.shapes.len());
        for shape in &operands.shapes {
            resolved.push(self.resolve_operand(node, shape)?);
        }

        let name = format!("{}{}", MULTI_UNION_PREFIX, node.name);
        self.registry.claim(&name)?;

        let (first_node, first) = &resolved[0];
        let origin = first_node.placement.base;
        let delta = first.delta;

        let mut element = Element::new("multiUnion").attr("name", name.as_str());
        let mut extent = BoundingBox::empty();
        for (operand, solid) in &resolved {
            self.check_relative_rotation(node, resolved[0].0, operand);

            let mut union_node = Element::new("multiUnionNode")
                .attr("name", format!("Node-{}", solid.name))
                .child(reference("solid", &solid.name));

            let offset = operand.placement.base - origin;
            if !is_zero_vector(&offset, self.config.zero_tolerance) {
                let position =
                    self.define_position(NameKind::RelativePosition, &node.name, &offset);
                union_node.push(reference("positionref", &position));
            }
            element.push(union_node);
            extent.merge(&solid.extent.translated(&offset));
        }
        self.append_solid(element);

        Ok(ResolvedSolid {
            name,
            delta,
            extent,
        })
    }
}
