// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Name index over a scene and its boolean operand graph

use super::SceneNode;
use crate::error::{ExportError, ExportResult};
use ahash::AHashMap;

/// Lookup of every scene node by name, including nodes nested in groups.
#[derive(Debug, Clone)]
pub struct SceneIndex<'a> {
    roots: &'a [SceneNode],
    /// Every node, depth-first in scene order
    order: Vec<&'a SceneNode>,
    by_name: AHashMap<&'a str, &'a SceneNode>,
    /// Maps operand name to the booleans combining it
    consumers: AHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> SceneIndex<'a> {
    /// Index `roots`, rejecting empty and repeated names.
    pub fn build(roots: &'a [SceneNode]) -> ExportResult<Self> {
        let mut index = Self {
            roots,
            order: Vec::new(),
            by_name: AHashMap::new(),
            consumers: AHashMap::new(),
        };
        for node in roots {
            index.insert(node)?;
        }
        Ok(index)
    }

    fn insert(&mut self, node: &'a SceneNode) -> ExportResult<()> {
        if node.name.trim().is_empty() {
            return Err(ExportError::invalid_parameter(
                node.kind.type_tag(),
                "object name must not be empty",
            ));
        }
        if self.by_name.insert(node.name.as_str(), node).is_some() {
            return Err(ExportError::duplicate(&node.name));
        }
        self.order.push(node);

        for operand in node.kind.operands() {
            self.consumers
                .entry(operand)
                .or_default()
                .push(node.name.as_str());
        }
        for child in node.kind.children() {
            self.insert(child)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'a SceneNode> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// True when some boolean combines `name`.
    pub fn is_operand(&self, name: &str) -> bool {
        self.consumers.contains_key(name)
    }

    /// Booleans that use `name` as an operand.
    pub fn consumers(&self, name: &str) -> &[&'a str] {
        self.consumers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Root objects that no boolean consumes, in scene order.
    pub fn top_level(&self) -> Vec<&'a SceneNode> {
        self.roots
            .iter()
            .filter(|node| !self.is_operand(&node.name))
            .collect()
    }

    /// Material, element and isotope nodes, depth-first in scene order.
    pub fn material_nodes(&self) -> Vec<&'a SceneNode> {
        self.order
            .iter()
            .copied()
            .filter(|node| node.kind.is_material_graph())
            .collect()
    }

    /// Every indexed node, depth-first in scene order.
    pub fn nodes(&self) -> &[&'a SceneNode] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BooleanOperands, BoxParams, GroupParams, MaterialParams, NodeKind};

    fn cube(name: &str) -> SceneNode {
        SceneNode::new(name, NodeKind::Box(BoxParams { x: 1.0, y: 1.0, z: 1.0 }))
    }

    fn cut(name: &str, base: &str, tool: &str) -> SceneNode {
        SceneNode::new(
            name,
            NodeKind::BooleanCut(BooleanOperands {
                base: base.into(),
                tool: tool.into(),
            }),
        )
    }

    #[test]
    fn test_operands_are_not_top_level() {
        let roots = vec![cube("A"), cube("B"), cut("C", "A", "B"), cube("D")];
        let index = SceneIndex::build(&roots).unwrap();

        let top: Vec<&str> = index.top_level().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(top, vec!["C", "D"]);
        assert!(index.is_operand("A"));
        assert_eq!(index.consumers("B"), &["C"]);
        assert!(index.consumers("D").is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let roots = vec![cube("A"), cube("A")];
        let result = SceneIndex::build(&roots);
        assert!(matches!(result, Err(ExportError::DuplicateName { name }) if name == "A"));
    }

    #[test]
    fn test_group_children_indexed() {
        let group = SceneNode::new(
            "Materials",
            NodeKind::Group(GroupParams {
                children: vec![
                    SceneNode::new("Steel", NodeKind::Material(MaterialParams::default())),
                    cube("Inner"),
                ],
            }),
        );
        let roots = vec![group];
        let index = SceneIndex::build(&roots).unwrap();

        assert_eq!(index.len(), 3);
        assert!(index.contains("Inner"));
        let materials: Vec<&str> = index.material_nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(materials, vec!["Steel"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let roots = vec![cube("  ")];
        assert!(matches!(
            SceneIndex::build(&roots),
            Err(ExportError::InvalidParameter { .. })
        ));
    }
}
