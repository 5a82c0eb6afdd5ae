// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene data model handed over by the host application

mod index;
mod material;
mod node;

pub use index::SceneIndex;
pub use material::{fraction_sum, Component, ElementParams, IsotopeParams, MaterialParams, Quantity};
pub use node::*;

use serde::{Deserialize, Serialize};

/// Ordered collection of top-level scene objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneNode>,
}

impl Scene {
    pub fn new(objects: Vec<SceneNode>) -> Self {
        Self { objects }
    }

    pub fn push(&mut self, node: SceneNode) {
        self.objects.push(node);
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Placement;

    #[test]
    fn test_scene_json_roundtrip() {
        let mut scene = Scene::default();
        scene.push(
            SceneNode::new("A", NodeKind::Box(BoxParams { x: 10.0, y: 20.0, z: 30.0 }))
                .with_placement(Placement::from_translation(5.0, 0.0, 0.0)),
        );
        scene.push(SceneNode::new(
            "Air",
            NodeKind::Material(MaterialParams {
                density: Some(Quantity::new("g/cm3", 0.0012)),
                components: vec![Component::fraction(0.7, "N"), Component::fraction(0.3, "O")],
                ..Default::default()
            }),
        ));

        let json = scene.to_json().unwrap();
        let parsed = Scene::from_json(&json).unwrap();
        assert_eq!(parsed, scene);
    }
}
