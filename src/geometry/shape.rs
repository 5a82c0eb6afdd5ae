// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boundary representation supplied by the host's geometry kernel

use super::{BoundingBox, Mesh};
use crate::error::{ExportError, ExportResult};
use ahash::AHashMap;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Kind of surface underlying a face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Planar,
    Curved,
}

/// One boundary face: its outer vertex loop and surface kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<Point3<f64>>,
    #[serde(default)]
    pub surface: Surface,
}

impl Face {
    pub fn planar(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            surface: Surface::Planar,
        }
    }

    pub fn curved(vertices: Vec<Point3<f64>>) -> Self {
        Self {
            vertices,
            surface: Surface::Curved,
        }
    }

    pub fn is_planar(&self) -> bool {
        self.surface == Surface::Planar
    }
}

/// Boundary shape of a scene object, in the object's local frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub faces: Vec<Face>,
}

impl Shape {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// True when every face lies on a planar surface.
    pub fn is_all_planar(&self) -> bool {
        self.faces.iter().all(Face::is_planar)
    }

    /// True when at least one face has three or more vertices.
    pub fn has_facets(&self) -> bool {
        self.faces.iter().any(|f| f.vertices.len() >= 3)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.faces.iter().flat_map(|f| f.vertices.iter()))
    }
}

/// Converts a boundary shape into a triangle mesh.
pub trait Mesher {
    fn discretize(&self, object: &str, shape: &Shape) -> ExportResult<Mesh>;
}

/// Welds coincident vertices and fan-triangulates each face loop.
///
/// Adequate when the host already delivers curved faces as fine polygon
/// loops; a kernel-backed mesher can be plugged in through [`Mesher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FanMesher;

impl Mesher for FanMesher {
    fn discretize(&self, object: &str, shape: &Shape) -> ExportResult<Mesh> {
        let mut mesh = Mesh::new();
        let mut welded: AHashMap<[u64; 3], usize> = AHashMap::new();

        for face in &shape.faces {
            if face.vertices.len() < 3 {
                continue;
            }
            let indices: Vec<usize> = face
                .vertices
                .iter()
                .map(|p| {
                    let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
                    *welded.entry(key).or_insert_with(|| mesh.add_vertex(*p))
                })
                .collect();

            for i in 1..indices.len() - 1 {
                mesh.add_triangle([indices[0], indices[i], indices[i + 1]]);
            }
        }

        if mesh.triangle_count() == 0 {
            return Err(ExportError::mesher(object, "shape has no faces to mesh"));
        }
        Ok(mesh)
    }
}
