// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene node definitions

use super::material::{ElementParams, IsotopeParams, MaterialParams};
use crate::geometry::{Mesh, Placement, Shape};
use crate::utils::math::deg_to_rad;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Angle unit declared on an angular solid. Values are written as given,
/// with this unit in the `aunit` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    #[serde(alias = "radian")]
    Rad,
    #[serde(alias = "degree")]
    Deg,
}

impl AngleUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            AngleUnit::Rad => "rad",
            AngleUnit::Deg => "deg",
        }
    }

    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Rad => value,
            AngleUnit::Deg => deg_to_rad(value),
        }
    }
}

/// A named object of the host scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default)]
    pub placement: Placement,
    /// Material reference for the object's logical volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            placement: Placement::identity(),
            material: None,
            kind,
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// Closed set of object kinds the exporter understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    // Primitive solids
    Box(BoxParams),
    Cylinder(CylinderParams),
    PartSphere(PartSphereParams),
    Cone(ConeParams),
    EllipticalCone(EllipticalConeParams),
    Ellipsoid(EllipsoidParams),
    EllipticalTube(EllipticalTubeParams),
    Polycone(PolyconeParams),
    Sphere(SphereParams),
    Trapezoid(TrapezoidParams),
    TrapezoidDual(TrapezoidDualParams),
    Tube(TubeParams),
    Tessellated(TessellatedParams),
    Extrusion(ExtrusionParams),

    // Boolean operations
    BooleanCut(BooleanOperands),
    BooleanUnion(BooleanOperands),
    BooleanIntersection(BooleanOperands),
    BooleanMultiUnion(MultiOperands),
    BooleanMultiCommon(MultiOperands),

    // Arbitrary geometry
    MeshFeature(MeshParams),
    GenericShape(ShapeParams),

    // Containers and material graph
    Group(GroupParams),
    Material(MaterialParams),
    Element(ElementParams),
    Isotope(IsotopeParams),
    Constant(ConstantParams),
}

impl NodeKind {
    pub fn type_tag(&self) -> &'static str {
        match self {
            NodeKind::Box(_) => "Box",
            NodeKind::Cylinder(_) => "Cylinder",
            NodeKind::PartSphere(_) => "PartSphere",
            NodeKind::Cone(_) => "Cone",
            NodeKind::EllipticalCone(_) => "EllipticalCone",
            NodeKind::Ellipsoid(_) => "Ellipsoid",
            NodeKind::EllipticalTube(_) => "EllipticalTube",
            NodeKind::Polycone(_) => "Polycone",
            NodeKind::Sphere(_) => "Sphere",
            NodeKind::Trapezoid(_) => "Trapezoid",
            NodeKind::TrapezoidDual(_) => "TrapezoidDual",
            NodeKind::Tube(_) => "Tube",
            NodeKind::Tessellated(_) => "Tessellated",
            NodeKind::Extrusion(_) => "Extrusion",
            NodeKind::BooleanCut(_) => "BooleanCut",
            NodeKind::BooleanUnion(_) => "BooleanUnion",
            NodeKind::BooleanIntersection(_) => "BooleanIntersection",
            NodeKind::BooleanMultiUnion(_) => "BooleanMultiUnion",
            NodeKind::BooleanMultiCommon(_) => "BooleanMultiCommon",
            NodeKind::MeshFeature(_) => "MeshFeature",
            NodeKind::GenericShape(_) => "GenericShape",
            NodeKind::Group(_) => "Group",
            NodeKind::Material(_) => "Material",
            NodeKind::Element(_) => "Element",
            NodeKind::Isotope(_) => "Isotope",
            NodeKind::Constant(_) => "Constant",
        }
    }

    /// Names of the objects this node combines, for boolean kinds.
    pub fn operands(&self) -> Vec<&str> {
        match self {
            NodeKind::BooleanCut(ops)
            | NodeKind::BooleanUnion(ops)
            | NodeKind::BooleanIntersection(ops) => vec![ops.base.as_str(), ops.tool.as_str()],
            NodeKind::BooleanMultiUnion(ops) | NodeKind::BooleanMultiCommon(ops) => {
                ops.shapes.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Nested nodes owned by this node.
    pub fn children(&self) -> &[SceneNode] {
        match self {
            NodeKind::Group(group) => &group.children,
            _ => &[],
        }
    }

    pub fn is_material_graph(&self) -> bool {
        matches!(
            self,
            NodeKind::Material(_) | NodeKind::Element(_) | NodeKind::Isotope(_)
        )
    }
}

fn zero() -> f64 {
    0.0
}

fn full_turn_degrees() -> f64 {
    360.0
}

fn south_pole() -> f64 {
    -90.0
}

fn north_pole() -> f64 {
    90.0
}

/// Box given by its full edge lengths, anchored at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Plain cylinder of the host's part workbench, anchored at its base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub radius: f64,
    pub height: f64,
    /// Sweep angle in degrees.
    #[serde(default = "full_turn_degrees")]
    pub angle: f64,
}

/// Sphere of the host's part workbench, anchored at its centre.
///
/// `angle1`..`angle2` bound the latitude and `angle3` is the longitude
/// sweep, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartSphereParams {
    pub radius: f64,
    #[serde(default = "south_pole")]
    pub angle1: f64,
    #[serde(default = "north_pole")]
    pub angle2: f64,
    #[serde(default = "full_turn_degrees")]
    pub angle3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeParams {
    #[serde(default = "zero")]
    pub rmin1: f64,
    pub rmax1: f64,
    #[serde(default = "zero")]
    pub rmin2: f64,
    pub rmax2: f64,
    pub z: f64,
    #[serde(default = "zero")]
    pub startphi: f64,
    pub deltaphi: f64,
    #[serde(default)]
    pub aunit: AngleUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipticalConeParams {
    pub dx: f64,
    pub dy: f64,
    pub zmax: f64,
    pub zcut: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidParams {
    pub ax: f64,
    pub by: f64,
    pub cz: f64,
    #[serde(default = "zero")]
    pub zcut1: f64,
    #[serde(default = "zero")]
    pub zcut2: f64,
}

/// Elliptical tube given by semi-axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipticalTubeParams {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// One polycone cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZPlane {
    #[serde(default = "zero")]
    pub rmin: f64,
    pub rmax: f64,
    pub z: f64,
}

impl ZPlane {
    pub fn new(rmin: f64, rmax: f64, z: f64) -> Self {
        Self { rmin, rmax, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyconeParams {
    #[serde(default = "zero")]
    pub startphi: f64,
    pub deltaphi: f64,
    #[serde(default)]
    pub aunit: AngleUnit,
    pub zplanes: Vec<ZPlane>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    #[serde(default = "zero")]
    pub rmin: f64,
    pub rmax: f64,
    #[serde(default = "zero")]
    pub startphi: f64,
    pub deltaphi: f64,
    #[serde(default = "zero")]
    pub starttheta: f64,
    pub deltatheta: f64,
    #[serde(default)]
    pub aunit: AngleUnit,
}

/// General trapezoid; `alpha` applies to both z faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidParams {
    pub z: f64,
    #[serde(default = "zero")]
    pub theta: f64,
    #[serde(default = "zero")]
    pub phi: f64,
    pub x1: f64,
    pub x2: f64,
    pub x3: f64,
    pub x4: f64,
    pub y1: f64,
    pub y2: f64,
    #[serde(default = "zero")]
    pub alpha: f64,
    #[serde(default)]
    pub aunit: AngleUnit,
}

/// Trapezoid with independent x and y pairs (`trd`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidDualParams {
    pub z: f64,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeParams {
    #[serde(default = "zero")]
    pub rmin: f64,
    pub rmax: f64,
    pub z: f64,
    #[serde(default = "zero")]
    pub startphi: f64,
    pub deltaphi: f64,
    #[serde(default)]
    pub aunit: AngleUnit,
}

/// Explicit facet with three or four absolute vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub vertices: Vec<Point3<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TessellatedParams {
    pub facets: Vec<Facet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex2D {
    pub x: f64,
    pub y: f64,
}

/// Extrusion cross-section placement along z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "zOrder")]
    pub z_order: u32,
    #[serde(rename = "zPosition")]
    pub z_position: f64,
    #[serde(rename = "xOffset", default = "zero")]
    pub x_offset: f64,
    #[serde(rename = "yOffset", default = "zero")]
    pub y_offset: f64,
    #[serde(rename = "scalingFactor", default = "one")]
    pub scaling_factor: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionParams {
    pub vertices: Vec<Vertex2D>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanOperands {
    pub base: String,
    pub tool: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOperands {
    pub shapes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    pub mesh: Mesh,
}

/// Object known only through its boundary shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    #[serde(default)]
    pub shape: Option<Shape>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

/// Named expression written to the `define` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantParams {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_node() {
        let json = r#"{
            "name": "A",
            "type": "Box",
            "x": 10, "y": 20, "z": 30,
            "placement": {"base": [1, 0, 0]}
        }"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.name, "A");
        assert_eq!(node.kind.type_tag(), "Box");
        assert!(matches!(node.kind, NodeKind::Box(BoxParams { x, .. }) if x == 10.0));
    }

    #[test]
    fn test_tube_defaults() {
        let json = r#"{
            "name": "T", "type": "Tube",
            "rmax": 5, "z": 10, "deltaphi": 360, "aunit": "deg"
        }"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();
        match node.kind {
            NodeKind::Tube(t) => {
                assert_eq!(t.rmin, 0.0);
                assert_eq!(t.startphi, 0.0);
                assert_eq!(t.aunit, AngleUnit::Deg);
            }
            other => panic!("unexpected kind {}", other.type_tag()),
        }
    }

    #[test]
    fn test_part_sphere_defaults_to_full_sphere() {
        let json = r#"{"name": "S", "type": "PartSphere", "radius": 5}"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind.type_tag(), "PartSphere");
        match node.kind {
            NodeKind::PartSphere(s) => {
                assert_eq!(s.angle1, -90.0);
                assert_eq!(s.angle2, 90.0);
                assert_eq!(s.angle3, 360.0);
            }
            other => panic!("unexpected kind {}", other.type_tag()),
        }
    }

    #[test]
    fn test_operands_and_children() {
        let cut = NodeKind::BooleanCut(BooleanOperands {
            base: "A".into(),
            tool: "B".into(),
        });
        assert_eq!(cut.operands(), vec!["A", "B"]);

        let group = NodeKind::Group(GroupParams {
            children: vec![SceneNode::new("C", cut)],
        });
        assert_eq!(group.children().len(), 1);
        assert!(group.operands().is_empty());
    }

    #[test]
    fn test_angle_unit() {
        assert_eq!(AngleUnit::Deg.as_str(), "deg");
        assert!((AngleUnit::Deg.to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(AngleUnit::Rad.to_radians(1.5), 1.5);
    }
}
