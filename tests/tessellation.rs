// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tessellation fallback for shapes and meshes

use anyhow::Result;
use gdml_export::error::ExportResult;
use gdml_export::gdml::{check_references, find_named, parse_elements};
use gdml_export::geometry::{Face, Mesh, Mesher, Placement, Shape};
use gdml_export::scene::{MeshParams, NodeKind, SceneNode, ShapeParams};
use gdml_export::Exporter;
use nalgebra::Point3;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns a fixed tetrahedron and counts its calls.
struct CountingMesher {
    calls: Arc<AtomicUsize>,
}

impl Mesher for CountingMesher {
    fn discretize(&self, _object: &str, _shape: &Shape) -> ExportResult<Mesh> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(tetrahedron())
    }
}

fn tetrahedron() -> Mesh {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    let d = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
    mesh.add_triangle([a, c, b]);
    mesh.add_triangle([a, b, d]);
    mesh.add_triangle([a, d, c]);
    mesh.add_triangle([b, c, d]);
    mesh
}

fn cube_faces(edge: f64) -> Vec<Vec<Point3<f64>>> {
    let p = |x: f64, y: f64, z: f64| Point3::new(x * edge, y * edge, z * edge);
    vec![
        vec![p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
        vec![p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
        vec![p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
        vec![p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
        vec![p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
        vec![p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
    ]
}

fn shape_node(name: &str, shape: Shape) -> SceneNode {
    SceneNode::new(name, NodeKind::GenericShape(ShapeParams { shape: Some(shape) }))
}

#[test]
fn test_planar_cube_bypasses_mesher() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let exporter = Exporter::new().with_mesher(CountingMesher { calls: calls.clone() });
    let shape = Shape::new(cube_faces(2.0).into_iter().map(Face::planar).collect());

    let (xml, report) = exporter.export_to_string(&[shape_node("Block", shape)])?;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(report.solids, 1);

    let elements = parse_elements(&xml)?;
    let tess = find_named(&elements, "tessellated", "TessBlock").expect("tessellated solid");
    let quads: Vec<_> = elements
        .iter()
        .filter(|e| e.tag == "quadrangular" && e.depth == tess.depth + 1)
        .collect();
    assert_eq!(quads.len(), 6);
    assert!(quads.iter().all(|q| q.get("type") == Some("ABSOLUTE")));

    // One position per vertex occurrence
    let vertices = elements
        .iter()
        .filter(|e| e.tag == "position" && e.get("name").map_or(false, |n| n.starts_with('v')))
        .count();
    assert_eq!(vertices, 24);
    assert!(check_references(&xml)?.is_ordered());
    Ok(())
}

#[test]
fn test_curved_face_goes_through_mesher() -> Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let exporter = Exporter::new().with_mesher(CountingMesher { calls: calls.clone() });
    let mut faces: Vec<Face> = cube_faces(1.0).into_iter().map(Face::planar).collect();
    faces[1].surface = gdml_export::geometry::Surface::Curved;

    let (xml, _) = exporter.export_to_string(&[shape_node("Dome", Shape::new(faces))])?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let elements = parse_elements(&xml)?;
    assert_eq!(elements.iter().filter(|e| e.tag == "triangular").count(), 4);
    assert_eq!(elements.iter().filter(|e| e.tag == "quadrangular").count(), 0);
    Ok(())
}

#[test]
fn test_default_mesher_handles_curved_faces() -> Result<()> {
    let faces = cube_faces(1.0).into_iter().map(Face::curved).collect();
    let (xml, _) = Exporter::new().export_to_string(&[shape_node("Soft", Shape::new(faces))])?;

    let elements = parse_elements(&xml)?;
    // Welded cube corners, two triangles per face
    assert_eq!(elements.iter().filter(|e| e.tag == "triangular").count(), 12);
    let vertices = elements
        .iter()
        .filter(|e| e.tag == "position" && e.get("name").map_or(false, |n| n.starts_with('v')))
        .count();
    assert_eq!(vertices, 8);
    Ok(())
}

#[test]
fn test_mesh_feature_is_placed() -> Result<()> {
    let node = SceneNode::new("Tet", NodeKind::MeshFeature(MeshParams { mesh: tetrahedron() }))
        .with_placement(Placement::from_translation(0.0, 0.0, 50.0));
    let (xml, report) = Exporter::new().export_to_string(&[node])?;

    let elements = parse_elements(&xml)?;
    assert!(find_named(&elements, "tessellated", "TessTet").is_some());
    let position = find_named(&elements, "position", "PosTet1").expect("placement");
    assert_eq!(position.get_f64("z"), Some(50.0));

    // World grows to cover the placed mesh
    assert_eq!(report.world_size[2], 2.0 * 51.0 + 20.0);
    Ok(())
}

#[test]
fn test_missing_shape_is_skipped() -> Result<()> {
    let scene = vec![
        SceneNode::new("Ghost", NodeKind::GenericShape(ShapeParams::default())),
        SceneNode::new("Tet", NodeKind::MeshFeature(MeshParams { mesh: tetrahedron() })),
    ];
    let (xml, report) = Exporter::new().export_to_string(&scene)?;
    assert_eq!(report.skipped, vec!["Ghost".to_string()]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.volumes, 1);
    assert!(!xml.contains("Ghost"));
    Ok(())
}
