// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean solids: operand resolution, relative positions and failures

use anyhow::Result;
use gdml_export::gdml::{check_references, find_named, parse_elements, ParsedElement};
use gdml_export::geometry::{Placement, Rotation};
use gdml_export::scene::{
    BooleanOperands, BoxParams, MultiOperands, NodeKind, SceneNode, ShapeParams,
};
use gdml_export::{ExportError, Exporter};
use nalgebra::Vector3;
use tempfile::TempDir;

fn cube(name: &str, x: f64, y: f64, z: f64) -> SceneNode {
    SceneNode::new(name, NodeKind::Box(BoxParams { x: 10.0, y: 10.0, z: 10.0 }))
        .with_placement(Placement::from_translation(x, y, z))
}

fn operands(base: &str, tool: &str) -> BooleanOperands {
    BooleanOperands {
        base: base.into(),
        tool: tool.into(),
    }
}

fn named<'e>(elements: &'e [ParsedElement], prefix: &str) -> Vec<&'e ParsedElement> {
    elements
        .iter()
        .filter(|e| e.get("name").map_or(false, |n| n.starts_with(prefix)))
        .collect()
}

#[test]
fn test_cut_references_both_operands() -> Result<()> {
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        cube("B", 3.0, 4.0, 5.0),
        SceneNode::new("C", NodeKind::BooleanCut(operands("A", "B"))),
    ];
    let (xml, report) = Exporter::new().export_to_string(&scene)?;
    let elements = parse_elements(&xml)?;

    let cut = find_named(&elements, "subtraction", "CutC").expect("subtraction");
    let children: Vec<_> = elements
        .iter()
        .skip_while(|e| e.get("name") != Some("CutC"))
        .skip(1)
        .take(3)
        .collect();
    assert_eq!(children[0].tag, "first");
    assert_eq!(children[0].get("ref"), Some("BoxA"));
    assert_eq!(children[1].tag, "second");
    assert_eq!(children[1].get("ref"), Some("BoxB"));
    assert_eq!(children[2].tag, "positionref");
    assert_eq!(cut.depth + 1, children[2].depth);

    // Exactly one relative position, equal to B - A
    let relative = named(&elements, "RelPos");
    assert_eq!(relative.len(), 1);
    assert_eq!(children[2].get("ref"), relative[0].get("name"));
    assert_eq!(relative[0].get_f64("x"), Some(3.0));
    assert_eq!(relative[0].get_f64("y"), Some(4.0));
    assert_eq!(relative[0].get_f64("z"), Some(5.0));

    // Operands are consumed: only the cut gets a volume
    assert_eq!(report.volumes, 1);
    assert!(find_named(&elements, "volume", "LVC1").is_some());
    assert!(named(&elements, "LVA").is_empty());
    assert!(check_references(&xml)?.is_ordered());
    Ok(())
}

#[test]
fn test_nested_booleans_resolve_depth_first() -> Result<()> {
    let scene = vec![
        SceneNode::new("Outer", NodeKind::BooleanUnion(operands("Inner", "D"))),
        SceneNode::new("Inner", NodeKind::BooleanIntersection(operands("A", "B"))),
        cube("A", 0.0, 0.0, 0.0),
        cube("B", 5.0, 0.0, 0.0),
        cube("D", 0.0, 20.0, 0.0),
    ];
    let (xml, report) = Exporter::new().export_to_string(&scene)?;
    let elements = parse_elements(&xml)?;

    let solids: Vec<&str> = elements
        .iter()
        .filter(|e| e.depth == 2 && e.section == Some(gdml_export::gdml::Section::Solids))
        .filter_map(|e| e.get("name"))
        .collect();
    assert_eq!(
        solids,
        vec!["BoxA", "BoxB", "IntersectInner", "BoxD", "UnionOuter", "WorldBox"]
    );
    assert_eq!(report.volumes, 1);
    assert!(check_references(&xml)?.is_ordered());
    Ok(())
}

#[test]
fn test_shared_operand_emitted_once() -> Result<()> {
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        cube("B", 2.0, 0.0, 0.0),
        cube("D", -2.0, 0.0, 0.0),
        SceneNode::new("C1", NodeKind::BooleanCut(operands("A", "B"))),
        SceneNode::new("C2", NodeKind::BooleanCut(operands("A", "D"))),
    ];
    let (xml, report) = Exporter::new().export_to_string(&scene)?;
    let elements = parse_elements(&xml)?;

    assert_eq!(elements.iter().filter(|e| e.get("name") == Some("BoxA")).count(), 1);
    assert_eq!(report.solids, 5);
    assert_eq!(report.volumes, 2);
    Ok(())
}

#[test]
fn test_multi_union_nodes() -> Result<()> {
    let scene = vec![
        cube("P", 1.0, 1.0, 1.0),
        cube("Q", 11.0, 1.0, 1.0),
        cube("R", 1.0, 1.0, 11.0),
        SceneNode::new(
            "Stack",
            NodeKind::BooleanMultiUnion(MultiOperands {
                shapes: vec!["P".into(), "Q".into(), "R".into()],
            }),
        ),
    ];
    let (xml, _) = Exporter::new().export_to_string(&scene)?;
    let elements = parse_elements(&xml)?;

    assert!(find_named(&elements, "multiUnion", "MultiFuseStack").is_some());
    let nodes: Vec<_> = elements.iter().filter(|e| e.tag == "multiUnionNode").collect();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].get("name"), Some("Node-BoxP"));

    // The first operand sits at the union origin
    let relative = named(&elements, "RelPos");
    assert_eq!(relative.len(), 2);
    assert_eq!(relative[0].get_f64("x"), Some(10.0));
    assert_eq!(relative[1].get_f64("z"), Some(10.0));
    assert!(check_references(&xml)?.is_ordered());
    Ok(())
}

#[test]
fn test_multi_common_writes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("common.gdml");
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        cube("B", 1.0, 0.0, 0.0),
        SceneNode::new(
            "Common",
            NodeKind::BooleanMultiCommon(MultiOperands {
                shapes: vec!["A".into(), "B".into()],
            }),
        ),
    ];

    let result = Exporter::new().export(&scene, &path);
    assert!(matches!(result, Err(ExportError::Unsupported { .. })));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_missing_operand() {
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        SceneNode::new("C", NodeKind::BooleanCut(operands("A", "Ghost"))),
    ];
    match Exporter::new().export_to_string(&scene) {
        Err(ExportError::MissingOperand { object, operand }) => {
            assert_eq!(object, "C");
            assert_eq!(operand, "Ghost");
        }
        other => panic!("expected missing operand, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_operand_without_geometry_is_fatal() {
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        SceneNode::new("Empty", NodeKind::GenericShape(ShapeParams::default())),
        SceneNode::new("C", NodeKind::BooleanCut(operands("A", "Empty"))),
    ];
    let result = Exporter::new().export_to_string(&scene);
    assert!(matches!(result, Err(ExportError::MissingGeometry { .. })));
}

#[test]
fn test_self_reference_is_a_cycle() {
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        SceneNode::new("Loop", NodeKind::BooleanUnion(operands("A", "Loop"))),
    ];
    let result = Exporter::new().export_to_string(&scene);
    assert!(matches!(result, Err(ExportError::CyclicReference { .. })));
}

#[test]
fn test_relative_rotation_is_reported() -> Result<()> {
    let unit = BoxParams { x: 1.0, y: 1.0, z: 1.0 };
    let tilted = SceneNode::new("B", NodeKind::Box(unit)).with_placement(
        Placement::from_translation(0.0, 0.0, 0.0)
            .with_rotation(Rotation::from_axis_angle(Vector3::z(), 30.0)),
    );
    let scene = vec![
        cube("A", 0.0, 0.0, 0.0),
        tilted,
        SceneNode::new("C", NodeKind::BooleanCut(operands("A", "B"))),
    ];
    let (_, report) = Exporter::new().export_to_string(&scene)?;
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("30.000 deg"));
    Ok(())
}
