// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export entry point: builds the GDML document and writes it to disk

use crate::config::{ExportConfig, WorldSizing};
use crate::error::ExportResult;
use crate::gdml::document::{Element, GdmlDocument, Section, WORLD_VOLUME};
use crate::gdml::Session;
use crate::geometry::{BoundingBox, FanMesher, Mesher};
use crate::scene::{SceneIndex, SceneNode};
use nalgebra::Vector3;
use serde::Serialize;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Name of the world solid.
pub const WORLD_BOX: &str = "WorldBox";

/// Summary of one export run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    /// Solid elements written, not counting the world box
    pub solids: usize,
    /// Volumes placed in the world
    pub volumes: usize,
    pub warnings: Vec<String>,
    /// Objects left out for lack of geometry
    pub skipped: Vec<String>,
    /// Edge lengths of the world box in mm
    pub world_size: [f64; 3],
}

/// GDML exporter
pub struct Exporter {
    config: ExportConfig,
    mesher: Box<dyn Mesher>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::with_config(ExportConfig::default())
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self {
            config,
            mesher: Box::new(FanMesher),
        }
    }

    /// Replace the mesher used for curved boundary shapes.
    pub fn with_mesher(mut self, mesher: impl Mesher + 'static) -> Self {
        self.mesher = Box::new(mesher);
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the complete document for `objects` in memory.
    ///
    /// Every call starts from fresh counters, so the same scene always
    /// yields the same names.
    pub fn build_document(
        &self,
        objects: &[SceneNode],
    ) -> ExportResult<(GdmlDocument, ExportReport)> {
        let index = SceneIndex::build(objects)?;
        let world = Element::new("volume");
        let mut session = Session::new(&self.config, self.mesher.as_ref(), index, world);
        session.registry.claim(WORLD_BOX)?;
        session.registry.claim(WORLD_VOLUME)?;

        session.emit_materials()?;
        session.resolve_top_level()?;

        let (mut document, placements, extent, mut report) = session.into_parts();
        let size = self.world_size(&extent);
        document.append(
            Section::Solids,
            Element::new("box")
                .attr("name", WORLD_BOX)
                .num("x", size.x)
                .num("y", size.y)
                .num("z", size.z)
                .attr("lunit", "mm"),
        );

        // References every top-level volume, so it goes last
        let mut world = Element::new("volume")
            .attr("name", WORLD_VOLUME)
            .child(Element::new("materialref").attr("ref", self.config.world_material.as_str()))
            .child(Element::new("solidref").attr("ref", WORLD_BOX));
        world.children.extend(placements.children);
        document.append(Section::Structure, world);

        report.world_size = [size.x, size.y, size.z];
        info!(
            solids = report.solids,
            volumes = report.volumes,
            warnings = report.warnings.len(),
            "GDML document built"
        );
        Ok((document, report))
    }

    fn world_size(&self, extent: &BoundingBox) -> Vector3<f64> {
        let world = &self.config.world;
        match world.sizing {
            WorldSizing::Computed if !extent.is_empty() => {
                extent.symmetric_size() + Vector3::repeat(2.0 * world.margin)
            }
            _ => Vector3::repeat(world.default_size),
        }
    }

    pub fn export_to_string(&self, objects: &[SceneNode]) -> ExportResult<(String, ExportReport)> {
        let (document, report) = self.build_document(objects)?;
        Ok((document.to_xml_string()?, report))
    }

    /// Export `objects` to `path`.
    ///
    /// The file is replaced atomically once the whole document is built;
    /// on error nothing is written.
    pub fn export(
        &self,
        objects: &[SceneNode],
        path: impl AsRef<Path>,
    ) -> ExportResult<ExportReport> {
        let path = path.as_ref();
        let (document, report) = self.build_document(objects)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        document.write_to(&mut file)?;
        file.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), "GDML written");
        Ok(report)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}
