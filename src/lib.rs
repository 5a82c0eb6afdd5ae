// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML Export
//!
//! Writes a scene of parametric solids, boolean combinations, meshes and
//! material definitions to a GDML document for detector simulation.
//! Primitives map onto native GDML solids, booleans onto GDML boolean
//! solids, and anything else is tessellated.

pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod gdml;
pub mod geometry;
pub mod io;
pub mod scene;
pub mod utils;

pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use exporter::{ExportReport, Exporter};
pub use io::import_scene_file;
pub use scene::{NodeKind, Scene, SceneNode};

use anyhow::{Context, Result};
use std::path::Path;

/// Export `objects` to the GDML file at `path` with default settings.
///
/// Nothing is written when the export fails.
pub fn export(objects: &[SceneNode], path: impl AsRef<Path>) -> ExportResult<()> {
    Exporter::new().export(objects, path).map(|_| ())
}

/// Export a JSON scene file to `output` with `config`.
pub fn export_file(
    scene_path: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: ExportConfig,
) -> Result<ExportReport> {
    let scene_path = scene_path.as_ref();
    let output = output.as_ref();
    let scene = import_scene_file(scene_path)?;
    Exporter::with_config(config)
        .export(&scene.objects, output)
        .with_context(|| {
            format!(
                "Failed to export {} to {}",
                scene_path.display(),
                output.display()
            )
        })
}
