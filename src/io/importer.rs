// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene file importer

use crate::scene::Scene;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse a JSON scene description.
///
/// Accepts either a `{"objects": [...]}` document or a bare array of nodes.
pub fn parse_scene(source: &str) -> Result<Scene> {
    if source.trim_start().starts_with('[') {
        let objects = serde_json::from_str(source).context("Invalid scene object list")?;
        return Ok(Scene::new(objects));
    }
    Scene::from_json(source).context("Invalid scene document")
}

/// Import a scene file and parse it into a [`Scene`]
pub fn import_scene_file(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;

    parse_scene(&source).with_context(|| format!("Failed to parse scene file: {}", path.display()))
}
