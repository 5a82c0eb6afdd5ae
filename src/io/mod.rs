// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - scene import

mod importer;

pub use importer::{import_scene_file, parse_scene};
