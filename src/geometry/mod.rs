// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - placements, extents and boundary shapes

mod bbox;
mod frustum;
mod mesh;
mod placement;
mod shape;

pub use bbox::BoundingBox;
pub use frustum::{decompose_polycone, Frustum, Profile};
pub use mesh::Mesh;
pub use placement::{Placement, Rotation};
pub use shape::{Face, FanMesher, Mesher, Shape, Surface};
