// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polycone decomposition into stacked frustum segments

use crate::scene::ZPlane;

/// Radial profile of one segment wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Profile {
    Cylinder { r: f64 },
    Cone { r1: f64, r2: f64 },
}

impl Profile {
    fn between(r1: f64, r2: f64) -> Self {
        if r1 == r2 {
            Profile::Cylinder { r: r1 }
        } else {
            Profile::Cone { r1, r2 }
        }
    }

    pub fn max_radius(&self) -> f64 {
        match *self {
            Profile::Cylinder { r } => r,
            Profile::Cone { r1, r2 } => r1.max(r2),
        }
    }
}

/// Solid between two consecutive z-planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub z0: f64,
    pub height: f64,
    pub outer: Profile,
    /// Bore, absent when both planes have zero inner radius.
    pub inner: Option<Profile>,
}

/// Split a z-plane chain into one frustum per consecutive pair.
pub fn decompose_polycone(planes: &[ZPlane]) -> Vec<Frustum> {
    planes
        .windows(2)
        .map(|pair| {
            let (lo, hi) = (&pair[0], &pair[1]);
            let inner = if lo.rmin == 0.0 && hi.rmin == 0.0 {
                None
            } else {
                Some(Profile::between(lo.rmin, hi.rmin))
            };
            Frustum {
                z0: lo.z,
                height: hi.z - lo.z,
                outer: Profile::between(lo.rmax, hi.rmax),
                inner,
            }
        })
        .collect()
}
