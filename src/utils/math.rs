// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::Vector3;

/// Convert degrees to radians
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// True when every component of `v` is within `tolerance` of zero
pub fn is_zero_vector(v: &Vector3<f64>, tolerance: f64) -> bool {
    v.iter().all(|c| c.abs() <= tolerance)
}

/// Format a number as a plain decimal GDML attribute value.
///
/// `f64`'s `Display` is the shortest representation that round-trips and
/// never switches to exponent notation, so integer-valued inputs print
/// without a fractional part (`10`, not `10.0`). Negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
