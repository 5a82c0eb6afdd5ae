// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Primitive solid encoders
//!
//! Every encoder turns one parameter record into a GDML solid element named
//! `<prefix><object name>`, together with the offset between the host's
//! anchor point and the GDML solid origin, and the solid's extent in its own
//! frame. Lengths are written in `mm`; angles keep the record's own unit.

use super::document::Element;
use crate::error::{ExportError, ExportResult};
use crate::geometry::{decompose_polycone, BoundingBox};
use crate::scene::{
    AngleUnit, BoxParams, ConeParams, CylinderParams, EllipsoidParams, EllipticalConeParams,
    EllipticalTubeParams, ExtrusionParams, PartSphereParams, PolyconeParams, SphereParams,
    TrapezoidDualParams, TrapezoidParams, TubeParams,
};
use nalgebra::{Point3, Vector3};
use tracing::debug;

const LENGTH_UNIT: &str = "mm";

/// Result of encoding one solid.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSolid {
    pub name: String,
    pub element: Element,
    /// Host anchor to GDML origin, in the object's local frame.
    pub delta: Vector3<f64>,
    /// Extent around the GDML origin.
    pub extent: BoundingBox,
}

/// Encoding of a primitive parameter record into a GDML solid.
pub trait Encode {
    /// Prefix prepended to the object name to form the solid name.
    const PREFIX: &'static str;

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid>;

    fn solid_name(object: &str) -> String {
        format!("{}{}", Self::PREFIX, object)
    }
}

fn finite(object: &str, values: &[(&str, f64)]) -> ExportResult<()> {
    for (field, value) in values {
        if !value.is_finite() {
            return Err(ExportError::invalid_parameter(
                object,
                format!("{} is not a finite number", field),
            ));
        }
    }
    Ok(())
}

fn lengths(object: &str, values: &[(&str, f64)]) -> ExportResult<()> {
    finite(object, values)?;
    for (field, value) in values {
        if *value < 0.0 {
            return Err(ExportError::invalid_parameter(
                object,
                format!("{} must not be negative (got {})", field, value),
            ));
        }
    }
    Ok(())
}

fn solid(tag: &str, name: &str) -> Element {
    Element::new(tag).attr("name", name)
}

impl Encode for BoxParams {
    const PREFIX: &'static str = "Box";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("x", self.x), ("y", self.y), ("z", self.z)])?;
        let name = Self::solid_name(object);
        let half = Vector3::new(self.x, self.y, self.z) / 2.0;

        let element = solid("box", &name)
            .num("x", self.x)
            .num("y", self.y)
            .num("z", self.z)
            .attr("lunit", LENGTH_UNIT);

        Ok(EncodedSolid {
            name,
            element,
            delta: half,
            extent: BoundingBox::centered(half),
        })
    }
}

impl Encode for CylinderParams {
    const PREFIX: &'static str = "Cyl";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("radius", self.radius), ("height", self.height)])?;
        finite(object, &[("angle", self.angle)])?;
        let name = Self::solid_name(object);

        let element = solid("tube", &name)
            .num("rmax", self.radius)
            .num("z", self.height)
            .num("deltaphi", self.angle)
            .attr("aunit", AngleUnit::Deg.as_str())
            .attr("lunit", LENGTH_UNIT);

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, self.height / 2.0),
            extent: BoundingBox::centered(Vector3::new(
                self.radius,
                self.radius,
                self.height / 2.0,
            )),
        })
    }
}

impl Encode for ConeParams {
    const PREFIX: &'static str = "Cone";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(
            object,
            &[
                ("rmin1", self.rmin1),
                ("rmax1", self.rmax1),
                ("rmin2", self.rmin2),
                ("rmax2", self.rmax2),
                ("z", self.z),
            ],
        )?;
        finite(object, &[("startphi", self.startphi), ("deltaphi", self.deltaphi)])?;
        let name = Self::solid_name(object);

        let element = solid("cone", &name)
            .num("rmin1", self.rmin1)
            .num("rmax1", self.rmax1)
            .num("rmin2", self.rmin2)
            .num("rmax2", self.rmax2)
            .num("z", self.z)
            .num("startphi", self.startphi)
            .num("deltaphi", self.deltaphi)
            .attr("aunit", self.aunit.as_str())
            .attr("lunit", LENGTH_UNIT);

        let r = self.rmax1.max(self.rmax2);
        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, self.z / 2.0),
            extent: BoundingBox::centered(Vector3::new(r, r, self.z / 2.0)),
        })
    }
}

impl Encode for EllipticalConeParams {
    const PREFIX: &'static str = "ElCone";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(
            object,
            &[
                ("dx", self.dx),
                ("dy", self.dy),
                ("zmax", self.zmax),
                ("zcut", self.zcut),
            ],
        )?;
        let name = Self::solid_name(object);

        let element = solid("elcone", &name)
            .num("dx", self.dx)
            .num("dy", self.dy)
            .num("zmax", self.zmax)
            .num("zcut", self.zcut)
            .attr("lunit", LENGTH_UNIT);

        // Widest section sits at the lower cut.
        let reach = self.zmax + self.zcut;
        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, self.zcut),
            extent: BoundingBox::centered(Vector3::new(
                self.dx * reach,
                self.dy * reach,
                self.zcut,
            )),
        })
    }
}

impl Encode for EllipsoidParams {
    const PREFIX: &'static str = "Ellipsoid";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("ax", self.ax), ("by", self.by), ("cz", self.cz)])?;
        finite(object, &[("zcut1", self.zcut1), ("zcut2", self.zcut2)])?;
        let name = Self::solid_name(object);

        let element = solid("ellipsoid", &name)
            .num("ax", self.ax)
            .num("by", self.by)
            .num("cz", self.cz)
            .num("zcut1", self.zcut1)
            .num("zcut2", self.zcut2)
            .attr("lunit", LENGTH_UNIT);

        // A zero cut means no cut.
        let z_min = if self.zcut1 != 0.0 { self.zcut1.max(-self.cz) } else { -self.cz };
        let z_max = if self.zcut2 != 0.0 { self.zcut2.min(self.cz) } else { self.cz };

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::zeros(),
            extent: BoundingBox::new(
                Point3::new(-self.ax, -self.by, z_min),
                Point3::new(self.ax, self.by, z_max),
            ),
        })
    }
}

impl Encode for EllipticalTubeParams {
    const PREFIX: &'static str = "ElTube";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("dx", self.dx), ("dy", self.dy), ("dz", self.dz)])?;
        let name = Self::solid_name(object);

        let element = solid("eltube", &name)
            .num("dx", self.dx)
            .num("dy", self.dy)
            .num("dz", self.dz)
            .attr("lunit", LENGTH_UNIT);

        // dz is a half-length; the host shape spans [0, 2dz].
        let half = Vector3::new(self.dx, self.dy, self.dz);
        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, self.dz),
            extent: BoundingBox::centered(half),
        })
    }
}

impl Encode for PolyconeParams {
    const PREFIX: &'static str = "Polycone";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        if self.zplanes.len() < 2 {
            return Err(ExportError::invalid_parameter(
                object,
                format!("polycone needs at least 2 z-planes, got {}", self.zplanes.len()),
            ));
        }
        finite(object, &[("startphi", self.startphi), ("deltaphi", self.deltaphi)])?;

        let name = Self::solid_name(object);
        let mut element = solid("polycone", &name)
            .num("startphi", self.startphi)
            .num("deltaphi", self.deltaphi)
            .attr("aunit", self.aunit.as_str())
            .attr("lunit", LENGTH_UNIT);

        for plane in &self.zplanes {
            lengths(object, &[("rmin", plane.rmin), ("rmax", plane.rmax)])?;
            finite(object, &[("z", plane.z)])?;
            if plane.rmin > plane.rmax {
                return Err(ExportError::invalid_parameter(
                    object,
                    format!("z-plane at z={} has rmin > rmax", plane.z),
                ));
            }
            element.push(
                Element::new("zplane")
                    .num("rmin", plane.rmin)
                    .num("rmax", plane.rmax)
                    .num("z", plane.z),
            );
        }

        let segments = decompose_polycone(&self.zplanes);
        debug!(object, segments = segments.len(), "polycone decomposed");

        let mut extent = BoundingBox::empty();
        for segment in &segments {
            let r = segment.outer.max_radius();
            extent.expand_to_include(&Point3::new(-r, -r, segment.z0));
            extent.expand_to_include(&Point3::new(r, r, segment.z0 + segment.height));
        }

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::zeros(),
            extent,
        })
    }
}

impl Encode for SphereParams {
    const PREFIX: &'static str = "Sphere";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("rmin", self.rmin), ("rmax", self.rmax)])?;
        finite(
            object,
            &[
                ("startphi", self.startphi),
                ("deltaphi", self.deltaphi),
                ("starttheta", self.starttheta),
                ("deltatheta", self.deltatheta),
            ],
        )?;
        let name = Self::solid_name(object);

        let element = solid("sphere", &name)
            .num("rmin", self.rmin)
            .num("rmax", self.rmax)
            .num("startphi", self.startphi)
            .num("deltaphi", self.deltaphi)
            .num("starttheta", self.starttheta)
            .num("deltatheta", self.deltatheta)
            .attr("aunit", self.aunit.as_str())
            .attr("lunit", LENGTH_UNIT);

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::zeros(),
            extent: BoundingBox::centered(Vector3::repeat(self.rmax)),
        })
    }
}

impl Encode for PartSphereParams {
    const PREFIX: &'static str = "Sphere";

    /// Latitudes `angle1..angle2` become a polar range measured from +z.
    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(object, &[("radius", self.radius)])?;
        finite(
            object,
            &[
                ("angle1", self.angle1),
                ("angle2", self.angle2),
                ("angle3", self.angle3),
            ],
        )?;

        SphereParams {
            rmin: 0.0,
            rmax: self.radius,
            startphi: 0.0,
            deltaphi: self.angle3,
            starttheta: 90.0 - self.angle2,
            deltatheta: self.angle2 - self.angle1,
            aunit: AngleUnit::Deg,
        }
        .encode(object)
    }
}

impl Encode for TrapezoidParams {
    const PREFIX: &'static str = "Trap";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(
            object,
            &[
                ("z", self.z),
                ("x1", self.x1),
                ("x2", self.x2),
                ("x3", self.x3),
                ("x4", self.x4),
                ("y1", self.y1),
                ("y2", self.y2),
            ],
        )?;
        finite(
            object,
            &[("theta", self.theta), ("phi", self.phi), ("alpha", self.alpha)],
        )?;
        let name = Self::solid_name(object);

        let element = solid("trap", &name)
            .num("z", self.z)
            .num("theta", self.theta)
            .num("phi", self.phi)
            .num("y1", self.y1)
            .num("x1", self.x1)
            .num("x2", self.x2)
            .num("alpha1", self.alpha)
            .num("y2", self.y2)
            .num("x3", self.x3)
            .num("x4", self.x4)
            .num("alpha2", self.alpha)
            .attr("aunit", self.aunit.as_str())
            .attr("lunit", LENGTH_UNIT);

        // Loose bound: widest face plus the theta and alpha shears.
        let half_z = self.z / 2.0;
        let half_y = self.y1.max(self.y2) / 2.0;
        let shear = half_z * self.aunit.to_radians(self.theta).tan().abs();
        let skew = half_y * self.aunit.to_radians(self.alpha).tan().abs();
        let half_x = [self.x1, self.x2, self.x3, self.x4]
            .into_iter()
            .fold(0.0_f64, f64::max)
            / 2.0;

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, half_z),
            extent: BoundingBox::centered(Vector3::new(
                half_x + shear + skew,
                half_y + shear,
                half_z,
            )),
        })
    }
}

impl Encode for TrapezoidDualParams {
    const PREFIX: &'static str = "Trd";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(
            object,
            &[
                ("z", self.z),
                ("x1", self.x1),
                ("x2", self.x2),
                ("y1", self.y1),
                ("y2", self.y2),
            ],
        )?;
        let name = Self::solid_name(object);

        let element = solid("trd", &name)
            .num("z", self.z)
            .num("x1", self.x1)
            .num("x2", self.x2)
            .num("y1", self.y1)
            .num("y2", self.y2)
            .attr("lunit", LENGTH_UNIT);

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::new(0.0, 0.0, self.z / 2.0),
            extent: BoundingBox::centered(Vector3::new(
                self.x1.max(self.x2) / 2.0,
                self.y1.max(self.y2) / 2.0,
                self.z / 2.0,
            )),
        })
    }
}

impl Encode for TubeParams {
    const PREFIX: &'static str = "Tube";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        lengths(
            object,
            &[("rmin", self.rmin), ("rmax", self.rmax), ("z", self.z)],
        )?;
        finite(object, &[("startphi", self.startphi), ("deltaphi", self.deltaphi)])?;
        let name = Self::solid_name(object);

        let element = solid("tube", &name)
            .num("rmin", self.rmin)
            .num("rmax", self.rmax)
            .num("z", self.z)
            .num("startphi", self.startphi)
            .num("deltaphi", self.deltaphi)
            .attr("aunit", self.aunit.as_str())
            .attr("lunit", LENGTH_UNIT);

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::zeros(),
            extent: BoundingBox::centered(Vector3::new(self.rmax, self.rmax, self.z / 2.0)),
        })
    }
}

impl Encode for ExtrusionParams {
    const PREFIX: &'static str = "Xtru";

    fn encode(&self, object: &str) -> ExportResult<EncodedSolid> {
        if self.vertices.len() < 3 {
            return Err(ExportError::invalid_parameter(
                object,
                format!("extrusion needs at least 3 vertices, got {}", self.vertices.len()),
            ));
        }
        if self.sections.len() < 2 {
            return Err(ExportError::invalid_parameter(
                object,
                format!("extrusion needs at least 2 sections, got {}", self.sections.len()),
            ));
        }

        let name = Self::solid_name(object);
        let mut element = solid("xtru", &name).attr("lunit", LENGTH_UNIT);

        for vertex in &self.vertices {
            finite(object, &[("x", vertex.x), ("y", vertex.y)])?;
            element.push(Element::new("twoDimVertex").num("x", vertex.x).num("y", vertex.y));
        }

        let mut extent = BoundingBox::empty();
        for section in &self.sections {
            finite(
                object,
                &[
                    ("zPosition", section.z_position),
                    ("xOffset", section.x_offset),
                    ("yOffset", section.y_offset),
                    ("scalingFactor", section.scaling_factor),
                ],
            )?;
            element.push(
                Element::new("section")
                    .attr("zOrder", section.z_order.to_string())
                    .num("zPosition", section.z_position)
                    .num("xOffset", section.x_offset)
                    .num("yOffset", section.y_offset)
                    .num("scalingFactor", section.scaling_factor),
            );

            for vertex in &self.vertices {
                extent.expand_to_include(&Point3::new(
                    vertex.x * section.scaling_factor + section.x_offset,
                    vertex.y * section.scaling_factor + section.y_offset,
                    section.z_position,
                ));
            }
        }

        Ok(EncodedSolid {
            name,
            element,
            delta: Vector3::zeros(),
            extent,
        })
    }
}
