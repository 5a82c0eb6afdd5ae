// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Logical volumes and their placement in the world volume

use super::document::{Element, Section};
use super::registry::NameKind;
use super::session::{reference, ResolvedSolid, Session};
use crate::error::ExportResult;
use crate::scene::SceneNode;
use crate::utils::math::is_zero_vector;

impl<'a> Session<'a> {
    /// Emit `<volume>` for `solid` and place it in the world volume.
    ///
    /// The host anchors solids differently from GDML, so the solid's delta
    /// is rotated into the object frame and added to its translation. The
    /// GDML rotation is the inverse of the host's, written as negated
    /// `(roll, pitch, yaw)` about x, y and z. Zero translations and identity
    /// rotations are left out.
    pub(crate) fn place_volume(
        &mut self,
        node: &SceneNode,
        solid: &ResolvedSolid,
    ) -> ExportResult<()> {
        let volume_name = self.registry.next_name(NameKind::LogicalVolume, &node.name);
        let material = node
            .material
            .clone()
            .unwrap_or_else(|| self.config.default_material.clone());

        self.document.append(
            Section::Structure,
            Element::new("volume")
                .attr("name", volume_name.as_str())
                .child(reference("materialref", &material))
                .child(reference("solidref", &solid.name)),
        );

        let physical_name = self.registry.next_name(NameKind::PhysicalVolume, &node.name);
        let mut physvol = Element::new("physvol")
            .attr("name", physical_name)
            .child(reference("volumeref", &volume_name));

        let tolerance = self.config.zero_tolerance;
        let placement = &node.placement;
        let translation = placement.adjusted(&solid.delta);
        if !is_zero_vector(&translation, tolerance) {
            let position = self.define_position(NameKind::Position, &node.name, &translation);
            physvol.push(reference("positionref", &position));
        }

        if !placement.rotation.is_identity(tolerance) {
            let [yaw, pitch, roll] = placement.rotation.to_euler();
            let rotation = self.registry.next_name(NameKind::Rotation, &node.name);
            self.document.append(
                Section::Define,
                Element::new("rotation")
                    .attr("name", rotation.as_str())
                    .attr("unit", "deg")
                    .num("x", -roll)
                    .num("y", -pitch)
                    .num("z", -yaw),
            );
            physvol.push(reference("rotationref", &rotation));
        }

        self.world.push(physvol);
        self.world_extent
            .merge(&solid.extent.placed(placement, &translation));
        self.report.volumes += 1;
        Ok(())
    }
}
