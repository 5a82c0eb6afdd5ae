// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Generated-name registry for one export run

use crate::error::{ExportError, ExportResult};
use ahash::{AHashMap, AHashSet};

/// Kinds of generated names, each with its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    LogicalVolume,
    PhysicalVolume,
    Position,
    Rotation,
    Vertex,
    RelativePosition,
}

impl NameKind {
    pub fn prefix(self) -> &'static str {
        match self {
            NameKind::LogicalVolume => "LV",
            NameKind::PhysicalVolume => "PV",
            NameKind::Position => "Pos",
            NameKind::Rotation => "Rot",
            NameKind::Vertex => "v",
            NameKind::RelativePosition => "RelPos",
        }
    }
}

/// Issues `<prefix><base><counter>` names and tracks every name used in the
/// document, so generated and object-derived names never collide.
#[derive(Debug, Default)]
pub struct NameRegistry {
    counters: AHashMap<NameKind, u64>,
    claimed: AHashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh name for `kind`; counters start at 1 and skip names already
    /// claimed.
    pub fn next_name(&mut self, kind: NameKind, base: &str) -> String {
        loop {
            let counter = self.counters.entry(kind).or_insert(1);
            let name = format!("{}{}{}", kind.prefix(), base, counter);
            *counter += 1;
            if self.claimed.insert(name.clone()) {
                return name;
            }
        }
    }

    /// Reserve a fixed name, failing if it was already used.
    pub fn claim(&mut self, name: &str) -> ExportResult<()> {
        if self.claimed.insert(name.to_string()) {
            Ok(())
        } else {
            Err(ExportError::duplicate(name))
        }
    }

    /// Value the next `next_name(kind, ..)` call starts from.
    pub fn counter(&self, kind: NameKind) -> u64 {
        self.counters.get(&kind).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_one_per_kind() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.next_name(NameKind::PhysicalVolume, "A"), "PVA1");
        assert_eq!(registry.next_name(NameKind::PhysicalVolume, "B"), "PVB2");
        assert_eq!(registry.next_name(NameKind::Position, "A"), "PosA1");
        assert_eq!(registry.counter(NameKind::PhysicalVolume), 3);
        assert_eq!(registry.counter(NameKind::Rotation), 1);
    }

    #[test]
    fn test_generated_names_skip_claimed() {
        let mut registry = NameRegistry::new();
        registry.claim("v1").unwrap();
        assert_eq!(registry.next_name(NameKind::Vertex, ""), "v2");
    }

    #[test]
    fn test_claim_detects_duplicates() {
        let mut registry = NameRegistry::new();
        registry.claim("BoxA").unwrap();
        let err = registry.claim("BoxA").unwrap_err();
        assert!(matches!(err, ExportError::DuplicateName { name } if name == "BoxA"));

        let generated = registry.next_name(NameKind::LogicalVolume, "A");
        assert!(registry.claim(&generated).is_err());
    }

    #[test]
    fn test_fresh_registry_repeats_names() {
        let names = |registry: &mut NameRegistry| {
            (0..3)
                .map(|_| registry.next_name(NameKind::Rotation, "X"))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&mut NameRegistry::new()), names(&mut NameRegistry::new()));
    }
}
