// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GDML export pipeline
//!
//! A [`Session`](session::Session) walks the scene once: constants and the
//! material graph first, then every top-level object, resolving boolean
//! operands before the boolean that references them. Nothing is written
//! to disk here; see [`crate::exporter`].

mod boolean;
mod materials;
mod session;
mod tessellate;
mod volume;

pub mod document;
pub mod reader;
pub mod registry;
pub mod solids;

pub use boolean::BooleanKind;
pub use document::{Element, GdmlDocument, Section, WORLD_VOLUME};
pub use reader::{
    check_references, find_named, parse_elements, ParsedElement, Reference, ReferenceReport,
};
pub use registry::{NameKind, NameRegistry};
pub use solids::{Encode, EncodedSolid};

pub(crate) use session::Session;
