// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for GDML export

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can abort a GDML export.
///
/// Every variant is fatal for the export call that produced it: the
/// destination file is only written after the whole document was built.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The scene uses a construct GDML cannot represent.
    #[error("unsupported construct in '{object}': {message}")]
    Unsupported { object: String, message: String },

    /// A boolean refers to an operand that is not in the scene.
    #[error("'{object}' references missing operand '{operand}'")]
    MissingOperand { object: String, operand: String },

    /// An object required by a later reference has no geometry.
    #[error("object '{object}' has no geometry to export")]
    MissingGeometry { object: String },

    /// Two objects or generated elements share one name.
    #[error("duplicate name '{name}'")]
    DuplicateName { name: String },

    /// A boolean or material graph refers back to itself.
    #[error("cyclic reference through '{name}'")]
    CyclicReference { name: String },

    /// A parameter record cannot be encoded.
    #[error("invalid parameter in '{object}': {message}")]
    InvalidParameter { object: String, message: String },

    /// The discretization mesher failed or returned an invalid mesh.
    #[error("mesher failed for '{object}': {message}")]
    Mesher { object: String, message: String },

    /// XML parse error while reading GDML back.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn unsupported(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unsupported {
            object: object.into(),
            message: message.into(),
        }
    }

    pub fn invalid_parameter(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            object: object.into(),
            message: message.into(),
        }
    }

    pub fn mesher(object: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mesher {
            object: object.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }
}
