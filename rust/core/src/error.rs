// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the viewer core.

use crate::controls::FieldLocation;

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving a mesh pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The mesh payload is not valid base64.
    #[error("invalid base64 mesh payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The rendering backend could not read the decoded bytes as polydata.
    #[error("failed to parse mesh: {0}")]
    MeshParse(String),

    /// A color-by selection names an array the mesh does not carry.
    #[error("no {location} array named {name:?}")]
    UnknownArray {
        location: FieldLocation,
        name: String,
    },

    /// A control received a value it cannot decode.
    #[error("invalid control value {0:?}")]
    InvalidControlValue(String),

    /// The color map catalog has no preset with this name.
    #[error("unknown color map preset {0:?}")]
    UnknownPreset(String),

    /// An attribute array's value count does not match its tuple count.
    #[error("array {name:?} holds {actual} values, expected {expected}")]
    ArrayLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl Error {
    /// Create a mesh parse error
    pub fn mesh_parse(message: impl Into<String>) -> Self {
        Self::MeshParse(message.into())
    }
}
