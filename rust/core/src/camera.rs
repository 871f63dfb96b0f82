// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera operations driven by URL parameters

use std::fmt;

use crate::params::UrlParams;

/// Named camera operation. The operation math belongs to the rendering
/// library; this only names what to call and in which order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CameraOperation {
    Zoom,
    Pitch,
    Elevation,
    Yaw,
    Azimuth,
    Roll,
    Dolly,
}

impl CameraOperation {
    /// Application order
    pub const ORDER: [CameraOperation; 7] = [
        CameraOperation::Zoom,
        CameraOperation::Pitch,
        CameraOperation::Elevation,
        CameraOperation::Yaw,
        CameraOperation::Azimuth,
        CameraOperation::Roll,
        CameraOperation::Dolly,
    ];

    /// URL parameter name, which is also the camera method name
    pub fn name(&self) -> &'static str {
        match self {
            CameraOperation::Zoom => "zoom",
            CameraOperation::Pitch => "pitch",
            CameraOperation::Elevation => "elevation",
            CameraOperation::Yaw => "yaw",
            CameraOperation::Azimuth => "azimuth",
            CameraOperation::Roll => "roll",
            CameraOperation::Dolly => "dolly",
        }
    }
}

impl fmt::Display for CameraOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Camera operations present in the URL, in application order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CameraPose {
    steps: Vec<(CameraOperation, f64)>,
}

impl CameraPose {
    /// Collect every camera parameter that is present and numeric. Values
    /// that do not parse are skipped with a warning.
    pub fn from_params(params: &UrlParams) -> Self {
        let steps = CameraOperation::ORDER
            .into_iter()
            .filter_map(|op| {
                let raw = params.single(op.name())?;
                match fast_float::parse::<f64, _>(raw.trim()) {
                    Ok(value) if value.is_finite() => Some((op, value)),
                    _ => {
                        tracing::warn!(operation = op.name(), value = raw, "ignoring non-numeric camera parameter");
                        None
                    }
                }
            })
            .collect();
        Self { steps }
    }

    pub fn with(mut self, operation: CameraOperation, value: f64) -> Self {
        self.steps.retain(|(op, _)| *op != operation);
        self.steps.push((operation, value));
        self.steps.sort_by_key(|(op, _)| CameraOperation::ORDER.iter().position(|o| o == op));
        self
    }

    pub fn steps(&self) -> &[(CameraOperation, f64)] {
        &self.steps
    }

    pub fn get(&self, operation: CameraOperation) -> Option<f64> {
        self.steps
            .iter()
            .find(|(op, _)| *op == operation)
            .map(|(_, value)| *value)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
