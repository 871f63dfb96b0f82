// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration loaded from URL parameters.

use crate::camera::CameraPose;
use crate::controls::ColorBy;
use crate::params::{ParamValue, UrlParams};

/// Color map selected when `lut` is absent
pub const DEFAULT_LUT: &str = "erdc_rainbow_bright";

/// Frame-rate target for the interactor during continuous interaction
pub const DESIRED_UPDATE_RATE: f64 = 15.0;

/// Control theme derived from the background brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// CSS class carried by every control widget
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Dark => "mesh-viewer-dark",
            Theme::Light => "mesh-viewer-light",
        }
    }
}

/// Frames-per-second overlay settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FpsOverlay {
    pub title: bool,
    pub graph: bool,
    pub info: bool,
    pub orientation: Option<String>,
}

impl Default for FpsOverlay {
    fn default() -> Self {
        Self {
            title: true,
            graph: true,
            info: true,
            orientation: None,
        }
    }
}

impl FpsOverlay {
    /// `None` when absent or falsy; a list sets `[title, graph, info,
    /// orientation]` positionally.
    pub fn from_param(value: Option<&ParamValue>) -> Option<Self> {
        match value? {
            ParamValue::Flag => Some(Self::default()),
            ParamValue::Single(raw) => truthy(raw).then(Self::default),
            ParamValue::List(items) => {
                let flag = |i: usize| items.get(i).map_or(true, |s| truthy(s));
                Some(Self {
                    title: flag(0),
                    graph: flag(1),
                    info: flag(2),
                    orientation: (items.len() == 4).then(|| items[3].clone()),
                })
            }
        }
    }
}

fn truthy(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "no" | "off" | "null" | "undefined"
    )
}

/// Viewer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ViewerConfig {
    /// Background RGB(A), components in 0–1
    pub background: Vec<f64>,
    /// Initially selected color map preset
    pub lut_name: String,
    /// Initially selected color-by field
    pub field: ColorBy,
    /// FPS overlay, when requested
    pub fps: Option<FpsOverlay>,
    /// Camera operations to apply on `update_camera`
    pub camera: CameraPose,
    /// Minimum level of forwarded log events
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_level"))]
    pub log_level: tracing::Level,
}

#[cfg(feature = "serde")]
fn serialize_level<S: serde::Serializer>(level: &tracing::Level, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(level.as_str())
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: vec![0.0, 0.0, 0.0],
            lut_name: DEFAULT_LUT.to_string(),
            field: ColorBy::Solid,
            fps: None,
            camera: CameraPose::default(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from URL parameters, defaulting missing or
    /// malformed entries.
    pub fn from_params(params: &UrlParams) -> Self {
        let defaults = Self::default();

        Self {
            background: parse_background(params).unwrap_or(defaults.background),
            lut_name: params
                .single("lut")
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.lut_name),
            field: params
                .single("field")
                .and_then(|raw| match raw.parse::<ColorBy>() {
                    Ok(field) => Some(field),
                    Err(err) => {
                        tracing::warn!(%err, "ignoring field parameter");
                        None
                    }
                })
                .unwrap_or(defaults.field),
            fps: FpsOverlay::from_param(params.get("fps")),
            camera: CameraPose::from_params(params),
            log_level: params
                .single("log")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.log_level),
        }
    }

    /// Parse a query string and load from it.
    pub fn from_query(query: &str) -> Self {
        Self::from_params(&UrlParams::parse(query))
    }

    pub fn theme(&self) -> Theme {
        if self.background.len() == 3 && self.background.iter().sum::<f64>() < 1.5 {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

fn parse_background(params: &UrlParams) -> Option<Vec<f64>> {
    let items = params.values("background");
    if items.is_empty() {
        return None;
    }

    let parsed: Option<Vec<f64>> = items
        .iter()
        .map(|s| fast_float::parse::<f64, _>(s.trim()).ok().filter(|v| v.is_finite()))
        .collect();

    match parsed {
        Some(color) if color.len() == 3 || color.len() == 4 => Some(color),
        _ => {
            tracing::warn!(value = ?items, "ignoring malformed background parameter");
            None
        }
    }
}
