// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Mesh Viewer Core
//!
//! Backend-neutral logic of an embeddable polygonal-mesh viewer: URL
//! parameter configuration, per-mesh render pipelines and their control
//! widgets, debounced redraws and camera operations.
//!
//! ## Overview
//!
//! - **Configuration**: [`ViewerConfig`] is read from the page's query string
//! - **Pipelines**: [`MeshPipeline`] wires a base64 mesh payload through a
//!   lookup table, mapper and actor
//! - **Controls**: [`ControlGroup`] models the per-mesh widgets; the DOM
//!   only renders them
//! - **Backend seam**: [`RenderBackend`] abstracts the rendering library
//!   (vtk.js in `mesh-viewer-wasm`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mesh_viewer_core::{ViewerConfig, ViewerSession};
//!
//! let config = ViewerConfig::from_query("?field=PointData:Temperature&zoom=1.5");
//! let session = ViewerSession::new(config, backend);
//!
//! let pipeline = session.create_pipeline(payload_base64, Some("Bunny"))?;
//! pipeline.controls().opacity.input(50);
//! session.update_active_camera();
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization of the viewer configuration

pub mod backend;
pub mod camera;
pub mod config;
pub mod controls;
pub mod debounce;
pub mod error;
pub mod observer;
pub mod params;
pub mod pipeline;
pub mod session;

#[cfg(test)]
mod polydata;
#[cfg(test)]
mod testing;

pub use backend::{
    Actor, Camera, ColorMode, DataArray, DataRange, LookupTable, Mapper, MeshData, RenderBackend,
    ScalarBar, ScalarColoring, ScalarMode,
};
pub use camera::{CameraOperation, CameraPose};
pub use config::{FpsOverlay, Theme, ViewerConfig, DEFAULT_LUT, DESIRED_UPDATE_RATE};
pub use controls::{
    ColorBy, ComponentSelection, ControlGroup, ControlValue, DisplayState, FieldLocation, Opacity,
    Representation, RepresentationMode, Select, SelectOption, Slider,
};
pub use debounce::{Debounced, Scheduler, REDRAW_DEBOUNCE};
pub use error::{Error, Result};
pub use observer::{Notifier, Subscription};
pub use params::{ParamValue, UrlParams};
pub use pipeline::{decode_payload, ArrayRef, MeshPipeline, DEFAULT_MESH_NAME};
pub use session::ViewerSession;
