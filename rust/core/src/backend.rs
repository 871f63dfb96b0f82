// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering library seam
//!
//! Mesh parsing, GPU rendering, color maps and camera math belong to the
//! rendering library. The viewer only talks to it through these traits;
//! `mesh-viewer-wasm` implements them over vtk.js.

use crate::camera::CameraOperation;
use crate::config::FpsOverlay;
use crate::controls::{ComponentSelection, FieldLocation, RepresentationMode};
use crate::debounce::Scheduler;
use crate::error::Result;

/// Closed numeric interval `[min, max]` driving the lookup table range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest interval covering `values`; `None` when empty.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| match range {
            None => Some(DataRange::new(v, v)),
            Some(r) => Some(DataRange::new(r.min.min(v), r.max.max(v))),
        })
    }
}

impl Default for DataRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl From<[f64; 2]> for DataRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

/// vtk mapper `ColorMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Default = 0,
    MapScalars = 1,
}

/// vtk mapper `ScalarMode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarMode {
    Default = 0,
    UsePointFieldData = 3,
    UseCellFieldData = 4,
}

/// Mapper coloring settings applied on every color-by change
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarColoring {
    pub array_name: Option<String>,
    pub color_mode: ColorMode,
    pub scalar_mode: ScalarMode,
    pub interpolate_scalars_before_mapping: bool,
    pub scalar_visibility: bool,
}

impl ScalarColoring {
    /// Solid color: scalar coloring off
    pub fn solid() -> Self {
        Self {
            array_name: None,
            color_mode: ColorMode::Default,
            scalar_mode: ScalarMode::Default,
            interpolate_scalars_before_mapping: false,
            scalar_visibility: false,
        }
    }

    /// Map the named array's scalars through the lookup table
    pub fn by_array(location: FieldLocation, name: &str) -> Self {
        let scalar_mode = match location {
            FieldLocation::PointData => ScalarMode::UsePointFieldData,
            FieldLocation::CellData => ScalarMode::UseCellFieldData,
        };
        Self {
            array_name: Some(name.to_string()),
            color_mode: ColorMode::MapScalars,
            scalar_mode,
            interpolate_scalars_before_mapping: location == FieldLocation::PointData,
            scalar_visibility: true,
        }
    }
}

/// Attribute array of a parsed mesh
pub trait DataArray {
    fn name(&self) -> String;
    fn number_of_components(&self) -> usize;
    /// Range of one component, or of the tuple magnitude. Single-component
    /// arrays return their plain value range for `Magnitude`.
    fn range(&self, component: ComponentSelection) -> DataRange;
}

/// Parsed polygonal mesh with point and cell attribute arrays
pub trait MeshData {
    type Array: DataArray;

    fn arrays(&self, location: FieldLocation) -> Vec<Self::Array>;
    fn array_by_name(&self, location: FieldLocation, name: &str) -> Option<Self::Array>;
    /// The point data's designated scalars, if any
    fn point_scalars(&self) -> Option<Self::Array>;
}

/// Color transfer function
pub trait LookupTable {
    fn apply_preset(&self, name: &str) -> Result<()>;
    fn set_mapping_range(&self, range: DataRange);
    fn update_range(&self);
    fn set_vector_mode(&self, mode: ComponentSelection);
    /// Register a callback invoked on every modification.
    fn on_modified(&self, callback: Box<dyn Fn()>);
}

pub trait Mapper {
    fn set_scalar_coloring(&self, coloring: &ScalarColoring);
}

pub trait Actor {
    fn set_visibility(&self, visible: bool);
    fn set_representation(&self, mode: RepresentationMode);
    fn set_edge_visibility(&self, visible: bool);
    fn set_opacity(&self, opacity: f64);
}

/// Scalar bar legend
pub trait ScalarBar {
    fn set_axis_label(&self, label: &str);
    fn set_visibility(&self, visible: bool);
}

pub trait Camera {
    fn apply(&self, operation: CameraOperation, value: f64);
}

/// Factory and renderer/render-window operations of a rendering library.
///
/// One backend instance corresponds to one render window.
pub trait RenderBackend: 'static {
    type Mesh: MeshData + 'static;
    type LookupTable: LookupTable + 'static;
    type Mapper: Mapper + 'static;
    type Actor: Actor + 'static;
    type ScalarBar: ScalarBar + 'static;
    type Camera: Camera + 'static;
    type Scheduler: Scheduler;

    /// Parse decoded bytes as polygonal data.
    fn read_polydata(&self, bytes: &[u8]) -> Result<Self::Mesh>;

    /// Names of every color map preset the library ships.
    fn preset_names(&self) -> Vec<String>;

    fn create_lookup_table(&self) -> Self::LookupTable;
    /// Mapper on `mesh`, bound to `lookup_table`, with scalar visibility off
    /// and the lookup table's range in charge of scalar mapping.
    fn create_mapper(&self, lookup_table: &Self::LookupTable, mesh: &Self::Mesh) -> Self::Mapper;
    fn create_actor(&self, mapper: &Self::Mapper) -> Self::Actor;
    fn create_scalar_bar(&self) -> Self::ScalarBar;

    fn add_actor(&self, actor: &Self::Actor);
    fn add_scalar_bar(&self, scalar_bar: &Self::ScalarBar);
    fn bind_scalar_bar(&self, scalar_bar: &Self::ScalarBar, lookup_table: &Self::LookupTable);

    /// Interactor target frame rate during continuous interaction
    fn set_desired_update_rate(&self, rate: f64);
    fn reset_camera(&self);
    fn active_camera(&self) -> Self::Camera;
    fn render(&self);

    fn scheduler(&self) -> Self::Scheduler;

    fn attach_stats_overlay(&self, overlay: &FpsOverlay);
    fn detach_stats_overlay(&self);
    fn update_stats_overlay(&self);
}
