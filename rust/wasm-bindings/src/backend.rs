// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! vtk.js render backend
//!
//! Implements the core's backend traits over the vtk.js object graph of
//! one full-screen render window.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::{Reflect, Uint8Array};
use mesh_viewer_core::{
    CameraOperation, ColorMode, ComponentSelection, DataRange, FieldLocation, FpsOverlay,
    RenderBackend, RepresentationMode, ScalarColoring, ScalarMode, Scheduler,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::error::{Result, ViewerError};
use crate::utils::js_error_message;
use crate::vtk;

/// CSS class added to the FPS monitor container
pub const FPS_MONITOR_CLASS: &str = "mesh-viewer-fps";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderWindowOptions<'a> {
    background: &'a [f64],
    container_style: ContainerStyle,
}

#[derive(Serialize)]
struct ContainerStyle {
    height: &'static str,
    width: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapperOptions {
    interpolate_scalars_before_mapping: bool,
    use_lookup_table_scalar_range: bool,
    scalar_visibility: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapperColoring<'a> {
    color_by_array_name: &'a str,
    color_mode: u8,
    interpolate_scalars_before_mapping: bool,
    scalar_mode: u8,
    scalar_visibility: bool,
}

impl<'a> From<&'a ScalarColoring> for MapperColoring<'a> {
    fn from(coloring: &'a ScalarColoring) -> Self {
        let color_mode = match coloring.color_mode {
            ColorMode::Default => 0,
            ColorMode::MapScalars => 1,
        };
        let scalar_mode = match coloring.scalar_mode {
            ScalarMode::Default => 0,
            ScalarMode::UsePointFieldData => 3,
            ScalarMode::UseCellFieldData => 4,
        };
        Self {
            color_by_array_name: coloring.array_name.as_deref().unwrap_or_default(),
            color_mode,
            interpolate_scalars_before_mapping: coloring.interpolate_scalars_before_mapping,
            scalar_mode,
            scalar_visibility: coloring.scalar_visibility,
        }
    }
}

/// Plain JS object for `value`; an empty object if conversion fails.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "options not converted");
        js_sys::Object::new().into()
    })
}

// ---- mesh ----

/// Polydata output of the XML reader
pub struct VtkMesh(vtk::PolyData);

impl VtkMesh {
    fn attributes(&self, location: FieldLocation) -> vtk::DataSetAttributes {
        match location {
            FieldLocation::PointData => self.0.get_point_data(),
            FieldLocation::CellData => self.0.get_cell_data(),
        }
    }
}

pub struct VtkArray(vtk::VtkDataArray);

impl mesh_viewer_core::DataArray for VtkArray {
    fn name(&self) -> String {
        self.0.get_name()
    }

    fn number_of_components(&self) -> usize {
        self.0.get_number_of_components() as usize
    }

    fn range(&self, component: ComponentSelection) -> DataRange {
        let index = match component {
            ComponentSelection::Magnitude => -1,
            ComponentSelection::Component(k) => k as i32,
        };
        let range = self.0.get_range(index);
        match (range.get(0).as_f64(), range.get(1).as_f64()) {
            (Some(min), Some(max)) => DataRange::new(min, max),
            _ => DataRange::default(),
        }
    }
}

impl mesh_viewer_core::MeshData for VtkMesh {
    type Array = VtkArray;

    fn arrays(&self, location: FieldLocation) -> Vec<VtkArray> {
        self.attributes(location)
            .get_arrays()
            .iter()
            .map(|array| VtkArray(array.unchecked_into()))
            .collect()
    }

    fn array_by_name(&self, location: FieldLocation, name: &str) -> Option<VtkArray> {
        vtk::non_null(self.attributes(location).get_array_by_name(name)).map(VtkArray)
    }

    fn point_scalars(&self) -> Option<VtkArray> {
        vtk::non_null(self.0.get_point_data().get_scalars()).map(VtkArray)
    }
}

// ---- render graph objects ----

/// Color transfer function plus the closures registered on it
pub struct VtkLookupTable {
    function: vtk::ColorTransferFunction,
    listeners: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl mesh_viewer_core::LookupTable for VtkLookupTable {
    fn apply_preset(&self, name: &str) -> mesh_viewer_core::Result<()> {
        let preset = vtk::get_preset_by_name(name);
        if preset.is_null() || preset.is_undefined() {
            return Err(mesh_viewer_core::Error::UnknownPreset(name.to_string()));
        }
        self.function.apply_color_map(&preset);
        Ok(())
    }

    fn set_mapping_range(&self, range: DataRange) {
        self.function.set_mapping_range(range.min, range.max);
    }

    fn update_range(&self) {
        self.function.update_range();
    }

    fn set_vector_mode(&self, mode: ComponentSelection) {
        match mode {
            ComponentSelection::Magnitude => self.function.set_vector_mode_to_magnitude(),
            ComponentSelection::Component(k) => {
                self.function.set_vector_mode_to_component();
                self.function.set_vector_component(k as u32);
            }
        }
    }

    fn on_modified(&self, callback: Box<dyn Fn()>) {
        let closure = Closure::wrap(callback);
        self.function
            .on_modified(closure.as_ref().unchecked_ref(), -1.0);
        self.listeners.borrow_mut().push(closure);
    }
}

impl mesh_viewer_core::Mapper for vtk::Mapper {
    fn set_scalar_coloring(&self, coloring: &ScalarColoring) {
        self.set(&to_js(&MapperColoring::from(coloring)));
    }
}

impl mesh_viewer_core::Actor for vtk::Actor {
    fn set_visibility(&self, visible: bool) {
        vtk::Actor::set_visibility(self, visible);
    }

    fn set_representation(&self, mode: RepresentationMode) {
        self.get_property().set_representation(mode.code());
    }

    fn set_edge_visibility(&self, visible: bool) {
        self.get_property().set_edge_visibility(visible);
    }

    fn set_opacity(&self, opacity: f64) {
        self.get_property().set_opacity(opacity);
    }
}

impl mesh_viewer_core::ScalarBar for vtk::ScalarBarActor {
    fn set_axis_label(&self, label: &str) {
        vtk::ScalarBarActor::set_axis_label(self, label);
    }

    fn set_visibility(&self, visible: bool) {
        vtk::ScalarBarActor::set_visibility(self, visible);
    }
}

impl mesh_viewer_core::Camera for vtk::VtkCamera {
    fn apply(&self, operation: CameraOperation, value: f64) {
        match operation {
            CameraOperation::Zoom => self.zoom(value),
            CameraOperation::Pitch => self.pitch(value),
            CameraOperation::Elevation => self.elevation(value),
            CameraOperation::Yaw => self.yaw(value),
            CameraOperation::Azimuth => self.azimuth(value),
            CameraOperation::Roll => self.roll(value),
            CameraOperation::Dolly => self.dolly(value),
        }
    }
}

// ---- scheduler ----

/// `setTimeout`-backed scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }

    fn cancel(&self, handle: Timeout) {
        drop(handle.cancel());
    }
}

// ---- backend ----

/// One vtk.js full-screen render window inside a container element
pub struct VtkBackend {
    full_screen: vtk::FullScreenRenderWindow,
    renderer: vtk::Renderer,
    render_window: vtk::RenderWindow,
    container: HtmlElement,
    fps_monitor: vtk::FpsMonitor,
    fps_attached: Cell<bool>,
}

impl VtkBackend {
    /// Allocate the render surface in `container` with the given background.
    pub fn new(container: &HtmlElement, background: &[f64]) -> Result<Self> {
        if !vtk::is_available() {
            return Err(ViewerError::VtkUnavailable);
        }

        let options = serde_wasm_bindgen::to_value(&RenderWindowOptions {
            background,
            container_style: ContainerStyle {
                height: "80%",
                width: "75%",
            },
        })?;
        Reflect::set(&options, &JsValue::from_str("rootContainer"), container)?;

        let full_screen = vtk::new_full_screen_render_window(&options);
        let renderer = full_screen.get_renderer();
        let render_window = full_screen.get_render_window();

        let fps_monitor = vtk::new_fps_monitor();
        fps_monitor
            .get_fps_monitor_container()
            .class_list()
            .add_1(FPS_MONITOR_CLASS)?;

        Ok(Self {
            full_screen,
            renderer,
            render_window,
            container: container.clone(),
            fps_monitor,
            fps_attached: Cell::new(false),
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }
}

impl RenderBackend for VtkBackend {
    type Mesh = VtkMesh;
    type LookupTable = VtkLookupTable;
    type Mapper = vtk::Mapper;
    type Actor = vtk::Actor;
    type ScalarBar = vtk::ScalarBarActor;
    type Camera = vtk::VtkCamera;
    type Scheduler = GlooScheduler;

    fn read_polydata(&self, bytes: &[u8]) -> mesh_viewer_core::Result<VtkMesh> {
        let reader = vtk::new_xml_poly_data_reader();
        let buffer = Uint8Array::from(bytes).buffer();
        reader
            .parse_as_array_buffer(&buffer)
            .map_err(|err| mesh_viewer_core::Error::mesh_parse(js_error_message(&err)))?;

        vtk::non_null(reader.get_output_data(0))
            .map(VtkMesh)
            .ok_or_else(|| mesh_viewer_core::Error::mesh_parse("reader produced no polydata"))
    }

    fn preset_names(&self) -> Vec<String> {
        vtk::rgb_preset_names()
    }

    fn create_lookup_table(&self) -> VtkLookupTable {
        VtkLookupTable {
            function: vtk::new_color_transfer_function(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn create_mapper(&self, lookup_table: &VtkLookupTable, mesh: &VtkMesh) -> vtk::Mapper {
        let options = to_js(&MapperOptions {
            interpolate_scalars_before_mapping: false,
            use_lookup_table_scalar_range: true,
            scalar_visibility: false,
        });
        if let Err(err) = Reflect::set(&options, &JsValue::from_str("lookupTable"), &lookup_table.function) {
            tracing::warn!(err = %js_error_message(&err), "mapper created without lookup table");
        }

        let mapper = vtk::new_mapper(&options);
        mapper.set_input_data(&mesh.0);
        mapper
    }

    fn create_actor(&self, mapper: &vtk::Mapper) -> vtk::Actor {
        let actor = vtk::new_actor();
        actor.set_mapper(mapper);
        actor
    }

    fn create_scalar_bar(&self) -> vtk::ScalarBarActor {
        vtk::new_scalar_bar_actor()
    }

    fn add_actor(&self, actor: &vtk::Actor) {
        self.renderer.add_actor(actor);
    }

    fn add_scalar_bar(&self, scalar_bar: &vtk::ScalarBarActor) {
        self.renderer.add_actor(scalar_bar);
    }

    fn bind_scalar_bar(&self, scalar_bar: &vtk::ScalarBarActor, lookup_table: &VtkLookupTable) {
        scalar_bar.set_scalars_to_colors(&lookup_table.function);
    }

    fn set_desired_update_rate(&self, rate: f64) {
        self.render_window.get_interactor().set_desired_update_rate(rate);
    }

    fn reset_camera(&self) {
        self.renderer.reset_camera();
    }

    fn active_camera(&self) -> vtk::VtkCamera {
        self.renderer.get_active_camera()
    }

    fn render(&self) {
        self.render_window.render();
    }

    fn scheduler(&self) -> GlooScheduler {
        GlooScheduler
    }

    fn attach_stats_overlay(&self, overlay: &FpsOverlay) {
        let monitor = &self.fps_monitor;
        monitor.set_monitor_visibility(overlay.title, overlay.graph, overlay.info);
        if let Some(orientation) = &overlay.orientation {
            monitor.set_orientation(orientation);
        }
        monitor.set_render_window(&self.render_window);
        monitor.set_container(&self.container);

        match vtk::fps_update_callback(monitor) {
            Some(update) => self.full_screen.set_resize_callback(&update),
            None => tracing::warn!("fps monitor has no update method"),
        }
        self.fps_attached.set(true);
    }

    fn detach_stats_overlay(&self) {
        self.fps_monitor.set_container(&JsValue::NULL);
        self.fps_attached.set(false);
    }

    fn update_stats_overlay(&self) {
        if self.fps_attached.get() {
            self.fps_monitor.update();
        }
    }
}
