// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! vtk.js bindings
//!
//! Imports from the UMD bundle's global `vtk` namespace. Only the calls the
//! viewer makes are declared.

use js_sys::{Array, ArrayBuffer, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    // ---- Rendering.Misc.vtkFullScreenRenderWindow ----

    pub type FullScreenRenderWindow;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Misc", "vtkFullScreenRenderWindow"], js_name = newInstance)]
    pub fn new_full_screen_render_window(options: &JsValue) -> FullScreenRenderWindow;

    #[wasm_bindgen(method, js_name = getRenderer)]
    pub fn get_renderer(this: &FullScreenRenderWindow) -> Renderer;

    #[wasm_bindgen(method, js_name = getRenderWindow)]
    pub fn get_render_window(this: &FullScreenRenderWindow) -> RenderWindow;

    #[wasm_bindgen(method, js_name = setResizeCallback)]
    pub fn set_resize_callback(this: &FullScreenRenderWindow, callback: &Function);

    // ---- Rendering.Core ----

    pub type Renderer;

    #[wasm_bindgen(method, js_name = addActor)]
    pub fn add_actor(this: &Renderer, actor: &JsValue);

    #[wasm_bindgen(method, js_name = resetCamera)]
    pub fn reset_camera(this: &Renderer);

    #[wasm_bindgen(method, js_name = getActiveCamera)]
    pub fn get_active_camera(this: &Renderer) -> VtkCamera;

    pub type RenderWindow;

    #[wasm_bindgen(method)]
    pub fn render(this: &RenderWindow);

    #[wasm_bindgen(method, js_name = getInteractor)]
    pub fn get_interactor(this: &RenderWindow) -> Interactor;

    pub type Interactor;

    #[wasm_bindgen(method, js_name = setDesiredUpdateRate)]
    pub fn set_desired_update_rate(this: &Interactor, rate: f64);

    pub type VtkCamera;

    #[wasm_bindgen(method)]
    pub fn zoom(this: &VtkCamera, factor: f64);
    #[wasm_bindgen(method)]
    pub fn pitch(this: &VtkCamera, angle: f64);
    #[wasm_bindgen(method)]
    pub fn elevation(this: &VtkCamera, angle: f64);
    #[wasm_bindgen(method)]
    pub fn yaw(this: &VtkCamera, angle: f64);
    #[wasm_bindgen(method)]
    pub fn azimuth(this: &VtkCamera, angle: f64);
    #[wasm_bindgen(method)]
    pub fn roll(this: &VtkCamera, angle: f64);
    #[wasm_bindgen(method)]
    pub fn dolly(this: &VtkCamera, factor: f64);

    pub type Actor;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkActor"], js_name = newInstance)]
    pub fn new_actor() -> Actor;

    #[wasm_bindgen(method, js_name = setMapper)]
    pub fn set_mapper(this: &Actor, mapper: &Mapper);

    #[wasm_bindgen(method, js_name = getProperty)]
    pub fn get_property(this: &Actor) -> Property;

    #[wasm_bindgen(method, js_name = setVisibility)]
    pub fn set_visibility(this: &Actor, visible: bool);

    pub type Property;

    #[wasm_bindgen(method, js_name = setRepresentation)]
    pub fn set_representation(this: &Property, representation: i32);

    #[wasm_bindgen(method, js_name = setEdgeVisibility)]
    pub fn set_edge_visibility(this: &Property, visible: bool);

    #[wasm_bindgen(method, js_name = setOpacity)]
    pub fn set_opacity(this: &Property, opacity: f64);

    pub type Mapper;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkMapper"], js_name = newInstance)]
    pub fn new_mapper(options: &JsValue) -> Mapper;

    #[wasm_bindgen(method)]
    pub fn set(this: &Mapper, values: &JsValue);

    #[wasm_bindgen(method, js_name = setInputData)]
    pub fn set_input_data(this: &Mapper, data: &PolyData);

    pub type ColorTransferFunction;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkColorTransferFunction"], js_name = newInstance)]
    pub fn new_color_transfer_function() -> ColorTransferFunction;

    #[wasm_bindgen(method, js_name = applyColorMap)]
    pub fn apply_color_map(this: &ColorTransferFunction, preset: &JsValue);

    #[wasm_bindgen(method, js_name = setMappingRange)]
    pub fn set_mapping_range(this: &ColorTransferFunction, min: f64, max: f64);

    #[wasm_bindgen(method, js_name = updateRange)]
    pub fn update_range(this: &ColorTransferFunction);

    #[wasm_bindgen(method, js_name = setVectorModeToMagnitude)]
    pub fn set_vector_mode_to_magnitude(this: &ColorTransferFunction);

    #[wasm_bindgen(method, js_name = setVectorModeToComponent)]
    pub fn set_vector_mode_to_component(this: &ColorTransferFunction);

    #[wasm_bindgen(method, js_name = setVectorComponent)]
    pub fn set_vector_component(this: &ColorTransferFunction, component: u32);

    #[wasm_bindgen(method, js_name = onModified)]
    pub fn on_modified(this: &ColorTransferFunction, callback: &Function, priority: f64) -> JsValue;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkColorTransferFunction", "vtkColorMaps"], js_name = getPresetByName)]
    pub fn get_preset_by_name(name: &str) -> JsValue;

    pub type ScalarBarActor;

    #[wasm_bindgen(js_namespace = ["vtk", "Rendering", "Core", "vtkScalarBarActor"], js_name = newInstance)]
    pub fn new_scalar_bar_actor() -> ScalarBarActor;

    #[wasm_bindgen(method, js_name = setAxisLabel)]
    pub fn set_axis_label(this: &ScalarBarActor, label: &str);

    #[wasm_bindgen(method, js_name = setVisibility)]
    pub fn set_visibility(this: &ScalarBarActor, visible: bool);

    #[wasm_bindgen(method, js_name = setScalarsToColors)]
    pub fn set_scalars_to_colors(this: &ScalarBarActor, lookup_table: &ColorTransferFunction);

    // ---- IO.XML / Common.DataModel ----

    pub type XmlPolyDataReader;

    #[wasm_bindgen(js_namespace = ["vtk", "IO", "XML", "vtkXMLPolyDataReader"], js_name = newInstance)]
    pub fn new_xml_poly_data_reader() -> XmlPolyDataReader;

    #[wasm_bindgen(method, catch, js_name = parseAsArrayBuffer)]
    pub fn parse_as_array_buffer(this: &XmlPolyDataReader, buffer: &ArrayBuffer) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = getOutputData)]
    pub fn get_output_data(this: &XmlPolyDataReader, port: u32) -> JsValue;

    pub type PolyData;

    #[wasm_bindgen(method, js_name = getPointData)]
    pub fn get_point_data(this: &PolyData) -> DataSetAttributes;

    #[wasm_bindgen(method, js_name = getCellData)]
    pub fn get_cell_data(this: &PolyData) -> DataSetAttributes;

    pub type DataSetAttributes;

    #[wasm_bindgen(method, js_name = getArrays)]
    pub fn get_arrays(this: &DataSetAttributes) -> Array;

    #[wasm_bindgen(method, js_name = getArrayByName)]
    pub fn get_array_by_name(this: &DataSetAttributes, name: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = getScalars)]
    pub fn get_scalars(this: &DataSetAttributes) -> JsValue;

    pub type VtkDataArray;

    #[wasm_bindgen(method, js_name = getName)]
    pub fn get_name(this: &VtkDataArray) -> String;

    #[wasm_bindgen(method, js_name = getNumberOfComponents)]
    pub fn get_number_of_components(this: &VtkDataArray) -> u32;

    /// `[min, max]`; component `-1` is the tuple magnitude
    #[wasm_bindgen(method, js_name = getRange)]
    pub fn get_range(this: &VtkDataArray, component: i32) -> Array;

    // ---- Interaction.UI.vtkFPSMonitor ----

    pub type FpsMonitor;

    #[wasm_bindgen(js_namespace = ["vtk", "Interaction", "UI", "vtkFPSMonitor"], js_name = newInstance)]
    pub fn new_fps_monitor() -> FpsMonitor;

    #[wasm_bindgen(method, js_name = getFpsMonitorContainer)]
    pub fn get_fps_monitor_container(this: &FpsMonitor) -> HtmlElement;

    #[wasm_bindgen(method, js_name = setMonitorVisibility)]
    pub fn set_monitor_visibility(this: &FpsMonitor, title: bool, graph: bool, info: bool);

    #[wasm_bindgen(method, js_name = setOrientation)]
    pub fn set_orientation(this: &FpsMonitor, orientation: &str);

    #[wasm_bindgen(method, js_name = setRenderWindow)]
    pub fn set_render_window(this: &FpsMonitor, render_window: &RenderWindow);

    #[wasm_bindgen(method, js_name = setContainer)]
    pub fn set_container(this: &FpsMonitor, container: &JsValue);

    #[wasm_bindgen(method)]
    pub fn update(this: &FpsMonitor);
}

/// Whether the vtk.js bundle is loaded
pub fn is_available() -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str("vtk"))
        .map(|vtk| vtk.is_object())
        .unwrap_or(false)
}

/// `vtkColorMaps.rgbPresetNames`
pub fn rgb_preset_names() -> Vec<String> {
    let path = [
        "vtk",
        "Rendering",
        "Core",
        "vtkColorTransferFunction",
        "vtkColorMaps",
        "rgbPresetNames",
    ];
    let names = path.iter().try_fold(JsValue::from(js_sys::global()), |value, key| {
        Reflect::get(&value, &JsValue::from_str(key)).ok().filter(|v| !v.is_undefined())
    });

    match names.and_then(|v| v.dyn_into::<Array>().ok()) {
        Some(array) => array.iter().filter_map(|name| name.as_string()).collect(),
        None => {
            tracing::warn!("vtk color map catalog not found");
            Vec::new()
        }
    }
}

/// Bound `update` method of a monitor, usable as a plain callback
pub fn fps_update_callback(monitor: &FpsMonitor) -> Option<Function> {
    Reflect::get(monitor, &JsValue::from_str("update"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

/// `None` for `null` / `undefined`
pub fn non_null<T: JsCast>(value: JsValue) -> Option<T> {
    if value.is_null() || value.is_undefined() {
        None
    } else {
        Some(value.unchecked_into())
    }
}
