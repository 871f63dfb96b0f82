// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for the mesh viewer
//!
//! `createViewer(container)` returns a [`MeshViewer`]; the free functions
//! `createPipeline`, `emptyContainer` and `updateCamera` act on the most
//! recently created viewer so pages can call them as globals.

use std::cell::RefCell;
use std::rc::Rc;

use mesh_viewer_core::{ColorBy, DataRange, ViewerConfig, ViewerSession};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::backend::VtkBackend;
use crate::dom::{self, ControlPanel};
use crate::error::{Result, ViewerError};
use crate::utils;
use crate::vtk::VtkCamera;

struct ViewerInner {
    session: ViewerSession<VtkBackend>,
    panel: ControlPanel,
}

thread_local! {
    static CURRENT: RefCell<Option<MeshViewer>> = const { RefCell::new(None) };
}

/// Snapshot of one pipeline's coloring state
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineState {
    name: String,
    color_by: ColorBy,
    data_range: DataRange,
    opacity: u32,
    component_visible: bool,
}

/// Viewer bound to one container element
#[wasm_bindgen]
#[derive(Clone)]
pub struct MeshViewer {
    inner: Rc<ViewerInner>,
}

#[wasm_bindgen]
impl MeshViewer {
    /// Create a viewer configured from the page URL.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement) -> std::result::Result<MeshViewer, JsValue> {
        Ok(Self::create(&container)?)
    }

    /// Decode a base64 VTP payload and add it with its controls.
    #[wasm_bindgen(js_name = createPipeline)]
    pub fn create_pipeline(&self, file_contents: &str, name: Option<String>) -> std::result::Result<(), JsValue> {
        let pipeline = self
            .inner
            .session
            .create_pipeline(file_contents, name.as_deref())
            .map_err(ViewerError::from)?;
        self.inner.panel.mount(pipeline.controls())?;
        Ok(())
    }

    /// Detach the FPS monitor, drop every pipeline and empty `container`.
    #[wasm_bindgen(js_name = emptyContainer)]
    pub fn empty_container(&self, container: &HtmlElement) -> std::result::Result<(), JsValue> {
        self.inner.session.empty();
        self.inner.panel.clear();
        remove_children(container)?;
        Ok(())
    }

    /// Apply the URL camera operations to `camera`, or to the active camera.
    #[wasm_bindgen(js_name = updateCamera)]
    pub fn update_camera(&self, camera: Option<VtkCamera>) {
        match camera {
            Some(camera) => self.inner.session.update_camera(&camera),
            None => self.inner.session.update_active_camera(),
        }
    }

    /// The configuration read from the URL
    #[wasm_bindgen(getter)]
    pub fn config(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.session.config())?)
    }

    /// Names of the pipelines, in creation order
    #[wasm_bindgen(getter, js_name = pipelineNames)]
    pub fn pipeline_names(&self) -> js_sys::Array {
        self.inner
            .session
            .pipelines()
            .iter()
            .map(|p| JsValue::from_str(p.name()))
            .collect()
    }

    /// Coloring state of the named pipeline, `undefined` if there is none
    #[wasm_bindgen(js_name = pipelineState)]
    pub fn pipeline_state(&self, name: &str) -> std::result::Result<JsValue, JsValue> {
        let Some(pipeline) = self.inner.session.pipeline(name) else {
            return Ok(JsValue::UNDEFINED);
        };
        let controls = pipeline.controls();
        let state = PipelineState {
            name: pipeline.name().to_string(),
            color_by: controls.color_by.value().unwrap_or_default(),
            data_range: pipeline.data_range(),
            opacity: controls.opacity.value(),
            component_visible: controls.component.is_visible(),
        };
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }
}

impl MeshViewer {
    fn create(container: &HtmlElement) -> Result<Self> {
        let config = ViewerConfig::from_query(&utils::query_string());
        let document = utils::document()?;
        dom::install_stylesheet(&document)?;
        let platform = utils::window()?.navigator().platform().unwrap_or_default();
        dom::mark_ios_device(&document, &platform)?;

        let backend = VtkBackend::new(container, &config.background)?;
        let theme = config.theme();
        let session = ViewerSession::new(config, backend);
        let panel = ControlPanel::new(&document, container, theme)?;

        Ok(Self {
            inner: Rc::new(ViewerInner { session, panel }),
        })
    }
}

fn remove_children(container: &HtmlElement) -> Result<()> {
    while let Some(child) = container.first_child() {
        container.remove_child(&child)?;
    }
    Ok(())
}

fn current() -> Result<MeshViewer> {
    CURRENT
        .with(|current| current.borrow().clone())
        .ok_or(ViewerError::NoViewer)
}

/// Create a viewer in `container` and make it the target of the free
/// functions.
#[wasm_bindgen(js_name = createViewer)]
pub fn create_viewer(container: HtmlElement) -> std::result::Result<MeshViewer, JsValue> {
    let viewer = MeshViewer::create(&container)?;
    CURRENT.with(|current| *current.borrow_mut() = Some(viewer.clone()));
    Ok(viewer)
}

#[wasm_bindgen(js_name = createPipeline)]
pub fn create_pipeline(file_contents: &str, name: Option<String>) -> std::result::Result<(), JsValue> {
    current()?.create_pipeline(file_contents, name)
}

/// Empty `container`. Works without a viewer.
#[wasm_bindgen(js_name = emptyContainer)]
pub fn empty_container(container: &HtmlElement) -> std::result::Result<(), JsValue> {
    match current() {
        Ok(viewer) => viewer.empty_container(container),
        Err(_) => Ok(remove_children(container)?),
    }
}

#[wasm_bindgen(js_name = updateCamera)]
pub fn update_camera(camera: Option<VtkCamera>) -> std::result::Result<(), JsValue> {
    current()?.update_camera(camera);
    Ok(())
}
