// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors surfaced to JavaScript

use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Core(#[from] mesh_viewer_core::Error),

    #[error("vtk.js is not loaded (no global `vtk` namespace)")]
    VtkUnavailable,

    #[error("no viewer has been created; call createViewer first")]
    NoViewer,

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("failed to convert value for JavaScript: {0}")]
    Serialization(#[from] serde_wasm_bindgen::Error),
}

impl From<JsValue> for ViewerError {
    fn from(value: JsValue) -> Self {
        ViewerError::Dom(crate::utils::js_error_message(&value))
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
