// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh Viewer WebAssembly Bindings
//!
//! JavaScript API for the mesh viewer built with wasm-bindgen. Rendering is
//! delegated to the vtk.js UMD bundle, which must be loaded before the
//! first `createViewer` call.

use mesh_viewer_core::ViewerConfig;
use wasm_bindgen::prelude::*;

mod api;
pub mod backend;
pub mod dom;
mod error;
pub mod logging;
mod utils;
pub mod vtk;

pub use api::{create_pipeline, create_viewer, empty_container, update_camera, MeshViewer};
pub use error::ViewerError;
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
    let config = ViewerConfig::from_query(&utils::query_string());
    logging::init(config.log_level);
}

/// Get the version of the mesh viewer
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
