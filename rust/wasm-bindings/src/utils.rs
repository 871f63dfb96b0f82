// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

use crate::error::{Result, ViewerError};

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| ViewerError::Dom("no global window".to_string()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| ViewerError::Dom("window has no document".to_string()))
}

/// `location.search` of the page, empty outside a browser window
pub fn query_string() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// `navigator.platform` names an iPad, iPhone or iPod
pub fn is_ios_platform(platform: &str) -> bool {
    ["iPad", "iPhone", "iPod"].iter().any(|device| platform.contains(device))
}

/// Readable message of a thrown JavaScript value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
