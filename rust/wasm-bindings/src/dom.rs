// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DOM rendering of the control panel
//!
//! Widget state lives in the core's [`ControlGroup`]. This module renders
//! it into `<select>`/`<input>` elements and feeds user events back into
//! the models.

use std::cell::RefCell;

use mesh_viewer_core::{ControlGroup, ControlValue, Select, Slider, Subscription, Theme};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlOptionElement, HtmlSelectElement,
};

use crate::error::{Result, ViewerError};

pub const ROOT_CLASS: &str = "mesh-viewer-root-controller";
pub const CONTROL_CLASS: &str = "mesh-viewer-control";
pub const BUTTON_CLASS: &str = "mesh-viewer-button";
pub const IOS_CLASS: &str = "is-ios-device";

const STYLE_ID: &str = "mesh-viewer-style";
const STYLESHEET: &str = include_str!("viewer.css");

const TOGGLE_ICON: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24' fill='none' stroke='%23888' stroke-width='2'>\
<line x1='4' y1='6' x2='20' y2='6'/><line x1='4' y1='12' x2='20' y2='12'/><line x1='4' y1='18' x2='20' y2='18'/></svg>";

/// Add the viewer stylesheet to the document head, once.
pub fn install_stylesheet(document: &Document) -> Result<()> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| ViewerError::Dom("document has no head".to_string()))?;
    let style = document.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(STYLESHEET));
    head.append_child(&style)?;
    Ok(())
}

/// Tag the body of iOS devices with `is-ios-device`.
pub fn mark_ios_device(document: &Document, platform: &str) -> Result<()> {
    if !crate::utils::is_ios_platform(platform) {
        return Ok(());
    }
    if let Some(body) = document.body() {
        body.class_list().add_1(IOS_CLASS)?;
    }
    Ok(())
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| ViewerError::Dom(format!("<{}> is not the expected element type", tag)))
}

/// Event listener removed from its target when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// DOM listeners and model subscriptions of one mounted control group
#[derive(Default)]
struct Bindings {
    listeners: Vec<Listener>,
    subscriptions: Vec<Subscription>,
}

impl Drop for Bindings {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
    }
}

/// Collapsible panel holding one control group per mesh
pub struct ControlPanel {
    document: Document,
    root: HtmlElement,
    toggle: HtmlImageElement,
    theme: Theme,
    _toggle_listener: Listener,
    groups: RefCell<Vec<(HtmlElement, Bindings)>>,
}

impl ControlPanel {
    /// Append the panel root and its toggle button to `container`.
    pub fn new(document: &Document, container: &HtmlElement, theme: Theme) -> Result<Self> {
        let root: HtmlElement = create(document, "div")?;
        root.set_class_name(ROOT_CLASS);

        let toggle: HtmlImageElement = create(document, "img")?;
        toggle.set_class_name(BUTTON_CLASS);
        toggle.set_src(TOGGLE_ICON);

        let panel = root.clone();
        let toggle_listener = Listener::new(&toggle, "click", move |_| {
            if let Err(err) = toggle_display(&panel) {
                tracing::warn!(%err, "control panel toggle failed");
            }
        })?;

        container.append_child(&root)?;
        container.append_child(&toggle)?;

        Ok(Self {
            document: document.clone(),
            root,
            toggle,
            theme,
            _toggle_listener: toggle_listener,
            groups: RefCell::new(Vec::new()),
        })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn toggle_button(&self) -> &HtmlImageElement {
        &self.toggle
    }

    pub fn group_count(&self) -> usize {
        self.groups.borrow().len()
    }

    /// Render a control group: label, representation, color map, color-by,
    /// component and opacity, in that order.
    pub fn mount(&self, controls: &ControlGroup) -> Result<HtmlElement> {
        let mut bindings = Bindings::default();
        let class = self.theme.css_class();

        let group: HtmlElement = create(&self.document, "div")?;
        group.set_class_name(CONTROL_CLASS);

        let label = self.document.create_element("label")?;
        label.set_class_name(class);
        label.set_text_content(Some(&controls.label));
        group.append_child(&label)?;

        group.append_child(&self.select(&controls.representation, &mut bindings)?.into())?;
        group.append_child(&self.select(&controls.preset, &mut bindings)?.into())?;
        group.append_child(&self.select(&controls.color_by, &mut bindings)?.into())?;
        group.append_child(&self.select(&controls.component, &mut bindings)?.into())?;
        group.append_child(&self.slider(&controls.opacity, &mut bindings)?.into())?;

        self.root.append_child(&group)?;
        self.groups.borrow_mut().push((group.clone(), bindings));
        tracing::debug!(label = %controls.label, "control group mounted");
        Ok(group)
    }

    /// Drop every group's listeners and remove the groups from the panel.
    pub fn clear(&self) {
        for (element, _bindings) in self.groups.borrow_mut().drain(..) {
            element.remove();
        }
    }

    fn select<T: ControlValue>(&self, model: &Select<T>, bindings: &mut Bindings) -> Result<HtmlSelectElement> {
        let element: HtmlSelectElement = create(&self.document, "select")?;
        element.set_class_name(self.theme.css_class());
        render_select(&element, model)?;

        let view = element.clone();
        let source = model.clone();
        bindings.subscriptions.push(model.on_refresh(move || {
            if let Err(err) = render_select(&view, &source) {
                tracing::warn!(%err, "select not refreshed");
            }
        }));

        let source = model.clone();
        let view = element.clone();
        bindings.listeners.push(Listener::new(&element, "change", move |_| {
            if let Err(err) = source.choose_encoded(&view.value()) {
                tracing::warn!(%err, "control change ignored");
            }
        })?);

        Ok(element)
    }

    fn slider(&self, model: &Slider, bindings: &mut Bindings) -> Result<HtmlInputElement> {
        let element: HtmlInputElement = create(&self.document, "input")?;
        element.set_class_name(self.theme.css_class());
        element.set_type("range");
        element.set_min(&model.min().to_string());
        element.set_max(&model.max().to_string());
        element.set_value(&model.value().to_string());

        let source = model.clone();
        let view = element.clone();
        bindings.listeners.push(Listener::new(&element, "input", move |_| {
            if let Err(err) = source.input_encoded(&view.value()) {
                tracing::warn!(%err, "opacity input ignored");
            }
        })?);

        Ok(element)
    }
}

/// Rebuild the options of `element` from `model`.
fn render_select<T: ControlValue>(element: &HtmlSelectElement, model: &Select<T>) -> Result<()> {
    element.set_length(0);
    for option in model.options() {
        let entry = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value.encode())?;
        element.append_child(&entry)?;
    }
    element.set_selected_index(model.selected_index().map_or(-1, |i| i as i32));

    let style = element.style();
    if model.is_visible() {
        style.remove_property("display")?;
    } else {
        style.set_property("display", "none")?;
    }
    Ok(())
}

fn toggle_display(panel: &HtmlElement) -> Result<()> {
    let style = panel.style();
    let hidden = style.get_property_value("display")? == "none";
    style.set_property("display", if hidden { "flex" } else { "none" })?;
    Ok(())
}
