// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(target_arch = "wasm32")]

use mesh_viewer_core::{
    ColorBy, ComponentSelection, ControlGroup, FieldLocation, Representation, SelectOption, Theme,
};
use mesh_viewer_wasm::dom::{self, ControlPanel, BUTTON_CLASS, CONTROL_CLASS, ROOT_CLASS};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlSelectElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn container() -> HtmlElement {
    let document = document();
    let div: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

fn controls() -> ControlGroup {
    let presets = vec!["Cool to Warm".to_string(), "erdc_rainbow_bright".to_string()];
    let group = ControlGroup::new("Bunny", &presets, "erdc_rainbow_bright");
    group.color_by.set_options(
        vec![
            SelectOption::new(ColorBy::Solid, ColorBy::Solid.label()),
            SelectOption::new(ColorBy::array(FieldLocation::PointData, "Velocity"), "(p) Velocity"),
        ],
        None,
    );
    group
}

fn nth_select(group: &HtmlElement, index: u32) -> HtmlSelectElement {
    group.children().item(index).unwrap().dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn panel_and_toggle_are_appended() {
    let container = container();
    let panel = ControlPanel::new(&document(), &container, Theme::Dark).unwrap();

    assert_eq!(container.child_element_count(), 2);
    assert_eq!(panel.root().class_name(), ROOT_CLASS);
    assert_eq!(panel.toggle_button().class_name(), BUTTON_CLASS);

    panel.toggle_button().click();
    assert_eq!(panel.root().style().get_property_value("display").unwrap(), "none");
    panel.toggle_button().click();
    assert_eq!(panel.root().style().get_property_value("display").unwrap(), "flex");
}

#[wasm_bindgen_test]
fn group_renders_widgets_in_order() {
    let panel = ControlPanel::new(&document(), &container(), Theme::Light).unwrap();
    let group = panel.mount(&controls()).unwrap();

    assert_eq!(group.class_name(), CONTROL_CLASS);
    let tags: Vec<String> = (0..group.child_element_count())
        .map(|i| group.children().item(i).unwrap().tag_name())
        .collect();
    assert_eq!(tags, vec!["LABEL", "SELECT", "SELECT", "SELECT", "SELECT", "INPUT"]);
    assert_eq!(group.children().item(0).unwrap().text_content().unwrap(), "Bunny");

    let representation = nth_select(&group, 1);
    assert_eq!(representation.value(), "1:2:0");
    assert_eq!(representation.class_name(), "mesh-viewer-light");
    assert_eq!(nth_select(&group, 2).value(), "erdc_rainbow_bright");

    let component = nth_select(&group, 4);
    assert_eq!(component.style().get_property_value("display").unwrap(), "none");
}

#[wasm_bindgen_test]
fn dom_changes_reach_the_models() {
    let panel = ControlPanel::new(&document(), &container(), Theme::Dark).unwrap();
    let controls = controls();
    let group = panel.mount(&controls).unwrap();

    let representation = nth_select(&group, 1);
    representation.set_value("1:1:0");
    representation
        .dispatch_event(&Event::new("change").unwrap())
        .unwrap();
    assert_eq!(controls.representation.value(), Some(Representation::Wireframe));

    let opacity: HtmlInputElement = group.children().item(5).unwrap().dyn_into().unwrap();
    opacity.set_value("40");
    opacity.dispatch_event(&Event::new("input").unwrap()).unwrap();
    assert_eq!(controls.opacity.value(), 40);
}

#[wasm_bindgen_test]
fn model_refresh_updates_the_view() {
    let panel = ControlPanel::new(&document(), &container(), Theme::Dark).unwrap();
    let controls = controls();
    let group = panel.mount(&controls).unwrap();

    controls
        .component
        .set_options(ComponentSelection::options(3), Some(&ComponentSelection::Magnitude));
    controls.component.set_visible(true);

    let component = nth_select(&group, 4);
    assert_eq!(component.length(), 4);
    assert_eq!(component.value(), "-1");
    assert_eq!(component.style().get_property_value("display").unwrap(), "");

    panel.clear();
    assert_eq!(panel.group_count(), 0);
    assert_eq!(panel.root().child_element_count(), 0);

    // bindings are gone: model changes no longer touch the removed view
    controls.component.set_visible(false);
    assert_eq!(component.style().get_property_value("display").unwrap(), "");
}

#[wasm_bindgen_test]
fn stylesheet_installed_once() {
    let document = document();
    dom::install_stylesheet(&document).unwrap();
    dom::install_stylesheet(&document).unwrap();
    let styles = document.query_selector_all("#mesh-viewer-style").unwrap();
    assert_eq!(styles.length(), 1);
}

#[wasm_bindgen_test]
fn version_is_reported() {
    assert_eq!(mesh_viewer_wasm::version(), env!("CARGO_PKG_VERSION"));
}
