// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control values and widget models
//!
//! Each widget of a pipeline's control group is modelled here independently
//! of the DOM. The composite string encodings (`"1:2:0"`, `"PointData:T"`,
//! `"-1"`) only exist at the boundary, through [`ControlValue`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::backend::{DataArray, MeshData};
use crate::error::{Error, Result};
use crate::observer::{Notifier, Subscription};

/// Attribute location on the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldLocation {
    PointData,
    CellData,
}

impl FieldLocation {
    pub const ALL: [FieldLocation; 2] = [FieldLocation::PointData, FieldLocation::CellData];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldLocation::PointData => "PointData",
            FieldLocation::CellData => "CellData",
        }
    }

    /// Short tag used in option labels: `(p)` / `(c)`
    pub fn tag(&self) -> &'static str {
        match self {
            FieldLocation::PointData => "p",
            FieldLocation::CellData => "c",
        }
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PointData" => Ok(FieldLocation::PointData),
            "CellData" => Ok(FieldLocation::CellData),
            other => Err(Error::InvalidControlValue(other.to_string())),
        }
    }
}

/// Actor surface representation (vtk `Representation` constants)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationMode {
    Points = 0,
    Wireframe = 1,
    Surface = 2,
}

impl RepresentationMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RepresentationMode::Points),
            1 => Some(RepresentationMode::Wireframe),
            2 => Some(RepresentationMode::Surface),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Visibility, representation and edge visibility of an actor.
///
/// `representation` is `None` for the hidden entry, which leaves the
/// actor's representation untouched (`-1` in the composite encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub visible: bool,
    pub representation: Option<RepresentationMode>,
    pub edge_visibility: bool,
}

/// Parse `v:r:e`, e.g. `1:2:0` or `0:-1:0`
fn display_triplet(input: &str) -> IResult<&str, (i32, i32, i32)> {
    fn int(input: &str) -> IResult<&str, i32> {
        map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| s.parse::<i32>())(input)
    }

    let (rest, (v, _, r, _, e)) = all_consuming(tuple((int, char(':'), int, char(':'), int)))(input)?;
    Ok((rest, (v, r, e)))
}

impl FromStr for DisplayState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (v, r, e)) =
            display_triplet(s).map_err(|_| Error::InvalidControlValue(s.to_string()))?;

        let representation = match r {
            -1 => None,
            code => Some(
                RepresentationMode::from_code(code)
                    .ok_or_else(|| Error::InvalidControlValue(s.to_string()))?,
            ),
        };

        Ok(DisplayState {
            visible: v != 0,
            representation,
            edge_visibility: e != 0,
        })
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.visible as i32,
            self.representation.map_or(-1, RepresentationMode::code),
            self.edge_visibility as i32
        )
    }
}

/// Entries of the representation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Hidden,
    Points,
    Wireframe,
    Surface,
    SurfaceWithEdges,
}

impl Representation {
    pub const ALL: [Representation; 5] = [
        Representation::Hidden,
        Representation::Points,
        Representation::Wireframe,
        Representation::Surface,
        Representation::SurfaceWithEdges,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Representation::Hidden => "Hidden",
            Representation::Points => "Points",
            Representation::Wireframe => "Wireframe",
            Representation::Surface => "Surface",
            Representation::SurfaceWithEdges => "Surface with Edges",
        }
    }

    pub fn display(&self) -> DisplayState {
        let (visible, representation, edge_visibility) = match self {
            Representation::Hidden => (false, None, false),
            Representation::Points => (true, Some(RepresentationMode::Points), false),
            Representation::Wireframe => (true, Some(RepresentationMode::Wireframe), false),
            Representation::Surface => (true, Some(RepresentationMode::Surface), false),
            Representation::SurfaceWithEdges => (true, Some(RepresentationMode::Surface), true),
        };
        DisplayState {
            visible,
            representation,
            edge_visibility,
        }
    }

    pub fn from_display(state: DisplayState) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.display() == state)
    }
}

impl Default for Representation {
    fn default() -> Self {
        Representation::Surface
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display().fmt(f)
    }
}

impl FromStr for Representation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let state: DisplayState = s.parse()?;
        Self::from_display(state).ok_or_else(|| Error::InvalidControlValue(s.to_string()))
    }
}

/// Which attribute array drives surface coloring
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ColorBy {
    #[default]
    Solid,
    Array {
        location: FieldLocation,
        name: String,
    },
}

impl ColorBy {
    pub fn array(location: FieldLocation, name: impl Into<String>) -> Self {
        ColorBy::Array {
            location,
            name: name.into(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ColorBy::Solid => "Solid color".to_string(),
            ColorBy::Array { location, name } => format!("({}) {}", location.tag(), name),
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, ColorBy::Solid)
    }
}

impl fmt::Display for ColorBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorBy::Solid => f.write_str(":"),
            ColorBy::Array { location, name } => write!(f, "{}:{}", location, name),
        }
    }
}

impl FromStr for ColorBy {
    type Err = Error;

    /// `Location:name`; array names may themselves contain `:`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            None if s.is_empty() => Ok(ColorBy::Solid),
            None => Err(Error::InvalidControlValue(s.to_string())),
            Some(("", _)) => Ok(ColorBy::Solid),
            Some((location, name)) => Ok(ColorBy::Array {
                location: location.parse()?,
                name: name.to_string(),
            }),
        }
    }
}

/// Vector handling of a multi-component color array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentSelection {
    #[default]
    Magnitude,
    Component(usize),
}

impl ComponentSelection {
    pub fn label(&self) -> String {
        match self {
            ComponentSelection::Magnitude => "Magnitude".to_string(),
            ComponentSelection::Component(index) => format!("Component {}", index + 1),
        }
    }

    /// `Magnitude` followed by one entry per component.
    pub fn options(components: usize) -> Vec<SelectOption<ComponentSelection>> {
        std::iter::once(ComponentSelection::Magnitude)
            .chain((0..components).map(ComponentSelection::Component))
            .map(|value| SelectOption::new(value, value.label()))
            .collect()
    }
}

impl fmt::Display for ComponentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentSelection::Magnitude => f.write_str("-1"),
            ComponentSelection::Component(index) => write!(f, "{}", index),
        }
    }
}

impl FromStr for ComponentSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidControlValue(s.to_string()))?;
        match value {
            v if v < 0 => Ok(ComponentSelection::Magnitude),
            v => Ok(ComponentSelection::Component(v as usize)),
        }
    }
}

/// Actor opacity as an integer percentage in `1..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opacity(u32);

impl Opacity {
    pub const MIN_PERCENT: u32 = 1;
    pub const MAX_PERCENT: u32 = 100;

    /// Clamp into `1..=100`, so the fraction is always in (0, 1].
    pub fn from_percent(percent: u32) -> Self {
        Self(percent.clamp(Self::MIN_PERCENT, Self::MAX_PERCENT))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    pub fn fraction(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(Self::MAX_PERCENT)
    }
}

/// Value carried by a select widget, with its option-value encoding
pub trait ControlValue: Clone + PartialEq + 'static {
    fn encode(&self) -> String;
    fn decode(raw: &str) -> Result<Self>;
}

impl ControlValue for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

macro_rules! control_value_via_str {
    ($($ty:ty),*) => {
        $(
            impl ControlValue for $ty {
                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(raw: &str) -> Result<Self> {
                    raw.parse()
                }
            }
        )*
    };
}

control_value_via_str!(Representation, ColorBy, ComponentSelection);

/// One entry of a select widget
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

#[derive(Debug)]
struct SelectState<T> {
    options: Vec<SelectOption<T>>,
    selected: Option<usize>,
    visible: bool,
}

/// Drop-down widget model.
///
/// `changed` fires only for user choices ([`Select::choose`]); `refreshed`
/// fires whenever options, selection or visibility change so a view can
/// redraw itself.
pub struct Select<T> {
    state: Rc<RefCell<SelectState<T>>>,
    changed: Notifier<T>,
    refreshed: Notifier<()>,
}

impl<T> Clone for Select<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            changed: self.changed.clone(),
            refreshed: self.refreshed.clone(),
        }
    }
}

impl<T: ControlValue> Select<T> {
    /// New visible select with the first option selected.
    pub fn new(options: Vec<SelectOption<T>>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self {
            state: Rc::new(RefCell::new(SelectState {
                options,
                selected,
                visible: true,
            })),
            changed: Notifier::new(),
            refreshed: Notifier::new(),
        }
    }

    pub fn options(&self) -> Vec<SelectOption<T>> {
        self.state.borrow().options.clone()
    }

    pub fn value(&self) -> Option<T> {
        let state = self.state.borrow();
        state.selected.map(|i| state.options[i].value.clone())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.borrow().selected
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            std::mem::replace(&mut state.visible, visible) != visible
        };
        if changed {
            self.refreshed.notify(&());
        }
    }

    /// Replace the options. `selected` falls back to the first option when
    /// absent or not among the new options.
    pub fn set_options(&self, options: Vec<SelectOption<T>>, selected: Option<&T>) {
        {
            let mut state = self.state.borrow_mut();
            let index = selected
                .and_then(|value| options.iter().position(|o| &o.value == value))
                .or(if options.is_empty() { None } else { Some(0) });
            state.options = options;
            state.selected = index;
        }
        self.refreshed.notify(&());
    }

    /// Programmatic selection, without a change notification.
    /// Returns `false` and keeps the current selection when `value` is not
    /// among the options.
    pub fn select(&self, value: &T) -> bool {
        let found = {
            let mut state = self.state.borrow_mut();
            match state.options.iter().position(|o| &o.value == value) {
                Some(index) => {
                    state.selected = Some(index);
                    true
                }
                None => false,
            }
        };
        if found {
            self.refreshed.notify(&());
        }
        found
    }

    /// User selection: select `value` and notify change listeners.
    pub fn choose(&self, value: T) -> bool {
        if !self.select(&value) {
            return false;
        }
        self.changed.notify(&value);
        true
    }

    /// User selection from an encoded option value.
    pub fn choose_encoded(&self, raw: &str) -> Result<()> {
        let value = T::decode(raw)?;
        if self.choose(value) {
            Ok(())
        } else {
            Err(Error::InvalidControlValue(raw.to_string()))
        }
    }

    pub fn on_change(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }

    pub fn on_refresh(&self, listener: impl Fn() + 'static) -> Subscription {
        self.refreshed.subscribe(move |_| listener())
    }
}

/// Integer range slider model
#[derive(Clone)]
pub struct Slider {
    min: u32,
    max: u32,
    value: Rc<Cell<u32>>,
    changed: Notifier<u32>,
}

impl Slider {
    pub fn new(min: u32, max: u32, value: u32) -> Self {
        Self {
            min,
            max,
            value: Rc::new(Cell::new(value.clamp(min, max))),
            changed: Notifier::new(),
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn value(&self) -> u32 {
        self.value.get()
    }

    /// User input: clamp, store and notify.
    pub fn input(&self, value: u32) {
        let value = value.clamp(self.min, self.max);
        self.value.set(value);
        self.changed.notify(&value);
    }

    /// User input from the DOM's string value. Fractional values round.
    pub fn input_encoded(&self, raw: &str) -> Result<()> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidControlValue(raw.to_string()))?;
        if !value.is_finite() {
            return Err(Error::InvalidControlValue(raw.to_string()));
        }
        self.input(value.round().max(0.0) as u32);
        Ok(())
    }

    pub fn on_input(&self, listener: impl Fn(&u32) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }
}

/// Labeled group of widgets belonging to one mesh pipeline
#[derive(Clone)]
pub struct ControlGroup {
    pub label: String,
    pub representation: Select<Representation>,
    pub preset: Select<String>,
    pub color_by: Select<ColorBy>,
    pub component: Select<ComponentSelection>,
    pub opacity: Slider,
}

impl ControlGroup {
    /// Widgets in their initial state. The color-by selector starts with
    /// only the solid color entry until the mesh is known.
    pub fn new(label: impl Into<String>, preset_names: &[String], preset: &str) -> Self {
        let representation = Select::new(representation_options());
        representation.select(&Representation::default());

        let preset_select = Select::new(
            preset_names
                .iter()
                .map(|name| SelectOption::new(name.clone(), name.clone()))
                .collect(),
        );
        preset_select.select(&preset.to_string());

        let component = Select::new(Vec::new());
        component.set_visible(false);

        Self {
            label: label.into(),
            representation,
            preset: preset_select,
            color_by: Select::new(vec![SelectOption::new(ColorBy::Solid, ColorBy::Solid.label())]),
            component,
            opacity: Slider::new(Opacity::MIN_PERCENT, Opacity::MAX_PERCENT, Opacity::MAX_PERCENT),
        }
    }
}

/// The five fixed representation entries
pub fn representation_options() -> Vec<SelectOption<Representation>> {
    Representation::ALL
        .into_iter()
        .map(|r| SelectOption::new(r, r.label()))
        .collect()
}

/// `Solid color`, then one entry per point array, then per cell array
pub fn color_by_options<M: MeshData>(mesh: &M) -> Vec<SelectOption<ColorBy>> {
    let mut options = vec![SelectOption::new(ColorBy::Solid, ColorBy::Solid.label())];
    for location in FieldLocation::ALL {
        for array in mesh.arrays(location) {
            let value = ColorBy::array(location, array.name());
            let label = value.label();
            options.push(SelectOption::new(value, label));
        }
    }
    options
}
