// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles: a virtual-clock scheduler and a recording backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use base64::Engine as _;
use rustc_hash::FxHashMap;

use crate::backend::{
    Actor, Camera, DataRange, LookupTable, Mapper, RenderBackend, ScalarBar, ScalarColoring,
};
use crate::camera::CameraOperation;
use crate::config::FpsOverlay;
use crate::controls::{ComponentSelection, RepresentationMode};
use crate::debounce::Scheduler;
use crate::error::{Error, Result};
use crate::polydata::PolyData;

pub fn encode(raw: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(raw)
}

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    tasks: Vec<(u64, Duration, Task)>,
    fired: usize,
    last_fired_at: Option<Duration>,
}

/// Scheduler driven by an explicit virtual clock
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    /// Move the clock forward, running due tasks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, at, _))| *at <= target)
                    .min_by_key(|(_, (id, at, _))| (*at, *id))
                    .map(|(index, _)| index);
                due.map(|index| {
                    let (_, at, task) = clock.tasks.remove(index);
                    clock.now = at;
                    (at, task)
                })
            };
            let Some((at, task)) = next else { break };
            task();
            let mut clock = self.clock.borrow_mut();
            clock.fired += 1;
            clock.last_fired_at = Some(at);
        }
        self.clock.borrow_mut().now = target;
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    pub fn fired_count(&self) -> usize {
        self.clock.borrow().fired
    }

    pub fn last_fired_at(&self) -> Option<Duration> {
        self.clock.borrow().last_fired_at
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> u64 {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let at = clock.now + delay;
        clock.tasks.push((id, at, task));
        id
    }

    fn cancel(&self, handle: u64) {
        self.clock.borrow_mut().tasks.retain(|(id, _, _)| *id != handle);
    }
}

/// Render-window side effects in call order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Render,
    ResetCamera,
    Camera(CameraOperation, f64),
}

type Journal = Rc<RefCell<Vec<Event>>>;

#[derive(Default)]
struct LookupTableState {
    preset: Option<String>,
    mapping_range: Option<DataRange>,
    vector_mode: Option<ComponentSelection>,
    listeners: Vec<Rc<dyn Fn()>>,
}

/// Lookup table that reports every mutation to its listeners
pub struct MockLookupTable {
    id: usize,
    presets: Vec<String>,
    state: RefCell<LookupTableState>,
}

impl MockLookupTable {
    fn modified(&self) {
        let listeners = self.state.borrow().listeners.clone();
        for listener in listeners {
            listener();
        }
    }

    /// Creation index within its backend
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn preset(&self) -> Option<String> {
        self.state.borrow().preset.clone()
    }

    pub fn mapping_range(&self) -> Option<DataRange> {
        self.state.borrow().mapping_range
    }

    pub fn vector_mode(&self) -> Option<ComponentSelection> {
        self.state.borrow().vector_mode
    }
}

impl LookupTable for MockLookupTable {
    fn apply_preset(&self, name: &str) -> Result<()> {
        if !self.presets.iter().any(|p| p == name) {
            return Err(Error::UnknownPreset(name.to_string()));
        }
        self.state.borrow_mut().preset = Some(name.to_string());
        self.modified();
        Ok(())
    }

    fn set_mapping_range(&self, range: DataRange) {
        self.state.borrow_mut().mapping_range = Some(range);
        self.modified();
    }

    fn update_range(&self) {}

    fn set_vector_mode(&self, mode: ComponentSelection) {
        self.state.borrow_mut().vector_mode = Some(mode);
        self.modified();
    }

    fn on_modified(&self, callback: Box<dyn Fn()>) {
        self.state.borrow_mut().listeners.push(Rc::from(callback));
    }
}

#[derive(Default)]
pub struct MockMapper {
    coloring: RefCell<Option<ScalarColoring>>,
}

impl MockMapper {
    pub fn coloring(&self) -> Option<ScalarColoring> {
        self.coloring.borrow().clone()
    }
}

impl Mapper for MockMapper {
    fn set_scalar_coloring(&self, coloring: &ScalarColoring) {
        *self.coloring.borrow_mut() = Some(coloring.clone());
    }
}

pub struct MockActor {
    visible: Cell<bool>,
    representation: Cell<Option<RepresentationMode>>,
    edge_visibility: Cell<bool>,
    opacity: Cell<f64>,
}

impl Default for MockActor {
    fn default() -> Self {
        Self {
            visible: Cell::new(true),
            representation: Cell::new(None),
            edge_visibility: Cell::new(false),
            opacity: Cell::new(1.0),
        }
    }
}

impl MockActor {
    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn representation(&self) -> Option<RepresentationMode> {
        self.representation.get()
    }

    pub fn edge_visibility(&self) -> bool {
        self.edge_visibility.get()
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }
}

impl Actor for MockActor {
    fn set_visibility(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn set_representation(&self, mode: RepresentationMode) {
        self.representation.set(Some(mode));
    }

    fn set_edge_visibility(&self, visible: bool) {
        self.edge_visibility.set(visible);
    }

    fn set_opacity(&self, opacity: f64) {
        self.opacity.set(opacity);
    }
}

pub struct MockScalarBar {
    label: RefCell<Option<String>>,
    visible: Cell<bool>,
    lookup_table: Cell<Option<usize>>,
}

impl MockScalarBar {
    pub fn axis_label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    /// Id of the lookup table the legend currently draws
    pub fn lookup_table(&self) -> Option<usize> {
        self.lookup_table.get()
    }
}

impl ScalarBar for MockScalarBar {
    fn set_axis_label(&self, label: &str) {
        *self.label.borrow_mut() = Some(label.to_string());
    }

    fn set_visibility(&self, visible: bool) {
        self.visible.set(visible);
    }
}

pub struct MockCamera {
    journal: Journal,
}

impl Camera for MockCamera {
    fn apply(&self, operation: CameraOperation, value: f64) {
        self.journal.borrow_mut().push(Event::Camera(operation, value));
    }
}

/// Backend recording everything the viewer asks of the render window.
///
/// Meshes are looked up by their decoded payload bytes.
pub struct MockBackend {
    journal: Journal,
    scheduler: ManualScheduler,
    meshes: RefCell<FxHashMap<Vec<u8>, PolyData>>,
    presets: Vec<String>,
    actors: Cell<usize>,
    scalar_bars: Cell<usize>,
    scalar_bar_bound: Cell<bool>,
    lookup_tables: Cell<usize>,
    update_rate: Cell<Option<f64>>,
    stats_overlay: RefCell<Option<FpsOverlay>>,
    stats_updates: Cell<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            journal: Rc::default(),
            scheduler: ManualScheduler::default(),
            meshes: RefCell::default(),
            presets: ["Cool to Warm", "erdc_rainbow_bright", "jet", "Grayscale"]
                .into_iter()
                .map(String::from)
                .collect(),
            actors: Cell::new(0),
            scalar_bars: Cell::new(0),
            scalar_bar_bound: Cell::new(false),
            lookup_tables: Cell::new(0),
            update_rate: Cell::new(None),
            stats_overlay: RefCell::new(None),
            stats_updates: Cell::new(0),
        }
    }

    /// Make `payload` (before base64) parse as `mesh`.
    pub fn register_mesh(&self, payload: &str, mesh: PolyData) {
        self.meshes
            .borrow_mut()
            .insert(payload.as_bytes().to_vec(), mesh);
    }

    pub fn events(&self) -> Vec<Event> {
        self.journal.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|e| **e == Event::Render)
            .count()
    }

    pub fn camera_resets(&self) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|e| **e == Event::ResetCamera)
            .count()
    }

    pub fn scheduler_handle(&self) -> ManualScheduler {
        self.scheduler.clone()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.get()
    }

    pub fn scalar_bar_count(&self) -> usize {
        self.scalar_bars.get()
    }

    pub fn scalar_bar_bound(&self) -> bool {
        self.scalar_bar_bound.get()
    }

    pub fn update_rate(&self) -> Option<f64> {
        self.update_rate.get()
    }

    pub fn stats_overlay(&self) -> Option<FpsOverlay> {
        self.stats_overlay.borrow().clone()
    }

    pub fn stats_updates(&self) -> usize {
        self.stats_updates.get()
    }
}

impl RenderBackend for MockBackend {
    type Mesh = PolyData;
    type LookupTable = MockLookupTable;
    type Mapper = MockMapper;
    type Actor = MockActor;
    type ScalarBar = MockScalarBar;
    type Camera = MockCamera;
    type Scheduler = ManualScheduler;

    fn read_polydata(&self, bytes: &[u8]) -> Result<PolyData> {
        self.meshes
            .borrow()
            .get(bytes)
            .cloned()
            .ok_or_else(|| Error::mesh_parse("not a vtkPolyData document"))
    }

    fn preset_names(&self) -> Vec<String> {
        self.presets.clone()
    }

    fn create_lookup_table(&self) -> MockLookupTable {
        let id = self.lookup_tables.get();
        self.lookup_tables.set(id + 1);
        MockLookupTable {
            id,
            presets: self.presets.clone(),
            state: RefCell::default(),
        }
    }

    fn create_mapper(&self, _lookup_table: &MockLookupTable, _mesh: &PolyData) -> MockMapper {
        MockMapper::default()
    }

    fn create_actor(&self, _mapper: &MockMapper) -> MockActor {
        MockActor::default()
    }

    fn create_scalar_bar(&self) -> MockScalarBar {
        MockScalarBar {
            label: RefCell::new(None),
            visible: Cell::new(true),
            lookup_table: Cell::new(None),
        }
    }

    fn add_actor(&self, _actor: &MockActor) {
        self.actors.set(self.actors.get() + 1);
    }

    fn add_scalar_bar(&self, _scalar_bar: &MockScalarBar) {
        self.scalar_bars.set(self.scalar_bars.get() + 1);
    }

    fn bind_scalar_bar(&self, scalar_bar: &MockScalarBar, lookup_table: &MockLookupTable) {
        scalar_bar.lookup_table.set(Some(lookup_table.id));
        self.scalar_bar_bound.set(true);
    }

    fn set_desired_update_rate(&self, rate: f64) {
        self.update_rate.set(Some(rate));
    }

    fn reset_camera(&self) {
        self.journal.borrow_mut().push(Event::ResetCamera);
    }

    fn active_camera(&self) -> MockCamera {
        MockCamera {
            journal: Rc::clone(&self.journal),
        }
    }

    fn render(&self) {
        self.journal.borrow_mut().push(Event::Render);
    }

    fn scheduler(&self) -> ManualScheduler {
        self.scheduler.clone()
    }

    fn attach_stats_overlay(&self, overlay: &FpsOverlay) {
        *self.stats_overlay.borrow_mut() = Some(overlay.clone());
    }

    fn detach_stats_overlay(&self) {
        self.stats_overlay.borrow_mut().take();
    }

    fn update_stats_overlay(&self) {
        self.stats_updates.set(self.stats_updates.get() + 1);
    }
}
