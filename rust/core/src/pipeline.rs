// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-mesh render pipeline
//!
//! One [`MeshPipeline`] owns the geometry source, lookup table, mapper and
//! actor of a mesh together with its [`ControlGroup`]. Control changes are
//! routed to the `update_*` methods, which mutate the render graph and
//! redraw.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use base64::Engine as _;

use crate::backend::{
    Actor, DataArray, DataRange, LookupTable, Mapper, MeshData, RenderBackend, ScalarBar,
    ScalarColoring,
};
use crate::controls::{
    color_by_options, ColorBy, ComponentSelection, ControlGroup, ControlValue, DisplayState,
    FieldLocation, Opacity, Representation, Select,
};
use crate::error::{Error, Result};
use crate::session::ViewerSession;

/// Display name used when the caller supplies none
pub const DEFAULT_MESH_NAME: &str = "Mesh";

/// Decode a base64 mesh payload. ASCII whitespace is ignored.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(cleaned)?)
}

/// Reference to the array currently driving coloring. The array itself is
/// looked up through the mesh on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayRef {
    pub location: FieldLocation,
    pub name: String,
    pub components: usize,
}

#[derive(Debug, Default)]
struct ColorState {
    data_range: DataRange,
    active: Option<ArrayRef>,
}

/// Interactive rendering pipeline of one mesh
pub struct MeshPipeline<B: RenderBackend> {
    name: String,
    backend: Rc<B>,
    scalar_bar: Rc<B::ScalarBar>,
    mesh: B::Mesh,
    lookup_table: B::LookupTable,
    mapper: B::Mapper,
    actor: B::Actor,
    controls: ControlGroup,
    color: RefCell<ColorState>,
}

impl<B: RenderBackend> MeshPipeline<B> {
    /// Build the full pipeline for a base64 payload.
    ///
    /// Fails before touching the renderer when the payload does not decode
    /// or parse, so no partial pipeline is ever added.
    pub(crate) fn build(
        session: &ViewerSession<B>,
        payload: &str,
        name: Option<&str>,
    ) -> Result<Rc<Self>> {
        let backend = Rc::clone(session.backend());
        let config = session.config();
        let name = name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_MESH_NAME);

        let controls = ControlGroup::new(name, &backend.preset_names(), &config.lut_name);

        let bytes = decode_payload(payload)?;
        let mesh = backend.read_polydata(&bytes)?;

        let lookup_table = backend.create_lookup_table();
        let mapper = backend.create_mapper(&lookup_table, &mesh);
        let actor = backend.create_actor(&mapper);
        backend.add_actor(&actor);
        backend.bind_scalar_bar(session.scalar_bar(), &lookup_table);

        let data_range = mesh
            .point_scalars()
            .map(|scalars| scalars.range(ComponentSelection::Magnitude))
            .unwrap_or_default();

        let pipeline = Rc::new(Self {
            name: name.to_string(),
            backend,
            scalar_bar: Rc::clone(session.scalar_bar_rc()),
            mesh,
            lookup_table,
            mapper,
            actor,
            controls,
            color: RefCell::new(ColorState {
                data_range,
                active: None,
            }),
        });

        pipeline
            .controls
            .color_by
            .set_options(color_by_options(&pipeline.mesh), None);

        pipeline.apply_preset();
        pipeline.wire_controls();

        let field = if pipeline.controls.color_by.select(&config.field) {
            config.field.clone()
        } else {
            tracing::warn!(pipeline = %pipeline.name, field = %config.field, "field not found on mesh, using solid color");
            pipeline.controls.color_by.select(&ColorBy::Solid);
            ColorBy::Solid
        };
        pipeline.update_color_by(&field)?;

        pipeline
            .lookup_table
            .on_modified(Box::new(session.redraw().trigger_fn()));

        pipeline.backend.reset_camera();
        pipeline.backend.render();
        pipeline.backend.update_stats_overlay();

        tracing::debug!(pipeline = %pipeline.name, range = ?data_range, "pipeline built");
        Ok(pipeline)
    }

    /// Route control changes to the update methods. Listeners only hold a
    /// weak reference back to the pipeline.
    fn wire_controls(self: &Rc<Self>) {
        let controls = &self.controls;

        let weak = Rc::downgrade(self);
        controls.representation.on_change(move |representation| {
            with_pipeline(&weak, |p| p.update_representation(*representation));
        });

        let weak = Rc::downgrade(self);
        controls.preset.on_change(move |_| {
            with_pipeline(&weak, |p| p.apply_preset());
        });

        let weak = Rc::downgrade(self);
        controls.color_by.on_change(move |color_by| {
            with_pipeline(&weak, |p| {
                if let Err(err) = p.update_color_by(color_by) {
                    tracing::warn!(pipeline = %p.name, %err, "color-by change rejected");
                }
            });
        });

        let weak = Rc::downgrade(self);
        controls.component.on_change(move |component| {
            with_pipeline(&weak, |p| p.update_component(*component));
        });

        let weak = Rc::downgrade(self);
        controls.opacity.on_input(move |percent| {
            with_pipeline(&weak, |p| p.update_opacity(Opacity::from_percent(*percent)));
        });
    }

    /// Apply the selected color map preset over the current data range.
    pub fn apply_preset(&self) {
        if let Some(preset) = self.controls.preset.value() {
            if let Err(err) = self.lookup_table.apply_preset(&preset) {
                tracing::warn!(pipeline = %self.name, %err, "color map not applied");
            }
        }

        let range = self.color.borrow().data_range;
        self.lookup_table.set_mapping_range(range);
        self.lookup_table.update_range();
        self.backend.render();
    }

    pub fn update_representation(&self, representation: Representation) {
        sync_select(&self.controls.representation, &representation);
        self.apply_display(representation.display());
    }

    /// Apply a decoded `v:r:e` state to the actor.
    pub fn apply_display(&self, state: DisplayState) {
        if let Some(mode) = state.representation {
            self.actor.set_representation(mode);
        }
        self.actor.set_edge_visibility(state.edge_visibility);
        self.actor.set_visibility(state.visible);
        self.backend.render();
    }

    pub fn update_opacity(&self, opacity: Opacity) {
        self.actor.set_opacity(opacity.fraction());
        self.backend.render();
    }

    /// Switch the array driving coloring.
    ///
    /// An unknown array leaves the pipeline untouched.
    pub fn update_color_by(&self, color_by: &ColorBy) -> Result<()> {
        match color_by {
            ColorBy::Solid => {
                self.color.borrow_mut().active = None;
                self.controls.component.set_visible(false);
                self.scalar_bar.set_visibility(false);
                self.mapper.set_scalar_coloring(&ScalarColoring::solid());
            }
            ColorBy::Array { location, name } => {
                let array = self.mesh.array_by_name(*location, name).ok_or_else(|| {
                    Error::UnknownArray {
                        location: *location,
                        name: name.clone(),
                    }
                })?;
                let components = array.number_of_components();

                {
                    let mut color = self.color.borrow_mut();
                    color.data_range = array.range(ComponentSelection::Magnitude);
                    color.active = Some(ArrayRef {
                        location: *location,
                        name: name.clone(),
                        components,
                    });
                }

                if components > 1 {
                    self.lookup_table.set_vector_mode(ComponentSelection::Magnitude);
                    self.controls.component.set_options(
                        ComponentSelection::options(components),
                        Some(&ComponentSelection::Magnitude),
                    );
                    self.controls.component.set_visible(true);
                } else {
                    self.controls.component.set_visible(false);
                }

                // the legend is shared; show this pipeline's colors
                self.backend.bind_scalar_bar(&self.scalar_bar, &self.lookup_table);
                self.scalar_bar.set_axis_label(name);
                self.scalar_bar.set_visibility(true);
                self.mapper
                    .set_scalar_coloring(&ScalarColoring::by_array(*location, name));
            }
        }

        sync_select(&self.controls.color_by, color_by);
        tracing::debug!(pipeline = %self.name, color_by = %color_by, "color-by updated");
        self.apply_preset();
        Ok(())
    }

    /// Switch a vector array between magnitude and single-component
    /// coloring. Ignored unless a multi-component array is active.
    pub fn update_component(&self, selection: ComponentSelection) {
        let active = match self.color.borrow().active.clone() {
            Some(active) if active.components > 1 => active,
            _ => return,
        };
        let Some(array) = self.mesh.array_by_name(active.location, &active.name) else {
            return;
        };

        sync_select(&self.controls.component, &selection);
        self.lookup_table.set_vector_mode(selection);

        let range = array.range(selection);
        self.color.borrow_mut().data_range = range;
        self.lookup_table.set_mapping_range(range);
        self.lookup_table.update_range();
        self.backend.render();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &ControlGroup {
        &self.controls
    }

    pub fn data_range(&self) -> DataRange {
        self.color.borrow().data_range
    }

    pub fn active_array(&self) -> Option<ArrayRef> {
        self.color.borrow().active.clone()
    }

    pub fn mesh(&self) -> &B::Mesh {
        &self.mesh
    }

    pub fn actor(&self) -> &B::Actor {
        &self.actor
    }

    pub fn mapper(&self) -> &B::Mapper {
        &self.mapper
    }

    pub fn lookup_table(&self) -> &B::LookupTable {
        &self.lookup_table
    }
}

fn with_pipeline<B: RenderBackend>(weak: &Weak<MeshPipeline<B>>, f: impl FnOnce(&MeshPipeline<B>)) {
    if let Some(pipeline) = weak.upgrade() {
        f(&pipeline);
    }
}

/// Mirror a programmatic update into its widget without re-notifying.
fn sync_select<T: ControlValue>(select: &Select<T>, value: &T) {
    if select.value().as_ref() != Some(value) {
        select.select(value);
    }
}
