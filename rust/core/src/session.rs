// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer session: one render window, its configuration and its pipelines

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{RenderBackend, ScalarBar};
use crate::config::{ViewerConfig, DESIRED_UPDATE_RATE};
use crate::debounce::{Debounced, REDRAW_DEBOUNCE};
use crate::error::Result;
use crate::pipeline::MeshPipeline;

/// State shared by every pipeline of one viewer
pub struct ViewerSession<B: RenderBackend> {
    config: ViewerConfig,
    backend: Rc<B>,
    scalar_bar: Rc<B::ScalarBar>,
    redraw: Debounced<B::Scheduler>,
    pipelines: RefCell<Vec<Rc<MeshPipeline<B>>>>,
}

impl<B: RenderBackend> ViewerSession<B> {
    /// Prepare the render window: interaction rate, shared scalar bar and
    /// the FPS overlay when configured.
    pub fn new(config: ViewerConfig, backend: B) -> Self {
        let backend = Rc::new(backend);
        backend.set_desired_update_rate(DESIRED_UPDATE_RATE);

        let scalar_bar = Rc::new(backend.create_scalar_bar());
        scalar_bar.set_visibility(false);
        backend.add_scalar_bar(&scalar_bar);

        if let Some(fps) = &config.fps {
            backend.attach_stats_overlay(fps);
        }

        let weak = Rc::downgrade(&backend);
        let redraw = Debounced::new(backend.scheduler(), REDRAW_DEBOUNCE, move || {
            if let Some(backend) = weak.upgrade() {
                backend.render();
            }
        });

        tracing::info!(
            lut = %config.lut_name,
            field = %config.field,
            fps = config.fps.is_some(),
            camera_ops = config.camera.steps().len(),
            "viewer session created"
        );

        Self {
            config,
            backend,
            scalar_bar,
            redraw,
            pipelines: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn scalar_bar(&self) -> &B::ScalarBar {
        &self.scalar_bar
    }

    pub(crate) fn scalar_bar_rc(&self) -> &Rc<B::ScalarBar> {
        &self.scalar_bar
    }

    /// Debounced render shared by every pipeline's lookup table
    pub fn redraw(&self) -> &Debounced<B::Scheduler> {
        &self.redraw
    }

    /// Decode, parse and register a mesh. Nothing is registered on error.
    pub fn create_pipeline(&self, payload: &str, name: Option<&str>) -> Result<Rc<MeshPipeline<B>>> {
        let pipeline = MeshPipeline::build(self, payload, name).map_err(|err| {
            tracing::warn!(%err, "mesh pipeline not created");
            err
        })?;
        self.pipelines.borrow_mut().push(Rc::clone(&pipeline));
        tracing::info!(pipeline = pipeline.name(), total = self.pipeline_count(), "mesh pipeline added");
        Ok(pipeline)
    }

    /// Pipelines in creation order
    pub fn pipelines(&self) -> Vec<Rc<MeshPipeline<B>>> {
        self.pipelines.borrow().clone()
    }

    /// First pipeline with this display name
    pub fn pipeline(&self, name: &str) -> Option<Rc<MeshPipeline<B>>> {
        self.pipelines
            .borrow()
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.borrow().len()
    }

    /// Detach the FPS overlay, hide the legend and forget every pipeline.
    /// Rendered actors stay in the renderer.
    pub fn empty(&self) {
        self.backend.detach_stats_overlay();
        self.scalar_bar.set_visibility(false);
        self.redraw.cancel();
        let dropped = std::mem::take(&mut *self.pipelines.borrow_mut());
        tracing::debug!(pipelines = dropped.len(), "viewer emptied");
    }

    /// Apply the configured camera operations in their fixed order,
    /// rendering after each.
    pub fn update_camera(&self, camera: &B::Camera) {
        use crate::backend::Camera as _;

        for &(operation, value) in self.config.camera.steps() {
            tracing::debug!(%operation, value, "camera operation");
            camera.apply(operation, value);
            self.backend.render();
        }
    }

    /// [`Self::update_camera`] on the renderer's active camera
    pub fn update_active_camera(&self) {
        let camera = self.backend.active_camera();
        self.update_camera(&camera);
    }
}
