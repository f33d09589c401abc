// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The surface lifecycle controller.

use crate::math::Extent2D;
use crate::platform::{native_window_id, SurfaceWindowHandle};
use crate::surface::api::{AdapterDescriptor, PresentationParameters, SurfaceOptions};
use crate::surface::enumerator::AdapterEnumerator;
use crate::surface::error::SurfaceError;
use crate::surface::factory::{DeviceBundle, DeviceChainFactory};
use crate::surface::selector::AdapterSelector;
use crate::surface::state::{SurfaceOperation, SurfaceState};
use crate::surface::traits::{GraphicsBackend, SurfaceLifecycle};
use crate::surface::views::{ViewBuilder, ViewPair};

/// Depth the depth-stencil view is cleared to every frame.
const FAR_DEPTH: f32 = 1.0;

/// Outcome of a resize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The chain was resized and both views were rebuilt.
    Rebuilt,
    /// A dimension is zero. The size was stored, nothing was rebuilt.
    Suspended,
}

/// Outcome of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was cleared and presented.
    Presented,
    /// Nothing to draw into; the request was a no-op.
    Skipped,
}

/// Everything that outlives a resize: the chain and what it was created from.
///
/// Fields are declared in release order.
pub(crate) struct ChainResources<B: GraphicsBackend> {
    pub(crate) devices: DeviceBundle<B>,
    pub(crate) adapter: B::Adapter,
    pub(crate) factory: B::Factory,
}

impl<B: GraphicsBackend> ChainResources<B> {
    fn release(self) {
        let ChainResources {
            devices,
            adapter,
            factory,
        } = self;
        let DeviceBundle {
            swap_chain,
            context,
            device,
        } = devices;
        drop(swap_chain);
        log::debug!("Released swap chain");
        drop(context);
        log::debug!("Released immediate context");
        drop(device);
        log::debug!("Released device");
        drop(adapter);
        log::debug!("Released adapter");
        drop(factory);
        log::debug!("Released factory");
    }
}

/// The live native resources of an active or suspended surface.
///
/// Either the whole aggregate exists or none of it does.
pub(crate) struct SurfaceResources<B: GraphicsBackend> {
    pub(crate) views: ViewPair<B>,
    pub(crate) chain: ChainResources<B>,
}

impl<B: GraphicsBackend> SurfaceResources<B> {
    /// Releases everything in reverse dependency order.
    fn release(self) {
        let SurfaceResources { views, chain } = self;
        let ViewPair {
            depth_stencil_view,
            render_target_view,
        } = views;
        drop(depth_stencil_view);
        log::debug!("Released depth-stencil view");
        drop(render_target_view);
        log::debug!("Released render-target view");
        chain.release();
    }
}

/// Drives a rendering surface through create, resize, render and destroy.
///
/// All calls are synchronous and must come from the thread that owns the
/// window, one at a time.
pub struct SurfaceController<B: GraphicsBackend> {
    backend: B,
    options: SurfaceOptions,
    state: SurfaceState,
    parameters: Option<PresentationParameters>,
    adapter: Option<AdapterDescriptor>,
    resources: Option<SurfaceResources<B>>,
    frame_count: u64,
}

impl<B: GraphicsBackend> SurfaceController<B> {
    /// Creates an uncreated surface over `backend`.
    pub fn new(backend: B, options: SurfaceOptions) -> Self {
        Self {
            backend,
            options,
            state: SurfaceState::Uncreated,
            parameters: None,
            adapter: None,
            resources: None,
            frame_count: 0,
        }
    }

    /// Handles "surface created".
    ///
    /// Enumerates adapters, selects one, creates the device and chain, then
    /// builds the views. On failure every resource acquired by this attempt is
    /// released and the surface stays uncreated. A zero-area window creates
    /// everything at 1x1 and leaves the surface suspended.
    pub fn create(
        &mut self,
        window: SurfaceWindowHandle,
        width: u32,
        height: u32,
    ) -> Result<(), SurfaceError> {
        if self.state != SurfaceState::Uncreated {
            return Err(self.invalid(SurfaceOperation::Create));
        }
        self.options.validate()?;

        let params = PresentationParameters::new(window, width, height, &self.options);
        log::info!(
            "Creating {} surface for window {:?} at {}",
            self.backend.name(),
            native_window_id(&**params.window()),
            params.extent()
        );

        let enumerator = AdapterEnumerator::new(&self.backend);
        let factory = enumerator.create_factory(self.options.debug_layer)?;
        let selected = AdapterSelector::new(self.options.min_feature_level)
            .select(enumerator.enumerate(&factory))?;
        log::info!("Selected adapter:\n{}", selected.descriptor);

        let devices = DeviceChainFactory::new(&self.backend).create(
            &factory,
            &selected.handle,
            &params,
            self.options.debug_layer,
        )?;
        let views = self
            .view_builder()
            .build_views(&devices.device, &devices.swap_chain, params.extent().clamped())?;

        self.state = if params.extent().is_zero_area() {
            SurfaceState::Suspended
        } else {
            SurfaceState::Active
        };
        self.resources = Some(SurfaceResources {
            views,
            chain: ChainResources {
                devices,
                adapter: selected.handle,
                factory,
            },
        });
        self.adapter = Some(selected.descriptor);
        self.parameters = Some(params);
        log::info!("Surface created, now {}", self.state);
        Ok(())
    }

    /// Handles "surface resized".
    ///
    /// A zero dimension stores the size and suspends the surface. Otherwise
    /// both views are released, the chain's buffers are resized in place and
    /// the views are rebuilt, even when the size did not change. A failure
    /// during the rebuild releases every resource and faults the surface.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, SurfaceError> {
        if !self.state.holds_resources() {
            return Err(self.invalid(SurfaceOperation::Resize));
        }
        let Some(params) = self.parameters.as_mut() else {
            return Err(self.invalid(SurfaceOperation::Resize));
        };
        params.set_size(width, height);
        let extent = params.extent();

        if extent.is_zero_area() {
            if self.state != SurfaceState::Suspended {
                log::info!("Surface suspended at {extent}");
            }
            self.state = SurfaceState::Suspended;
            return Ok(ResizeOutcome::Suspended);
        }

        let Some(SurfaceResources { views, mut chain }) = self.resources.take() else {
            return Err(self.invalid(SurfaceOperation::Resize));
        };
        views.release();

        match self.rebuild_views(&mut chain, extent) {
            Ok(views) => {
                self.resources = Some(SurfaceResources { views, chain });
                if self.state != SurfaceState::Active {
                    log::info!("Surface resumed at {extent}");
                }
                self.state = SurfaceState::Active;
                log::debug!("Surface resized to {extent}");
                Ok(ResizeOutcome::Rebuilt)
            }
            Err(e) => {
                log::error!("Surface resize to {extent} failed, releasing the surface: {e}");
                chain.release();
                self.state = SurfaceState::Faulted;
                Err(e)
            }
        }
    }

    fn rebuild_views(
        &self,
        chain: &mut ChainResources<B>,
        extent: Extent2D,
    ) -> Result<ViewPair<B>, SurfaceError> {
        let (buffer_count, format) = match self.parameters.as_ref() {
            Some(params) => (params.buffer_count(), params.format()),
            None => return Err(self.invalid(SurfaceOperation::Resize)),
        };
        self.backend
            .resize_buffers(
                &mut chain.devices.swap_chain,
                buffer_count,
                extent.width,
                extent.height,
                format,
            )
            .map_err(SurfaceError::ChainResize)?;
        self.view_builder()
            .build_views(&chain.devices.device, &chain.devices.swap_chain, extent)
    }

    /// Handles the per-frame render trigger.
    ///
    /// Clears the render target to the configured color and the depth buffer
    /// to far depth with a zero stencil, then presents. Silently skipped while
    /// the surface is uncreated, suspended or faulted. A failed present is
    /// returned without changing the state.
    pub fn render(&mut self) -> Result<FrameOutcome, SurfaceError> {
        match self.state {
            SurfaceState::Active => {}
            SurfaceState::Destroyed => return Err(self.invalid(SurfaceOperation::Render)),
            SurfaceState::Uncreated | SurfaceState::Suspended | SurfaceState::Faulted => {
                log::trace!("Render skipped, surface is {}", self.state);
                return Ok(FrameOutcome::Skipped);
            }
        }
        let Some(resources) = self.resources.as_mut() else {
            return Ok(FrameOutcome::Skipped);
        };
        let devices = &mut resources.chain.devices;

        self.backend
            .clear_render_target(
                &devices.context,
                &resources.views.render_target_view,
                self.options.clear_color,
            )
            .map_err(SurfaceError::Present)?;
        self.backend
            .clear_depth_stencil(
                &devices.context,
                &resources.views.depth_stencil_view,
                FAR_DEPTH,
                0,
            )
            .map_err(SurfaceError::Present)?;
        self.backend
            .present(&mut devices.swap_chain, self.options.sync_interval)
            .map_err(SurfaceError::Present)?;

        self.frame_count += 1;
        log::trace!("Presented frame {}", self.frame_count);
        Ok(FrameOutcome::Presented)
    }

    /// Handles "surface destroyed". Releases every resource in reverse
    /// dependency order. Calling it again is a no-op.
    pub fn destroy(&mut self) -> Result<(), SurfaceError> {
        if self.state == SurfaceState::Destroyed {
            log::debug!("Surface already destroyed");
            return Ok(());
        }
        if let Some(resources) = self.resources.take() {
            resources.release();
        }
        log::info!(
            "Surface destroyed after {} frame(s), was {}",
            self.frame_count,
            self.state
        );
        self.state = SurfaceState::Destroyed;
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// The selected adapter, once the surface was created.
    pub fn adapter(&self) -> Option<&AdapterDescriptor> {
        self.adapter.as_ref()
    }

    /// The size last reported by the window, possibly zero.
    pub fn size(&self) -> Option<Extent2D> {
        self.parameters.as_ref().map(PresentationParameters::extent)
    }

    /// Number of frames presented so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The options the surface was configured with.
    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    /// The graphics binding.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn resources(&self) -> Option<&SurfaceResources<B>> {
        self.resources.as_ref()
    }

    fn view_builder(&self) -> ViewBuilder<'_, B> {
        ViewBuilder::new(&self.backend, self.options.depth_format, self.options.sample_count)
    }

    fn invalid(&self, operation: SurfaceOperation) -> SurfaceError {
        SurfaceError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl<B: GraphicsBackend> Drop for SurfaceController<B> {
    fn drop(&mut self) {
        if let Some(resources) = self.resources.take() {
            log::warn!("Surface dropped without destroy, releasing its resources");
            resources.release();
        }
    }
}

impl<B: GraphicsBackend> SurfaceLifecycle for SurfaceController<B> {
    fn create(
        &mut self,
        window: SurfaceWindowHandle,
        width: u32,
        height: u32,
    ) -> Result<(), SurfaceError> {
        SurfaceController::create(self, window, width, height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, SurfaceError> {
        SurfaceController::resize(self, width, height)
    }

    fn render(&mut self) -> Result<FrameOutcome, SurfaceError> {
        SurfaceController::render(self)
    }

    fn destroy(&mut self) -> Result<(), SurfaceError> {
        SurfaceController::destroy(self)
    }

    fn state(&self) -> SurfaceState {
        self.state
    }

    fn adapter(&self) -> Option<&AdapterDescriptor> {
        self.adapter.as_ref()
    }
}
