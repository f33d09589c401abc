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

//! The `winit` application that forwards window events to a surface.

use proton_core::platform::SurfaceWindow;
use proton_core::surface::{FrameOutcome, ResizeOutcome, SurfaceError, SurfaceLifecycle};
use proton_infra::{WinitWindow, WinitWindowBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

/// Owns the window and the surface presenting into it.
pub struct SandboxApp {
    surface: Box<dyn SurfaceLifecycle>,
    window: Option<WinitWindow>,
    width: u32,
    height: u32,
    failure: Option<SurfaceError>,
}

impl SandboxApp {
    pub fn new(surface: Box<dyn SurfaceLifecycle>, width: u32, height: u32) -> Self {
        Self {
            surface,
            window: None,
            width,
            height,
            failure: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SurfaceError) {
        log::error!("Surface error: {error}");
        if let Err(e) = self.surface.destroy() {
            log::error!("Surface teardown failed: {e}");
        }
        self.failure = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for SandboxApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WinitWindowBuilder::new()
            .with_title("Proton Sandbox")
            .with_dimensions(self.width, self.height)
            .build(event_loop)
        {
            Ok(window) => window,
            Err(e) => {
                log::error!("Failed to create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size();
        if let Err(e) = self.surface.create(window.clone_handle_arc(), width, height) {
            self.fail(event_loop, e);
            return;
        }
        if let Some(adapter) = self.surface.adapter() {
            log::info!("Presenting through:\n{adapter}");
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.winit_id() != id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                if let Err(e) = self.surface.destroy() {
                    log::error!("Surface teardown failed: {e}");
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Window resized to: {}x{}", size.width, size.height);
                match self.surface.resize(size.width, size.height) {
                    Ok(ResizeOutcome::Rebuilt) => window.request_redraw(),
                    Ok(ResizeOutcome::Suspended) => {}
                    Err(e) => self.fail(event_loop, e),
                }
            }
            // Redraws chain only while frames are presented; a suspended
            // surface waits for the resize that resumes it.
            WindowEvent::RedrawRequested => match self.surface.render() {
                Ok(FrameOutcome::Presented) => window.request_redraw(),
                Ok(FrameOutcome::Skipped) => {}
                Err(e @ SurfaceError::Present(_)) => {
                    log::warn!("{e}");
                    window.request_redraw();
                }
                Err(e) => self.fail(event_loop, e),
            },
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Surface ended in state '{}'", self.surface.state());
        if let Err(e) = self.surface.destroy() {
            log::error!("Surface teardown failed: {e}");
        }
    }
}
