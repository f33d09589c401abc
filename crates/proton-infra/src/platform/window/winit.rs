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

//! A `winit`-based implementation of the `SurfaceWindow` trait.

use proton_core::platform::{SurfaceWindow, SurfaceWindowHandle};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use std::sync::Arc;
use winit::{dpi::LogicalSize, error::OsError, event_loop::ActiveEventLoop, window::Window};

/// A wrapper around a `winit::window::Window` that can host a surface.
///
/// It uses an `Arc` internally so the surface can keep the window alive for as
/// long as its swap chain presents into it.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<Window>,
}

/// A builder for creating `WinitWindow` instances.
pub struct WinitWindowBuilder {
    title: String,
    width: u32,
    height: u32,
    resizable: bool,
}

impl WinitWindowBuilder {
    /// Creates a new `WinitWindowBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            title: "Proton".to_string(),
            width: 800,
            height: 600,
            resizable: true,
        }
    }

    /// Sets the title of the window to be built.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial inner dimensions of the window to be built.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets whether the user can resize the window.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Builds the `WinitWindow` using the provided `winit` event loop.
    ///
    /// # Errors
    /// Returns an `OsError` if the underlying `winit` window creation fails.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        log::info!(
            "Building window with title: '{}' and size: {}x{}",
            self.title,
            self.width,
            self.height
        );

        let window_attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_resizable(self.resizable)
            .with_visible(true);

        let window = event_loop.create_window(window_attributes)?;

        log::info!("Winit window created successfully (id: {:?}).", window.id());
        Ok(WinitWindow {
            inner: Arc::new(window),
        })
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitWindow {
    /// The `winit` id of the window, for matching incoming window events.
    pub fn winit_id(&self) -> winit::window::WindowId {
        self.inner.id()
    }
}

impl HasWindowHandle for WinitWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}

impl HasDisplayHandle for WinitWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        self.inner.display_handle()
    }
}

impl SurfaceWindow for WinitWindow {
    /// Returns the physical dimensions (width, height) of the window's inner area.
    /// A minimized window reports a zero dimension on some platforms.
    fn inner_size(&self) -> (u32, u32) {
        let size = self.inner.inner_size();
        (size.width, size.height)
    }

    fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    /// Clones a thread-safe, reference-counted handle to the window.
    fn clone_handle_arc(&self) -> SurfaceWindowHandle {
        self.inner.clone()
    }

    /// Returns a stable, unique identifier for the window.
    fn id(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.inner.id().hash(&mut hasher);
        hasher.finish()
    }
}
