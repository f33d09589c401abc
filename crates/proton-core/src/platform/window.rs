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

use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use std::sync::Arc;

/// Combines the windowing handle traits required by graphics backends.
/// This is used to satisfy Rust's "trait object" rules.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shared, thread-safe handle to the native window a surface presents into.
pub type SurfaceWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// A window that can host a rendering surface.
///
/// Any windowing backend (winit, a native control toolkit, ...) implements this
/// trait to drive a [`crate::surface::SurfaceController`].
pub trait SurfaceWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// Returns the physical dimensions (width, height) of the window's client area.
    fn inner_size(&self) -> (u32, u32);

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Clones an `Arc`'d handle to the window, kept by the surface for its lifetime.
    fn clone_handle_arc(&self) -> SurfaceWindowHandle;

    /// Returns a stable identifier for the window.
    fn id(&self) -> u64;
}

/// Returns the numeric value of the native window handle, for diagnostics.
///
/// `None` when the platform handle is unavailable or is not represented by a
/// single integer or pointer.
pub fn native_window_id(window: &(dyn WindowHandle + Send + Sync)) -> Option<u64> {
    let handle = window.window_handle().ok()?;
    match handle.as_raw() {
        RawWindowHandle::Win32(h) => Some(h.hwnd.get() as u64),
        RawWindowHandle::Xlib(h) => Some(h.window as u64),
        RawWindowHandle::Xcb(h) => Some(u64::from(h.window.get())),
        RawWindowHandle::Wayland(h) => Some(h.surface.as_ptr() as usize as u64),
        RawWindowHandle::AppKit(h) => Some(h.ns_view.as_ptr() as usize as u64),
        _ => None,
    }
}
