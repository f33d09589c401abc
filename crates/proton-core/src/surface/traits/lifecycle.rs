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

use crate::platform::SurfaceWindowHandle;
use crate::surface::api::AdapterDescriptor;
use crate::surface::controller::{FrameOutcome, ResizeOutcome};
use crate::surface::error::SurfaceError;
use crate::surface::state::SurfaceState;

/// The lifecycle signals a window layer forwards to its surface.
///
/// This is the object-safe face of [`crate::surface::SurfaceController`], so
/// callers can hold a surface without naming its backend.
pub trait SurfaceLifecycle {
    /// Handles "surface created".
    fn create(
        &mut self,
        window: SurfaceWindowHandle,
        width: u32,
        height: u32,
    ) -> Result<(), SurfaceError>;

    /// Handles "surface resized".
    fn resize(&mut self, width: u32, height: u32) -> Result<ResizeOutcome, SurfaceError>;

    /// Handles the per-frame render trigger.
    fn render(&mut self) -> Result<FrameOutcome, SurfaceError>;

    /// Handles "surface destroyed".
    fn destroy(&mut self) -> Result<(), SurfaceError>;

    /// Returns the current lifecycle state.
    fn state(&self) -> SurfaceState;

    /// Returns the selected adapter, once created.
    fn adapter(&self) -> Option<&AdapterDescriptor>;
}
