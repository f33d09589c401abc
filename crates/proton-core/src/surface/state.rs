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

//! Observable lifecycle state of a surface.

use std::fmt;

/// The lifecycle state of a [`crate::surface::SurfaceController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    /// No resources exist yet.
    #[default]
    Uncreated,
    /// All resources exist and frames are presented.
    Active,
    /// All resources exist but the window has a zero dimension; renders are skipped.
    Suspended,
    /// A resize rebuild failed and every resource was released.
    Faulted,
    /// Terminal. Resources were released by `destroy`.
    Destroyed,
}

impl SurfaceState {
    /// Returns `true` if the surface currently owns native resources.
    pub fn holds_resources(self) -> bool {
        matches!(self, SurfaceState::Active | SurfaceState::Suspended)
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceState::Uncreated => "uncreated",
            SurfaceState::Active => "active",
            SurfaceState::Suspended => "suspended",
            SurfaceState::Faulted => "faulted",
            SurfaceState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// A lifecycle operation, named in state errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceOperation {
    /// Surface creation.
    Create,
    /// Resize.
    Resize,
    /// Per-frame clear and present.
    Render,
    /// Destruction.
    Destroy,
}

impl fmt::Display for SurfaceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceOperation::Create => "create",
            SurfaceOperation::Resize => "resize",
            SurfaceOperation::Render => "render",
            SurfaceOperation::Destroy => "destroy",
        };
        f.write_str(name)
    }
}
