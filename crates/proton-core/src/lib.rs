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

//! # Proton Core
//!
//! Backend-agnostic contracts for binding a hardware rendering surface to a
//! native window: adapter discovery, device and swap chain creation, view
//! derivation, and the lifecycle state machine that keeps those resources
//! consistent across window events.
//!
//! Concrete graphics bindings live in `proton-infra` and implement
//! [`surface::GraphicsBackend`].

#![warn(missing_docs)]

pub mod math;
pub mod platform;
pub mod surface;

pub use surface::{SurfaceController, SurfaceError, SurfaceOptions, SurfaceState};
