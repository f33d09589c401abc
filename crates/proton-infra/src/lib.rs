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

//! # Proton Infra
//!
//! Concrete implementations of the contracts declared in `proton-core`:
//! graphics bindings of [`proton_core::surface::GraphicsBackend`] and a
//! `winit` window that can host a surface.

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;
#[cfg(feature = "platform")]
pub mod platform;

#[cfg(all(windows, feature = "d3d11"))]
pub use graphics::d3d11::D3D11Backend;
#[cfg(feature = "graphics")]
pub use graphics::wgpu::WgpuBackend;
#[cfg(feature = "platform")]
pub use platform::window::{WinitWindow, WinitWindowBuilder};
