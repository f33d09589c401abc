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

//! Conversions between proton's surface types and `wgpu` types.

use proton_core::math::LinearRgba;
use proton_core::surface::api::{AdapterKind, BindFlags, DepthFormat, FeatureLevel, PixelFormat};
use proton_core::surface::NativeError;
use wgpu::{Backend, DeviceType};

/// Returns a human-readable name for a backend.
pub fn backend_name(backend: Backend) -> &'static str {
    match backend {
        Backend::Vulkan => "Vulkan",
        Backend::Metal => "Metal",
        Backend::Dx12 => "DirectX 12",
        Backend::Gl => "OpenGL",
        Backend::BrowserWebGpu => "WebGPU",
        Backend::Noop => "No-op",
    }
}

/// Converts a `wgpu` device type to an [`AdapterKind`].
pub fn adapter_kind(device_type: DeviceType) -> AdapterKind {
    match device_type {
        DeviceType::IntegratedGpu => AdapterKind::Integrated,
        DeviceType::DiscreteGpu => AdapterKind::Discrete,
        DeviceType::VirtualGpu => AdapterKind::Virtual,
        DeviceType::Cpu => AdapterKind::Software,
        DeviceType::Other => AdapterKind::Unknown,
    }
}

/// Maps an adapter's capabilities onto the closest feature tier.
///
/// WebGPU compliance covers everything tier 10_1 requires; a 16k texture
/// limit on top of that is what separates 11_0. Non-compliant adapters
/// (mostly GLES) land on 10_0 or 9_3 depending on their texture limit.
pub fn feature_level(webgpu_compliant: bool, max_texture_dimension_2d: u32) -> FeatureLevel {
    match (webgpu_compliant, max_texture_dimension_2d) {
        (true, d) if d >= 16384 => FeatureLevel::Level11_0,
        (true, _) => FeatureLevel::Level10_1,
        (false, d) if d >= 8192 => FeatureLevel::Level10_0,
        (false, _) => FeatureLevel::Level9_3,
    }
}

/// The texture format a chain format maps to.
pub fn pixel_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
    }
}

/// The texture format a depth format maps to.
pub fn depth_format(format: DepthFormat) -> wgpu::TextureFormat {
    match format {
        DepthFormat::Depth16Unorm => wgpu::TextureFormat::Depth16Unorm,
        DepthFormat::Depth24UnormStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
        DepthFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
    }
}

/// Texture usages equivalent to a set of bind flags.
pub fn texture_usages(bind: BindFlags) -> wgpu::TextureUsages {
    let mut usages = wgpu::TextureUsages::empty();
    if bind.contains(BindFlags::RENDER_TARGET) || bind.contains(BindFlags::DEPTH_STENCIL) {
        usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
    }
    if bind.contains(BindFlags::SHADER_RESOURCE) {
        usages |= wgpu::TextureUsages::TEXTURE_BINDING;
    }
    usages
}

/// Converts a clear color.
pub fn color(color: LinearRgba) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color.r),
        g: f64::from(color.g),
        b: f64::from(color.b),
        a: f64::from(color.a),
    }
}

/// Wraps any `wgpu` error into a [`NativeError`]. `wgpu` has no result codes.
pub fn native(context: &str, error: impl std::fmt::Display) -> NativeError {
    NativeError::new(format!("{context}: {error}"))
}
