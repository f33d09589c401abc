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

//! Conversions between proton's surface types and Direct3D/DXGI values.

use proton_core::surface::api::{
    AdapterKind, BindFlags, CpuAccess, DepthFormat, FeatureLevel, PixelFormat, ResourceUsage,
};
use proton_core::surface::NativeError;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::{DXGI_ADAPTER_FLAG, DXGI_ADAPTER_FLAG_SOFTWARE};

/// Dedicated video memory above which an adapter is assumed to be discrete.
const DISCRETE_MEMORY_THRESHOLD: usize = 512 << 20;

/// Every tier a device can be requested at, most capable first.
pub(super) const ALL_FEATURE_LEVELS: [D3D_FEATURE_LEVEL; 10] = [
    D3D_FEATURE_LEVEL_12_2,
    D3D_FEATURE_LEVEL_12_1,
    D3D_FEATURE_LEVEL_12_0,
    D3D_FEATURE_LEVEL_11_1,
    D3D_FEATURE_LEVEL_11_0,
    D3D_FEATURE_LEVEL_10_1,
    D3D_FEATURE_LEVEL_10_0,
    D3D_FEATURE_LEVEL_9_3,
    D3D_FEATURE_LEVEL_9_2,
    D3D_FEATURE_LEVEL_9_1,
];

pub(super) fn feature_level(level: D3D_FEATURE_LEVEL) -> Option<FeatureLevel> {
    let level = match level {
        D3D_FEATURE_LEVEL_9_1 => FeatureLevel::Level9_1,
        D3D_FEATURE_LEVEL_9_2 => FeatureLevel::Level9_2,
        D3D_FEATURE_LEVEL_9_3 => FeatureLevel::Level9_3,
        D3D_FEATURE_LEVEL_10_0 => FeatureLevel::Level10_0,
        D3D_FEATURE_LEVEL_10_1 => FeatureLevel::Level10_1,
        D3D_FEATURE_LEVEL_11_0 => FeatureLevel::Level11_0,
        D3D_FEATURE_LEVEL_11_1 => FeatureLevel::Level11_1,
        D3D_FEATURE_LEVEL_12_0 => FeatureLevel::Level12_0,
        D3D_FEATURE_LEVEL_12_1 => FeatureLevel::Level12_1,
        D3D_FEATURE_LEVEL_12_2 => FeatureLevel::Level12_2,
        _ => return None,
    };
    Some(level)
}

/// DXGI only flags software adapters; the discrete/integrated split is
/// guessed from dedicated memory.
pub(super) fn adapter_kind(flags: u32, dedicated_video_memory: usize) -> AdapterKind {
    if DXGI_ADAPTER_FLAG(flags as i32).contains(DXGI_ADAPTER_FLAG_SOFTWARE) {
        AdapterKind::Software
    } else if dedicated_video_memory >= DISCRETE_MEMORY_THRESHOLD {
        AdapterKind::Discrete
    } else {
        AdapterKind::Integrated
    }
}

pub(super) fn pixel_format(format: PixelFormat) -> DXGI_FORMAT {
    match format {
        PixelFormat::Bgra8Unorm => DXGI_FORMAT_B8G8R8A8_UNORM,
    }
}

pub(super) fn depth_format(format: DepthFormat) -> DXGI_FORMAT {
    match format {
        DepthFormat::Depth16Unorm => DXGI_FORMAT_D16_UNORM,
        DepthFormat::Depth24UnormStencil8 => DXGI_FORMAT_D24_UNORM_S8_UINT,
        DepthFormat::Depth32Float => DXGI_FORMAT_D32_FLOAT,
    }
}

pub(super) fn usage(usage: ResourceUsage) -> D3D11_USAGE {
    match usage {
        ResourceUsage::Default => D3D11_USAGE_DEFAULT,
        ResourceUsage::Dynamic => D3D11_USAGE_DYNAMIC,
    }
}

pub(super) fn bind_flags(bind: BindFlags) -> u32 {
    let mut flags = 0;
    if bind.contains(BindFlags::SHADER_RESOURCE) {
        flags |= D3D11_BIND_SHADER_RESOURCE.0 as u32;
    }
    if bind.contains(BindFlags::RENDER_TARGET) {
        flags |= D3D11_BIND_RENDER_TARGET.0 as u32;
    }
    if bind.contains(BindFlags::DEPTH_STENCIL) {
        flags |= D3D11_BIND_DEPTH_STENCIL.0 as u32;
    }
    flags
}

pub(super) fn cpu_access(access: CpuAccess) -> u32 {
    match access {
        CpuAccess::None => 0,
        CpuAccess::Read => D3D11_CPU_ACCESS_READ.0 as u32,
        CpuAccess::Write => D3D11_CPU_ACCESS_WRITE.0 as u32,
    }
}

/// Decodes a fixed-size, NUL-padded UTF-16 name.
pub(super) fn wide_name(raw: &[u16]) -> String {
    let len = raw.iter().position(|c| *c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..len])
}

/// Keeps the `HRESULT` of a failed call.
pub(super) fn native(context: &str, error: windows::core::Error) -> NativeError {
    NativeError::with_code(error.code().0, format!("{context}: {}", error.message()))
}
