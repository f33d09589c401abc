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

//! Direct3D 11 binding of the surface capability set.
//!
//! Every handle is a COM interface; dropping it calls `Release`.

use super::conversions::{self, native, ALL_FEATURE_LEVELS};
use proton_core::math::LinearRgba;
use proton_core::surface::api::{
    AdapterInfo, DepthFormat, DeviceFlags, DisplayMode, FeatureLevel, PixelFormat,
    SwapChainDescriptor, SwapEffect, Texture2dDescriptor,
};
use proton_core::surface::{CreatedDevice, GraphicsBackend, NativeError, NativeResult};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows::core::Interface;
use windows::Win32::Foundation::{E_INVALIDARG, HWND};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

/// Binds surfaces directly to Direct3D 11 and DXGI.
#[derive(Debug, Clone, Copy, Default)]
pub struct D3D11Backend;

impl D3D11Backend {
    /// A Direct3D 11 backend.
    pub fn new() -> Self {
        Self
    }

    /// Probes the highest tier `adapter` accepts, dropping the newest tiers
    /// one by one while the runtime rejects them as unknown.
    fn probe_feature_level(adapter: &IDXGIAdapter) -> windows::core::Result<D3D_FEATURE_LEVEL> {
        let mut candidates: &[D3D_FEATURE_LEVEL] = &ALL_FEATURE_LEVELS;
        loop {
            let mut level = D3D_FEATURE_LEVEL::default();
            let result = unsafe {
                D3D11CreateDevice(
                    adapter,
                    D3D_DRIVER_TYPE_UNKNOWN,
                    None,
                    D3D11_CREATE_DEVICE_FLAG(0),
                    Some(candidates),
                    D3D11_SDK_VERSION,
                    None,
                    Some(&mut level),
                    None,
                )
            };
            match result {
                Ok(()) => return Ok(level),
                Err(e) if e.code() == E_INVALIDARG && candidates.len() > 1 => {
                    candidates = &candidates[1..]
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn output_window(desc: &SwapChainDescriptor) -> NativeResult<HWND> {
    let handle = desc
        .window
        .window_handle()
        .map_err(|e| NativeError::new(format!("window handle unavailable: {e}")))?;
    match handle.as_raw() {
        RawWindowHandle::Win32(win32) => Ok(HWND(win32.hwnd.get() as *mut core::ffi::c_void)),
        other => Err(NativeError::new(format!("Direct3D 11 needs a Win32 window, got {other:?}"))),
    }
}

impl GraphicsBackend for D3D11Backend {
    type Factory = IDXGIFactory1;
    type Adapter = IDXGIAdapter1;
    type Output = IDXGIOutput;
    type Device = ID3D11Device;
    type Context = ID3D11DeviceContext;
    type SwapChain = IDXGISwapChain;
    type Texture = ID3D11Texture2D;
    type RenderTargetView = ID3D11RenderTargetView;
    type DepthStencilView = ID3D11DepthStencilView;

    fn name(&self) -> &str {
        "Direct3D 11"
    }

    fn create_factory(&self, debug: bool) -> NativeResult<Self::Factory> {
        if debug {
            match unsafe { CreateDXGIFactory2::<IDXGIFactory1>(DXGI_CREATE_FACTORY_DEBUG) } {
                Ok(factory) => return Ok(factory),
                Err(e) => log::warn!(
                    "DXGI debug factory unavailable ({}), using the release factory",
                    e.message()
                ),
            }
        }
        unsafe { CreateDXGIFactory1::<IDXGIFactory1>() }
            .map_err(|e| native("CreateDXGIFactory1", e))
    }

    fn enum_adapter(
        &self,
        factory: &Self::Factory,
        index: u32,
    ) -> NativeResult<Option<Self::Adapter>> {
        match unsafe { factory.EnumAdapters1(index) } {
            Ok(adapter) => Ok(Some(adapter)),
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => Ok(None),
            Err(e) => Err(native("EnumAdapters1", e)),
        }
    }

    fn adapter_info(&self, adapter: &Self::Adapter) -> NativeResult<AdapterInfo> {
        let desc = unsafe { adapter.GetDesc1() }.map_err(|e| native("GetDesc1", e))?;
        Ok(AdapterInfo {
            name: conversions::wide_name(&desc.Description),
            device_id: desc.DeviceId,
            vendor_id: desc.VendorId,
            kind: conversions::adapter_kind(desc.Flags, desc.DedicatedVideoMemory),
            dedicated_video_memory: desc.DedicatedVideoMemory as u64,
            dedicated_system_memory: desc.DedicatedSystemMemory as u64,
            backend: self.name().to_owned(),
        })
    }

    fn supported_feature_level(&self, adapter: &Self::Adapter) -> NativeResult<FeatureLevel> {
        let base: IDXGIAdapter = adapter.cast().map_err(|e| native("IDXGIAdapter", e))?;
        let level = Self::probe_feature_level(&base).map_err(|e| native("D3D11CreateDevice", e))?;
        conversions::feature_level(level)
            .ok_or_else(|| NativeError::new(format!("unrecognized feature level 0x{:X}", level.0)))
    }

    fn enum_output(
        &self,
        adapter: &Self::Adapter,
        index: u32,
    ) -> NativeResult<Option<Self::Output>> {
        match unsafe { adapter.EnumOutputs(index) } {
            Ok(output) => Ok(Some(output)),
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => Ok(None),
            Err(e) => Err(native("EnumOutputs", e)),
        }
    }

    fn output_name(&self, output: &Self::Output) -> NativeResult<String> {
        let desc = unsafe { output.GetDesc() }.map_err(|e| native("GetDesc", e))?;
        Ok(conversions::wide_name(&desc.DeviceName))
    }

    fn display_modes(
        &self,
        output: &Self::Output,
        format: PixelFormat,
    ) -> NativeResult<Vec<DisplayMode>> {
        let dxgi_format = conversions::pixel_format(format);
        let mut count = 0u32;
        unsafe { output.GetDisplayModeList(dxgi_format, DXGI_ENUM_MODES(0), &mut count, None) }
            .map_err(|e| native("GetDisplayModeList", e))?;
        let mut modes = vec![DXGI_MODE_DESC::default(); count as usize];
        let list = Some(modes.as_mut_ptr());
        unsafe { output.GetDisplayModeList(dxgi_format, DXGI_ENUM_MODES(0), &mut count, list) }
            .map_err(|e| native("GetDisplayModeList", e))?;
        modes.truncate(count as usize);

        Ok(modes
            .iter()
            .map(|mode| DisplayMode {
                width: mode.Width,
                height: mode.Height,
                refresh_numerator: mode.RefreshRate.Numerator,
                refresh_denominator: mode.RefreshRate.Denominator,
                format,
            })
            .collect())
    }

    fn create_device_and_swap_chain(
        &self,
        _factory: &Self::Factory,
        adapter: &Self::Adapter,
        desc: &SwapChainDescriptor,
        flags: DeviceFlags,
    ) -> NativeResult<CreatedDevice<Self>> {
        let base: IDXGIAdapter = adapter.cast().map_err(|e| native("IDXGIAdapter", e))?;
        let chain_desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: desc.mode.width,
                Height: desc.mode.height,
                Format: conversions::pixel_format(desc.mode.format),
                ..Default::default()
            },
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: desc.sample.count.count(),
                Quality: desc.sample.quality,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            OutputWindow: output_window(desc)?,
            Windowed: desc.windowed.into(),
            SwapEffect: match desc.swap_effect {
                SwapEffect::Discard => DXGI_SWAP_EFFECT_DISCARD,
                SwapEffect::Sequential => DXGI_SWAP_EFFECT_SEQUENTIAL,
            },
            Flags: 0,
        };

        let mut create_flags = D3D11_CREATE_DEVICE_BGRA_SUPPORT;
        if flags.debug {
            create_flags |= D3D11_CREATE_DEVICE_DEBUG;
        }

        let mut swap_chain = None;
        let mut device = None;
        let mut context = None;
        unsafe {
            D3D11CreateDeviceAndSwapChain(
                &base,
                D3D_DRIVER_TYPE_UNKNOWN,
                None,
                create_flags,
                None,
                D3D11_SDK_VERSION,
                Some(&chain_desc),
                Some(&mut swap_chain),
                Some(&mut device),
                None,
                Some(&mut context),
            )
        }
        .map_err(|e| native("D3D11CreateDeviceAndSwapChain", e))?;

        Ok(CreatedDevice {
            device,
            context,
            swap_chain,
        })
    }

    fn back_buffer(&self, chain: &Self::SwapChain, index: u32) -> NativeResult<Self::Texture> {
        unsafe { chain.GetBuffer::<ID3D11Texture2D>(index) }.map_err(|e| native("GetBuffer", e))
    }

    fn create_render_target_view(
        &self,
        device: &Self::Device,
        texture: &Self::Texture,
    ) -> NativeResult<Self::RenderTargetView> {
        let mut view = None;
        unsafe { device.CreateRenderTargetView(texture, None, Some(&mut view)) }
            .map_err(|e| native("CreateRenderTargetView", e))?;
        view.ok_or_else(|| NativeError::new("CreateRenderTargetView returned no view"))
    }

    fn create_texture_2d(
        &self,
        device: &Self::Device,
        desc: &Texture2dDescriptor,
    ) -> NativeResult<Self::Texture> {
        let native_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: desc.mip_levels,
            ArraySize: desc.array_size,
            Format: conversions::depth_format(desc.format),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: desc.sample.count.count(),
                Quality: desc.sample.quality,
            },
            Usage: conversions::usage(desc.usage),
            BindFlags: conversions::bind_flags(desc.bind),
            CPUAccessFlags: conversions::cpu_access(desc.cpu_access),
            MiscFlags: 0,
        };
        let mut texture = None;
        unsafe { device.CreateTexture2D(&native_desc, None, Some(&mut texture)) }
            .map_err(|e| native("CreateTexture2D", e))?;
        texture.ok_or_else(|| NativeError::new("CreateTexture2D returned no texture"))
    }

    fn create_depth_stencil_view(
        &self,
        device: &Self::Device,
        texture: &Self::Texture,
        _format: DepthFormat,
    ) -> NativeResult<Self::DepthStencilView> {
        // A null description inherits format and dimension from the texture.
        let mut view = None;
        unsafe { device.CreateDepthStencilView(texture, None, Some(&mut view)) }
            .map_err(|e| native("CreateDepthStencilView", e))?;
        view.ok_or_else(|| NativeError::new("CreateDepthStencilView returned no view"))
    }

    fn resize_buffers(
        &self,
        chain: &mut Self::SwapChain,
        buffer_count: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> NativeResult<()> {
        unsafe {
            chain.ResizeBuffers(
                buffer_count,
                width,
                height,
                conversions::pixel_format(format),
                DXGI_SWAP_CHAIN_FLAG(0),
            )
        }
        .map_err(|e| native("ResizeBuffers", e))
    }

    fn clear_render_target(
        &self,
        context: &Self::Context,
        view: &Self::RenderTargetView,
        color: LinearRgba,
    ) -> NativeResult<()> {
        let rgba = color.to_array();
        unsafe { context.ClearRenderTargetView(view, &rgba) };
        Ok(())
    }

    fn clear_depth_stencil(
        &self,
        context: &Self::Context,
        view: &Self::DepthStencilView,
        depth: f32,
        stencil: u8,
    ) -> NativeResult<()> {
        let clear = (D3D11_CLEAR_DEPTH.0 | D3D11_CLEAR_STENCIL.0) as u32;
        unsafe { context.ClearDepthStencilView(view, clear, depth, stencil) };
        Ok(())
    }

    fn present(&self, chain: &mut Self::SwapChain, sync_interval: u32) -> NativeResult<()> {
        unsafe { chain.Present(sync_interval, DXGI_PRESENT(0)) }
            .ok()
            .map_err(|e| native("Present", e))
    }
}
