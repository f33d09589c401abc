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

//! `wgpu` binding of the surface capability set.
//!
//! The instance plays the factory, `wgpu` adapters and devices map directly,
//! and the chain is a configured surface plus an owned back buffer. `wgpu`
//! does not expose display outputs, so adapters report none.

use super::conversions::{self, native};
use super::swap_chain::{WgpuContext, WgpuDepthView, WgpuSwapChain};
use proton_core::math::LinearRgba;
use proton_core::surface::api::{
    AdapterInfo, DepthFormat, DeviceFlags, DisplayMode, FeatureLevel, PixelFormat,
    SwapChainDescriptor, Texture2dDescriptor,
};
use proton_core::surface::{CreatedDevice, GraphicsBackend, NativeError, NativeResult};
use wgpu::SurfaceTargetUnsafe;

/// Runs `create` inside validation and out-of-memory error scopes, turning a
/// captured error into a [`NativeError`].
pub(crate) fn scoped<T>(
    device: &wgpu::Device,
    context: &str,
    create: impl FnOnce() -> T,
) -> NativeResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(out_of_memory) {
        Some(error) => Err(native(context, error)),
        None => Ok(value),
    }
}

/// The `wgpu` instance and the adapters it reported when it was created.
///
/// Adapters are listed once so indices stay stable for the factory's lifetime.
#[derive(Debug)]
pub struct WgpuFactory {
    instance: wgpu::Instance,
    adapters: Vec<wgpu::Adapter>,
}

/// `wgpu` exposes no display outputs; this type has no values.
#[derive(Debug)]
pub enum WgpuOutput {}

/// Binds surfaces through `wgpu`, on whichever native API it picks.
#[derive(Debug, Clone, Copy)]
pub struct WgpuBackend {
    backends: wgpu::Backends,
}

impl WgpuBackend {
    /// A backend over the primary native APIs (Vulkan, Metal, DirectX 12).
    pub fn new() -> Self {
        Self::with_backends(wgpu::Backends::PRIMARY)
    }

    /// A backend restricted to `backends`.
    pub fn with_backends(backends: wgpu::Backends) -> Self {
        Self { backends }
    }

    fn surface_config(
        &self,
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        desc: &SwapChainDescriptor,
    ) -> NativeResult<(wgpu::SurfaceConfiguration, Vec<wgpu::PresentMode>)> {
        let caps = surface.get_capabilities(adapter);
        let preferred = conversions::pixel_format(desc.mode.format);
        let format = if caps.formats.contains(&preferred) {
            preferred
        } else {
            let fallback = caps
                .formats
                .first()
                .copied()
                .ok_or_else(|| NativeError::new("The adapter cannot present to this window"))?;
            log::warn!("Surface does not support {preferred:?}, presenting as {fallback:?}");
            fallback
        };

        let sample_count = desc.sample.count.count();
        if sample_count == 1 && !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(NativeError::new(
                "The surface cannot be copied into; use a sample count above 1",
            ));
        }
        if !adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(sample_count)
        {
            return Err(NativeError::new(format!(
                "{sample_count}x multisampling is not supported for {format:?}"
            )));
        }

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if sample_count == 1 {
            usage |= wgpu::TextureUsages::COPY_DST;
        }
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: desc.mode.width.max(1),
            height: desc.mode.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: desc.buffer_count.max(1),
            alpha_mode,
            view_formats: vec![],
        };
        Ok((config, caps.present_modes))
    }
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for WgpuBackend {
    type Factory = WgpuFactory;
    type Adapter = wgpu::Adapter;
    type Output = WgpuOutput;
    type Device = wgpu::Device;
    type Context = WgpuContext;
    type SwapChain = WgpuSwapChain;
    type Texture = wgpu::Texture;
    type RenderTargetView = wgpu::TextureView;
    type DepthStencilView = WgpuDepthView;

    fn name(&self) -> &str {
        "wgpu"
    }

    fn create_factory(&self, debug: bool) -> NativeResult<WgpuFactory> {
        let flags = if debug {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: self.backends,
            flags: flags.with_env(),
            ..Default::default()
        });
        let adapters = instance.enumerate_adapters(self.backends);
        log::debug!("wgpu instance reports {} adapter(s)", adapters.len());
        Ok(WgpuFactory { instance, adapters })
    }

    fn enum_adapter(
        &self,
        factory: &WgpuFactory,
        index: u32,
    ) -> NativeResult<Option<wgpu::Adapter>> {
        Ok(factory.adapters.get(index as usize).cloned())
    }

    fn adapter_info(&self, adapter: &wgpu::Adapter) -> NativeResult<AdapterInfo> {
        let info = adapter.get_info();
        Ok(AdapterInfo {
            name: info.name,
            device_id: info.device,
            vendor_id: info.vendor,
            kind: conversions::adapter_kind(info.device_type),
            dedicated_video_memory: 0,
            dedicated_system_memory: 0,
            backend: conversions::backend_name(info.backend).to_string(),
        })
    }

    fn supported_feature_level(&self, adapter: &wgpu::Adapter) -> NativeResult<FeatureLevel> {
        Ok(conversions::feature_level(
            adapter.get_downlevel_capabilities().is_webgpu_compliant(),
            adapter.limits().max_texture_dimension_2d,
        ))
    }

    fn enum_output(
        &self,
        _adapter: &wgpu::Adapter,
        _index: u32,
    ) -> NativeResult<Option<WgpuOutput>> {
        Ok(None)
    }

    fn output_name(&self, output: &WgpuOutput) -> NativeResult<String> {
        match *output {}
    }

    fn display_modes(
        &self,
        output: &WgpuOutput,
        _format: PixelFormat,
    ) -> NativeResult<Vec<DisplayMode>> {
        match *output {}
    }

    fn create_device_and_swap_chain(
        &self,
        factory: &WgpuFactory,
        adapter: &wgpu::Adapter,
        desc: &SwapChainDescriptor,
        flags: DeviceFlags,
    ) -> NativeResult<CreatedDevice<Self>> {
        // SAFETY: the descriptor holds an `Arc` of the window, and the chain
        // never outlives the controller that keeps that descriptor's window alive.
        let target = unsafe { SurfaceTargetUnsafe::from_window(&desc.window) }
            .map_err(|e| native("Failed to create surface target", e))?;
        let surface = unsafe { factory.instance.create_surface_unsafe(target) }
            .map_err(|e| native("Failed to create surface", e))?;
        let (config, present_modes) = self.surface_config(&surface, adapter, desc)?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Proton Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| native("Failed to create logical device", e))?;

        if flags.debug {
            device.on_uncaptured_error(Box::new(|e| {
                log::error!("WGPU Uncaptured Error: {e:?}");
            }));
        }

        let context = WgpuContext {
            device: device.clone(),
            queue,
        };
        let swap_chain = WgpuSwapChain::new(
            surface,
            config,
            present_modes,
            context.clone(),
            desc.sample.count.count(),
        )?;
        Ok(CreatedDevice {
            device: Some(device),
            context: Some(context),
            swap_chain: Some(swap_chain),
        })
    }

    fn back_buffer(&self, chain: &WgpuSwapChain, index: u32) -> NativeResult<wgpu::Texture> {
        if index != 0 {
            return Err(NativeError::new(format!(
                "Back buffer {index} is not accessible, wgpu exposes only the current one"
            )));
        }
        Ok(chain.back_buffer().clone())
    }

    fn create_render_target_view(
        &self,
        device: &wgpu::Device,
        texture: &wgpu::Texture,
    ) -> NativeResult<wgpu::TextureView> {
        scoped(device, "Failed to create render-target view", || {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("Proton Render Target View"),
                ..Default::default()
            })
        })
    }

    fn create_texture_2d(
        &self,
        device: &wgpu::Device,
        desc: &Texture2dDescriptor,
    ) -> NativeResult<wgpu::Texture> {
        scoped(device, "Failed to create depth texture", || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Proton Depth Texture"),
                size: wgpu::Extent3d {
                    width: desc.width,
                    height: desc.height,
                    depth_or_array_layers: desc.array_size,
                },
                mip_level_count: desc.mip_levels,
                sample_count: desc.sample.count.count(),
                dimension: wgpu::TextureDimension::D2,
                format: conversions::depth_format(desc.format),
                usage: conversions::texture_usages(desc.bind),
                view_formats: &[],
            })
        })
    }

    fn create_depth_stencil_view(
        &self,
        device: &wgpu::Device,
        texture: &wgpu::Texture,
        format: DepthFormat,
    ) -> NativeResult<WgpuDepthView> {
        let view = scoped(device, "Failed to create depth-stencil view", || {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("Proton Depth Stencil View"),
                ..Default::default()
            })
        })?;
        Ok(WgpuDepthView {
            view,
            has_stencil: format.has_stencil(),
        })
    }

    fn resize_buffers(
        &self,
        chain: &mut WgpuSwapChain,
        buffer_count: u32,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> NativeResult<()> {
        chain.resize(width, height, buffer_count)
    }

    fn clear_render_target(
        &self,
        context: &WgpuContext,
        view: &wgpu::TextureView,
        color: LinearRgba,
    ) -> NativeResult<()> {
        context.submit("Proton Clear Encoder", |encoder| {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Proton Clear Color Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(conversions::color(color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        });
        Ok(())
    }

    fn clear_depth_stencil(
        &self,
        context: &WgpuContext,
        view: &WgpuDepthView,
        depth: f32,
        stencil: u8,
    ) -> NativeResult<()> {
        let stencil_ops = view.has_stencil.then_some(wgpu::Operations {
            load: wgpu::LoadOp::Clear(u32::from(stencil)),
            store: wgpu::StoreOp::Store,
        });
        context.submit("Proton Clear Depth Encoder", |encoder| {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Proton Clear Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &view.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        });
        Ok(())
    }

    fn present(&self, chain: &mut WgpuSwapChain, sync_interval: u32) -> NativeResult<()> {
        chain.present(sync_interval)
    }
}
