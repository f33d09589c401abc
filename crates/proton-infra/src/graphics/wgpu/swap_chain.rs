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

//! A presentation chain over a `wgpu::Surface`.
//!
//! `wgpu` hands out surface textures one frame at a time, so the chain owns a
//! persistent back buffer that views are built against. Presenting resolves
//! (multisampled) or copies (single-sampled) that buffer into the surface
//! texture of the frame.

use super::conversions::native;
use proton_core::surface::NativeResult;

/// Device and queue, the `wgpu` equivalent of an immediate context.
#[derive(Debug, Clone)]
pub struct WgpuContext {
    /// The device commands are encoded on.
    pub device: wgpu::Device,
    /// The queue commands are submitted to.
    pub queue: wgpu::Queue,
}

impl WgpuContext {
    /// Encodes one command buffer with `record` and submits it.
    pub(crate) fn submit(&self, label: &str, record: impl FnOnce(&mut wgpu::CommandEncoder)) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        record(&mut encoder);
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// A depth-stencil view together with what the clear needs to know about it.
#[derive(Debug, Clone)]
pub struct WgpuDepthView {
    /// The texture view.
    pub view: wgpu::TextureView,
    /// Whether the format has a stencil aspect to clear.
    pub has_stencil: bool,
}

/// A configured surface and the back buffer rendered into.
#[derive(Debug)]
pub struct WgpuSwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    present_modes: Vec<wgpu::PresentMode>,
    context: WgpuContext,
    back_buffer: wgpu::Texture,
    sample_count: u32,
}

impl WgpuSwapChain {
    pub(crate) fn new(
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        present_modes: Vec<wgpu::PresentMode>,
        context: WgpuContext,
        sample_count: u32,
    ) -> NativeResult<Self> {
        surface.configure(&context.device, &config);
        let back_buffer = create_back_buffer(&context.device, &config, sample_count)?;
        Ok(Self {
            surface,
            config,
            present_modes,
            context,
            back_buffer,
            sample_count,
        })
    }

    /// The back buffer views are built against.
    pub fn back_buffer(&self) -> &wgpu::Texture {
        &self.back_buffer
    }

    /// Current surface configuration.
    pub fn config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    /// Reconfigures the surface at the new size and replaces the back buffer.
    ///
    /// Views of the previous back buffer keep it alive until they are dropped.
    pub(crate) fn resize(
        &mut self,
        width: u32,
        height: u32,
        buffer_count: u32,
    ) -> NativeResult<()> {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.config.desired_maximum_frame_latency = buffer_count.max(1);
        self.surface.configure(&self.context.device, &self.config);
        self.back_buffer =
            create_back_buffer(&self.context.device, &self.config, self.sample_count)?;
        log::debug!(
            "Reconfigured wgpu surface to {}x{}",
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    /// Switches between vsync'd and immediate presentation.
    fn apply_sync_interval(&mut self, sync_interval: u32) {
        let wanted = if sync_interval == 0 {
            [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
                .into_iter()
                .find(|m| self.present_modes.contains(m))
                .unwrap_or(wgpu::PresentMode::Fifo)
        } else {
            wgpu::PresentMode::Fifo
        };
        if wanted != self.config.present_mode {
            log::debug!("Switching present mode to {wanted:?}");
            self.config.present_mode = wanted;
            self.surface.configure(&self.context.device, &self.config);
        }
    }

    fn acquire(&mut self) -> NativeResult<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.context.device, &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| native("Failed to acquire the surface texture", e))
            }
            Err(e) => Err(native("Failed to acquire the surface texture", e)),
        }
    }

    /// Moves the back buffer contents into the next surface texture and
    /// presents it.
    pub(crate) fn present(&mut self, sync_interval: u32) -> NativeResult<()> {
        self.apply_sync_interval(sync_interval);
        let frame = self.acquire()?;
        let back_buffer = &self.back_buffer;

        self.context.submit("Proton Present Encoder", |encoder| {
            if back_buffer.sample_count() > 1 {
                let source = back_buffer.create_view(&wgpu::TextureViewDescriptor::default());
                let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
                let _resolve_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Proton Resolve Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &source,
                        depth_slice: None,
                        resolve_target: Some(&target),
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Discard,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
            } else {
                encoder.copy_texture_to_texture(
                    back_buffer.as_image_copy(),
                    frame.texture.as_image_copy(),
                    back_buffer.size(),
                );
            }
        });
        frame.present();
        Ok(())
    }
}

fn create_back_buffer(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> NativeResult<wgpu::Texture> {
    let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
    if sample_count == 1 {
        usage |= wgpu::TextureUsages::COPY_SRC;
    }
    super::backend::scoped(device, "Failed to create the back buffer", || {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Proton Back Buffer"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage,
            view_formats: &[],
        })
    })
}
