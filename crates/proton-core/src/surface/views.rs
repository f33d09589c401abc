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

//! Derives the render-target and depth-stencil views of a surface.

use crate::math::Extent2D;
use crate::surface::api::{DepthFormat, SampleCount, SampleDescriptor, Texture2dDescriptor};
use crate::surface::error::{SurfaceError, ViewStep};
use crate::surface::traits::GraphicsBackend;

/// The render-target and depth-stencil views of the current surface size.
///
/// Dropping the pair releases the depth-stencil view first.
pub struct ViewPair<B: GraphicsBackend> {
    /// View over the freshly allocated depth texture.
    pub depth_stencil_view: B::DepthStencilView,
    /// View over the chain's back buffer.
    pub render_target_view: B::RenderTargetView,
}

impl<B: GraphicsBackend> ViewPair<B> {
    /// Releases the pair ahead of a chain resize: render-target view first,
    /// since it was the most recently bound.
    pub fn release(self) {
        let ViewPair {
            depth_stencil_view,
            render_target_view,
        } = self;
        drop(render_target_view);
        log::debug!("Released render-target view");
        drop(depth_stencil_view);
        log::debug!("Released depth-stencil view");
    }
}

/// Builds views as pure functions of the device and the current size.
///
/// Views are never resized; a size change rebuilds both.
pub struct ViewBuilder<'b, B: GraphicsBackend> {
    backend: &'b B,
    depth_format: DepthFormat,
    sample: SampleDescriptor,
}

impl<'b, B: GraphicsBackend> ViewBuilder<'b, B> {
    /// Creates a builder whose depth texture matches the chain's sample count.
    pub fn new(backend: &'b B, depth_format: DepthFormat, sample_count: SampleCount) -> Self {
        Self {
            backend,
            depth_format,
            sample: SampleDescriptor {
                count: sample_count,
                quality: 0,
            },
        }
    }

    /// Wraps the chain's back buffer 0 in a render-target view.
    ///
    /// The back-buffer texture is released as soon as the view exists.
    pub fn build_render_target_view(
        &self,
        device: &B::Device,
        chain: &B::SwapChain,
    ) -> Result<B::RenderTargetView, SurfaceError> {
        let back_buffer = self
            .backend
            .back_buffer(chain, 0)
            .map_err(SurfaceError::view(ViewStep::BackBuffer))?;
        let view = self
            .backend
            .create_render_target_view(device, &back_buffer)
            .map_err(SurfaceError::view(ViewStep::RenderTargetView))?;
        drop(back_buffer);
        log::debug!("Created render-target view, released back buffer");
        Ok(view)
    }

    /// Allocates a depth texture of exactly `width` x `height` and wraps it in
    /// a depth-stencil view.
    ///
    /// The texture is released as soon as the view exists.
    pub fn build_depth_stencil_view(
        &self,
        device: &B::Device,
        width: u32,
        height: u32,
    ) -> Result<B::DepthStencilView, SurfaceError> {
        let desc =
            Texture2dDescriptor::depth_stencil(width, height, self.depth_format, self.sample);
        let texture = self
            .backend
            .create_texture_2d(device, &desc)
            .map_err(SurfaceError::view(ViewStep::DepthTexture))?;
        let view = self
            .backend
            .create_depth_stencil_view(device, &texture, self.depth_format)
            .map_err(SurfaceError::view(ViewStep::DepthStencilView))?;
        drop(texture);
        log::debug!(
            "Created {width}x{height} {:?} depth-stencil view, released depth texture",
            self.depth_format
        );
        Ok(view)
    }

    /// Builds both views for `extent`. If the depth-stencil view fails the
    /// render-target view is released before returning.
    pub fn build_views(
        &self,
        device: &B::Device,
        chain: &B::SwapChain,
        extent: Extent2D,
    ) -> Result<ViewPair<B>, SurfaceError> {
        let render_target_view = self.build_render_target_view(device, chain)?;
        let depth_stencil_view =
            self.build_depth_stencil_view(device, extent.width, extent.height)?;
        Ok(ViewPair {
            depth_stencil_view,
            render_target_view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::api::{
        BindFlags, CpuAccess, PresentationParameters, ResourceUsage, SurfaceOptions,
    };
    use crate::surface::enumerator::AdapterEnumerator;
    use crate::surface::error::NativeError;
    use crate::surface::factory::{DeviceBundle, DeviceChainFactory};
    use crate::surface::tracking::{
        FakeAdapter, FakeWindow, HandleKind, NativeCall, TrackingBackend,
    };

    fn bundle(backend: &TrackingBackend) -> DeviceBundle<TrackingBackend> {
        let enumerator = AdapterEnumerator::new(backend);
        let factory = enumerator.create_factory(false).unwrap();
        let adapter = enumerator.enumerate(&factory).next().unwrap().unwrap();
        let params =
            PresentationParameters::new(FakeWindow::handle(), 640, 480, &SurfaceOptions::default());
        DeviceChainFactory::new(backend)
            .create(&factory, &adapter.handle, &params, false)
            .unwrap()
    }

    fn setup() -> (TrackingBackend, DeviceBundle<TrackingBackend>) {
        let backend = TrackingBackend::new(vec![FakeAdapter::hardware("GPU A", 0x10)]);
        let devices = bundle(&backend);
        (backend, devices)
    }

    #[test]
    fn test_intermediate_textures_are_released() {
        let (backend, devices) = setup();
        let builder =
            ViewBuilder::new(&backend, DepthFormat::Depth24UnormStencil8, SampleCount::X4);
        let views = builder
            .build_views(&devices.device, &devices.swap_chain, Extent2D::new(640, 480))
            .unwrap();

        assert_eq!(backend.live(HandleKind::BackBuffer), 0);
        assert_eq!(backend.live(HandleKind::DepthTexture), 0);
        assert_eq!(backend.live(HandleKind::RenderTargetView), 1);
        assert_eq!(backend.live(HandleKind::DepthStencilView), 1);

        let desc = backend.last_texture_desc().unwrap();
        assert_eq!((desc.width, desc.height), (640, 480));
        assert_eq!(desc.mip_levels, 1);
        assert_eq!(desc.array_size, 1);
        assert_eq!(desc.sample.count, SampleCount::X4);
        assert_eq!(desc.usage, ResourceUsage::Default);
        assert_eq!(desc.bind, BindFlags::DEPTH_STENCIL);
        assert_eq!(desc.cpu_access, CpuAccess::None);
        drop(views);
    }

    #[test]
    fn test_release_drops_render_target_before_depth_stencil() {
        let (backend, devices) = setup();
        let views = ViewBuilder::new(&backend, DepthFormat::Depth16Unorm, SampleCount::X1)
            .build_views(&devices.device, &devices.swap_chain, Extent2D::new(8, 8))
            .unwrap();
        backend.clear_events();
        views.release();
        assert_eq!(
            backend.release_order(),
            vec![HandleKind::RenderTargetView, HandleKind::DepthStencilView]
        );
    }

    #[test]
    fn test_failed_steps_report_their_step_and_leak_nothing() {
        let cases = [
            (NativeCall::BackBuffer, ViewStep::BackBuffer),
            (NativeCall::CreateRenderTargetView, ViewStep::RenderTargetView),
            (NativeCall::CreateTexture2d, ViewStep::DepthTexture),
            (NativeCall::CreateDepthStencilView, ViewStep::DepthStencilView),
        ];
        for (call, expected) in cases {
            let (backend, devices) = setup();
            backend.fail_next(call, NativeError::with_code(-2147024882, "E_OUTOFMEMORY"));
            let err = ViewBuilder::new(&backend, DepthFormat::default(), SampleCount::X4)
                .build_views(&devices.device, &devices.swap_chain, Extent2D::new(640, 480))
                .err()
                .unwrap();
            match err {
                SurfaceError::ViewCreation { step, .. } => assert_eq!(step, expected),
                other => panic!("unexpected error: {other}"),
            }
            for kind in [
                HandleKind::BackBuffer,
                HandleKind::RenderTargetView,
                HandleKind::DepthTexture,
                HandleKind::DepthStencilView,
            ] {
                assert_eq!(backend.live(kind), 0, "{kind:?} leaked after {call:?} failed");
            }
        }
    }
}
