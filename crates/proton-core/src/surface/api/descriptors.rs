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

//! Creation descriptors handed to a [`crate::surface::traits::GraphicsBackend`].

use super::enums::{CpuAccess, DepthFormat, PixelFormat, ResourceUsage, SampleCount, SwapEffect};
use super::flags::BindFlags;
use super::settings::PresentationParameters;
use crate::platform::SurfaceWindowHandle;
use std::fmt;

/// Multisampling description shared by the chain and its depth texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SampleDescriptor {
    /// Samples per pixel.
    pub count: SampleCount,
    /// Quality level, 0 for the standard pattern.
    pub quality: u32,
}

/// Size and format of the chain's buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeDescriptor {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Buffer pixel format.
    pub format: PixelFormat,
}

/// Everything needed to create a presentation chain bound to a window.
#[derive(Clone)]
pub struct SwapChainDescriptor {
    /// Buffer mode.
    pub mode: ModeDescriptor,
    /// Multisampling.
    pub sample: SampleDescriptor,
    /// How the buffers are bound to the pipeline.
    pub usage: BindFlags,
    /// Number of buffers in the chain.
    pub buffer_count: u32,
    /// The native window the chain presents into.
    pub window: SurfaceWindowHandle,
    /// Windowed (`true`) or exclusive fullscreen.
    pub windowed: bool,
    /// Presentation model.
    pub swap_effect: SwapEffect,
}

impl SwapChainDescriptor {
    /// Builds the descriptor from presentation parameters.
    ///
    /// A zero dimension is clamped to 1 since native chains reject empty buffers.
    pub fn from_parameters(params: &PresentationParameters) -> Self {
        let extent = params.extent().clamped();
        Self {
            mode: ModeDescriptor {
                width: extent.width,
                height: extent.height,
                format: params.format(),
            },
            sample: SampleDescriptor {
                count: params.sample_count(),
                quality: 0,
            },
            usage: BindFlags::RENDER_TARGET,
            buffer_count: params.buffer_count(),
            window: params.window().clone(),
            windowed: params.windowed(),
            swap_effect: SwapEffect::Discard,
        }
    }
}

impl fmt::Debug for SwapChainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapChainDescriptor")
            .field("mode", &self.mode)
            .field("sample", &self.sample)
            .field("usage", &self.usage)
            .field("buffer_count", &self.buffer_count)
            .field("windowed", &self.windowed)
            .field("swap_effect", &self.swap_effect)
            .finish_non_exhaustive()
    }
}

/// Flags applied to device creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceFlags {
    /// Enables the native debug/validation layer.
    pub debug: bool,
}

/// Description of a 2D texture used as a depth/stencil target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture2dDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Number of array layers.
    pub array_size: u32,
    /// Depth/stencil format.
    pub format: DepthFormat,
    /// Multisampling, which must match the chain's.
    pub sample: SampleDescriptor,
    /// Expected usage.
    pub usage: ResourceUsage,
    /// Pipeline bindings.
    pub bind: BindFlags,
    /// CPU access.
    pub cpu_access: CpuAccess,
}

impl Texture2dDescriptor {
    /// A single-mip, single-layer, GPU-only depth/stencil texture.
    pub fn depth_stencil(
        width: u32,
        height: u32,
        format: DepthFormat,
        sample: SampleDescriptor,
    ) -> Self {
        Self {
            width,
            height,
            mip_levels: 1,
            array_size: 1,
            format,
            sample,
            usage: ResourceUsage::Default,
            bind: BindFlags::DEPTH_STENCIL,
            cpu_access: CpuAccess::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_stencil_descriptor_defaults() {
        let sample = SampleDescriptor {
            count: SampleCount::X4,
            quality: 0,
        };
        let desc = Texture2dDescriptor::depth_stencil(
            640,
            480,
            DepthFormat::Depth24UnormStencil8,
            sample,
        );
        assert_eq!(desc.mip_levels, 1);
        assert_eq!(desc.array_size, 1);
        assert_eq!(desc.sample, sample);
        assert_eq!(desc.usage, ResourceUsage::Default);
        assert_eq!(desc.cpu_access, CpuAccess::None);
        assert!(desc.bind.contains(BindFlags::DEPTH_STENCIL));
        assert!(!desc.bind.contains(BindFlags::RENDER_TARGET));
    }
}
