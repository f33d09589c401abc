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

//! The native capability set every graphics binding implements.

use crate::math::LinearRgba;
use crate::surface::api::*;
use crate::surface::error::NativeResult;

/// The three handles produced by a combined device and chain creation call.
///
/// Each one is optional because a native call can report success while still
/// leaving a handle unset. Callers must check all three together.
pub struct CreatedDevice<B: GraphicsBackend + ?Sized> {
    /// The logical device.
    pub device: Option<B::Device>,
    /// Its immediate command context.
    pub context: Option<B::Context>,
    /// The presentation chain bound to the window.
    pub swap_chain: Option<B::SwapChain>,
}

/// A concrete binding of a native graphics API.
///
/// Every method maps onto a single native call. Handles are plain owned
/// values: releasing a handle is dropping it, and each binding maps drop onto
/// the native release (COM `Release`, reference count decrement, ...).
pub trait GraphicsBackend {
    /// Entry object from which adapters are enumerated.
    type Factory;
    /// A physical adapter.
    type Adapter;
    /// A display output attached to an adapter.
    type Output;
    /// The logical device, the resource allocator.
    type Device;
    /// The immediate context commands are recorded into.
    type Context;
    /// The presentation chain.
    type SwapChain;
    /// A 2D texture.
    type Texture;
    /// A render-target view.
    type RenderTargetView;
    /// A depth-stencil view.
    type DepthStencilView;

    /// A short name for logs (e.g., "Direct3D 11").
    fn name(&self) -> &str;

    /// Creates the factory.
    /// ## Arguments
    /// * `debug` - Requests the debug variant of the factory where the API has one.
    fn create_factory(&self, debug: bool) -> NativeResult<Self::Factory>;

    /// Returns the adapter at `index`, or `None` past the last adapter.
    fn enum_adapter(
        &self,
        factory: &Self::Factory,
        index: u32,
    ) -> NativeResult<Option<Self::Adapter>>;

    /// Reads the adapter's identity and memory figures.
    fn adapter_info(&self, adapter: &Self::Adapter) -> NativeResult<AdapterInfo>;

    /// Queries the highest capability tier the adapter supports.
    fn supported_feature_level(&self, adapter: &Self::Adapter) -> NativeResult<FeatureLevel>;

    /// Returns the output at `index`, or `None` past the last output.
    fn enum_output(
        &self,
        adapter: &Self::Adapter,
        index: u32,
    ) -> NativeResult<Option<Self::Output>>;

    /// Reads the output's device name.
    fn output_name(&self, output: &Self::Output) -> NativeResult<String>;

    /// Lists the display modes the output supports for `format`.
    fn display_modes(
        &self,
        output: &Self::Output,
        format: PixelFormat,
    ) -> NativeResult<Vec<DisplayMode>>;

    /// Creates the device, its immediate context and a chain bound to the
    /// descriptor's window, in one native call.
    /// ## Arguments
    /// * `factory` - The factory the adapter was enumerated from.
    /// * `adapter` - The adapter the device is created on.
    /// * `desc` - The presentation chain description.
    /// * `flags` - Creation flags, fixed for the device's lifetime.
    /// ## Returns
    /// The three handles, any of which may be missing even on success.
    fn create_device_and_swap_chain(
        &self,
        factory: &Self::Factory,
        adapter: &Self::Adapter,
        desc: &SwapChainDescriptor,
        flags: DeviceFlags,
    ) -> NativeResult<CreatedDevice<Self>>;

    /// Retrieves the chain's back buffer at `index`.
    fn back_buffer(&self, chain: &Self::SwapChain, index: u32) -> NativeResult<Self::Texture>;

    /// Wraps a texture in a render-target view. The view keeps its own
    /// reference to the texture.
    fn create_render_target_view(
        &self,
        device: &Self::Device,
        texture: &Self::Texture,
    ) -> NativeResult<Self::RenderTargetView>;

    /// Allocates a 2D texture.
    fn create_texture_2d(
        &self,
        device: &Self::Device,
        desc: &Texture2dDescriptor,
    ) -> NativeResult<Self::Texture>;

    /// Wraps a texture in a depth-stencil view. The view keeps its own
    /// reference to the texture.
    fn create_depth_stencil_view(
        &self,
        device: &Self::Device,
        texture: &Self::Texture,
        format: DepthFormat,
    ) -> NativeResult<Self::DepthStencilView>;

    /// Resizes the chain's buffers in place.
    /// ## Errors
    /// Fails while any view or texture of the old buffers is still alive.
    fn resize_buffers(
        &self,
        chain: &mut Self::SwapChain,
        buffer_count: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> NativeResult<()>;

    /// Clears a render-target view to `color`.
    fn clear_render_target(
        &self,
        context: &Self::Context,
        view: &Self::RenderTargetView,
        color: LinearRgba,
    ) -> NativeResult<()>;

    /// Clears a depth-stencil view.
    fn clear_depth_stencil(
        &self,
        context: &Self::Context,
        view: &Self::DepthStencilView,
        depth: f32,
        stencil: u8,
    ) -> NativeResult<()>;

    /// Presents the current back buffer to the window.
    fn present(&self, chain: &mut Self::SwapChain, sync_interval: u32) -> NativeResult<()>;
}
