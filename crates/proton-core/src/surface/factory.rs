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

//! Creates the device, its context and the presentation chain.

use crate::surface::api::{DeviceFlags, PresentationParameters, SwapChainDescriptor};
use crate::surface::error::SurfaceError;
use crate::surface::traits::{CreatedDevice, GraphicsBackend};

/// The device, context and chain of a surface.
///
/// Fields are declared in release order: the chain goes before the context,
/// which goes before the device.
pub struct DeviceBundle<B: GraphicsBackend> {
    /// The presentation chain.
    pub swap_chain: B::SwapChain,
    /// The immediate context.
    pub context: B::Context,
    /// The logical device.
    pub device: B::Device,
}

/// Builds a [`DeviceBundle`] from an adapter and presentation parameters.
pub struct DeviceChainFactory<'b, B: GraphicsBackend> {
    backend: &'b B,
}

impl<'b, B: GraphicsBackend> DeviceChainFactory<'b, B> {
    /// Creates a factory over `backend`.
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Creates device, context and chain in one native call.
    ///
    /// The chain description is derived from `params`, with a zero dimension
    /// clamped to 1. `debug` enables the native validation layer and cannot be
    /// changed afterwards.
    ///
    /// ## Errors
    /// `DeviceCreation` if the call fails or leaves any of the three handles
    /// unset. Handles that were produced are released before returning.
    pub fn create(
        &self,
        factory: &B::Factory,
        adapter: &B::Adapter,
        params: &PresentationParameters,
        debug: bool,
    ) -> Result<DeviceBundle<B>, SurfaceError> {
        let desc = SwapChainDescriptor::from_parameters(params);
        log::debug!("Creating device and swap chain: {desc:?}");

        let created = self
            .backend
            .create_device_and_swap_chain(factory, adapter, &desc, DeviceFlags { debug })
            .map_err(|e| SurfaceError::DeviceCreation {
                code: e.code(),
                reason: e.message().to_owned(),
            })?;

        match created {
            CreatedDevice {
                device: Some(device),
                context: Some(context),
                swap_chain: Some(swap_chain),
            } => {
                log::debug!(
                    "Created device, context and {}-buffer swap chain ({}x{}, {}x MSAA)",
                    desc.buffer_count,
                    desc.mode.width,
                    desc.mode.height,
                    desc.sample.count.count()
                );
                Ok(DeviceBundle {
                    swap_chain,
                    context,
                    device,
                })
            }
            CreatedDevice {
                device,
                context,
                swap_chain,
            } => {
                let missing: Vec<&str> = [
                    ("device", device.is_none()),
                    ("context", context.is_none()),
                    ("swap chain", swap_chain.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                drop(swap_chain);
                drop(context);
                drop(device);
                Err(SurfaceError::DeviceCreation {
                    code: None,
                    reason: format!("the native call succeeded without a {}", missing.join(", ")),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::api::SurfaceOptions;
    use crate::surface::enumerator::AdapterEnumerator;
    use crate::surface::error::NativeError;
    use crate::surface::tracking::{
        FakeAdapter, FakeWindow, HandleKind, NativeCall, TrackingBackend,
    };

    fn setup() -> TrackingBackend {
        TrackingBackend::new(vec![FakeAdapter::hardware("GPU A", 0x10)])
    }

    fn run(
        backend: &TrackingBackend,
        width: u32,
        height: u32,
    ) -> Result<DeviceBundle<TrackingBackend>, SurfaceError> {
        let enumerator = AdapterEnumerator::new(backend);
        let factory = enumerator.create_factory(false)?;
        let adapter = enumerator.enumerate(&factory).next().unwrap()?;
        let params = PresentationParameters::new(
            FakeWindow::handle(),
            width,
            height,
            &SurfaceOptions::default(),
        );
        DeviceChainFactory::new(backend).create(&factory, &adapter.handle, &params, true)
    }

    #[test]
    fn test_creates_all_three_handles() {
        let backend = setup();
        let bundle = run(&backend, 800, 600).unwrap();
        assert_eq!(bundle.swap_chain.size(), (800, 600));
        assert_eq!(bundle.swap_chain.buffer_count(), 2);
        assert_eq!(backend.live(HandleKind::Device), 1);
        assert_eq!(backend.live(HandleKind::Context), 1);
        assert_eq!(backend.live(HandleKind::SwapChain), 1);
        assert!(backend.last_device_flags().unwrap().debug);
        drop(bundle);
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let backend = setup();
        let bundle = run(&backend, 0, 0).unwrap();
        assert_eq!(bundle.swap_chain.size(), (1, 1));
    }

    #[test]
    fn test_native_failure_carries_code() {
        let backend = setup();
        backend.fail_next(
            NativeCall::CreateDeviceAndSwapChain,
            NativeError::with_code(0x887A0004u32 as i32, "DXGI_ERROR_UNSUPPORTED"),
        );
        let err = run(&backend, 800, 600).err().unwrap();
        assert!(matches!(err, SurfaceError::DeviceCreation { code: Some(_), .. }));
        assert_eq!(err.native_code(), Some(0x887A0004u32 as i32));
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_null_handle_is_a_failure_and_releases_the_rest() {
        for kind in [HandleKind::Device, HandleKind::Context, HandleKind::SwapChain] {
            let backend = setup();
            backend.omit_on_create(kind);
            let err = run(&backend, 800, 600).err().unwrap();
            assert!(matches!(err, SurfaceError::DeviceCreation { code: None, .. }));
            assert_eq!(backend.live_count(), 0, "leak after omitting {kind:?}");
        }
    }
}
