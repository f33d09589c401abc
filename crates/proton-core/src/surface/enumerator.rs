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

//! Lists the adapters of a factory and their display outputs.

use crate::surface::api::{AdapterDescriptor, OutputDescriptor, PixelFormat};
use crate::surface::error::SurfaceError;
use crate::surface::traits::GraphicsBackend;

/// An adapter handle together with the snapshot taken when it was enumerated.
pub struct EnumeratedAdapter<B: GraphicsBackend> {
    /// Diagnostic snapshot of the adapter.
    pub descriptor: AdapterDescriptor,
    /// The native adapter handle.
    pub handle: B::Adapter,
}

impl<B: GraphicsBackend> AsRef<AdapterDescriptor> for EnumeratedAdapter<B> {
    fn as_ref(&self) -> &AdapterDescriptor {
        &self.descriptor
    }
}

/// Produces adapter descriptors from a backend.
///
/// Holds no state of its own: every call to [`AdapterEnumerator::enumerate`]
/// queries the system again.
pub struct AdapterEnumerator<'b, B: GraphicsBackend> {
    backend: &'b B,
}

impl<'b, B: GraphicsBackend> AdapterEnumerator<'b, B> {
    /// Creates an enumerator over `backend`.
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Creates the factory adapters are enumerated from.
    ///
    /// Without a factory no device can exist, so failure is fatal to the surface.
    pub fn create_factory(&self, debug: bool) -> Result<B::Factory, SurfaceError> {
        let factory = self
            .backend
            .create_factory(debug)
            .map_err(SurfaceError::Enumeration)?;
        log::debug!("Created {} factory (debug: {})", self.backend.name(), debug);
        Ok(factory)
    }

    /// Lazily enumerates the adapters of `factory`, in system order.
    pub fn enumerate<'a>(&'a self, factory: &'a B::Factory) -> Adapters<'a, B> {
        Adapters {
            backend: self.backend,
            factory,
            next: 0,
            done: false,
        }
    }

    fn describe(&self, index: u32, handle: &B::Adapter) -> Result<AdapterDescriptor, SurfaceError> {
        let info = self
            .backend
            .adapter_info(handle)
            .map_err(SurfaceError::Enumeration)?;
        let feature_level = match self.backend.supported_feature_level(handle) {
            Ok(level) => Some(level),
            Err(e) => {
                log::debug!("Feature level query failed for '{}': {}", info.name, e);
                None
            }
        };
        let outputs = self.outputs(handle);
        Ok(AdapterDescriptor {
            index,
            info,
            feature_level,
            outputs,
        })
    }

    /// Lists the outputs of an adapter. Display modes are only probed for the
    /// first one. Output queries are diagnostic, so failures end the listing
    /// instead of failing the enumeration.
    fn outputs(&self, adapter: &B::Adapter) -> Vec<OutputDescriptor> {
        let mut outputs = Vec::new();
        for index in 0.. {
            let output = match self.backend.enum_output(adapter, index) {
                Ok(Some(output)) => output,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Output enumeration stopped at index {index}: {e}");
                    break;
                }
            };
            let name = self.backend.output_name(&output).unwrap_or_else(|e| {
                log::warn!("Could not read the name of output {index}: {e}");
                String::from("<unknown>")
            });
            let modes = if index == 0 {
                self.backend
                    .display_modes(&output, PixelFormat::Bgra8Unorm)
                    .unwrap_or_else(|e| {
                        log::warn!("Could not list display modes of '{name}': {e}");
                        Vec::new()
                    })
            } else {
                Vec::new()
            };
            outputs.push(OutputDescriptor { name, modes });
        }
        outputs
    }
}

/// Iterator over the adapters of a factory. Stops after the first error.
pub struct Adapters<'a, B: GraphicsBackend> {
    backend: &'a B,
    factory: &'a B::Factory,
    next: u32,
    done: bool,
}

impl<B: GraphicsBackend> Iterator for Adapters<'_, B> {
    type Item = Result<EnumeratedAdapter<B>, SurfaceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.next;
        let handle = match self.backend.enum_adapter(self.factory, index) {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(SurfaceError::Enumeration(e)));
            }
        };
        self.next += 1;

        match AdapterEnumerator::new(self.backend).describe(index, &handle) {
            Ok(descriptor) => {
                log::debug!(
                    "Found adapter {}: {} ({:#X})",
                    index,
                    descriptor.info.name,
                    descriptor.info.device_id
                );
                Some(Ok(EnumeratedAdapter { descriptor, handle }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Enumerates every adapter of `backend` and returns their snapshots, for the
/// diagnostic capability report. All native handles are released on return.
pub fn describe_adapters<B: GraphicsBackend>(
    backend: &B,
    debug: bool,
) -> Result<Vec<AdapterDescriptor>, SurfaceError> {
    let enumerator = AdapterEnumerator::new(backend);
    let factory = enumerator.create_factory(debug)?;
    let descriptors = enumerator
        .enumerate(&factory)
        .map(|adapter| adapter.map(|a| a.descriptor))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::api::{FeatureLevel, SOFTWARE_ADAPTER_ID};
    use crate::surface::error::NativeError;
    use crate::surface::tracking::{FakeAdapter, HandleKind, NativeCall, TrackingBackend};

    #[test]
    fn test_enumerates_in_order_and_probes_first_output_only() {
        let backend = TrackingBackend::new(vec![
            FakeAdapter::hardware("GPU A", 0x2684)
                .with_outputs(&["\\\\.\\DISPLAY1", "\\\\.\\DISPLAY2"]),
            FakeAdapter::software(),
        ]);
        let adapters = describe_adapters(&backend, false).unwrap();

        assert_eq!(adapters.len(), 2);
        assert_eq!(adapters[0].index, 0);
        assert_eq!(adapters[0].info.name, "GPU A");
        assert_eq!(adapters[0].feature_level, Some(FeatureLevel::Level11_1));
        assert_eq!(adapters[0].outputs.len(), 2);
        assert!(!adapters[0].outputs[0].modes.is_empty());
        assert!(adapters[0].outputs[1].modes.is_empty());
        assert_eq!(adapters[1].info.device_id, SOFTWARE_ADAPTER_ID);
        assert!(adapters[1].outputs.is_empty());
        assert_eq!(backend.count_calls(NativeCall::DisplayModes), 1);
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let backend = TrackingBackend::new(vec![FakeAdapter::hardware("GPU A", 0x1)]);
        let enumerator = AdapterEnumerator::new(&backend);
        let factory = enumerator.create_factory(false).unwrap();

        let first: Vec<_> = enumerator.enumerate(&factory).collect();
        let second: Vec<_> = enumerator.enumerate(&factory).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(backend.count_calls(NativeCall::EnumAdapter), 4);
    }

    #[test]
    fn test_factory_failure_is_an_enumeration_error() {
        let backend = TrackingBackend::new(vec![FakeAdapter::hardware("GPU A", 0x1)]);
        backend.fail_next(NativeCall::CreateFactory, NativeError::with_code(-1, "no DXGI"));

        let err = describe_adapters(&backend, true).unwrap_err();
        assert!(matches!(err, SurfaceError::Enumeration(_)));
        assert_eq!(err.native_code(), Some(-1));
        assert_eq!(backend.acquired(HandleKind::Factory), 0);
    }

    #[test]
    fn test_iterator_stops_after_first_error() {
        let backend = TrackingBackend::new(vec![
            FakeAdapter::hardware("GPU A", 0x1),
            FakeAdapter::hardware("GPU B", 0x2),
        ]);
        backend.fail_next(NativeCall::AdapterInfo, NativeError::new("device removed"));
        let enumerator = AdapterEnumerator::new(&backend);
        let factory = enumerator.create_factory(false).unwrap();

        let results: Vec<_> = enumerator.enumerate(&factory).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
        drop(results);
        drop(factory);
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_unknown_feature_level_is_recorded_as_none() {
        let backend = TrackingBackend::new(vec![
            FakeAdapter::hardware("GPU A", 0x1).with_feature_level(None),
        ]);
        let adapters = describe_adapters(&backend, false).unwrap();
        assert_eq!(adapters[0].feature_level, None);
    }
}
