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

//! Picks the adapter a surface is created on.

use crate::surface::api::{AdapterDescriptor, FeatureLevel};
use crate::surface::error::SurfaceError;

/// Adapter selection policy: the first hardware adapter in enumeration order,
/// which must reach a minimum capability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSelector {
    min_feature_level: FeatureLevel,
}

impl AdapterSelector {
    /// Creates a selector requiring at least `min_feature_level`.
    pub fn new(min_feature_level: FeatureLevel) -> Self {
        Self { min_feature_level }
    }

    /// The required minimum tier.
    pub fn min_feature_level(&self) -> FeatureLevel {
        self.min_feature_level
    }

    /// Selects from `adapters`.
    ///
    /// Software adapters are skipped and the first remaining one is chosen.
    /// The tier check applies to that adapter only; a hardware adapter below
    /// the minimum is an error, not a reason to try the next one. Unselected
    /// candidates are dropped as they are passed over and the rest of the
    /// sequence is never pulled.
    ///
    /// ## Errors
    /// * `NoSuitableAdapter` - The sequence is empty or holds only software adapters.
    /// * `UnsupportedFeatureLevel` - The chosen adapter is below the minimum tier.
    /// * Any error yielded by the sequence itself.
    pub fn select<T, I>(&self, adapters: I) -> Result<T, SurfaceError>
    where
        T: AsRef<AdapterDescriptor>,
        I: IntoIterator<Item = Result<T, SurfaceError>>,
    {
        let mut inspected = 0;
        for candidate in adapters {
            let candidate = candidate?;
            inspected += 1;
            let descriptor = candidate.as_ref();
            if descriptor.is_software() {
                log::debug!("Skipping software adapter '{}'", descriptor.info.name);
                continue;
            }
            if !descriptor.supports(self.min_feature_level) {
                return Err(SurfaceError::UnsupportedFeatureLevel {
                    adapter: descriptor.info.name.clone(),
                    supported: descriptor.feature_level,
                    required: self.min_feature_level,
                });
            }
            return Ok(candidate);
        }
        Err(SurfaceError::NoSuitableAdapter { inspected })
    }
}

impl Default for AdapterSelector {
    fn default() -> Self {
        Self::new(FeatureLevel::default())
    }
}
