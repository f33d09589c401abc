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

//! Rendering surface lifecycle: adapter selection, device and chain creation,
//! view building, and the controller tying them together.

pub mod api;
pub mod controller;
pub mod enumerator;
pub mod error;
pub mod factory;
pub mod selector;
pub mod state;
pub mod traits;
pub mod views;

#[cfg(test)]
pub(crate) mod tracking;


pub use self::api::{PresentationParameters, SurfaceOptions};
pub use self::controller::{FrameOutcome, ResizeOutcome, SurfaceController};
pub use self::enumerator::{describe_adapters, AdapterEnumerator, Adapters, EnumeratedAdapter};
pub use self::error::{NativeError, NativeResult, SurfaceError, ViewStep};
pub use self::factory::{DeviceBundle, DeviceChainFactory};
pub use self::selector::AdapterSelector;
pub use self::state::{SurfaceOperation, SurfaceState};
pub use self::traits::{CreatedDevice, GraphicsBackend, SurfaceLifecycle};
pub use self::views::{ViewBuilder, ViewPair};
