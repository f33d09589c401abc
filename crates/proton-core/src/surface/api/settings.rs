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

//! Surface configuration and presentation parameters.

use super::enums::{DepthFormat, FeatureLevel, PixelFormat, SampleCount};
use crate::math::{Extent2D, LinearRgba};
use crate::platform::SurfaceWindowHandle;
use crate::surface::error::SurfaceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable toggling the native debug layer.
pub const ENV_DEBUG_LAYER: &str = "PROTON_DEBUG_LAYER";
/// Environment variable overriding the chain's buffer count.
pub const ENV_BUFFER_COUNT: &str = "PROTON_BUFFER_COUNT";
/// Environment variable overriding the multisample count.
pub const ENV_SAMPLE_COUNT: &str = "PROTON_SAMPLE_COUNT";
/// Environment variable overriding the present sync interval.
pub const ENV_SYNC_INTERVAL: &str = "PROTON_SYNC_INTERVAL";

/// Upper bound accepted for [`SurfaceOptions::buffer_count`].
pub const MAX_BUFFER_COUNT: u32 = 16;

/// Options accepted at surface creation.
///
/// Every field is fixed for the lifetime of the surface it creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceOptions {
    /// Enables the native debug/validation layer at device creation.
    pub debug_layer: bool,
    /// Number of buffers in the presentation chain.
    pub buffer_count: u32,
    /// Multisample count shared by the chain and the depth texture.
    pub sample_count: SampleCount,
    /// Windowed presentation. Exclusive fullscreen is not supported, so
    /// `false` is overridden at creation.
    pub windowed: bool,
    /// The lowest capability tier an adapter must support to be selected.
    pub min_feature_level: FeatureLevel,
    /// Format of the depth/stencil buffer.
    pub depth_format: DepthFormat,
    /// Color the render target is cleared to every frame.
    pub clear_color: LinearRgba,
    /// Vertical blanks to wait for on present, 0 to present immediately.
    pub sync_interval: u32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            debug_layer: true,
            buffer_count: 2,
            sample_count: SampleCount::X4,
            windowed: true,
            min_feature_level: FeatureLevel::Level11_0,
            depth_format: DepthFormat::Depth24UnormStencil8,
            clear_color: LinearRgba::CHARCOAL,
            sync_interval: 1,
        }
    }
}

impl SurfaceOptions {
    /// Default options overlaid with the `PROTON_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Default options overlaid with values from `lookup`.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(value) = parse_var::<bool>(&lookup, ENV_DEBUG_LAYER) {
            options.debug_layer = value;
        }
        if let Some(value) = parse_var::<u32>(&lookup, ENV_BUFFER_COUNT) {
            options.buffer_count = value;
        }
        if let Some(value) = parse_var::<u32>(&lookup, ENV_SAMPLE_COUNT) {
            match SampleCount::try_from(value) {
                Ok(count) => options.sample_count = count,
                Err(e) => log::warn!("Ignoring {ENV_SAMPLE_COUNT}: {e}"),
            }
        }
        if let Some(value) = parse_var::<u32>(&lookup, ENV_SYNC_INTERVAL) {
            options.sync_interval = value;
        }
        options
    }

    /// Checks the options before any native resource is created.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if !(1..=MAX_BUFFER_COUNT).contains(&self.buffer_count) {
            return Err(SurfaceError::InvalidConfiguration(format!(
                "buffer_count must be within 1..={MAX_BUFFER_COUNT}, got {}",
                self.buffer_count
            )));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {key}: cannot parse '{raw}'");
            None
        }
    }
}

/// Parameters of the presentation chain owned by a live surface.
///
/// Only the size changes after construction, on resize.
#[derive(Clone)]
pub struct PresentationParameters {
    format: PixelFormat,
    buffer_count: u32,
    sample_count: SampleCount,
    windowed: bool,
    window: SurfaceWindowHandle,
    extent: Extent2D,
}

impl PresentationParameters {
    /// Builds the parameters for a window of the given size.
    pub fn new(
        window: SurfaceWindowHandle,
        width: u32,
        height: u32,
        options: &SurfaceOptions,
    ) -> Self {
        if !options.windowed {
            log::warn!("Exclusive fullscreen is not supported, presenting windowed");
        }
        Self {
            format: PixelFormat::Bgra8Unorm,
            buffer_count: options.buffer_count,
            sample_count: options.sample_count,
            windowed: true,
            window,
            extent: Extent2D::new(width, height),
        }
    }

    /// Pixel format of the chain's buffers.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of buffers in the chain.
    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    /// Multisample count.
    pub fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    /// Always `true`.
    pub fn windowed(&self) -> bool {
        self.windowed
    }

    /// The native window the chain presents into.
    pub fn window(&self) -> &SurfaceWindowHandle {
        &self.window
    }

    /// Current size as last reported by the window, possibly zero.
    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.extent = Extent2D::new(width, height);
    }
}

impl fmt::Debug for PresentationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationParameters")
            .field("format", &self.format)
            .field("buffer_count", &self.buffer_count)
            .field("sample_count", &self.sample_count)
            .field("windowed", &self.windowed)
            .field("extent", &self.extent)
            .finish_non_exhaustive()
    }
}
