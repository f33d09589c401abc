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

//! Generic surface enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel format of the presentation chain's buffers.
///
/// The chain format is fixed for this surface model; the enum exists so that
/// display-mode queries and bindings name the format explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Four 8-bit unsigned normalized components in BGRA order.
    #[default]
    Bgra8Unorm,
}

impl PixelFormat {
    /// Size of one pixel in bytes.
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Bgra8Unorm => 4,
        }
    }
}

/// Format of the depth/stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthFormat {
    /// 16-bit unsigned normalized depth, no stencil.
    Depth16Unorm,
    /// 24-bit unsigned normalized depth with an 8-bit stencil.
    #[default]
    Depth24UnormStencil8,
    /// 32-bit float depth, no stencil.
    Depth32Float,
}

impl DepthFormat {
    /// Returns `true` if the format carries a stencil aspect.
    pub const fn has_stencil(self) -> bool {
        matches!(self, DepthFormat::Depth24UnormStencil8)
    }
}

/// The number of samples per pixel for Multisample Anti-Aliasing (MSAA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SampleCount {
    /// 1 sample per pixel (MSAA disabled).
    X1,
    /// 2 samples per pixel.
    X2,
    /// 4 samples per pixel.
    #[default]
    X4,
    /// 8 samples per pixel.
    X8,
    /// 16 samples per pixel.
    X16,
}

impl SampleCount {
    /// Returns the numeric sample count.
    pub const fn count(self) -> u32 {
        match self {
            SampleCount::X1 => 1,
            SampleCount::X2 => 2,
            SampleCount::X4 => 4,
            SampleCount::X8 => 8,
            SampleCount::X16 => 16,
        }
    }

    /// Maps a numeric sample count back to the enum, if it is a supported value.
    pub const fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(SampleCount::X1),
            2 => Some(SampleCount::X2),
            4 => Some(SampleCount::X4),
            8 => Some(SampleCount::X8),
            16 => Some(SampleCount::X16),
            _ => None,
        }
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        SampleCount::from_count(value)
            .ok_or_else(|| format!("unsupported sample count {value}, expected 1, 2, 4, 8 or 16"))
    }
}

impl From<SampleCount> for u32 {
    fn from(value: SampleCount) -> Self {
        value.count()
    }
}

/// A hardware capability tier, ordered from least to most capable.
///
/// Tiers follow the Direct3D feature-level ladder; bindings for other APIs map
/// their capabilities onto the closest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureLevel {
    /// Tier 9.1.
    #[serde(rename = "9_1")]
    Level9_1,
    /// Tier 9.2.
    #[serde(rename = "9_2")]
    Level9_2,
    /// Tier 9.3.
    #[serde(rename = "9_3")]
    Level9_3,
    /// Tier 10.0.
    #[serde(rename = "10_0")]
    Level10_0,
    /// Tier 10.1.
    #[serde(rename = "10_1")]
    Level10_1,
    /// Tier 11.0, the default minimum for surface creation.
    #[serde(rename = "11_0")]
    Level11_0,
    /// Tier 11.1.
    #[serde(rename = "11_1")]
    Level11_1,
    /// Tier 12.0.
    #[serde(rename = "12_0")]
    Level12_0,
    /// Tier 12.1.
    #[serde(rename = "12_1")]
    Level12_1,
    /// Tier 12.2.
    #[serde(rename = "12_2")]
    Level12_2,
}

impl Default for FeatureLevel {
    fn default() -> Self {
        FeatureLevel::Level11_0
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureLevel::Level9_1 => "9_1",
            FeatureLevel::Level9_2 => "9_2",
            FeatureLevel::Level9_3 => "9_3",
            FeatureLevel::Level10_0 => "10_0",
            FeatureLevel::Level10_1 => "10_1",
            FeatureLevel::Level11_0 => "11_0",
            FeatureLevel::Level11_1 => "11_1",
            FeatureLevel::Level12_0 => "12_0",
            FeatureLevel::Level12_1 => "12_1",
            FeatureLevel::Level12_2 => "12_2",
        };
        write!(f, "Level_{s}")
    }
}

/// The physical type of a graphics adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdapterKind {
    /// A discrete, dedicated GPU.
    Discrete,
    /// A GPU integrated into the CPU.
    Integrated,
    /// A virtualized GPU.
    Virtual,
    /// A software rasterizer running on the CPU.
    Software,
    /// The binding could not tell.
    #[default]
    Unknown,
}

/// How presented buffers are treated by the presentation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapEffect {
    /// Back buffer contents are discarded after present.
    #[default]
    Discard,
    /// Back buffer contents persist across presents.
    Sequential,
}

/// Expected usage pattern of a GPU resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceUsage {
    /// Read and written by the GPU only.
    #[default]
    Default,
    /// Written by the CPU every frame, read by the GPU.
    Dynamic,
}

/// CPU access granted to a GPU resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CpuAccess {
    /// The CPU never maps the resource.
    #[default]
    None,
    /// The CPU may map the resource for reading.
    Read,
    /// The CPU may map the resource for writing.
    Write,
}
