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

//! Adapter and display output information.

use super::enums::{AdapterKind, FeatureLevel, PixelFormat};
use std::fmt;

/// Device id of the Microsoft Basic Render Driver, the software rasterizer
/// that the system exposes alongside real hardware.
pub const SOFTWARE_ADAPTER_ID: u32 = 0x8C;

/// Identity and memory figures reported by the native adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterInfo {
    /// The name of the adapter (e.g., "NVIDIA GeForce RTX 4090").
    pub name: String,
    /// PCI device id.
    pub device_id: u32,
    /// PCI vendor id.
    pub vendor_id: u32,
    /// The physical type of the adapter.
    pub kind: AdapterKind,
    /// Dedicated video memory in bytes, 0 when the binding does not report it.
    pub dedicated_video_memory: u64,
    /// Dedicated system memory in bytes, 0 when the binding does not report it.
    pub dedicated_system_memory: u64,
    /// Name of the graphics API the adapter was enumerated through.
    pub backend: String,
}

/// One display mode supported by an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
    /// Refresh rate numerator.
    pub refresh_numerator: u32,
    /// Refresh rate denominator.
    pub refresh_denominator: u32,
    /// Pixel format the mode was queried for.
    pub format: PixelFormat,
}

impl DisplayMode {
    /// Returns the refresh rate in whole hertz, or 0 if the denominator is 0.
    pub fn refresh_rate_hz(&self) -> u32 {
        self.refresh_numerator
            .checked_div(self.refresh_denominator)
            .unwrap_or(0)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} @ {}Hz",
            self.width,
            self.height,
            self.refresh_rate_hz()
        )
    }
}

/// A display output attached to an adapter.
///
/// Read-only snapshot owned by the [`AdapterDescriptor`] it was enumerated from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDescriptor {
    /// Device name of the output (e.g., `\\.\DISPLAY1`).
    pub name: String,
    /// Display modes matching the chain's pixel format. Only probed for the
    /// adapter's first output; empty for the others.
    pub modes: Vec<DisplayMode>,
}

/// Immutable snapshot of an adapter taken at enumeration time.
///
/// It is not re-validated: if hardware changes after enumeration the
/// descriptor goes stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// Position of the adapter in enumeration order.
    pub index: u32,
    /// Identity and memory figures.
    pub info: AdapterInfo,
    /// Highest supported capability tier, `None` if it could not be queried.
    pub feature_level: Option<FeatureLevel>,
    /// Display outputs in enumeration order.
    pub outputs: Vec<OutputDescriptor>,
}

impl AdapterDescriptor {
    /// Returns `true` for the software/reference rasterizer.
    pub fn is_software(&self) -> bool {
        self.info.device_id == SOFTWARE_ADAPTER_ID || self.info.kind == AdapterKind::Software
    }

    /// Returns `true` if the adapter supports at least the given tier.
    pub fn supports(&self, required: FeatureLevel) -> bool {
        self.feature_level.is_some_and(|level| level >= required)
    }
}

impl AsRef<AdapterDescriptor> for AdapterDescriptor {
    fn as_ref(&self) -> &AdapterDescriptor {
        self
    }
}

/// Multi-line capability report, used for diagnostics.
impl fmt::Display for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({:#X})", self.info.name, self.info.device_id)?;
        writeln!(f, "  Backend:               {}", self.info.backend)?;
        writeln!(f, "  Kind:                  {:?}", self.info.kind)?;
        writeln!(
            f,
            "  DedicatedSystemMemory: {}",
            self.info.dedicated_system_memory
        )?;
        writeln!(
            f,
            "  DedicatedVideoMemory:  {}",
            self.info.dedicated_video_memory
        )?;
        match self.feature_level {
            Some(level) => writeln!(f, "  FeatureLevel:          {level}")?,
            None => writeln!(f, "  FeatureLevel:          unknown")?,
        }
        write!(f, "  Outputs")?;
        if self.outputs.is_empty() {
            write!(f, "\n    -")?;
        }
        for output in &self.outputs {
            write!(f, "\n    DeviceName: {}", output.name)?;
            for mode in &output.modes {
                write!(f, "\n      {mode}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(device_id: u32, kind: AdapterKind) -> AdapterDescriptor {
        AdapterDescriptor {
            index: 0,
            info: AdapterInfo {
                name: "Test Adapter".to_string(),
                device_id,
                kind,
                ..Default::default()
            },
            feature_level: Some(FeatureLevel::Level11_0),
            outputs: Vec::new(),
        }
    }

    #[test]
    fn test_software_detected_by_id_or_kind() {
        assert!(descriptor(SOFTWARE_ADAPTER_ID, AdapterKind::Unknown).is_software());
        assert!(descriptor(0x1234, AdapterKind::Software).is_software());
        assert!(!descriptor(0x1234, AdapterKind::Discrete).is_software());
    }

    #[test]
    fn test_supports_compares_against_tier() {
        let mut d = descriptor(0x1234, AdapterKind::Discrete);
        assert!(d.supports(FeatureLevel::Level10_0));
        assert!(d.supports(FeatureLevel::Level11_0));
        assert!(!d.supports(FeatureLevel::Level11_1));
        d.feature_level = None;
        assert!(!d.supports(FeatureLevel::Level9_1));
    }

    #[test]
    fn test_refresh_rate_handles_zero_denominator() {
        let mode = DisplayMode {
            width: 1920,
            height: 1080,
            refresh_numerator: 60000,
            refresh_denominator: 1001,
            format: PixelFormat::Bgra8Unorm,
        };
        assert_eq!(mode.refresh_rate_hz(), 59);
        assert_eq!(mode.to_string(), "1920 x 1080 @ 59Hz");

        let unknown = DisplayMode {
            refresh_denominator: 0,
            ..mode
        };
        assert_eq!(unknown.refresh_rate_hz(), 0);
    }

    #[test]
    fn test_report_lists_outputs_or_placeholder() {
        let mut d = descriptor(0x1234, AdapterKind::Discrete);
        let report = d.to_string();
        assert!(report.starts_with("Test Adapter (0x1234)"));
        assert!(report.ends_with("Outputs\n    -"));

        d.outputs.push(OutputDescriptor {
            name: "\\\\.\\DISPLAY1".to_string(),
            modes: Vec::new(),
        });
        let report = d.to_string();
        assert!(report.contains("DeviceName: \\\\.\\DISPLAY1"));
        assert!(!report.ends_with("-"));
    }
}
