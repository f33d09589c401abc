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

//! Defines the `LinearRgba` color type used for clear values.

use serde::{Deserialize, Serialize};

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// `#[repr(C)]` keeps the layout identical to the `float[4]` expected by
/// native clear calls.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque red (`[1.0, 0.0, 0.0, 1.0]`).
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Dark neutral grey, the default surface background.
    pub const CHARCOAL: Self = Self::rgb(0.1, 0.1, 0.1);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the components as an array, in `[r, g, b, a]` order.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::CHARCOAL
    }
}

impl From<[f32; 4]> for LinearRgba {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_is_opaque() {
        let c = LinearRgba::rgb(0.25, 0.5, 0.75);
        assert_relative_eq!(c.a, 1.0);
        assert_eq!(c.to_array(), [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_array_conversion_keeps_component_order() {
        let c: LinearRgba = [0.1, 0.2, 0.3, 0.4].into();
        assert_relative_eq!(c.r, 0.1);
        assert_relative_eq!(c.g, 0.2);
        assert_relative_eq!(c.b, 0.3);
        assert_relative_eq!(c.a, 0.4);
    }

    #[test]
    fn test_layout_matches_native_float4() {
        let c = LinearRgba::RED;
        let raw: &[f32; 4] = bytemuck::cast_ref(&c);
        assert_eq!(raw, &[1.0, 0.0, 0.0, 1.0]);
    }
}
