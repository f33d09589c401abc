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

//! Flags describing how a resource is bound to the pipeline.

use std::ops::BitOr;

/// Flags describing the pipeline stages a resource can be bound to.
///
/// Multiple bindings can be combined using bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BindFlags {
    bits: u32,
}

impl BindFlags {
    /// Not bound to any stage.
    pub const NONE: Self = Self { bits: 0 };
    /// Readable from shaders.
    pub const SHADER_RESOURCE: Self = Self { bits: 1 << 0 };
    /// Usable as a color render target (including presentation output).
    pub const RENDER_TARGET: Self = Self { bits: 1 << 1 };
    /// Usable as a depth/stencil target.
    pub const DEPTH_STENCIL: Self = Self { bits: 1 << 2 };

    /// Creates a set of flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain every flag in `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if these flags are empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl BitOr for BindFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_contains() {
        let flags = BindFlags::RENDER_TARGET | BindFlags::SHADER_RESOURCE;
        assert!(flags.contains(BindFlags::RENDER_TARGET));
        assert!(flags.contains(BindFlags::SHADER_RESOURCE));
        assert!(!flags.contains(BindFlags::DEPTH_STENCIL));
        assert!(BindFlags::NONE.is_empty());
        assert!(!flags.is_empty());
    }
}
