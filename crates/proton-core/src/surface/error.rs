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

//! Defines the error types of the surface subsystem.

use crate::surface::api::FeatureLevel;
use crate::surface::state::{SurfaceOperation, SurfaceState};
use std::fmt;

/// A failure reported by a single native graphics call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    code: Option<i32>,
    message: String,
}

/// The result of a single native graphics call.
pub type NativeResult<T> = Result<T, NativeError>;

impl NativeError {
    /// An error without a native result code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// An error carrying the native result code (e.g., an `HRESULT`).
    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// The native result code, if the API reported one.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (0x{:08X})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for NativeError {}

impl From<String> for NativeError {
    fn from(message: String) -> Self {
        NativeError::new(message)
    }
}

impl From<&str> for NativeError {
    fn from(message: &str) -> Self {
        NativeError::new(message)
    }
}

/// The view-building step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewStep {
    /// Retrieving the chain's back buffer.
    BackBuffer,
    /// Wrapping the back buffer in a render-target view.
    RenderTargetView,
    /// Allocating the depth/stencil texture.
    DepthTexture,
    /// Wrapping the depth texture in a depth-stencil view.
    DepthStencilView,
}

impl fmt::Display for ViewStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewStep::BackBuffer => "back buffer retrieval",
            ViewStep::RenderTargetView => "render-target view creation",
            ViewStep::DepthTexture => "depth texture allocation",
            ViewStep::DepthStencilView => "depth-stencil view creation",
        };
        f.write_str(name)
    }
}

/// An error produced by a surface lifecycle operation.
///
/// Creation-chain errors are never retried; the caller decides whether to
/// recreate the surface.
#[derive(Debug)]
pub enum SurfaceError {
    /// The graphics subsystem could not produce a factory, or adapter
    /// enumeration failed.
    Enumeration(NativeError),
    /// No hardware adapter was found.
    NoSuitableAdapter {
        /// Number of adapters inspected, software ones included.
        inspected: usize,
    },
    /// The selected adapter does not reach the required capability tier.
    UnsupportedFeatureLevel {
        /// Name of the selected adapter.
        adapter: String,
        /// Highest tier the adapter reported, if it could be queried.
        supported: Option<FeatureLevel>,
        /// The required minimum tier.
        required: FeatureLevel,
    },
    /// Device, context or chain creation failed or returned a null handle.
    DeviceCreation {
        /// Native result code, if the API reported one.
        code: Option<i32>,
        /// What went wrong.
        reason: String,
    },
    /// Building the render-target or depth-stencil view failed.
    ViewCreation {
        /// The failing step.
        step: ViewStep,
        /// The native failure.
        source: NativeError,
    },
    /// Resizing the chain's buffers failed.
    ChainResize(NativeError),
    /// Presenting the frame failed.
    Present(NativeError),
    /// The operation is not valid in the surface's current state.
    InvalidState {
        /// The rejected operation.
        operation: SurfaceOperation,
        /// The state the surface was in.
        state: SurfaceState,
    },
    /// The options cannot describe a valid surface.
    InvalidConfiguration(String),
}

impl SurfaceError {
    /// The native result code carried by the error, if any.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            SurfaceError::Enumeration(e)
            | SurfaceError::ChainResize(e)
            | SurfaceError::Present(e)
            | SurfaceError::ViewCreation { source: e, .. } => e.code(),
            SurfaceError::DeviceCreation { code, .. } => *code,
            _ => None,
        }
    }

    pub(crate) fn view(step: ViewStep) -> impl FnOnce(NativeError) -> SurfaceError {
        move |source| SurfaceError::ViewCreation { step, source }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Enumeration(e) => write!(f, "Adapter enumeration failed: {e}"),
            SurfaceError::NoSuitableAdapter { inspected } => write!(
                f,
                "No hardware adapter found ({inspected} adapter(s) inspected)"
            ),
            SurfaceError::UnsupportedFeatureLevel {
                adapter,
                supported,
                required,
            } => match supported {
                Some(level) => write!(
                    f,
                    "Adapter '{adapter}' supports {level}, {required} is required"
                ),
                None => write!(
                    f,
                    "Adapter '{adapter}' did not report a feature level, {required} is required"
                ),
            },
            SurfaceError::DeviceCreation { code, reason } => match code {
                Some(code) => write!(f, "Device creation failed (0x{code:08X}): {reason}"),
                None => write!(f, "Device creation failed: {reason}"),
            },
            SurfaceError::ViewCreation { step, source } => {
                write!(f, "View creation failed during {step}: {source}")
            }
            SurfaceError::ChainResize(e) => write!(f, "Resizing the swap chain failed: {e}"),
            SurfaceError::Present(e) => write!(f, "Present failed: {e}"),
            SurfaceError::InvalidState { operation, state } => {
                write!(f, "Cannot {operation} a surface in the {state} state")
            }
            SurfaceError::InvalidConfiguration(msg) => {
                write!(f, "Invalid surface configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Enumeration(e)
            | SurfaceError::ChainResize(e)
            | SurfaceError::Present(e)
            | SurfaceError::ViewCreation { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
