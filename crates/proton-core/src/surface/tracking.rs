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

//! A [`GraphicsBackend`] that hands out tracked handles instead of native ones.
//!
//! Every handle reports its release to a shared ledger when dropped, so tests
//! can count live handles, check release order and inject failures at any
//! native call.

use crate::math::LinearRgba;
use crate::platform::SurfaceWindowHandle;
use crate::surface::api::*;
use crate::surface::error::{NativeError, NativeResult};
use crate::surface::traits::{CreatedDevice, GraphicsBackend};
use raw_window_handle as rwh;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroIsize;
use std::rc::Rc;
use std::sync::{Arc, Once};

/// `DXGI_ERROR_INVALID_CALL`, returned when resizing while buffers are referenced.
pub(crate) const INVALID_CALL: i32 = 0x887A0001u32 as i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum HandleKind {
    Factory,
    Adapter,
    Output,
    Device,
    Context,
    SwapChain,
    BackBuffer,
    DepthTexture,
    RenderTargetView,
    DepthStencilView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NativeCall {
    CreateFactory,
    EnumAdapter,
    AdapterInfo,
    SupportedFeatureLevel,
    EnumOutput,
    OutputName,
    DisplayModes,
    CreateDeviceAndSwapChain,
    BackBuffer,
    CreateRenderTargetView,
    CreateTexture2d,
    CreateDepthStencilView,
    ResizeBuffers,
    ClearRenderTarget,
    ClearDepthStencil,
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandleEvent {
    Acquired(HandleKind),
    Released(HandleKind),
}

/// A fake adapter as the tracking backend reports it.
#[derive(Debug, Clone)]
pub(crate) struct FakeAdapter {
    info: AdapterInfo,
    feature_level: Option<FeatureLevel>,
    outputs: Vec<String>,
}

impl FakeAdapter {
    pub(crate) fn hardware(name: &str, device_id: u32) -> Self {
        Self {
            info: AdapterInfo {
                name: name.to_string(),
                device_id,
                vendor_id: 0x10DE,
                kind: AdapterKind::Discrete,
                dedicated_video_memory: 8 << 30,
                dedicated_system_memory: 0,
                backend: "Tracking".to_string(),
            },
            feature_level: Some(FeatureLevel::Level11_1),
            outputs: Vec::new(),
        }
    }

    pub(crate) fn software() -> Self {
        Self {
            info: AdapterInfo {
                name: "Microsoft Basic Render Driver".to_string(),
                device_id: SOFTWARE_ADAPTER_ID,
                vendor_id: 0x1414,
                kind: AdapterKind::Software,
                dedicated_video_memory: 0,
                dedicated_system_memory: 0,
                backend: "Tracking".to_string(),
            },
            feature_level: Some(FeatureLevel::Level12_1),
            outputs: Vec::new(),
        }
    }

    pub(crate) fn with_outputs(mut self, names: &[&str]) -> Self {
        self.outputs = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub(crate) fn with_feature_level(mut self, level: Option<FeatureLevel>) -> Self {
        self.feature_level = level;
        self
    }
}

#[derive(Default)]
struct Ledger {
    next_id: u64,
    live: BTreeMap<u64, HandleKind>,
    events: Vec<HandleEvent>,
    calls: Vec<NativeCall>,
    failures: HashMap<NativeCall, NativeError>,
    omit_on_create: Option<HandleKind>,
    adapters: Vec<FakeAdapter>,
    device_flags: Option<DeviceFlags>,
    texture_desc: Option<Texture2dDescriptor>,
}

/// A handle whose drop is recorded in the ledger.
pub(crate) struct Tracked {
    id: u64,
    kind: HandleKind,
    ledger: Rc<RefCell<Ledger>>,
}

impl Tracked {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.live.remove(&self.id);
        ledger.events.push(HandleEvent::Released(self.kind));
    }
}

pub(crate) struct TrackedAdapter {
    _handle: Tracked,
    index: usize,
}

pub(crate) struct TrackedOutput {
    _handle: Tracked,
    adapter: usize,
    index: usize,
}

pub(crate) struct TrackedChain {
    _handle: Tracked,
    width: u32,
    height: u32,
    buffer_count: u32,
    presents: u64,
}

impl TrackedChain {
    pub(crate) fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    pub(crate) fn presents(&self) -> u64 {
        self.presents
    }
}

/// The tracking backend. Clones share one ledger.
#[derive(Clone)]
pub(crate) struct TrackingBackend {
    ledger: Rc<RefCell<Ledger>>,
}

impl TrackingBackend {
    pub(crate) fn new(adapters: Vec<FakeAdapter>) -> Self {
        let ledger = Ledger {
            adapters,
            ..Default::default()
        };
        Self {
            ledger: Rc::new(RefCell::new(ledger)),
        }
    }

    /// Makes the next call of `call` fail with `error`.
    pub(crate) fn fail_next(&self, call: NativeCall, error: NativeError) {
        self.ledger.borrow_mut().failures.insert(call, error);
    }

    /// Makes device creation succeed without producing the `kind` handle.
    pub(crate) fn omit_on_create(&self, kind: HandleKind) {
        self.ledger.borrow_mut().omit_on_create = Some(kind);
    }

    pub(crate) fn live(&self, kind: HandleKind) -> usize {
        self.ledger.borrow().live.values().filter(|k| **k == kind).count()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.ledger.borrow().live.len()
    }

    pub(crate) fn acquired(&self, kind: HandleKind) -> usize {
        self.ledger
            .borrow()
            .events
            .iter()
            .filter(|e| **e == HandleEvent::Acquired(kind))
            .count()
    }

    pub(crate) fn released(&self, kind: HandleKind) -> usize {
        self.ledger
            .borrow()
            .events
            .iter()
            .filter(|e| **e == HandleEvent::Released(kind))
            .count()
    }

    /// Kinds of the handles released since the last [`Self::clear_events`], in order.
    pub(crate) fn release_order(&self) -> Vec<HandleKind> {
        self.ledger
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                HandleEvent::Released(kind) => Some(*kind),
                HandleEvent::Acquired(_) => None,
            })
            .collect()
    }

    pub(crate) fn clear_events(&self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.events.clear();
        ledger.calls.clear();
    }

    pub(crate) fn count_calls(&self, call: NativeCall) -> usize {
        self.ledger.borrow().calls.iter().filter(|c| **c == call).count()
    }

    pub(crate) fn last_device_flags(&self) -> Option<DeviceFlags> {
        self.ledger.borrow().device_flags
    }

    pub(crate) fn last_texture_desc(&self) -> Option<Texture2dDescriptor> {
        self.ledger.borrow().texture_desc
    }

    fn enter(&self, call: NativeCall) -> NativeResult<()> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.calls.push(call);
        match ledger.failures.remove(&call) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn acquire(&self, kind: HandleKind) -> Tracked {
        let mut ledger = self.ledger.borrow_mut();
        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.live.insert(id, kind);
        ledger.events.push(HandleEvent::Acquired(kind));
        Tracked {
            id,
            kind,
            ledger: Rc::clone(&self.ledger),
        }
    }

    fn adapter(&self, index: usize) -> NativeResult<FakeAdapter> {
        self.ledger
            .borrow()
            .adapters
            .get(index)
            .cloned()
            .ok_or_else(|| NativeError::new("adapter removed"))
    }
}

impl GraphicsBackend for TrackingBackend {
    type Factory = Tracked;
    type Adapter = TrackedAdapter;
    type Output = TrackedOutput;
    type Device = Tracked;
    type Context = Tracked;
    type SwapChain = TrackedChain;
    type Texture = Tracked;
    type RenderTargetView = Tracked;
    type DepthStencilView = Tracked;

    fn name(&self) -> &str {
        "Tracking"
    }

    fn create_factory(&self, _debug: bool) -> NativeResult<Tracked> {
        self.enter(NativeCall::CreateFactory)?;
        Ok(self.acquire(HandleKind::Factory))
    }

    fn enum_adapter(&self, _factory: &Tracked, index: u32) -> NativeResult<Option<TrackedAdapter>> {
        self.enter(NativeCall::EnumAdapter)?;
        let index = index as usize;
        if index >= self.ledger.borrow().adapters.len() {
            return Ok(None);
        }
        Ok(Some(TrackedAdapter {
            _handle: self.acquire(HandleKind::Adapter),
            index,
        }))
    }

    fn adapter_info(&self, adapter: &TrackedAdapter) -> NativeResult<AdapterInfo> {
        self.enter(NativeCall::AdapterInfo)?;
        Ok(self.adapter(adapter.index)?.info)
    }

    fn supported_feature_level(&self, adapter: &TrackedAdapter) -> NativeResult<FeatureLevel> {
        self.enter(NativeCall::SupportedFeatureLevel)?;
        self.adapter(adapter.index)?
            .feature_level
            .ok_or_else(|| NativeError::with_code(0x80004002u32 as i32, "E_NOINTERFACE"))
    }

    fn enum_output(
        &self,
        adapter: &TrackedAdapter,
        index: u32,
    ) -> NativeResult<Option<TrackedOutput>> {
        self.enter(NativeCall::EnumOutput)?;
        let index = index as usize;
        if index >= self.adapter(adapter.index)?.outputs.len() {
            return Ok(None);
        }
        Ok(Some(TrackedOutput {
            _handle: self.acquire(HandleKind::Output),
            adapter: adapter.index,
            index,
        }))
    }

    fn output_name(&self, output: &TrackedOutput) -> NativeResult<String> {
        self.enter(NativeCall::OutputName)?;
        self.adapter(output.adapter)?
            .outputs
            .get(output.index)
            .cloned()
            .ok_or_else(|| NativeError::new("output removed"))
    }

    fn display_modes(
        &self,
        _output: &TrackedOutput,
        format: PixelFormat,
    ) -> NativeResult<Vec<DisplayMode>> {
        self.enter(NativeCall::DisplayModes)?;
        Ok([(1280, 720), (1920, 1080)]
            .into_iter()
            .map(|(width, height)| DisplayMode {
                width,
                height,
                refresh_numerator: 60,
                refresh_denominator: 1,
                format,
            })
            .collect())
    }

    fn create_device_and_swap_chain(
        &self,
        _factory: &Tracked,
        _adapter: &TrackedAdapter,
        desc: &SwapChainDescriptor,
        flags: DeviceFlags,
    ) -> NativeResult<CreatedDevice<Self>> {
        self.enter(NativeCall::CreateDeviceAndSwapChain)?;
        self.ledger.borrow_mut().device_flags = Some(flags);

        let mut created = CreatedDevice {
            device: Some(self.acquire(HandleKind::Device)),
            context: Some(self.acquire(HandleKind::Context)),
            swap_chain: Some(TrackedChain {
                _handle: self.acquire(HandleKind::SwapChain),
                width: desc.mode.width,
                height: desc.mode.height,
                buffer_count: desc.buffer_count,
                presents: 0,
            }),
        };
        let omit = self.ledger.borrow().omit_on_create;
        match omit {
            Some(HandleKind::Device) => created.device = None,
            Some(HandleKind::Context) => created.context = None,
            Some(HandleKind::SwapChain) => created.swap_chain = None,
            _ => {}
        }
        Ok(created)
    }

    fn back_buffer(&self, _chain: &TrackedChain, _index: u32) -> NativeResult<Tracked> {
        self.enter(NativeCall::BackBuffer)?;
        Ok(self.acquire(HandleKind::BackBuffer))
    }

    fn create_render_target_view(
        &self,
        _device: &Tracked,
        _texture: &Tracked,
    ) -> NativeResult<Tracked> {
        self.enter(NativeCall::CreateRenderTargetView)?;
        Ok(self.acquire(HandleKind::RenderTargetView))
    }

    fn create_texture_2d(
        &self,
        _device: &Tracked,
        desc: &Texture2dDescriptor,
    ) -> NativeResult<Tracked> {
        self.enter(NativeCall::CreateTexture2d)?;
        self.ledger.borrow_mut().texture_desc = Some(*desc);
        Ok(self.acquire(HandleKind::DepthTexture))
    }

    fn create_depth_stencil_view(
        &self,
        _device: &Tracked,
        _texture: &Tracked,
        _format: DepthFormat,
    ) -> NativeResult<Tracked> {
        self.enter(NativeCall::CreateDepthStencilView)?;
        Ok(self.acquire(HandleKind::DepthStencilView))
    }

    fn resize_buffers(
        &self,
        chain: &mut TrackedChain,
        buffer_count: u32,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> NativeResult<()> {
        self.enter(NativeCall::ResizeBuffers)?;
        if self.live(HandleKind::BackBuffer) > 0 || self.live(HandleKind::RenderTargetView) > 0 {
            return Err(NativeError::with_code(
                INVALID_CALL,
                "back buffer still referenced",
            ));
        }
        chain.buffer_count = buffer_count;
        chain.width = width;
        chain.height = height;
        Ok(())
    }

    fn clear_render_target(
        &self,
        _context: &Tracked,
        _view: &Tracked,
        _color: LinearRgba,
    ) -> NativeResult<()> {
        self.enter(NativeCall::ClearRenderTarget)
    }

    fn clear_depth_stencil(
        &self,
        _context: &Tracked,
        _view: &Tracked,
        _depth: f32,
        _stencil: u8,
    ) -> NativeResult<()> {
        self.enter(NativeCall::ClearDepthStencil)
    }

    fn present(&self, chain: &mut TrackedChain, _sync_interval: u32) -> NativeResult<()> {
        self.enter(NativeCall::Present)?;
        chain.presents += 1;
        Ok(())
    }
}

/// A window with a fixed Win32 handle that is never dereferenced.
pub(crate) struct FakeWindow {
    hwnd: NonZeroIsize,
}

impl FakeWindow {
    pub(crate) fn handle() -> SurfaceWindowHandle {
        Arc::new(FakeWindow {
            hwnd: NonZeroIsize::new(0x1000).unwrap(),
        })
    }
}

impl rwh::HasWindowHandle for FakeWindow {
    fn window_handle(&self) -> Result<rwh::WindowHandle<'_>, rwh::HandleError> {
        let raw = rwh::RawWindowHandle::Win32(rwh::Win32WindowHandle::new(self.hwnd));
        // SAFETY: the handle is only ever compared, never passed to the OS.
        Ok(unsafe { rwh::WindowHandle::borrow_raw(raw) })
    }
}

impl rwh::HasDisplayHandle for FakeWindow {
    fn display_handle(&self) -> Result<rwh::DisplayHandle<'_>, rwh::HandleError> {
        Ok(rwh::DisplayHandle::windows())
    }
}

thread_local! {
    static WARNINGS: Cell<usize> = const { Cell::new(0) };
}

/// Counts `warn` records per thread, so parallel tests do not see each other.
struct WarnCounter;

impl log::Log for WarnCounter {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if record.level() == log::Level::Warn {
            WARNINGS.with(|count| count.set(count.get() + 1));
        }
    }

    fn flush(&self) {}
}

static WARN_COUNTER: WarnCounter = WarnCounter;

/// Runs `f` and returns its result with the number of warnings it logged.
pub(crate) fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        if log::set_logger(&WARN_COUNTER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    let before = WARNINGS.with(Cell::get);
    let result = f();
    let after = WARNINGS.with(Cell::get);
    (result, after - before)
}
