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

// Proton Sandbox
// Opens a window and drives a surface through create, resize, render and destroy.

mod app;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use proton_core::surface::{describe_adapters, GraphicsBackend, SurfaceLifecycle};
use proton_core::{SurfaceController, SurfaceOptions};
use proton_infra::WgpuBackend;
use std::path::{Path, PathBuf};
use winit::event_loop::EventLoop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// wgpu, on the platform's primary native API.
    Wgpu,
    /// Direct3D 11 (Windows, built with the `d3d11` feature).
    D3d11,
}

#[derive(Debug, Parser)]
#[command(name = "sandbox", about = "Drives a proton surface inside a window")]
struct Args {
    /// Graphics binding to use.
    #[arg(long, value_enum, default_value_t = Backend::Wgpu)]
    backend: Backend,

    /// Print the capability report of every adapter and exit.
    #[arg(long)]
    list_adapters: bool,

    /// JSON file with surface options. Environment variables are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Initial window height.
    #[arg(long, default_value_t = 768)]
    height: u32,
}

#[cfg(not(all(windows, feature = "d3d11")))]
const D3D11_UNAVAILABLE: &str =
    "the Direct3D 11 binding is only built on Windows with the `d3d11` feature";

fn load_options(path: Option<&Path>) -> Result<SurfaceOptions> {
    let Some(path) = path else {
        return Ok(SurfaceOptions::from_env());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading surface options from {}", path.display()))?;
    let options: SurfaceOptions =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded surface options from {}", path.display());
    Ok(options)
}

fn print_adapters<B: GraphicsBackend>(backend: &B, debug: bool) -> Result<()> {
    let adapters = describe_adapters(backend, debug)?;
    println!("{} adapter(s) through {}", adapters.len(), backend.name());
    for adapter in &adapters {
        println!("{adapter}");
    }
    Ok(())
}

fn surface_for(backend: Backend, options: SurfaceOptions) -> Result<Box<dyn SurfaceLifecycle>> {
    match backend {
        Backend::Wgpu => Ok(Box::new(SurfaceController::new(WgpuBackend::new(), options))),
        #[cfg(all(windows, feature = "d3d11"))]
        Backend::D3d11 => Ok(Box::new(SurfaceController::new(
            proton_infra::D3D11Backend::new(),
            options,
        ))),
        #[cfg(not(all(windows, feature = "d3d11")))]
        Backend::D3d11 => anyhow::bail!(D3D11_UNAVAILABLE),
    }
}

fn list_adapters(backend: Backend, debug: bool) -> Result<()> {
    match backend {
        Backend::Wgpu => print_adapters(&WgpuBackend::new(), debug),
        #[cfg(all(windows, feature = "d3d11"))]
        Backend::D3d11 => print_adapters(&proton_infra::D3D11Backend::new(), debug),
        #[cfg(not(all(windows, feature = "d3d11")))]
        Backend::D3d11 => anyhow::bail!(D3D11_UNAVAILABLE),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let args = Args::parse();
    let options = load_options(args.config.as_deref())?;
    options.validate()?;

    if args.list_adapters {
        return list_adapters(args.backend, options.debug_layer);
    }

    let surface = surface_for(args.backend, options)?;
    let event_loop = EventLoop::new()?;
    let mut app = app::SandboxApp::new(surface, args.width, args.height);
    event_loop.run_app(&mut app)?;
    app.into_result()
}
