//! lantern-viewer: displays one glTF model with an orbit camera.
//!
//! Controls:
//! - left drag: rotate (keeps spinning briefly after release)
//! - wheel: zoom
//! - R: reset the camera
//! - Escape: exit

mod viewer;

use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use winit::dpi::LogicalSize;

use lantern_engine::camera::CameraConfig;
use lantern_engine::device::GpuInit;
use lantern_engine::logging::{init_logging, LoggingConfig};
use lantern_engine::scene::{plan_scene, SourceAsset};
use lantern_engine::window::{Runtime, RuntimeConfig};

use viewer::ViewerApp;

#[derive(Parser, Debug)]
#[command(name = "lantern-viewer")]
#[command(about = "Minimal wgpu viewer for glTF models")]
struct Args {
    /// Path to a .gltf or .glb file
    model: PathBuf,

    /// Window title (defaults to the file name)
    #[arg(long)]
    title: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "640")]
    width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "480")]
    height: f64,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Present without waiting for vertical sync
    #[arg(long)]
    no_vsync: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let asset = SourceAsset::import(&args.model)
        .and_then(|asset| plan_scene(&asset).map(|_| asset))
        .with_context(|| format!("cannot construct scene from {}", args.model.display()))?;

    let title = args.title.unwrap_or_else(|| {
        let name = args
            .model
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("lantern - {name}")
    });

    let config = RuntimeConfig {
        title,
        initial_size: LogicalSize::new(args.width, args.height),
        ..Default::default()
    };
    let gpu_init = if args.no_vsync {
        GpuInit::without_vsync()
    } else {
        GpuInit::default()
    };

    let failed = Rc::new(Cell::new(false));
    let app = ViewerApp::new(asset, CameraConfig::default(), failed.clone());

    Runtime::run(config, gpu_init, app)?;

    Ok(if failed.get() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
