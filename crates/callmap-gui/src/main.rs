#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod components;
mod session;
mod settings;
mod theme;

use app::CallmapApp;
use settings::AppSettings;

const DEFAULT_INPUT: &str = "functions.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive folder/function graph viewer", long_about = None)]
struct Args {
    /// Folder -> function mapping to display.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

fn main() -> eframe::Result<()> {
    // Log to stderr; tune with RUST_LOG=callmap=debug.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = AppSettings::load();
    let input = args.input;
    tracing::info!("Opening {}", input.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Callmap",
        options,
        Box::new(move |cc| Ok(Box::new(CallmapApp::new(cc, input, settings)))),
    )
}
