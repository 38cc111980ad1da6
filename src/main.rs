// Hide console window in release builds (Windows GUI app)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod app_data;
mod battle;
mod cli;
mod flow;
mod masterdata;
mod options;
mod router;
mod save;
mod scene;
mod session;
mod settings;
mod ui;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "skybreaker=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();
    if let Some(command) = &cli.command {
        return cli::run(command, cli.json);
    }

    tracing::info!("Starting Skybreaker");

    let window = app_data::window_config();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size(window.initial_size)
        .with_min_inner_size(window.min_size)
        .with_title(&window.title);

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        &window.title,
        native_options,
        Box::new(|cc| Ok(Box::new(app::SkybreakerApp::new(cc)?))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
