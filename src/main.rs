// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Wall Mockup
//!
//! A desktop application for previewing paintings on a photo of a wall at
//! true relative scale. Paintings can be dragged, framed, saved as projects
//! and exported to portable files.

mod app;
mod config;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::WallMockApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Wall Mockup"),
        ..Default::default()
    };

    eframe::run_native(
        "Wall Mockup",
        options,
        Box::new(move |_cc| Ok(Box::new(WallMockApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
