// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BoxLabel - bounding box labeling tool
//!
//! A cross-platform desktop application for drawing, resizing and labeling
//! bounding boxes over a sequence of images. Each image's boxes are kept in
//! a normalized text file next to it.

mod app;
mod config;
mod controller;
mod i18n;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::BoxLabelApp;
use config::{Settings, SETTINGS_FILE};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let settings = Settings::load_or_default(&settings_path);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("BoxLabel"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "BoxLabel",
        options,
        Box::new(|_cc| Ok(Box::new(BoxLabelApp::new(settings, settings_path)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
