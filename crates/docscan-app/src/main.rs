// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docscan — headless document scanner driver.
//
// Entry point. Initialises logging, loads the scanner config, runs one scan
// session against the desktop bridge and prints the result as JSON.

mod cli;
mod services;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use docscan_bridge::DesktopBridge;
use docscan_core::ScannerConfig;
use docscan_core::config::CONFIG_FILE;
use docscan_core::error::Result;
use docscan_core::human_errors::humanize_error;
use docscan_editor::ScanSession;
use tracing_subscriber::EnvFilter;

use cli::Args;
use services::data_dir;
use services::runner::{ScanPlan, ScanReport, run_scan};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Docscan starting");

    let args = Args::parse();
    let report = match run(args).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "scan failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            if err.is_crop_failure() {
                eprintln!("Run with --no-crop to inspect the overlay without cropping.");
            }
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "could not serialise report");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ScanReport> {
    let config_dir = args.config_dir.clone().unwrap_or_else(data_dir::data_dir);
    let config = match ScannerConfig::load(&config_dir) {
        Some(config) => config,
        None => {
            let config = ScannerConfig::default();
            if config_dir.join(CONFIG_FILE).exists() {
                tracing::warn!(dir = %config_dir.display(), "config.json unreadable; using defaults");
            } else if let Err(err) = config.persist(&config_dir) {
                tracing::warn!(error = %err, dir = %config_dir.display(), "could not write default config");
            }
            config
        }
    };

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| data_dir::subdir(&config_dir, "scans"));

    let mut bridge = DesktopBridge::new(&args.image, out_dir)?;
    if let Some(corners) = args.corners {
        bridge = bridge.with_corners(corners);
    }
    tracing::info!(work_dir = %bridge.work_dir().display(), "desktop bridge ready");

    let session = ScanSession::new(Arc::new(bridge), config);
    let mut events = session.subscribe();

    let plan = ScanPlan {
        layouts: args.layouts,
        drags: args.drags,
        crop: !args.no_crop,
    };
    let report = run_scan(&session, &plan).await?;

    while let Ok(event) = events.try_recv() {
        tracing::debug!(photo = %event.photo, found = event.document_found, "capture event");
    }
    Ok(report)
}
