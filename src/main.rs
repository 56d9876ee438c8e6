mod app;
mod config;
mod debug;
mod error;
mod event;
mod service;
mod session;
mod theme;
mod ui;

use app::StackOverFixApp;
use config::Config;
use eframe::egui;
use event::AppEvent;
use service::{AnalysisService, ServiceDispatcher};
use std::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stackoverfix=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let (tx, rx) = mpsc::channel();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "falling back to default config");
            let _ = tx.send(AppEvent::Warning(format!("config: {err}")));
            Config::default()
        }
    };
    info!(base_url = %config.service.base_url, "starting StackOverFix");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("stackoverfix-runtime")
        .build()?;

    let service = AnalysisService::new(config.service.clone())?;
    let dispatcher = ServiceDispatcher::new(service, tx, runtime.handle().clone());
    let service_url = dispatcher.base_url().to_string();
    let app = StackOverFixApp::new(rx, dispatcher, config.form, service_url);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "StackOverFix",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
