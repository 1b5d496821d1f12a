mod app;

use anyhow::{anyhow, Context};
use parse_uploader::api::ParseApiClient;
use parse_uploader::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    println!(
        "Using parsing service at {} (timeout {}s)",
        config.base_url, config.timeout_seconds
    );
    let client = ParseApiClient::new(&config).context("Failed to create API client")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([500.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Plataforma de Automação",
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| -> Box<dyn eframe::App> {
            Box::new(app::ParseUploader::new(cc, client))
        }),
    )
    .map_err(|e| anyhow!("Failed to start UI: {}", e))
}
