use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod app;
mod bridge;
mod config;

use app::FinderApp;
use bridge::{spawn_backend_thread, BackendCommand, UiEvent};
use config::{is_supported_api_url, load_settings};

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the GitHub API; overrides finder.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Whole-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    if !is_supported_api_url(&settings.api_base_url) {
        tracing::error!(
            url = %settings.api_base_url,
            "api url must start with http:// or https://"
        );
        std::process::exit(2);
    }
    tracing::info!(
        url = %settings.api_base_url,
        timeout_secs = settings.request_timeout_secs,
        "finder: starting"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("GitHub Profile Finder")
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([520.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "GitHub Profile Finder",
        options,
        Box::new(|_cc| Ok(Box::new(FinderApp::new(cmd_tx, ui_rx)))),
    )
}
