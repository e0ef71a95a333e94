use anyhow::{Context, Result};
use clap::Parser;
use geofeed::app::App;
use geofeed::channel::{self, server_events};
use geofeed::config::{Config, ServerMode};
use geofeed::logging;
use geofeed::map::markers::MarkerRetention;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geofeed")]
#[command(about = "Watch geotagged tweets stream into a terminal map", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Socket.IO server URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Generate fake tweets locally instead of connecting to a server
    #[arg(long)]
    demo: bool,

    /// Keep detached markers in memory across viewport changes
    #[arg(long)]
    retain_markers: bool,

    /// Write logs to this file (overrides config)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.server {
            config.server.url = url;
        }
        if self.demo {
            config.server.mode = ServerMode::Demo;
        }
        if self.retain_markers {
            config.markers.retention = MarkerRetention::Retain;
        }
        if let Some(path) = self.log_file {
            config.logging.file = Some(path);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    let log_file = config.log_file();
    logging::init(&log_file, &config.logging.level)?;
    tracing::info!(log_file = %log_file.display(), server = %config.server.url, "geofeed starting");

    let (tx, rx) = server_events();
    let channel = channel::open(&config, tx).await?;
    let mut app = App::new(&config, channel, rx);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}
