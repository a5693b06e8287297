//! handmenu - replay recorded hand landmarks through the gesture menu.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use handmenu::actuator::TracingActuator;
use handmenu::app::App;
use handmenu::config::HandMenuConfig;
use handmenu::tracking::{JsonLinesProvider, LandmarkProvider};

#[derive(Parser, Debug)]
#[command(name = "handmenu", about = "Hand-gesture menu driven by recorded landmarks")]
struct Cli {
    /// JSON-lines landmark recording to replay (`-` for stdin)
    #[arg(long, default_value = "-")]
    replay: String,

    /// S-expression config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pass raw gesture actions through without debouncing
    #[arg(long)]
    no_debounce: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("handmenu {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handmenu=info".into()),
        )
        .init();

    info!("handmenu v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => HandMenuConfig::load(path)?,
        None => HandMenuConfig::default(),
    };
    if cli.no_debounce {
        config.debounce.enabled = false;
    }
    info!("config: {}", config.to_sexp());

    let mut provider: Box<dyn LandmarkProvider> = if cli.replay == "-" {
        info!("replaying from stdin");
        Box::new(JsonLinesProvider::new(io::stdin().lock()))
    } else {
        info!("replaying {}", cli.replay);
        let file = File::open(&cli.replay)
            .with_context(|| format!("failed to open recording {}", cli.replay))?;
        Box::new(JsonLinesProvider::new(BufReader::new(file)))
    };

    let mut actuator = TracingActuator::default();
    let mut app = App::new(config);
    let stdout = io::stdout();
    let summary = app.run(provider.as_mut(), &mut actuator, &mut stdout.lock())?;

    info!(
        frames = summary.frames,
        events = summary.events,
        moves = actuator.moves,
        clicks = actuator.clicks,
        "done: {}",
        summary.stop.as_str()
    );
    info!("status: {}", app.status_sexp());
    Ok(())
}
