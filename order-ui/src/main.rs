use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, info};

use order_ui::config::{AppConfig, Overrides};
use order_ui::console::Console;
use order_ui::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Solar kit order form.
///
/// Edits are saved locally as you type and restored on the next start.
/// Submitted orders are POSTed as JSON to the configured order sink.
#[derive(Debug, Parser)]
struct Cli {
    /// Path to an `order-form.toml` config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order sink endpoint; overrides `[sink] url`.
    #[arg(long)]
    sink_url: Option<String>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Storage connection string.
    /// For SQLite this is a file path (e.g. `order-form.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    /// CSV file with `kit_id,label,unit_price` rows replacing the built-in kits.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `order_core=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            sink_url: self.sink_url.clone(),
            backend: self.backend.clone(),
            db: self.db.clone(),
            catalog: self.catalog.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    logging::init_logging(&config.logging)?;
    debug!(?config, "configuration loaded");

    let catalog = Arc::new(app::load_catalog(&config)?);
    let sink = app::build_sink(&config)?;
    let form = app::open_form(&config, catalog).await?;

    let mut console = Console::new(form, sink, config.reset_delay(), std::io::stdout());
    console.run(BufReader::new(tokio::io::stdin())).await?;

    info!("order form closed");
    Ok(())
}
