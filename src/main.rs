use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use order_viewer::render::html::render_page;
use order_viewer::ui::App;
use order_viewer::{logging, Config, HttpOrderSource, OrderViewer, Phase};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "order-viewer")]
#[command(about = "Look up an order by id and show its details")]
#[command(version)]
struct Cli {
    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Order service origin, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal view (default)
    Tui,
    /// Look up one order and write the rendered HTML page
    Show {
        order_id: String,
        /// Write the page here instead of stdout
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Write the empty lookup page
    Page {
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn write_page(page: &str, path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, page)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", page);
            Ok(())
        }
    }
}

async fn run_tui(config: Config) -> Result<()> {
    let log_path = logging::setup_file_tracing()?;
    tracing::info!(log = %log_path.display(), base_url = %config.base_url, "logging to file");

    let source = Arc::new(HttpOrderSource::new(
        config.base_url.clone(),
        config.request_timeout(),
    ));
    let app = App::new(source, config.display_options()?);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();
    result
}

async fn run_show(config: Config, order_id: &str, html: Option<&PathBuf>) -> Result<ExitCode> {
    logging::setup_stderr_tracing();

    let source = HttpOrderSource::new(config.base_url.clone(), config.request_timeout());
    let mut viewer = OrderViewer::new(config.display_options()?);
    let phase = viewer.lookup(&source, order_id).await;

    write_page(&render_page(&viewer, order_id.trim()), html)?;

    if phase == Phase::Error {
        if let Some(message) = viewer.error() {
            eprintln!("{}", message);
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            run_tui(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { order_id, html } => run_show(config, &order_id, html.as_ref()).await,
        Command::Page { html } => {
            let viewer = OrderViewer::new(config.display_options()?);
            write_page(&render_page(&viewer, ""), html.as_ref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
