mod app;
mod color;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use app::AgreementBoardApp;
use clap::Parser;
use eframe::egui;

use agreement_board::config::AppConfig;
use agreement_board::data::{FilteredView, OverviewSummary};
use agreement_board::source::{self, SheetSource};

/// Dashboard over the agreements spreadsheet.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (default: <config dir>/agreement-board/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read a local CSV export instead of Google Sheets
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Override the sheet range, e.g. "Hoja1!A:Z"
    #[arg(long)]
    range: Option<String>,

    /// Print the overview metrics and exit without opening a window
    #[arg(long)]
    summary: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(range) = cli.range {
        config.sheet.range = range;
    }
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    config.validate(cli.csv.is_none())?;

    let source = source::from_config(&config, cli.csv.as_deref());
    if cli.summary {
        return print_summary(&config, source.as_ref());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    let title = config.ui.title.clone();

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the remote logos.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AgreementBoardApp::new(config, source)))
        }),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}

fn print_summary(config: &AppConfig, source: &dyn SheetSource) -> Result<()> {
    let dataset = source::load_dataset(source, &config.sheet.range)
        .with_context(|| format!("loading {}", source.describe()))?;
    let summary = OverviewSummary::compute(&FilteredView::all(&dataset), &config.columns)?;

    println!("Total entidades:    {}", summary.total);
    println!("Entidades privadas: {}", summary.private);
    println!("Entidades públicas: {}", summary.public);
    println!("Distribución por {}:", config.columns.agreement_type);
    for (value, n) in &summary.by_agreement_type {
        println!("  {value}: {n}");
    }
    Ok(())
}
