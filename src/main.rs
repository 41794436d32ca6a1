use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ecommerce_dashboard::config::DashboardConfig;
use ecommerce_dashboard::ingestion::{IngestionOptions, LogObserver};
use ecommerce_dashboard::{pipeline, report, DashboardResult};

#[derive(Parser, Debug)]
#[command(name = "ecommerce-dashboard")]
#[command(about = "Render the e-commerce sales dashboard from the order CSV exports")]
struct Cli {
    /// JSON config file. Missing fields take their defaults.
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,
    /// Directory holding the five source tables.
    #[arg(long, env = "DASHBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// HTML output path.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the summary tables as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,
    /// Locale for money labels: id_ID, pt_BR, en_US, en_GB or de_DE.
    #[arg(long)]
    locale: Option<String>,
    /// ISO currency code for money labels, e.g. IDR or BRL.
    #[arg(long)]
    currency: Option<String>,
    /// Number of categories and cities shown in the bar charts.
    #[arg(long)]
    top_n: Option<usize>,
}

impl Cli {
    fn into_config(self) -> DashboardResult<DashboardConfig> {
        let mut cfg = match &self.config {
            Some(path) => DashboardConfig::from_path(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(dir) = self.data_dir {
            cfg.data_dir = dir;
        }
        if let Some(output) = self.output {
            cfg.output = output;
        }
        if let Some(json) = self.json {
            cfg.json_output = Some(json);
        }
        if let Some(locale) = self.locale {
            cfg.locale = locale;
        }
        if let Some(currency) = self.currency {
            cfg.currency = currency;
        }
        if let Some(n) = self.top_n {
            cfg.top_n = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> DashboardResult<()> {
    let cfg = cli.into_config()?;
    log::debug!("config: {cfg:?}");

    let options = IngestionOptions {
        observer: Some(Arc::new(LogObserver)),
        ..IngestionOptions::default()
    };
    let summary = pipeline::run(&cfg.sources(), &options)?;

    let html = report::render(&summary, &cfg.report_options()?)?;
    fs::write(&cfg.output, html)?;
    log::info!("wrote {}", cfg.output.display());

    if let Some(path) = &cfg.json_output {
        fs::write(path, serde_json::to_string_pretty(&summary.to_json())?)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
