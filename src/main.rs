use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ta_analyser::export::export_tables;
use ta_analyser::{AnalysisConfig, AnalysisSession, LogObserver, ProcessingRequest};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Signal measurement (.csv, .txt, .xls, .xlsx).
    #[clap(short, long)]
    signal: PathBuf,

    /// Reference / dark measurement subtracted from the signal.
    #[clap(short, long)]
    reference: Option<PathBuf>,

    /// Moving average window size (overrides the config file).
    #[clap(short, long)]
    window: Option<usize>,

    /// JSON configuration file.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the exported tables (overrides the config file).
    #[clap(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(window) = args.window {
        config.window_size = window;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = Some(dir);
    }

    let mut request = ProcessingRequest::new(args.signal, config.window_size);
    request.reference_path = args.reference;

    let mut session = AnalysisSession::new();
    let result = session
        .run(&request, &mut LogObserver)
        .with_context(|| format!("processing {}", request.signal_path.display()))?;

    println!("{}", result.summary());

    if let Some(dir) = &config.output_dir {
        let written = export_tables(
            result,
            dir,
            config.delimiter_byte(),
            config.export_extension(),
        )
        .context("exporting tables")?;
        for path in written {
            info!("Wrote {}", path.display());
        }
    }
    Ok(())
}
