//! lgK Predictor - Command Line Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use lgk_predictor::{init_logging, InputTable, LgkPredictor, PredictorConfig};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Predict lgK for every SMILES row of a CSV file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CatBoost JSON model (overrides model_path from the config)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Input CSV with a SMILES column
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!("=== lgK predictor v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PredictorConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(model) = cli.model {
        config.model_path = Some(model);
    }
    if config.model_path.is_none() {
        bail!("no model given; pass --model or set model_path in the configuration");
    }

    let predictor = LgkPredictor::from_config(&config).context("failed to load model")?;
    let input = InputTable::from_csv_path(&cli.input, &config.csv_options())
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let batch = predictor.predict_batch(&input).context("prediction failed")?;

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(["smiles", "lgK", "valid"])?;
    for (row, (smiles, value)) in input.smiles().iter().zip(&batch.values).enumerate() {
        writer.write_record([
            smiles.as_str(),
            value.to_string().as_str(),
            if batch.is_valid(row) { "true" } else { "false" },
        ])?;
    }
    writer.flush()?;

    info!("Wrote {} predictions", batch.values.len());
    Ok(())
}
