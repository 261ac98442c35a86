//! SkinGuard CLI - classifies one skin-lesion photograph with an ONNX model.
//!
//! Usage:
//!   skinguard lesion.jpg --model melanoma.onnx
//!   skinguard lesion.jpg --model melanoma.onnx --format json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use skinguard_core::report::{ImageReport, OutputFormat, print_report};
use skinguard_core::{Classifier, ModelOptions};

#[derive(Parser)]
#[command(name = "skinguard")]
#[command(about = "Benign/malignant skin-lesion classifier")]
struct Cli {
    /// Image to classify
    image: PathBuf,

    /// Path to the ONNX model file
    #[arg(short, long, env = "SKINGUARD_MODEL")]
    model: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// ONNX Runtime intra-op threads
    #[arg(long, default_value_t = 4)]
    intra_threads: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    log::info!("loading model from {}", cli.model.display());
    let options = ModelOptions {
        intra_threads: cli.intra_threads,
    };
    let classifier = Classifier::load(&cli.model, &options)
        .with_context(|| format!("cannot start without a model ({})", cli.model.display()))?;

    let classification = classifier
        .classify_path(&cli.image)
        .with_context(|| format!("cannot classify {}", cli.image.display()))?;

    let report = ImageReport {
        path: &cli.image,
        classification,
    };
    print_report(&report, cli.format);

    Ok(())
}
