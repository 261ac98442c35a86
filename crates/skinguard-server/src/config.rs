use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "skinguard-server")]
#[command(about = "HTTP front end for the skin-lesion classifier")]
pub struct Config {
    /// Path to the ONNX model file
    #[arg(short, long, env = "SKINGUARD_MODEL")]
    pub model: PathBuf,

    #[arg(long, env = "SKINGUARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "SKINGUARD_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Where accepted uploads are stored
    #[arg(long, env = "SKINGUARD_UPLOAD_DIR", default_value = "static/images")]
    pub upload_dir: PathBuf,

    /// Upper bound on a single classification, in seconds
    #[arg(long, env = "SKINGUARD_INFERENCE_TIMEOUT_SECS", default_value_t = 30)]
    pub inference_timeout_secs: u64,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "SKINGUARD_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl Config {
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }
}
