//! Configuration for cuadro-server.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP listener.
    pub host: String,
    pub port: u16,
    /// Directory where per-result debug artifacts are written.
    pub scratch_dir: PathBuf,
    /// Upper bound on the whole multipart request body.
    pub max_upload_bytes: usize,
    /// Worker threads per document (0 = one per CPU).
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            scratch_dir: env::temp_dir(),
            max_upload_bytes: 64 * 1024 * 1024,
            worker_threads: 0,
        }
    }
}

impl Config {
    /// Build a configuration from environment variables, falling back
    /// to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            host: env::var("CUADRO_HOST").unwrap_or(defaults.host),
            port: env::var("CUADRO_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            scratch_dir: env::var("CUADRO_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            max_upload_bytes: env::var("CUADRO_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            worker_threads: env::var("CUADRO_WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.worker_threads),
        }
    }
}
