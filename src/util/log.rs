use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to a file; stdout belongs to the terminal UI.
pub fn initialize_logging() -> Result<()> {
    let directory = log_directory();
    fs::create_dir_all(&directory)?;
    let log_file = fs::File::create(directory.join("sonica.log"))?;

    let filter = EnvFilter::try_from_env("SONICA_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn log_directory() -> PathBuf {
    ProjectDirs::from("", "", "sonica")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
