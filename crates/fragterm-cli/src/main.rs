use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;

#[derive(Parser)]
#[command(name = "fragterm")]
#[command(about = "fragterm - edit and run code fragments in the terminal")]
#[command(version)]
struct Cli {
    /// File to open as the first fragment
    file: Option<PathBuf>,

    /// Read settings from this file instead of the default config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme (dark, tokyo-night, dracula)
    #[arg(long)]
    theme: Option<String>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut settings = match cli.config {
        Some(ref path) if path.exists() || !cli.write_config => {
            fragterm_core::Settings::load_from(path)?
        }
        Some(_) => fragterm_core::Settings::default(),
        None => fragterm_core::Settings::load(),
    };
    if let Some(theme) = cli.theme {
        settings.editor.theme = theme;
    }

    if cli.write_config {
        let path = cli
            .config
            .unwrap_or_else(fragterm_core::Settings::config_path);
        settings.save_to(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    app::run_tui(settings, cli.file).await
}

/// The terminal belongs to the editor, so logs go to a file.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false);

    match open_log_file() {
        Some(file) => builder.with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::data_local_dir()?.join("fragterm");
    fs::create_dir_all(&dir).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dir.join("fragterm.log"))
        .ok()
}
