use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use tether::core::config;

#[derive(Parser)]
#[command(name = "tether", about = "Backend-driven terminal form client")]
struct Args {
    /// Backend that serves the form
    #[arg(short, long)]
    backend: Option<String>,

    /// Do not save the wire transcript on exit
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to tether.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("tether.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&file_config, args.backend.as_deref(), args.no_save);

    log::info!("Tether starting up with backend: {}", resolved.backend);

    tether::tui::run(resolved)
}
