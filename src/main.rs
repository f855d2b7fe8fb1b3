use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use slotalloc::run_pipeline;

/// Allocate slots among catalog items to maximize revenue within a budget
#[derive(Parser)]
#[command(name = "slotalloc")]
struct Cli {
    /// Run configuration (YAML)
    #[arg(long, default_value = "conf.yml")]
    conf: PathBuf,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_tracing();
    let cli = Cli::parse();

    let report = run_pipeline(&cli.conf)?;
    println!("{}", report.message);
    if let Some(table) = &report.table {
        print!("\n{table}");
    }
    Ok(())
}
