//! addonscan - JavaScript scanner CLI
//!
//! Thin wrapper over the library: scans the given files and prints the
//! accumulated diagnostics.

use addonscan::reporters::{self, OutputFormat};
use addonscan::{JavaScriptScanner, ScannerOptions, SourceUnit};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "addonscan", version, about = "Scan extension JavaScript for policy violations")]
struct Cli {
    /// JavaScript files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Comma-separated rule names to disable
    #[arg(long, env = "ADDONSCAN_DISABLED_RULES")]
    disabled_rules: Option<String>,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

impl Cli {
    fn run(self) -> Result<bool> {
        let options = ScannerOptions {
            disabled_rules: self.disabled_rules.clone(),
            ..Default::default()
        };
        let disabled = options.parsed_disabled_rules();

        let mut scanner = JavaScriptScanner::new();
        for path in &self.files {
            let code = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let unit = SourceUnit::new(code, path.display().to_string())
                .with_disabled_rules(disabled.clone());
            scanner.scan(&unit)?;
        }

        let result = scanner.result();
        print!("{}", reporters::render(result, self.format)?);
        Ok(result.error_count() > 0)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(true) => ExitCode::FAILURE,
        Ok(false) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
