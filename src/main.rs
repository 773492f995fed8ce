use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use importscope::analysis::{analyze_project, extract_from_script};

#[derive(Parser)]
#[command(name = "importscope")]
#[command(version = "0.1.0")]
#[command(
    about = "Static import analyzer that extracts the source of project-local symbols referenced by Python scripts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a Python script, or every script under a directory
    Analyze {
        /// Path to a script or project directory (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Analyze { path }) => {
            let path = Path::new(path);
            let json = if path.is_file() {
                let sources = extract_from_script(path)
                    .with_context(|| format!("failed to analyze {}", path.display()))?;
                serde_json::to_string_pretty(&sources)?
            } else {
                let project = analyze_project(path)
                    .with_context(|| format!("failed to analyze {}", path.display()))?;
                serde_json::to_string_pretty(&project)?
            };
            println!("{}", json);
        }
        Some(Commands::Version) => {
            println!("importscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("ImportScope - Static Import-Source Extractor for Python");
            println!("Run 'importscope analyze --path script.py' to analyze a script");
            println!("Run 'importscope --help' for more information");
        }
    }

    Ok(())
}
