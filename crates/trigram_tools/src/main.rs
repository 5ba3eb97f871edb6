//! Trigram Combat - Development Tools

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trigram_core::catalog::Catalog;
use trigram_tools::export::{export_catalog, Format};
use trigram_tools::report::{matrix_table, parse_stance, transitions_table};
use trigram_tools::validate::{validate_path, ValidatedFile};

#[derive(Parser)]
#[command(name = "trigram-tools")]
#[command(about = "Development tools for the trigram combat core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files (the built-in catalog when no path is given)
    Validate {
        /// Catalog file, config file, or directory of RON files
        path: Option<PathBuf>,
    },
    /// Print the stance effectiveness matrix
    Matrix,
    /// Rank every transition out of a stance
    Transitions {
        /// Stance name, Korean name, or ring index
        stance: String,
    },
    /// Print the built-in catalog
    Export {
        /// Output encoding
        #[arg(long, value_enum, default_value_t = Format::Ron)]
        format: Format,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path: None } => {
            let errors = Catalog::builtin().to_data().validate();
            if errors.is_empty() {
                tracing::info!("Built-in catalog is valid");
                ExitCode::SUCCESS
            } else {
                for error in errors {
                    tracing::error!("{error}");
                }
                ExitCode::FAILURE
            }
        }
        Commands::Validate { path: Some(path) } => {
            tracing::info!("Validating data files in: {}", path.display());
            let results = match validate_path(&path) {
                Ok(results) => results,
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let mut failed = 0usize;
            for result in results {
                match result {
                    Ok(ValidatedFile::Catalog {
                        path,
                        techniques,
                        vital_points,
                    }) => tracing::info!(
                        "{}: catalog ok ({techniques} techniques, {vital_points} vital points)",
                        path.display()
                    ),
                    Ok(ValidatedFile::Config { path }) => {
                        tracing::info!("{}: config ok", path.display());
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::error!("{e}");
                    }
                }
            }
            if failed == 0 {
                tracing::info!("Validation passed");
                ExitCode::SUCCESS
            } else {
                tracing::error!("Validation failed for {failed} file(s)");
                ExitCode::FAILURE
            }
        }
        Commands::Matrix => {
            print!("{}", matrix_table(&Catalog::builtin()));
            ExitCode::SUCCESS
        }
        Commands::Transitions { stance } => match parse_stance(&stance) {
            Ok(from) => {
                print!("{}", transitions_table(from));
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::FAILURE
            }
        },
        Commands::Export { format } => match export_catalog(&Catalog::builtin(), format) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
