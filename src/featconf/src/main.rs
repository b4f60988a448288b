// featconf/src/main.rs

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use featconf::cli::{self, Destination};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "featconf")]
#[command(about = "Inspect and edit FSL FEAT design (fsf) files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Write the edited design here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    force: bool,
}

impl From<OutputArgs> for Destination {
    fn from(args: OutputArgs) -> Self {
        Destination {
            output: args.output,
            force: args.force,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole design
    Print { file: PathBuf },
    /// List the inputs
    Inputs { file: PathBuf },
    /// List the contrast names
    Contrasts { file: PathBuf },
    /// List entries whose key matches a regular expression
    Find { file: PathBuf, pattern: String },
    /// Set one value
    Set {
        file: PathBuf,
        key: String,
        value: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Remove inputs whose path matches a regular expression
    RemoveInputs {
        file: PathBuf,
        pattern: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Remove one input by position (1-based)
    DropInput {
        file: PathBuf,
        position: usize,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let args = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Print { file } => cli::print_document(&file, &mut out),
        Commands::Inputs { file } => cli::list_inputs(&file, &mut out),
        Commands::Contrasts { file } => cli::list_contrasts(&file, &mut out),
        Commands::Find { file, pattern } => cli::find_entries(&file, &pattern, &mut out),
        Commands::Set {
            file,
            key,
            value,
            output,
        } => {
            if let Some(warning) = cli::set_value(&file, &key, &value, &output.into(), &mut out)? {
                eprintln!("WARNING: {}", warning);
            }
            Ok(())
        }
        Commands::RemoveInputs {
            file,
            pattern,
            output,
        } => {
            let report = cli::remove_inputs(&file, &pattern, &output.into(), &mut out)?;
            for path in &report.removed {
                eprintln!("removing: {}", path);
            }
            Ok(())
        }
        Commands::DropInput {
            file,
            position,
            output,
        } => {
            let removed = cli::drop_input(&file, position, &output.into(), &mut out)?;
            eprintln!("removing: {}", removed.value());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
