use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use olus::diagnostics::{render_error, CompileError};

#[derive(Parser)]
#[command(name = "olus", version, about = "The Oluś interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an Oluś source file
    Run {
        /// Source file path
        file: PathBuf,
    },
    /// Parse and resolve a source file without running it
    Check {
        /// Source file path
        file: PathBuf,
    },
    /// Reformat a source file into canonical style
    Fmt {
        /// Source file path
        file: PathBuf,
        /// Rewrite the file in place instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
    /// Compile a source file and emit the lowered program as JSON
    EmitIr {
        /// Source file path
        file: PathBuf,
        /// Output path. If omitted, prints to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Watch files and automatically rerun on changes
    Watch {
        #[command(subcommand)]
        command: WatchCommands,
    },
}

#[derive(Subcommand)]
enum WatchCommands {
    /// Watch and automatically re-run an Oluś program
    Run {
        /// The Oluś file to watch and run
        file: PathBuf,

        /// Don't clear terminal between runs
        #[arg(long)]
        no_clear: bool,
    },
}

/// Report an error against its source file and exit.
fn fail(source: &str, file: &Path, err: &CompileError) -> ! {
    render_error(source, &file.to_string_lossy(), err);
    std::process::exit(1);
}

fn read_or_exit(file: &Path) -> String {
    match olus::read_source(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => {
            let source = read_or_exit(&file);
            if let Err(err) = olus::run_to(&source, &mut std::io::stdout().lock()) {
                fail(&source, &file, &err);
            }
        }
        Commands::Check { file } => {
            let source = read_or_exit(&file);
            if let Err(err) = olus::compile(&source) {
                fail(&source, &file, &err);
            }
        }
        Commands::Fmt { file, write } => {
            let source = read_or_exit(&file);
            let formatted = match olus::format_source(&source) {
                Ok(text) => text,
                Err(err) => fail(&source, &file, &err),
            };
            if write {
                if let Err(e) = std::fs::write(&file, &formatted) {
                    eprintln!("error: failed to write {}: {e}", file.display());
                    std::process::exit(1);
                }
            } else {
                print!("{formatted}");
            }
        }
        Commands::EmitIr { file, output } => {
            let source = read_or_exit(&file);
            let program = match olus::compile(&source) {
                Ok(program) => program,
                Err(err) => fail(&source, &file, &err),
            };
            let json = match serde_json::to_string_pretty(&program) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("error: serialization failed: {e}");
                    std::process::exit(1);
                }
            };
            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, &json) {
                        eprintln!("error: failed to write {}: {e}", path.display());
                        std::process::exit(1);
                    }
                }
                None => println!("{json}"),
            }
        }
        Commands::Watch { command } => match command {
            WatchCommands::Run { file, no_clear } => {
                if let Err(err) = olus::watch::watch_run(&file, no_clear) {
                    eprintln!("Watch error: {err}");
                    std::process::exit(1);
                }
            }
        },
    }
}
