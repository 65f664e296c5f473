//! Stubgen CLI - Scaffold NUnit placeholder test files from C# source trees.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use serde::Serialize;
use stubgen::errors::{exit_code, StubgenError};
use stubgen::extract::extract;
use stubgen::model::CodeModel;
use stubgen::pipeline::{generate, PipelineConfig};
use stubgen::walker::{source_files, WalkOptions};

#[derive(Parser)]
#[command(name = "stubgen")]
#[command(about = "Scaffold NUnit placeholder test files from C# source trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate test stubs for every class found under a path
    Generate {
        /// Root directory (or single file) containing C# sources
        input: PathBuf,

        /// Directory to write generated stubs into (created if absent)
        #[arg(short, long)]
        output: PathBuf,

        /// Concurrently active workers per pipeline stage (0 = default 10)
        #[arg(short = 'j', long, default_value_t = 0)]
        parallelism: usize,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the discovered code model without writing anything
    Scan {
        /// Root directory (or single file) to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Structured logging with env-based filter, defaulting to info so the
    // per-artifact and per-warning lines are visible out of the box
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        // Logs go to stderr; stdout is reserved for command output
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let json_output = json_flag(&cli.command);

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            parallelism,
            include_hidden,
            follow_symlinks,
            json,
        } => run_generate(
            input,
            output,
            parallelism,
            include_hidden,
            follow_symlinks,
            json,
        ),
        Commands::Scan {
            path,
            json,
            include_hidden,
        } => run_scan(path, json, include_hidden),
        Commands::Completions { shell } => {
            generate_completions(shell, &mut Cli::command(), "stubgen", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn json_flag(cmd: &Commands) -> bool {
    match cmd {
        Commands::Generate { json, .. } => *json,
        Commands::Scan { json, .. } => *json,
        Commands::Completions { .. } => false,
    }
}

// --- Generate command ---

fn run_generate(
    input: PathBuf,
    output: PathBuf,
    parallelism: usize,
    include_hidden: bool,
    follow_symlinks: bool,
    json: bool,
) -> Result<(), StubgenError> {
    if !input.exists() {
        return Err(StubgenError::PathNotFound(input));
    }

    let walk_opts = WalkOptions {
        include_hidden,
        follow_symlinks,
        ..Default::default()
    };
    let paths = source_files(&input, &walk_opts)?;

    fs::create_dir_all(&output)?;

    let config = PipelineConfig::new(&output, parallelism);
    let summary = generate(paths, &config);

    if json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| StubgenError::Io(std::io::Error::other(e.to_string())))?;
        println!("{json}");
    } else {
        println!(
            "{} files scanned, {} stubs written to {}",
            summary.files,
            summary.stubs_written,
            output.display()
        );
        if summary.read_failures + summary.parse_failures + summary.write_failures > 0 {
            println!(
                "skipped: {} unreadable, {} unparseable, {} write failures",
                summary.read_failures, summary.parse_failures, summary.write_failures
            );
        }
    }

    Ok(())
}

// --- Scan command ---

#[derive(Serialize)]
struct ScannedFile {
    path: String,
    #[serde(flatten)]
    model: CodeModel,
}

fn run_scan(path: PathBuf, json: bool, include_hidden: bool) -> Result<(), StubgenError> {
    if !path.exists() {
        return Err(StubgenError::PathNotFound(path));
    }

    let walk_opts = WalkOptions {
        include_hidden,
        ..Default::default()
    };
    let paths = source_files(&path, &walk_opts)?;

    if paths.is_empty() {
        return Err(StubgenError::NoFilesFound(path));
    }

    let mut scanned = Vec::new();
    for file in paths {
        let Ok(text) = fs::read_to_string(&file) else {
            continue;
        };
        let model = extract(&file, &text);
        scanned.push(ScannedFile {
            path: file.display().to_string(),
            model,
        });
    }

    if json {
        #[derive(Serialize)]
        struct Output {
            files: Vec<ScannedFile>,
        }
        let output = Output { files: scanned };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| StubgenError::Io(std::io::Error::other(e.to_string())))?;
        println!("{json}");
    } else {
        for file in &scanned {
            println!("{}", file.path);
            for ns in &file.model.namespaces {
                println!("  namespace {}", ns.name);
                for class in &ns.classes {
                    println!("    class {}", class.name);
                    for method in &class.method_names {
                        println!("      {}", method);
                    }
                }
            }
        }
    }

    Ok(())
}
