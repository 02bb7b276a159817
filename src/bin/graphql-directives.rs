//! GraphQL Directives CLI
//!
//! Command-line interface for rendering annotated SDL from a schema manifest.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use graphql_directives::{load_manifest, AnnotatedSchema, Error, Manifest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphql-directives")]
#[command(about = "Render GraphQL SDL with custom directive applications")]
#[command(version)]
struct Cli {
    /// Log assembly and rendering steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the annotated SDL of a manifest
    Render {
        /// Schema manifest (JSON)
        manifest: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print field and argument names exactly as declared
        #[arg(long)]
        no_camel_case: bool,

        /// Do not register @include, @skip, @deprecated and @specifiedBy
        #[arg(long)]
        no_builtin_directives: bool,
    },

    /// Render the SDL without any custom directive application
    Baseline {
        /// Schema manifest (JSON)
        manifest: PathBuf,
    },

    /// Validate a manifest and list the directives it uses
    Check {
        /// Schema manifest (JSON)
        manifest: PathBuf,

        /// Output result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            manifest,
            output,
            no_camel_case,
            no_builtin_directives,
        } => run_render(&manifest, output, no_camel_case, no_builtin_directives),
        Commands::Baseline { manifest } => run_baseline(&manifest),
        Commands::Check { manifest, json } => run_check(&manifest, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load(path: &Path) -> Result<Manifest, u8> {
    load_manifest(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn build(manifest: &Manifest) -> Result<AnnotatedSchema, Error> {
    let schema = manifest.build()?;
    tracing::debug!(
        directives = schema.directives().len(),
        used = schema.directives_used().len(),
        "manifest built"
    );
    Ok(schema)
}

fn run_render(
    path: &Path,
    output: Option<PathBuf>,
    no_camel_case: bool,
    no_builtin_directives: bool,
) -> Result<(), u8> {
    let mut manifest = load(path)?;
    if no_camel_case {
        manifest.auto_camel_case = false;
    }
    if no_builtin_directives {
        manifest.include_builtin_directives = false;
    }

    let sdl = build(&manifest)
        .and_then(|schema| schema.sdl().map_err(Error::from))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{sdl}\n")).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", sdl);
        }
    }

    Ok(())
}

fn run_baseline(path: &Path) -> Result<(), u8> {
    let manifest = load(path)?;
    let schema = build(&manifest).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", schema.print_baseline());
    Ok(())
}

fn run_check(path: &Path, json_output: bool) -> Result<(), u8> {
    let manifest = match load_manifest(path) {
        Ok(manifest) => manifest,
        Err(e) => {
            report_error(json_output, &e.to_string());
            return Err(e.exit_code() as u8);
        }
    };

    let checked = build(&manifest).and_then(|schema| {
        schema.sdl()?;
        Ok(schema)
    });

    match checked {
        Ok(schema) => {
            let used: Vec<&str> = schema
                .directives_used()
                .into_iter()
                .map(|definition| definition.name())
                .collect();
            if json_output {
                let output = serde_json::json!({
                    "valid": true,
                    "directives": used,
                });
                println!("{}", output);
            } else if used.is_empty() {
                println!("Valid (no directives used)");
            } else {
                let used: Vec<String> = used.iter().map(|name| format!("@{name}")).collect();
                println!("Valid (directives used: {})", used.join(", "));
            }
            Ok(())
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        let output = serde_json::json!({
            "valid": false,
            "error": msg,
        });
        println!("{}", output);
    } else {
        eprintln!("Error: {}", msg);
    }
}
