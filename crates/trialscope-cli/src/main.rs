//! TrialScope CLI - schema catalog for SQL-generating agents

#[cfg(feature = "serve")]
use trialscope_cli::server;
use trialscope_cli::{catalog, cli, logging, output};

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use trialscope_core::{ResourceRequest, Resolver};

use catalog::Catalog;
use cli::{Args, OutputFormat};

/// A requested resource could not be resolved.
const EXIT_FAILURE: u8 = 1;
/// Configuration or catalog load error.
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(&args.log_level, args.quiet) {
        eprintln!("trialscope: error: {e:#}");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    let catalog = match catalog::load_catalog(&args) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("trialscope: error: {e:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    #[cfg(feature = "serve")]
    if args.serve {
        return run_serve_mode(args, catalog);
    }

    match run(&args, &catalog) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("trialscope: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Run the CLI in serve mode.
#[cfg(feature = "serve")]
fn run_serve_mode(args: Args, catalog: Catalog) -> ExitCode {
    use server::ServerConfig;

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("trialscope: error: failed to create tokio runtime: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match runtime.block_on(server::run_server(config, catalog)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("trialscope: server error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Resolves the requested resources and writes them out.
///
/// Returns whether any lookup failed. Failed lookups are reported on stderr
/// and do not stop the remaining ones.
fn run(args: &Args, catalog: &Catalog) -> Result<bool> {
    let resolver = Resolver::new(&catalog.model);

    if args.list || (args.uris.is_empty() && args.tables.is_empty()) {
        let descriptors = resolver.list();
        let out = match args.format {
            OutputFormat::Json => output::format_descriptors_json(&descriptors, args.compact),
            OutputFormat::Text => output::format_resource_table(
                &descriptors,
                &catalog.source,
                &catalog.model.stats(),
                !args.quiet,
            ),
        };
        write_output(&args.output, &out)?;
        return Ok(false);
    }

    let mut requests = Vec::new();
    let mut has_errors = false;
    for uri in &args.uris {
        match ResourceRequest::parse(uri) {
            Ok(request) => requests.push(request),
            Err(e) => {
                eprintln!("trialscope: error: {e}");
                has_errors = true;
            }
        }
    }
    if !args.tables.is_empty() {
        requests.push(ResourceRequest::Subset(args.tables.clone()));
    }

    let mut resolved = Vec::with_capacity(requests.len());
    for request in &requests {
        match resolver.resolve_request(request) {
            Ok(resource) => resolved.push(resource),
            Err(e) => {
                eprintln!("trialscope: error: {}: {e}", request.uri());
                has_errors = true;
            }
        }
    }

    let out = match args.format {
        OutputFormat::Json => output::format_resources_json(&resolved, args.compact),
        OutputFormat::Text => resolved
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    if !resolved.is_empty() || args.format == OutputFormat::Json {
        write_output(&args.output, &out)?;
    }

    Ok(has_errors)
}

fn write_output(path: &Option<std::path::PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
