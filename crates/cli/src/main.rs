//! plait command-line tool.
//!
//! Loads descriptor files and prints what the composition engine derives from
//! them: the build recipe of every declared endpoint, or the attributes a
//! declaration carries for one marker.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use plait_loader::Manifest;
use plait_model::MarkerId;
use tracing::info;

mod cli;
mod report;

use cli::{Cli, Command};

fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let result = match cli.command {
		Command::Inspect { files } => inspect(&files),
		Command::Resolve { file, declaration, marker } => resolve(&file, &declaration, &marker),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("error: {err}");
			let mut source = err.source();
			while let Some(cause) = source {
				eprintln!("  caused by: {cause}");
				source = cause.source();
			}
			ExitCode::FAILURE
		}
	}
}

type CliResult = Result<(), Box<dyn Error>>;

fn inspect(files: &[PathBuf]) -> CliResult {
	let manifest = Manifest::load_all(files)?;
	info!(
		files = files.len(),
		markers = manifest.markers().len(),
		declarations = manifest.declarations().len(),
		"descriptors loaded",
	);

	let registrations = plait_compose::register_all(manifest.resolver());
	print!("{}", report::recipes(&registrations));
	if !registrations.is_clean() {
		return Err(format!("{} declaration(s) failed to register", registrations.failures.len()).into());
	}
	Ok(())
}

fn resolve(file: &Path, declaration: &str, marker: &str) -> CliResult {
	let manifest = Manifest::load(file)?;
	let decl = manifest
		.declarations()
		.get(declaration)
		.ok_or_else(|| format!("no declaration named `{declaration}` in {}", file.display()))?;

	let resolved = manifest.resolver().resolve_attributes(decl, &MarkerId::new(marker))?;
	print!("{}", report::attributes(declaration, marker, resolved.as_ref()));
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("PLAIT_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("plait=debug,plait_compose=debug,plait_loader=debug,plait_model=debug,info")
		} else {
			EnvFilter::new("info")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
