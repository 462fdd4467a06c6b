use std::path::PathBuf;

use clap::{Parser, Subcommand};


/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "plait")]
#[command(about = "Inspect declarative endpoint descriptors")]
#[command(version)]
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the build recipe of every endpoint declared in the descriptors
	Inspect {
		/// Descriptor files, loaded in order
		#[arg(required = true, value_name = "FILE")]
		files: Vec<PathBuf>,
	},
	/// Print the attributes a declaration carries for one marker
	Resolve {
		/// Descriptor file
		#[arg(value_name = "FILE")]
		file: PathBuf,
		/// Declaration name
		declaration: String,
		/// Marker id, such as `server` or `services`
		marker: String,
	},
}
