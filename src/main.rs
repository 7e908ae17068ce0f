use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cfgboot::caller::{CallStack, Frame};
use cfgboot::init::{InitRequest, InitScope};
use cfgboot::options::{OPTIONS_FILE_NAME, generate_options_template, parse_options_file};
use cfgboot::registry::{GlobalRegistry, RegistryState};

#[derive(Parser)]
#[command(name = "cfgboot")]
#[command(
	author,
	version,
	about = "Bootstrap a configuration search path and inspect the result"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Initialize and print the resulting job name and search path
	Show(ShowArgs),
	/// Check an options file for errors without initializing
	Validate {
		/// Options file to check
		file: PathBuf,
	},
	/// Create a template cfgboot.toml in the current directory
	Init {
		/// Overwrite an existing cfgboot.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Args)]
struct ShowArgs {
	/// Config path relative to the working directory, or absolute
	#[arg(long, value_name = "PATH", conflicts_with_all = ["config_dir", "config_module", "options"])]
	config_path: Option<String>,

	/// Filesystem config directory
	#[arg(long, value_name = "DIR", conflicts_with_all = ["config_module", "options"])]
	config_dir: Option<String>,

	/// Importable config package, e.g. my_app.conf
	#[arg(long, value_name = "MODULE", conflicts_with = "options")]
	config_module: Option<String>,

	/// Read initialization options from a file
	#[arg(long, value_name = "FILE")]
	options: Option<PathBuf>,

	/// Job name (derived from the caller when omitted)
	#[arg(long)]
	job_name: Option<String>,
}

fn main() -> ExitCode {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with(fmt::layer().with_writer(std::io::stderr))
		.init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Show(args) => handle_show(args),
		Commands::Validate { file } => handle_validate(&file),
		Commands::Init { force } => handle_init(force),
	}
}

fn handle_show(args: ShowArgs) -> Result<ExitCode> {
	let (request, stack) = match args.options {
		Some(ref path) => {
			let loaded = parse_options_file(path)
				.with_context(|| format!("Failed to load options from {}", path.display()))?;
			(loaded.options.to_request(), loaded.caller_stack())
		}
		None => {
			let request = if let Some(module) = args.config_module {
				InitRequest::config_module(module)
			} else if let Some(dir) = args.config_dir {
				InitRequest::config_dir(dir)
			} else {
				InitRequest::config_path(args.config_path.as_deref()).detect_job_name()
			};
			// Without an options file the command line behaves like an interactive session
			(request, CallStack::from_callers([Frame::interactive()]))
		}
	};

	let request = match args.job_name {
		Some(job_name) => request.with_job_name(job_name),
		None => request,
	};

	let registry = GlobalRegistry::global();
	let _scope = InitScope::enter(registry, &stack, &request).context("Failed to initialize")?;
	let state = registry
		.current()
		.context("Registry is empty after initialization")?;

	print_state(&state);
	Ok(ExitCode::SUCCESS)
}

fn print_state(state: &RegistryState) {
	println!("Job name: {}", state.job_name);
	println!("Caller: {}", state.caller);
	if let Some(strict) = state.strict {
		println!("Strict: {}", strict);
	}
	println!();
	println!("Search path (in priority order):");
	for (i, entry) in state.search_path.entries().iter().enumerate() {
		println!("  {}. {}", i + 1, entry);
	}
}

fn handle_validate(file: &Path) -> Result<ExitCode> {
	match parse_options_file(file) {
		Ok(loaded) => {
			let source = if let Some(ref module) = loaded.options.config_module {
				format!("config-module {}", module)
			} else if let Some(ref dir) = loaded.options.config_dir {
				format!("config-dir {}", dir)
			} else if let Some(ref path) = loaded.options.config_path {
				format!("config-path {}", path)
			} else {
				"built-in configuration only".to_string()
			};
			println!("Options file is valid: {} ({})", loaded.path.display(), source);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Options error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let options_path = PathBuf::from(OPTIONS_FILE_NAME);

	if options_path.exists() && !force {
		anyhow::bail!("{OPTIONS_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&options_path, generate_options_template())
		.with_context(|| format!("Failed to write {}", options_path.display()))?;

	println!("Created {OPTIONS_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}
