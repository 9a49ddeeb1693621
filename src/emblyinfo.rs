//! Inspects AssEmbly debug information files and the diagnostic catalog.

use std::path::PathBuf;

use clap::Parser;
use embly::cli::WarningOptions;
use embly::debug_info::{DebugInfoFile, parse_debug_info};
use embly::warning::{AssemblerWarnings, Severity, known_codes, message_template};
use log::{LevelFilter, debug, info};
use miette::IntoDiagnostic;
use time::macros::format_description;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct CliArguments {
	/// Debug information file to read.
	#[arg(required_unless_present = "list_diagnostics")]
	debug_file:       Option<PathBuf>,
	/// Addresses to look up, in hexadecimal. If none are given, the whole file is printed.
	#[arg(value_parser = parse_address)]
	addresses:        Vec<u64>,
	/// List all known diagnostics and whether they are enabled, instead of reading a debug information file.
	#[arg(long, short = 'l')]
	list_diagnostics: bool,
	#[command(flatten)]
	warnings:         WarningOptions,
	/// Verbosity level to use.
	#[arg(long, short, action = clap::ArgAction::Count)]
	verbose:          u8,
}

fn parse_address(address: &str) -> Result<u64, String> {
	let digits = address.trim_start_matches("0x").trim_start_matches("0X");
	u64::from_str_radix(digits, 16).map_err(|error| format!("`{address}` is not a hexadecimal address: {error}"))
}

fn main() -> miette::Result<()> {
	human_panic::setup_panic!(human_panic::metadata!());
	miette::set_hook(Box::new(|_| {
		Box::new(miette::MietteHandlerOpts::new().unicode(true).context_lines(2).tab_width(4).build())
	}))?;

	let arguments = CliArguments::parse();
	let log_level = match arguments.verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		3 .. => LevelFilter::Trace,
	};
	simple_logger::SimpleLogger::new()
		.with_level(log_level)
		.with_local_timestamps()
		.with_timestamp_format(format_description!(version = 2, "[hour]:[minute]:[second]"))
		.init()
		.into_diagnostic()?;

	if arguments.list_diagnostics {
		list_diagnostics(&arguments.warnings);
		return Ok(());
	}

	let Some(debug_file) = arguments.debug_file else {
		return Ok(());
	};
	info!("reading {}", debug_file.display());
	let text = std::fs::read_to_string(&debug_file).into_diagnostic()?;
	let debug_info = parse_debug_info(&text).map_err(|error| miette::Report::new(*error))?;

	if arguments.addresses.is_empty() {
		print_all(&debug_info);
	} else {
		for address in arguments.addresses {
			print_address(&debug_info, address);
		}
	}
	Ok(())
}

fn list_diagnostics(options: &WarningOptions) {
	let mut engine = AssemblerWarnings::with_default_analyzers();
	engine.apply_options(options);
	debug!("{engine:?}");
	for severity in Severity::ALL {
		for code in known_codes(severity) {
			let state = if engine.is_enabled(severity, code) { "enabled" } else { "disabled" };
			let message = message_template(severity, code).unwrap_or_default();
			println!("{}::{code:04} ({state}): {message}", severity.code_prefix());
		}
	}
}

fn print_address(debug_info: &DebugInfoFile, address: u64) {
	println!("{address:016X}");
	match debug_info.instruction_at(address) {
		Some(instruction) => println!("\tinstruction: {instruction}"),
		None => println!("\tno instruction starts here"),
	}
	let labels = debug_info.labels_at(address);
	if !labels.is_empty() {
		println!("\tlabels: {}", labels.join(", "));
	}
	if let Some(import) = debug_info.import_at(address) {
		println!("\timports: {import}");
	}
}

fn print_all(debug_info: &DebugInfoFile) {
	let header = &debug_info.header;
	println!("assembled {} with `{}`, {} bytes", header.date, header.command_line, header.total_program_size);

	let mut addresses = debug_info
		.assembled_instructions
		.keys()
		.chain(debug_info.address_labels.keys())
		.chain(debug_info.import_locations.keys())
		.copied()
		.collect::<Vec<_>>();
	addresses.sort_unstable();
	addresses.dedup();
	for address in addresses {
		print_address(debug_info, address);
	}
}
