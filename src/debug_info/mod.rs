//! Debug information files.
//!
//! A debug information file is written next to an assembled program and lets a debugger show the original source
//! line of each instruction, the labels pointing at an address, and where other files were imported. It is a plain
//! text file with a header and three sections:
//!
//! ```text
//! AssEmbly Debug Information File
//! Format Version: 0.2
//! Date: 2024-01-31 12:00:00
//! Command Line: assembly program.asm
//! Total Program Size: 10 bytes
//! ===============================================================================
//!
//! [1]: Assembled Instructions
//! ===============================================================================
//! 0000000000000000 @ MVQ rg0, 5
//! ===============================================================================
//!
//! [2]: Address Labels
//! ===============================================================================
//! 0000000000000000 @ start,main
//! ===============================================================================
//!
//! [3]: Resolved Imports
//! ===============================================================================
//! 000000000000000A @ "lib.asm" -> "/home/user/lib.asm"
//! ===============================================================================
//! ```
//!
//! Nothing is escaped: source lines, label names and paths must not contain ` @ ` or ` -> `.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use log::debug;

mod parser;
#[cfg(test)] mod test;

pub use parser::parse_debug_info;

/// Format version this codec reads and writes.
pub const FORMAT_VERSION: &str = "0.2";

pub(crate) const TITLE: &str = "AssEmbly Debug Information File";
pub(crate) const SEPARATOR: &str =
	"===============================================================================";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) const ASSEMBLED_INSTRUCTIONS: &str = "Assembled Instructions";
pub(crate) const ADDRESS_LABELS: &str = "Address Labels";
pub(crate) const RESOLVED_IMPORTS: &str = "Resolved Imports";

/// Information about the assembler run that produced a debug information file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugInfoHeader {
	/// When the file was generated, in local time.
	pub date:               NaiveDateTime,
	/// The command line the assembler was invoked with.
	pub command_line:       String,
	/// Size of the assembled program in bytes.
	pub total_program_size: u64,
}

impl DebugInfoHeader {
	/// Header for a program assembled right now by this process.
	#[must_use]
	pub fn now(total_program_size: u64) -> Self {
		Self {
			date: Local::now().naive_local(),
			command_line: std::env::args().collect::<Vec<_>>().join(" "),
			total_program_size,
		}
	}
}

/// Contents of a parsed debug information file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugInfoFile {
	/// Header data.
	pub header:                 DebugInfoHeader,
	/// Source line of the instruction starting at each address.
	pub assembled_instructions: BTreeMap<u64, String>,
	/// All labels pointing at each address, in the order they were written.
	pub address_labels:         BTreeMap<u64, Vec<String>>,
	/// Name of the file imported at each address, as written in the source. The resolved path stored in the file is
	/// not kept.
	pub import_locations:       BTreeMap<u64, String>,
}

impl DebugInfoFile {
	/// Source line of the instruction starting at this address.
	#[must_use]
	pub fn instruction_at(&self, address: u64) -> Option<&str> {
		self.assembled_instructions.get(&address).map(String::as_str)
	}

	/// Labels pointing at this address; empty if there are none.
	#[must_use]
	pub fn labels_at(&self, address: u64) -> &[String] {
		self.address_labels.get(&address).map_or(&[], Vec::as_slice)
	}

	/// Name of the file imported at this address.
	#[must_use]
	pub fn import_at(&self, address: u64) -> Option<&str> {
		self.import_locations.get(&address).map(String::as_str)
	}
}

fn section_heading(text: &mut String, number: u8, title: &str) {
	text.push_str(&format!("\n[{number}]: {title}\n{SEPARATOR}"));
}

fn section_end(text: &mut String) {
	text.push('\n');
	text.push_str(SEPARATOR);
	text.push('\n');
}

/// Generates a debug information file for a program that was just assembled by this process.
///
/// `instructions` holds the address and source line of every instruction, `labels` the address and names of every
/// labelled address, and `imports` the name as written in the source, the resolved path and the address of every
/// imported file. Entries are written in the order given.
#[must_use]
pub fn generate_debug_info<I, L, N, P>(
	total_program_size: u64,
	instructions: &[(u64, I)],
	labels: &[(u64, Vec<L>)],
	imports: &[(N, P, u64)],
) -> String
where
	I: AsRef<str>,
	L: AsRef<str>,
	N: AsRef<str>,
	P: AsRef<str>,
{
	generate_debug_info_with_header(&DebugInfoHeader::now(total_program_size), instructions, labels, imports)
}

/// Generates a debug information file with the given header. See [`generate_debug_info`].
#[must_use]
pub fn generate_debug_info_with_header<I, L, N, P>(
	header: &DebugInfoHeader,
	instructions: &[(u64, I)],
	labels: &[(u64, Vec<L>)],
	imports: &[(N, P, u64)],
) -> String
where
	I: AsRef<str>,
	L: AsRef<str>,
	N: AsRef<str>,
	P: AsRef<str>,
{
	let mut text = format!(
		"{TITLE}\nFormat Version: {FORMAT_VERSION}\nDate: {}\nCommand Line: {}\nTotal Program Size: {} bytes\n{SEPARATOR}\n",
		header.date.format(DATE_FORMAT),
		header.command_line,
		header.total_program_size
	);

	section_heading(&mut text, 1, ASSEMBLED_INSTRUCTIONS);
	for (address, instruction) in instructions {
		text.push_str(&format!("\n{address:016X} @ {}", instruction.as_ref()));
	}
	section_end(&mut text);

	section_heading(&mut text, 2, ADDRESS_LABELS);
	for (address, names) in labels {
		let names = names.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",");
		text.push_str(&format!("\n{address:016X} @ {names}"));
	}
	section_end(&mut text);

	section_heading(&mut text, 3, RESOLVED_IMPORTS);
	for (source_name, resolved_path, address) in imports {
		text.push_str(&format!("\n{address:016X} @ \"{}\" -> \"{}\"", source_name.as_ref(), resolved_path.as_ref()));
	}
	section_end(&mut text);

	debug!(
		"generated debug information: {} instructions, {} labelled addresses, {} imports",
		instructions.len(),
		labels.len(),
		imports.len()
	);
	text
}
