//! Debug information file parsing.
//!
//! Parsing happens in two steps. First, the whole document is matched against the fixed file structure, which yields
//! the header fields and the raw text of the three sections. Only if the structure matches and the version is the
//! supported one are the section entries parsed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use log::debug;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, line_ending, multispace0, not_line_ending};
use nom::combinator::{eof, map_res, not, recognize};
use nom::error::Error;
use nom::multi::many0;
use nom::sequence::{delimited, terminated};
use nom::{IResult, Offset, Parser};

use super::{
	ADDRESS_LABELS, ASSEMBLED_INSTRUCTIONS, DATE_FORMAT, DebugInfoFile, DebugInfoHeader, FORMAT_VERSION,
	RESOLVED_IMPORTS, SEPARATOR, TITLE,
};
use crate::EmblyError;

const ADDRESS_DIGITS: usize = 16;

/// The document split into its parts, before any entries are parsed.
#[derive(Debug)]
struct RawDocument<'a> {
	version:            &'a str,
	date:               NaiveDateTime,
	command_line:       &'a str,
	total_program_size: u64,
	instructions:       &'a str,
	labels:             &'a str,
	imports:            &'a str,
}

fn separator(input: &str) -> IResult<&str, &str> {
	tag(SEPARATOR).parse(input)
}

/// `<key><value>` followed by a line break; yields the value.
fn header_line<'a>(key: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
	delimited(tag(key), not_line_ending, line_ending)
}

/// A numbered section heading, its separator, the section body and the closing separator; yields the body.
///
/// Every line of the body is preceded by its line break, so the body of a section without entries is empty. A body line
/// may not start with a separator.
fn section<'a>(number: u8, title: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
	let heading = format!("[{number}]: {title}");
	move |input: &'a str| -> IResult<&'a str, &'a str> {
		let (input, _) = (line_ending, line_ending, tag(heading.as_str()), line_ending, separator).parse(input)?;
		let (input, body) = recognize(many0((line_ending, not(separator), not_line_ending))).parse(input)?;
		let (input, _) = (line_ending, separator).parse(input)?;
		Ok((input, body))
	}
}

fn date(input: &str) -> IResult<&str, NaiveDateTime> {
	map_res(not_line_ending, |date: &str| NaiveDateTime::parse_from_str(date.trim(), DATE_FORMAT)).parse(input)
}

fn document(input: &str) -> IResult<&str, RawDocument<'_>> {
	let (rest, (_, version, date, command_line, total_program_size, _, instructions, labels, imports, _)) = (
		terminated(tag(TITLE), line_ending),
		header_line("Format Version: "),
		delimited(tag("Date: "), date, line_ending),
		header_line("Command Line: "),
		delimited(
			tag("Total Program Size: "),
			map_res(digit1, |size: &str| size.parse::<u64>()),
			(tag(" bytes"), line_ending),
		),
		separator,
		section(1, ASSEMBLED_INSTRUCTIONS),
		section(2, ADDRESS_LABELS),
		section(3, RESOLVED_IMPORTS),
		(multispace0, eof),
	)
		.parse(input)?;
	Ok((rest, RawDocument { version, date, command_line, total_program_size, instructions, labels, imports }))
}

/// Parses the text of a debug information file.
///
/// If two entries of a section have the same address, the later one wins.
///
/// # Errors
/// - [`EmblyError::InvalidFormat`] if the text does not have the structure of a debug information file.
/// - [`EmblyError::WrongVersion`] if it does, but was written in a different format version.
/// - [`EmblyError::InvalidDebugLine`] or [`EmblyError::InvalidAddress`] if an entry is malformed.
pub fn parse_debug_info(text: &str) -> Result<DebugInfoFile, Box<EmblyError>> {
	let (_, raw) = document(text).map_err(|error| {
		let failure_offset = match error {
			nom::Err::Error(error) | nom::Err::Failure(error) => text.offset(error.input),
			nom::Err::Incomplete(_) => text.len(),
		};
		Box::new(EmblyError::InvalidFormat { src: Arc::from(text), location: (failure_offset, 0).into() })
	})?;

	if raw.version != FORMAT_VERSION {
		return Err(EmblyError::WrongVersion { expected: FORMAT_VERSION.to_owned(), found: raw.version.to_owned() }.into());
	}

	let assembled_instructions =
		parse_section(text, ASSEMBLED_INSTRUCTIONS, raw.instructions, |instruction, _| Ok(instruction.to_owned()))?;
	let address_labels = parse_section(text, ADDRESS_LABELS, raw.labels, |names, _| {
		Ok(if names.is_empty() { Vec::new() } else { names.split(',').map(str::to_owned).collect() })
	})?;
	let import_locations = parse_section(text, RESOLVED_IMPORTS, raw.imports, |import, line_span| {
		import
			.split_once(" -> ")
			.and_then(|(source_name, _resolved_path)| {
				source_name.trim().strip_prefix('"').and_then(|name| name.strip_suffix('"'))
			})
			.map(str::to_owned)
			.ok_or_else(|| invalid_line(text, RESOLVED_IMPORTS, line_span))
	})?;

	debug!(
		"parsed debug information: {} instructions, {} labelled addresses, {} imports",
		assembled_instructions.len(),
		address_labels.len(),
		import_locations.len()
	);

	Ok(DebugInfoFile {
		header: DebugInfoHeader {
			date:               raw.date,
			command_line:       raw.command_line.to_owned(),
			total_program_size: raw.total_program_size,
		},
		assembled_instructions,
		address_labels,
		import_locations,
	})
}

/// Offset and length of a line within the whole document.
type LineSpan = (usize, usize);

fn invalid_line(text: &str, section: &str, (offset, length): LineSpan) -> Box<EmblyError> {
	Box::new(EmblyError::InvalidDebugLine {
		section:  section.to_owned(),
		src:      Arc::from(text),
		location: (offset, length).into(),
	})
}

/// Parses every non-blank line of a section body as `<address> @ <payload>`, and the payload with the given function.
fn parse_section<T>(
	text: &str,
	section: &str,
	body: &str,
	mut parse_payload: impl FnMut(&str, LineSpan) -> Result<T, Box<EmblyError>>,
) -> Result<BTreeMap<u64, T>, Box<EmblyError>> {
	let mut entries = BTreeMap::new();
	let mut line_offset = text.offset(body);
	for line in body.split('\n') {
		let line_span = (line_offset, line.len());
		line_offset += line.len() + 1;

		let line = line.strip_suffix('\r').unwrap_or(line);
		if line.trim().is_empty() {
			continue;
		}
		let (address, payload) = line.split_once(" @ ").ok_or_else(|| invalid_line(text, section, line_span))?;
		let invalid_address = || {
			Box::new(EmblyError::InvalidAddress {
				address:  address.to_owned(),
				src:      Arc::from(text),
				location: (line_span.0, address.len()).into(),
			})
		};
		// `from_str_radix` also accepts a sign, which the format does not.
		if address.len() != ADDRESS_DIGITS || !address.bytes().all(|byte| byte.is_ascii_hexdigit()) {
			return Err(invalid_address());
		}
		let address_value = u64::from_str_radix(address, 16).map_err(|_| invalid_address())?;
		entries.insert(address_value, parse_payload(payload, line_span)?);
	}
	Ok(entries)
}
