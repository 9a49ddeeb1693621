//! Debug information file tests.

use chrono::NaiveDate;

use super::*;
use crate::EmblyError;

fn header() -> DebugInfoHeader {
	DebugInfoHeader {
		date:               NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(12, 34, 56).unwrap(),
		command_line:       "assembly program.asm --debug".to_owned(),
		total_program_size: 31,
	}
}

fn sample_file() -> String {
	generate_debug_info_with_header(
		&header(),
		&[(0x0, "MVQ rg0, 5"), (0xA, "CAL :func"), (0x13, "HLT"), (0x14, "ADD rg0, rg1")],
		&[(0x0, vec!["start", "main"]), (0x14, vec!["func"])],
		&[("lib.asm", "/home/user/project/lib.asm", 0x14_u64)],
	)
}

const EXPECTED_SAMPLE: &str = "AssEmbly Debug Information File
Format Version: 0.2
Date: 2024-01-31 12:34:56
Command Line: assembly program.asm --debug
Total Program Size: 31 bytes
===============================================================================

[1]: Assembled Instructions
===============================================================================
0000000000000000 @ MVQ rg0, 5
000000000000000A @ CAL :func
0000000000000013 @ HLT
0000000000000014 @ ADD rg0, rg1
===============================================================================

[2]: Address Labels
===============================================================================
0000000000000000 @ start,main
0000000000000014 @ func
===============================================================================

[3]: Resolved Imports
===============================================================================
0000000000000014 @ \"lib.asm\" -> \"/home/user/project/lib.asm\"
===============================================================================
";

#[test]
fn generated_layout() {
	assert_eq!(sample_file(), EXPECTED_SAMPLE);
}

#[test]
fn round_trip() {
	let parsed = parse_debug_info(&sample_file()).unwrap();
	assert_eq!(parsed.header, header());
	assert_eq!(
		parsed.assembled_instructions,
		BTreeMap::from([
			(0x0, "MVQ rg0, 5".to_owned()),
			(0xA, "CAL :func".to_owned()),
			(0x13, "HLT".to_owned()),
			(0x14, "ADD rg0, rg1".to_owned()),
		])
	);
	assert_eq!(
		parsed.address_labels,
		BTreeMap::from([(0x0, vec!["start".to_owned(), "main".to_owned()]), (0x14, vec!["func".to_owned()])])
	);
	// Only the name as written in the source survives, not the resolved path.
	assert_eq!(parsed.import_locations, BTreeMap::from([(0x14, "lib.asm".to_owned())]));
}

#[test]
fn lookups() {
	let parsed = parse_debug_info(EXPECTED_SAMPLE).unwrap();
	assert_eq!(parsed.instruction_at(0xA), Some("CAL :func"));
	assert_eq!(parsed.instruction_at(0xB), None);
	assert_eq!(parsed.labels_at(0x0), ["start".to_owned(), "main".to_owned()]);
	assert!(parsed.labels_at(0x13).is_empty());
	assert_eq!(parsed.import_at(0x14), Some("lib.asm"));
	assert_eq!(parsed.import_at(0x0), None);
}

#[test]
fn large_addresses() {
	let text = generate_debug_info_with_header(
		&header(),
		&[(u64::MAX, "HLT")],
		&[(0xDEAD_BEEF_0000_0001, vec!["far"])],
		&[] as &[(&str, &str, u64)],
	);
	assert!(text.contains("\nFFFFFFFFFFFFFFFF @ HLT\n"));
	assert!(text.contains("\nDEADBEEF00000001 @ far\n"));
	let parsed = parse_debug_info(&text).unwrap();
	assert_eq!(parsed.instruction_at(u64::MAX), Some("HLT"));
	assert_eq!(parsed.labels_at(0xDEAD_BEEF_0000_0001), ["far".to_owned()]);
}

#[test]
fn empty_sections() {
	let text = generate_debug_info_with_header(
		&header(),
		&[] as &[(u64, &str)],
		&[] as &[(u64, Vec<&str>)],
		&[] as &[(&str, &str, u64)],
	);
	let parsed = parse_debug_info(&text).unwrap();
	assert!(parsed.assembled_instructions.is_empty());
	assert!(parsed.address_labels.is_empty());
	assert!(parsed.import_locations.is_empty());
	assert_eq!(parsed.header.total_program_size, 31);
}

#[test]
fn generated_header_is_current() {
	let text = generate_debug_info(5, &[(0, "HLT")], &[] as &[(u64, Vec<&str>)], &[] as &[(&str, &str, u64)]);
	let parsed = parse_debug_info(&text).unwrap();
	assert_eq!(parsed.header.total_program_size, 5);
	assert_eq!(parsed.instruction_at(0), Some("HLT"));
}

#[test]
fn other_versions_are_rejected() {
	for version in ["0.1", "0.3", "1.0", "", "0.2.1", "0.2 ", " 0.2", "0.2\t", " "] {
		let text = EXPECTED_SAMPLE.replace("Format Version: 0.2", &format!("Format Version: {version}"));
		let error = parse_debug_info(&text).unwrap_err();
		assert!(
			matches!(&*error, EmblyError::WrongVersion { expected, found } if expected == "0.2" && found == version),
			"version {version:?} gave {error:?}"
		);
	}
}

#[test]
fn truncated_files_are_invalid() {
	let without_final_separator = EXPECTED_SAMPLE.trim_end().strip_suffix(SEPARATOR).unwrap().to_owned();
	let without_heading = EXPECTED_SAMPLE.replace("[2]: Address Labels\n", "");
	let without_header_line = EXPECTED_SAMPLE.replace("Command Line: assembly program.asm --debug\n", "");
	let cut_in_half = EXPECTED_SAMPLE[.. EXPECTED_SAMPLE.len() / 2].to_owned();
	for text in [without_final_separator, without_heading, without_header_line, cut_in_half, String::new()] {
		let error = parse_debug_info(&text).unwrap_err();
		assert!(matches!(&*error, EmblyError::InvalidFormat { .. }), "{text:?} gave {error:?}");
	}
}

#[test]
fn trailing_garbage_is_invalid() {
	let text = format!("{EXPECTED_SAMPLE}\nsomething else\n");
	assert!(matches!(*parse_debug_info(&text).unwrap_err(), EmblyError::InvalidFormat { .. }));
}

#[test]
fn later_entries_win() {
	let text = EXPECTED_SAMPLE.replace(
		"0000000000000013 @ HLT\n",
		"0000000000000013 @ HLT\n000000000000000A @ NOP\n",
	);
	let parsed = parse_debug_info(&text).unwrap();
	assert_eq!(parsed.instruction_at(0xA), Some("NOP"));
	assert_eq!(parsed.assembled_instructions.len(), 4);
}

#[test]
fn blank_lines_are_skipped() {
	let text = EXPECTED_SAMPLE
		.replace("000000000000000A @ CAL :func\n", "000000000000000A @ CAL :func\n\n   \n")
		.replace("0000000000000014 @ func\n", "0000000000000014 @ func\n\n");
	let parsed = parse_debug_info(&text).unwrap();
	assert_eq!(parsed, parse_debug_info(EXPECTED_SAMPLE).unwrap());
}

#[test]
fn windows_line_endings() {
	let text = EXPECTED_SAMPLE.replace('\n', "\r\n");
	let parsed = parse_debug_info(&text).unwrap();
	assert_eq!(parsed, parse_debug_info(EXPECTED_SAMPLE).unwrap());
}

#[test]
fn malformed_entries() {
	let missing_delimiter = EXPECTED_SAMPLE.replace("0000000000000013 @ HLT", "0000000000000013 HLT");
	assert!(matches!(
		&*parse_debug_info(&missing_delimiter).unwrap_err(),
		EmblyError::InvalidDebugLine { section, .. } if section == "Assembled Instructions"
	));

	let bad_address = EXPECTED_SAMPLE.replace("0000000000000014 @ func", "00000000000000G4 @ func");
	assert!(matches!(
		&*parse_debug_info(&bad_address).unwrap_err(),
		EmblyError::InvalidAddress { address, .. } if address == "00000000000000G4"
	));

	for address in ["+13", "+000000000000013", " 000000000000013", "13", "0x0000000000000013"] {
		let text = EXPECTED_SAMPLE.replace("0000000000000013 @ HLT", &format!("{address} @ HLT"));
		let error = parse_debug_info(&text).unwrap_err();
		assert!(
			matches!(&*error, EmblyError::InvalidAddress { address: found, .. } if found == address),
			"address {address:?} gave {error:?}"
		);
	}

	let too_large = EXPECTED_SAMPLE.replace("0000000000000014 @ func", "10000000000000014 @ func");
	assert!(matches!(&*parse_debug_info(&too_large).unwrap_err(), EmblyError::InvalidAddress { .. }));

	let unquoted_import = EXPECTED_SAMPLE.replace("@ \"lib.asm\" ->", "@ lib.asm ->");
	assert!(matches!(
		&*parse_debug_info(&unquoted_import).unwrap_err(),
		EmblyError::InvalidDebugLine { section, .. } if section == "Resolved Imports"
	));

	let missing_arrow = EXPECTED_SAMPLE.replace("\"lib.asm\" -> ", "\"lib.asm\" ");
	assert!(matches!(&*parse_debug_info(&missing_arrow).unwrap_err(), EmblyError::InvalidDebugLine { .. }));
}

#[test]
fn error_points_at_entry() {
	let text = EXPECTED_SAMPLE.replace("0000000000000013 @ HLT", "0000000000000013 HLT");
	let error = parse_debug_info(&text).unwrap_err();
	let EmblyError::InvalidDebugLine { location, .. } = *error else {
		panic!("expected an invalid line error, got {error:?}");
	};
	let offset = text.find("0000000000000013 HLT").unwrap();
	assert_eq!(location.offset(), offset);
	assert_eq!(location.len(), "0000000000000013 HLT".len());
}
