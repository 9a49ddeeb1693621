//! Error types shared by all parts of embly.

use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::mnemonic::{OperandType, format_signature};
use crate::warning::{DiagnosticCode, Severity};

/// All types of errors that embly can report to its caller.
///
/// Diagnostic warnings are not errors; see [`crate::warning::Warning`] for those.
#[derive(Error, Debug, Diagnostic)]
#[allow(clippy::module_name_repetitions, missing_docs)]
pub enum EmblyError {
	//#region Debug info format errors
	#[error("Debug information file is not in a valid format")]
	#[diagnostic(
		code(embly::debug_info::invalid_format),
		severity(Error),
		help("The file is either not a debug information file, or it was truncated or edited by hand.")
	)]
	InvalidFormat {
		#[source_code]
		src:      Arc<str>,
		#[label("Structure stops matching here")]
		location: SourceSpan,
	},

	#[error("Debug information file has format version {found}, but only version {expected} is supported")]
	#[diagnostic(
		code(embly::debug_info::wrong_version),
		severity(Error),
		help("Re-assemble the program to generate a debug information file in the current format.")
	)]
	WrongVersion { expected: String, found: String },

	#[error("Line in the \"{section}\" section is not a valid debug information entry")]
	#[diagnostic(
		code(embly::debug_info::invalid_line),
		severity(Error),
		help("Entries have the form `<16 hex digit address> @ <data>`.")
	)]
	InvalidDebugLine {
		section:  String,
		#[source_code]
		src:      Arc<str>,
		#[label("Invalid entry")]
		location: SourceSpan,
	},

	#[error("`{address}` is not a valid 64-bit hexadecimal address")]
	#[diagnostic(code(embly::debug_info::invalid_address), severity(Error))]
	InvalidAddress {
		address:  String,
		#[source_code]
		src:      Arc<str>,
		#[label("Invalid address")]
		location: SourceSpan,
	},
	//#endregion

	//#region Mnemonic resolution errors
	#[error("No overload of `{mnemonic}` matches `{}`", format_signature(.mnemonic, .operands))]
	#[diagnostic(
		code(embly::unknown_overload),
		severity(Error),
		help("{}", overload_help(mnemonic, known_overloads))
	)]
	UnknownOverload { mnemonic: String, operands: Vec<OperandType>, known_overloads: Vec<String> },
	//#endregion

	//#region Diagnostic engine and configuration errors
	#[error("There is no {severity} with code {code:04}")]
	#[diagnostic(
		code(embly::unknown_diagnostic_code),
		severity(Error),
		help("Every analyzer must belong to a diagnostic with a message.")
	)]
	UnknownDiagnosticCode { severity: Severity, code: DiagnosticCode },

	#[error("`{value}` is not a valid {typename}")]
	#[diagnostic(code(embly::unknown_variant), severity(Error))]
	UnknownVariant { value: String, typename: String },

	#[error("`{spec}` does not specify a diagnostic")]
	#[diagnostic(
		code(embly::invalid_diagnostic_spec),
		severity(Error),
		help("Use `<severity>:<code>`, for example `warning:0007` or `suggestion:1`, or `all`.")
	)]
	InvalidDiagnosticSpec { spec: String },
	//#endregion
}

fn overload_help(mnemonic: &str, known_overloads: &[String]) -> String {
	if known_overloads.is_empty() {
		format!("`{mnemonic}` is not a known mnemonic")
	} else {
		format!("`{mnemonic}` can be used as: {}", known_overloads.join(", "))
	}
}
