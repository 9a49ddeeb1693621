//! Assembler diagnostics: non-fatal errors, warnings and suggestions raised while assembling.
//!
//! The [`AssemblerWarnings`] engine runs in two phases. Every assembled instruction is fed to
//! [`AssemblerWarnings::next_instruction`], which runs the "rolling" analyzers against it. Once the program is
//! complete, [`AssemblerWarnings::finalize`] runs the "final" analyzers against the whole program.

use std::fmt::{Display, Formatter};

use embly_derive::Parse;

mod engine;
mod messages;

pub use engine::{AssemblerWarnings, FinalAnalyzer, RollingAnalyzer};
pub use messages::{known_codes, message_template};

/// Diagnostic codes are numbered separately for each severity.
pub type DiagnosticCode = u16;

/// Severity tiers of diagnostics, most severe first. Each tier has its own codes, analyzers and enabled set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Parse)]
pub enum Severity {
	/// The program assembles, but almost certainly does not do what was intended.
	NonFatalError,
	/// The program assembles, but something about it is suspicious.
	Warning,
	/// Stylistic or size improvements.
	Suggestion,
}

impl Severity {
	/// All severities in the order their diagnostics are reported.
	pub const ALL: [Self; 3] = [Self::NonFatalError, Self::Warning, Self::Suggestion];

	pub(crate) const fn index(self) -> usize {
		self as usize
	}

	/// Part of the diagnostic code names used by miette, e.g. `embly::warning::0007`.
	#[must_use]
	pub const fn code_prefix(self) -> &'static str {
		match self {
			Self::NonFatalError => "embly::non_fatal_error",
			Self::Warning => "embly::warning",
			Self::Suggestion => "embly::suggestion",
		}
	}
}

impl Display for Severity {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::NonFatalError => "non-fatal error",
			Self::Warning => "warning",
			Self::Suggestion => "suggestion",
		})
	}
}

impl From<Severity> for miette::Severity {
	fn from(severity: Severity) -> Self {
		match severity {
			Severity::NonFatalError => Self::Error,
			Severity::Warning => Self::Warning,
			Severity::Suggestion => Self::Advice,
		}
	}
}

/// Where in the source code something happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourceLocation {
	/// Source line, as counted by the caller.
	pub line:   usize,
	/// Source column, as counted by the caller.
	pub column: usize,
}

impl SourceLocation {
	/// Creates a new location.
	#[must_use]
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl Display for SourceLocation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// One instruction, as the assembler produced it, together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AssembledInstruction {
	/// Encoded bytes of the instruction.
	pub bytes:    Vec<u8>,
	/// Mnemonic as written in the source, or empty if the caller does not provide it.
	pub mnemonic: String,
	/// Operands as written in the source.
	pub operands: Vec<String>,
	/// Origin of the instruction.
	pub location: SourceLocation,
}

impl AssembledInstruction {
	/// Creates an instruction that only carries its bytes and location.
	#[must_use]
	pub fn new(bytes: impl Into<Vec<u8>>, line: usize, column: usize) -> Self {
		Self { bytes: bytes.into(), location: SourceLocation::new(line, column), ..Default::default() }
	}

	/// Attaches the source text elements of this instruction, which are used to fill in warning messages.
	#[must_use]
	pub fn with_source(mut self, mnemonic: impl Into<String>, operands: &[&str]) -> Self {
		self.mnemonic = mnemonic.into();
		self.operands = operands.iter().map(|operand| (*operand).to_owned()).collect();
		self
	}

	/// Mnemonic followed by the operands; index `n` fills placeholder `{n}` of a message template.
	#[must_use]
	pub fn elements(&self) -> Vec<String> {
		std::iter::once(self.mnemonic.clone()).chain(self.operands.iter().cloned()).collect()
	}
}

/// All instructions given to the engine so far, in program order.
pub type ProgramHistory = [AssembledInstruction];

/// A diagnostic raised by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
	/// Severity tier.
	pub severity:             Severity,
	/// Code within the severity tier.
	pub code:                 DiagnosticCode,
	/// Source line the diagnostic refers to.
	pub line:                 usize,
	/// Source column the diagnostic refers to.
	pub column:               usize,
	/// Mnemonic and operands of the instruction that caused the diagnostic, if any.
	pub instruction_elements: Vec<String>,
}

impl Warning {
	/// Creates a new warning.
	#[must_use]
	pub const fn new(
		severity: Severity,
		code: DiagnosticCode,
		location: SourceLocation,
		instruction_elements: Vec<String>,
	) -> Self {
		Self { severity, code, line: location.line, column: location.column, instruction_elements }
	}

	/// Human-readable message, built from the message template of this code. Returns `None` if the severity has no
	/// message for this code.
	#[must_use]
	pub fn message(&self) -> Option<String> {
		message_template(self.severity, self.code).map(|template| fill_template(template, &self.instruction_elements))
	}
}

impl Display for Warning {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {:04} on line {}:{}", self.severity, self.code, self.line, self.column)?;
		if let Some(message) = self.message() {
			write!(f, ": {message}")?;
		}
		Ok(())
	}
}

impl std::error::Error for Warning {}

impl miette::Diagnostic for Warning {
	fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
		Some(Box::new(format!("{}::{:04}", self.severity.code_prefix(), self.code)))
	}

	fn severity(&self) -> Option<miette::Severity> {
		Some(self.severity.into())
	}
}

/// Replaces every `{n}` in the template with element `n`. Placeholders without an element become empty.
fn fill_template(template: &str, elements: &[String]) -> String {
	let mut result = String::with_capacity(template.len());
	let mut rest = template;
	while let Some(start) = rest.find('{') {
		result.push_str(&rest[.. start]);
		let after_brace = &rest[start + 1 ..];
		let placeholder = after_brace.find('}').and_then(|end| after_brace[.. end].parse::<usize>().ok().map(|i| (i, end)));
		if let Some((index, end)) = placeholder {
			result.push_str(elements.get(index).map_or("", String::as_str));
			rest = &after_brace[end + 1 ..];
		} else {
			result.push('{');
			rest = after_brace;
		}
	}
	result.push_str(rest);
	result
}
