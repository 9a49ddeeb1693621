//! Command-line interface related structures.

use std::str::FromStr;

use crate::EmblyError;
use crate::parse::Parse;
use crate::warning::{DiagnosticCode, Severity};

/// Specification of which diagnostics to silence.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "binaries", derive(clap::Args))]
pub struct WarningOptions {
	/// Diagnostics to silence, as `<severity>:<code>` (e.g. `warning:0007` or `non-fatal-error:2`), or `all`.
	#[cfg_attr(feature = "binaries", arg(value_parser = DiagnosticSpec::from_str, long, short = 'w'))]
	pub disable: Vec<DiagnosticSpec>,
}

impl WarningOptions {
	/// Creates options that disable the given diagnostics.
	#[must_use]
	pub const fn disabling(disable: Vec<DiagnosticSpec>) -> Self {
		Self { disable }
	}

	/// All diagnostics to disable.
	#[must_use]
	pub fn disabled(&self) -> &[DiagnosticSpec] {
		&self.disable
	}
}

/// One diagnostic, or all of them, as given on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DiagnosticSpec {
	/// Marker for every diagnostic of every severity.
	All,
	/// A single diagnostic.
	Code(Severity, DiagnosticCode),
}

impl FromStr for DiagnosticSpec {
	type Err = Box<EmblyError>;

	fn from_str(spec: &str) -> Result<Self, Self::Err> {
		let spec = spec.trim();
		if spec.eq_ignore_ascii_case("all") {
			return Ok(Self::All);
		}
		let invalid = || Box::new(EmblyError::InvalidDiagnosticSpec { spec: spec.to_owned() });
		let (severity, code) = spec.split_once(':').ok_or_else(invalid)?;
		let severity = Severity::parse(&severity.trim().replace(['-', '_', ' '], ""))?;
		let code = code.trim().parse::<DiagnosticCode>().map_err(|_| invalid())?;
		Ok(Self::Code(severity, code))
	}
}
