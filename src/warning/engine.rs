//! The two-phase diagnostic engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter};

use log::{debug, trace};

use super::{
	AssembledInstruction, DiagnosticCode, ProgramHistory, Severity, SourceLocation, Warning, known_codes,
	message_template,
};
use crate::EmblyError;
use crate::cli::{DiagnosticSpec, WarningOptions};

/// A check that runs once per assembled instruction. It receives the new instruction and all instructions before it,
/// and returns whether the new instruction triggers the diagnostic. Analyzers may keep their own state between calls.
pub type RollingAnalyzer = Box<dyn FnMut(&AssembledInstruction, &ProgramHistory) -> bool>;

/// A check that runs once after the whole program was assembled. It returns the locations of all places in the
/// program that trigger the diagnostic.
pub type FinalAnalyzer = Box<dyn FnMut(&ProgramHistory) -> Vec<SourceLocation>>;

/// Analyzers and enabled codes of one severity.
struct Tier {
	rolling: BTreeMap<DiagnosticCode, RollingAnalyzer>,
	final_:  BTreeMap<DiagnosticCode, FinalAnalyzer>,
	enabled: BTreeSet<DiagnosticCode>,
}

impl Tier {
	fn new(severity: Severity) -> Self {
		Self { rolling: BTreeMap::new(), final_: BTreeMap::new(), enabled: known_codes(severity).collect() }
	}
}

/// Diagnostic engine for one assembly run.
///
/// Analyzers are registered per severity and code; both the rolling and the final analyzers of a severity are
/// filtered through that severity's set of enabled codes. All known codes start out enabled. Warnings are always
/// reported severity by severity (non-fatal errors first), and by ascending code within a severity.
///
/// Disabling a code only hides its warnings. Its analyzer still runs, so any state it tracks stays correct.
pub struct AssemblerWarnings {
	tiers:   [Tier; 3],
	history: Vec<AssembledInstruction>,
}

impl Default for AssemblerWarnings {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for AssemblerWarnings {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut debug = f.debug_struct("AssemblerWarnings");
		for severity in Severity::ALL {
			let tier = self.tier(severity);
			debug.field(&format!("{severity} rolling"), &tier.rolling.keys().collect::<Vec<_>>());
			debug.field(&format!("{severity} final"), &tier.final_.keys().collect::<Vec<_>>());
			debug.field(&format!("{severity} enabled"), &tier.enabled);
		}
		debug.field("instructions", &self.history.len()).finish()
	}
}

impl AssemblerWarnings {
	/// Creates an engine without any analyzers, with every known code enabled.
	#[must_use]
	pub fn new() -> Self {
		Self { tiers: Severity::ALL.map(Tier::new), history: Vec::new() }
	}

	/// Creates an engine with the built-in analyzers registered.
	#[must_use]
	pub fn with_default_analyzers() -> Self {
		let mut this = Self::new();
		this.tier_mut(Severity::Suggestion)
			.rolling
			.insert(1, Box::new(|instruction: &AssembledInstruction, _: &ProgramHistory| {
				instruction.mnemonic.eq_ignore_ascii_case("NOP")
			}));
		this
	}

	fn tier(&self, severity: Severity) -> &Tier {
		&self.tiers[severity.index()]
	}

	fn tier_mut(&mut self, severity: Severity) -> &mut Tier {
		&mut self.tiers[severity.index()]
	}

	fn check_known(severity: Severity, code: DiagnosticCode) -> Result<(), Box<EmblyError>> {
		message_template(severity, code)
			.map(|_| ())
			.ok_or_else(|| EmblyError::UnknownDiagnosticCode { severity, code }.into())
	}

	/// Registers a rolling analyzer, replacing any previous rolling analyzer of the same diagnostic.
	///
	/// # Errors
	/// If the severity has no diagnostic with this code.
	pub fn register_rolling(
		&mut self,
		severity: Severity,
		code: DiagnosticCode,
		analyzer: impl FnMut(&AssembledInstruction, &ProgramHistory) -> bool + 'static,
	) -> Result<(), Box<EmblyError>> {
		Self::check_known(severity, code)?;
		self.tier_mut(severity).rolling.insert(code, Box::new(analyzer));
		Ok(())
	}

	/// Registers a final analyzer, replacing any previous final analyzer of the same diagnostic.
	///
	/// # Errors
	/// If the severity has no diagnostic with this code.
	pub fn register_final(
		&mut self,
		severity: Severity,
		code: DiagnosticCode,
		analyzer: impl FnMut(&ProgramHistory) -> Vec<SourceLocation> + 'static,
	) -> Result<(), Box<EmblyError>> {
		Self::check_known(severity, code)?;
		self.tier_mut(severity).final_.insert(code, Box::new(analyzer));
		Ok(())
	}

	/// Reports warnings with this code again.
	pub fn enable(&mut self, severity: Severity, code: DiagnosticCode) {
		self.tier_mut(severity).enabled.insert(code);
	}

	/// Stops reporting warnings with this code.
	pub fn disable(&mut self, severity: Severity, code: DiagnosticCode) {
		self.tier_mut(severity).enabled.remove(&code);
	}

	/// Whether warnings with this code are reported.
	#[must_use]
	pub fn is_enabled(&self, severity: Severity, code: DiagnosticCode) -> bool {
		self.tier(severity).enabled.contains(&code)
	}

	/// All enabled codes of a severity, ascending.
	pub fn enabled_codes(&self, severity: Severity) -> impl Iterator<Item = DiagnosticCode> + '_ {
		self.tier(severity).enabled.iter().copied()
	}

	/// Disables everything the user asked to disable.
	pub fn apply_options(&mut self, options: &WarningOptions) {
		for spec in options.disabled() {
			match *spec {
				DiagnosticSpec::All => {
					for tier in &mut self.tiers {
						tier.enabled.clear();
					}
				},
				DiagnosticSpec::Code(severity, code) => self.disable(severity, code),
			}
		}
	}

	/// Instructions seen so far.
	#[must_use]
	pub fn history(&self) -> &ProgramHistory {
		&self.history
	}

	/// Runs all rolling analyzers on the next instruction of the program and returns the warnings it causes.
	pub fn next_instruction(&mut self, instruction: AssembledInstruction) -> Vec<Warning> {
		let mut warnings = Vec::new();
		for severity in Severity::ALL {
			let tier = &mut self.tiers[severity.index()];
			for (code, analyzer) in &mut tier.rolling {
				if analyzer(&instruction, &self.history) && tier.enabled.contains(code) {
					trace!("{severity} {code:04} triggered at {}", instruction.location);
					warnings.push(Warning::new(severity, *code, instruction.location, instruction.elements()));
				}
			}
		}
		self.history.push(instruction);
		warnings
	}

	/// Runs all final analyzers on the complete program and returns the warnings they cause. This consumes the engine,
	/// so it can neither be finalized twice nor receive more instructions afterwards. Both examples fail with a use of
	/// the moved engine (E0382):
	///
	/// ```compile_fail
	/// # use embly::warning::AssemblerWarnings;
	/// let warnings = AssemblerWarnings::new();
	/// let _ = warnings.finalize();
	/// let _ = warnings.finalize();
	/// ```
	///
	/// ```compile_fail
	/// # use embly::warning::{AssembledInstruction, AssemblerWarnings};
	/// let mut warnings = AssemblerWarnings::new();
	/// let _ = warnings.finalize();
	/// warnings.next_instruction(AssembledInstruction::new([0x01], 1, 0));
	/// ```
	#[must_use]
	pub fn finalize(mut self) -> Vec<Warning> {
		debug!("running final analyzers over {} instructions", self.history.len());
		let mut warnings = Vec::new();
		for severity in Severity::ALL {
			let tier = &mut self.tiers[severity.index()];
			for (code, analyzer) in &mut tier.final_ {
				let locations = analyzer(&self.history);
				if !tier.enabled.contains(code) {
					continue;
				}
				for location in locations {
					trace!("{severity} {code:04} triggered at {location}");
					let elements = self
						.history
						.iter()
						.find(|instruction| instruction.location == location)
						.map(AssembledInstruction::elements)
						.unwrap_or_default();
					warnings.push(Warning::new(severity, *code, location, elements));
				}
			}
		}
		warnings
	}
}
