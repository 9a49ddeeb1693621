//! Message templates of all diagnostics. `{0}` is replaced by the mnemonic, `{1}` and onwards by the operands.

use super::{DiagnosticCode, Severity};

const NON_FATAL_ERROR_MESSAGES: &[(DiagnosticCode, &str)] =
	&[(1, "Instruction writes to the rpo register."), (2, "Division by constant 0.")];

const WARNING_MESSAGES: &[(DiagnosticCode, &str)] = &[
	(1, "Data insertion is not directly preceded by an unconditional jump, return, or halt instruction."),
	(2, "Jump/Call target label points to data, not executable code."),
	(3, "Jump/Call target label points to end of file, not executable code."),
	(4, "Instruction writes to a label pointing to executable code."),
	(5, "Instruction reads from a label pointing to executable code in a context that likely expects data."),
	(6, "String insertion is not immediately followed by a 0 (null) byte."),
	(7, "Numeric literal is too large for the given move instruction. Upper bits will be truncated at runtime."),
	(8, "Unreachable code detected."),
	(9, "Program runs to end of file without being terminated by an unconditional jump, return, or halt instruction."),
	(10, "File import is not directly preceded by an unconditional jump, return, or halt instruction."),
	(11, "Instruction writes to the rsf register."),
	(12, "Instruction writes to the rsb register."),
	(13, "Jump/Call target label points to itself, resulting in an unbreakable infinite loop."),
	(14, "Unlabelled executable code found after data insertion."),
	(15, "Code follows an imported file that is not terminated by unconditional jump, return, or halt instruction."),
	(16, "Addresses are 64-bit values, however this move instruction moves less than 64 bits."),
];

const SUGGESTION_MESSAGES: &[(DiagnosticCode, &str)] = &[
	(1, "Avoid use of NOP instruction."),
	(2, "Use the `PAD` directive instead of chaining `DAT 0` directives."),
	(3, "Put IMP directives at the end of the file, unless the position of the directive is important given the file's contents."),
	(4, "Put data at the end of the file, unless the position of the data is important."),
	(5, "Use `TST {1}, {1}` instead of `CMP {1}, 0`, as it results in less bytes."),
	(6, "Use `XOR {1}, {1}` instead of `{0} {1}, 0`, as it results in less bytes."),
	(7, "Use `INC {1}` instead of `ADD {1}, 1`, as it results in less bytes."),
	(8, "Use `DEC {1}` instead of `SUB {1}, 1`, as it results in less bytes."),
	(9, "Operation has no effect."),
	(10, "Shift operation shifts by 64 bits or more, which will always result in 0. Use `XOR {1}, {1}` instead."),
	(11, "Remove leading 0 digits from denary number."),
	(12, "Remove useless `PAD 0` directive."),
];

const fn messages_for(severity: Severity) -> &'static [(DiagnosticCode, &'static str)] {
	match severity {
		Severity::NonFatalError => NON_FATAL_ERROR_MESSAGES,
		Severity::Warning => WARNING_MESSAGES,
		Severity::Suggestion => SUGGESTION_MESSAGES,
	}
}

/// The message template of a diagnostic, or `None` if the severity has no diagnostic with this code.
#[must_use]
pub fn message_template(severity: Severity, code: DiagnosticCode) -> Option<&'static str> {
	messages_for(severity).iter().find(|(known, _)| *known == code).map(|(_, message)| *message)
}

/// All codes that have a message for the given severity, ascending.
pub fn known_codes(severity: Severity) -> impl Iterator<Item = DiagnosticCode> {
	messages_for(severity).iter().map(|(code, _)| *code)
}
