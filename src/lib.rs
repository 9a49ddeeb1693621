//! Auxiliary layer of the AssEmbly assembler.
//!
//! - [`mnemonic`] maps a mnemonic and the types of its operands to an opcode.
//! - [`warning`] runs diagnostic analyzers over the assembled program and reports non-fatal errors, warnings and
//!   suggestions.
//! - [`debug_info`] writes and reads debug information files that map program addresses back to source lines, labels
//!   and imports.

pub mod cli;
pub mod debug_info;
mod error;
pub mod mnemonic;
pub mod parse;
pub mod warning;

pub use error::EmblyError;
pub use mnemonic::{MnemonicSignature, MnemonicTable, Opcode, OperandType};
pub use warning::{AssemblerWarnings, Severity, Warning};
