//! Mnemonic overload resolution.
//!
//! Many mnemonics are overloaded on the kinds of operands they take; `ADD reg, reg` and `ADD reg, lit` are different
//! instructions with different opcodes. The [`MnemonicTable`] maps a [`MnemonicSignature`] (name plus operand types)
//! to the matching [`Opcode`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use embly_derive::Parse;
use log::trace;

use crate::EmblyError;

/// Kinds of operands an instruction can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Parse)]
pub enum OperandType {
	/// A register name, such as `rg0`.
	Register,
	/// A numeric literal, or a label reference that is used as a literal address.
	Literal,
	/// A label that is dereferenced, such as `:label`.
	Address,
	/// A register that is dereferenced, such as `*rg0`.
	Pointer,
}

impl OperandType {
	/// The abbreviation used in instruction listings.
	#[must_use]
	pub const fn short_name(self) -> &'static str {
		match self {
			Self::Register => "reg",
			Self::Literal => "lit",
			Self::Address => "adr",
			Self::Pointer => "ptr",
		}
	}
}

impl Display for OperandType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.short_name())
	}
}

/// Formats a mnemonic with its operand types the way instruction listings do, e.g. `ADD reg, lit`.
pub(crate) fn format_signature(mnemonic: &str, operands: &[OperandType]) -> String {
	if operands.is_empty() {
		mnemonic.to_owned()
	} else {
		format!("{mnemonic} {}", operands.iter().copied().map(OperandType::short_name).collect::<Vec<_>>().join(", "))
	}
}

/// An encoded instruction: the extension set it belongs to and its code within that set. Instructions of the base
/// set have extension set 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Opcode {
	/// Extension set.
	pub extension_set: u8,
	/// Instruction code within the extension set.
	pub code:          u8,
}

impl Opcode {
	/// Creates an opcode of the given extension set.
	#[must_use]
	pub const fn new(extension_set: u8, code: u8) -> Self {
		Self { extension_set, code }
	}

	/// Creates an opcode of the base instruction set.
	#[must_use]
	pub const fn base(code: u8) -> Self {
		Self::new(0, code)
	}
}

impl Display for Opcode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:02X}:{:02X}", self.extension_set, self.code)
	}
}

/// A mnemonic name together with the ordered types of its operands.
///
/// Two signatures are equal only if the names match exactly (case-sensitive) and the operand types match position by
/// position. The hash however only covers the name, so all overloads of one mnemonic share a hash bucket and are told
/// apart there by equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MnemonicSignature {
	/// Mnemonic name.
	pub mnemonic: String,
	/// Operand types, in order.
	pub operands: Vec<OperandType>,
}

impl MnemonicSignature {
	/// Creates a new signature.
	#[must_use]
	pub fn new(mnemonic: impl Into<String>, operands: &[OperandType]) -> Self {
		Self { mnemonic: mnemonic.into(), operands: operands.to_vec() }
	}
}

impl Hash for MnemonicSignature {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.mnemonic.hash(state);
	}
}

impl Display for MnemonicSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&format_signature(&self.mnemonic, &self.operands))
	}
}

/// Lookup table from mnemonic signatures to opcodes. Built once, then only read.
#[derive(Clone, Debug, Default)]
pub struct MnemonicTable {
	entries: HashMap<MnemonicSignature, Opcode>,
}

impl MnemonicTable {
	/// Creates an empty table.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an overload to the table. If the exact signature was already present, its previous opcode is replaced
	/// and returned.
	pub fn insert(&mut self, signature: MnemonicSignature, opcode: Opcode) -> Option<Opcode> {
		match self.entries.entry(signature) {
			Entry::Occupied(mut entry) => Some(entry.insert(opcode)),
			Entry::Vacant(entry) => {
				entry.insert(opcode);
				None
			},
		}
	}

	/// Finds the opcode of the overload of `mnemonic` that takes exactly the given operand types.
	///
	/// # Errors
	/// If no overload of `mnemonic` has an identical operand type sequence.
	pub fn resolve(&self, mnemonic: &str, operands: &[OperandType]) -> Result<Opcode, Box<EmblyError>> {
		let signature = MnemonicSignature::new(mnemonic, operands);
		self.entries.get(&signature).copied().map_or_else(
			|| {
				Err(EmblyError::UnknownOverload {
					mnemonic:        signature.mnemonic.clone(),
					operands:        signature.operands.clone(),
					known_overloads: self.overloads_of(mnemonic).iter().map(ToString::to_string).collect(),
				}
				.into())
			},
			|opcode| {
				trace!("resolved {signature} to {opcode}");
				Ok(opcode)
			},
		)
	}

	/// All signatures registered for the given mnemonic, in operand type order.
	#[must_use]
	pub fn overloads_of(&self, mnemonic: &str) -> Vec<&MnemonicSignature> {
		let mut overloads = self.entries.keys().filter(|signature| signature.mnemonic == mnemonic).collect::<Vec<_>>();
		overloads.sort_by(|a, b| a.operands.cmp(&b.operands));
		overloads
	}

	/// Number of overloads in the table.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table has no overloads at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over all overloads in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&MnemonicSignature, &Opcode)> {
		self.entries.iter()
	}
}

impl FromIterator<(MnemonicSignature, Opcode)> for MnemonicTable {
	fn from_iter<T: IntoIterator<Item = (MnemonicSignature, Opcode)>>(iter: T) -> Self {
		Self { entries: iter.into_iter().collect() }
	}
}
