//! Parsing enums from their textual names.

use crate::EmblyError;

/// Types that can be parsed from a single word, such as a severity name on the command line. Usually derived with
/// `embly_derive::Parse`, which matches variant names case-insensitively.
pub trait Parse
where
	Self: Sized,
{
	/// Parse this type from the given text.
	/// # Errors
	/// If the text does not name a value of this type.
	fn parse(value: &str) -> Result<Self, Box<EmblyError>>;
}
