//! Derive macros for embly.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{ToTokens, quote};

/// Derives `embly::parse::Parse` for an enum that only has unit variants. A variant is matched by its lowercased
/// identifier, and the input is lowercased before matching, so `NonFatalError`, `nonfatalerror` and
/// `NONFATALERROR` all parse to `NonFatalError`.
#[proc_macro_derive(Parse)]
pub fn parse_macro_derive(input: TokenStream) -> TokenStream {
	let type_ = syn::parse::<syn::DeriveInput>(input).unwrap();

	match type_.data {
		syn::Data::Enum(enum_) => {
			let name = type_.ident;
			let name_string = format!("{name}").to_lowercase();
			let variant_identifiers_and_strings = enum_
				.variants
				.iter()
				.map(|variant| match variant.fields {
					syn::Fields::Unit => (variant.ident.clone(), format!("{}", variant.ident).to_lowercase()),
					_ => panic!(
						"Parse cannot be derived for enums containing non-unit variants; variant {} is not a unit.",
						variant.to_token_stream()
					),
				})
				.collect::<Vec<(syn::Ident, String)>>();
			let variant_identifiers = variant_identifiers_and_strings.iter().map(|(identifier, _)| identifier);
			let variant_strings = variant_identifiers_and_strings.iter().map(|(_, string)| string);

			quote! {
				#[automatically_derived]
				impl crate::parse::Parse for #name {
					fn parse(value: &str) -> ::std::result::Result<Self, ::std::boxed::Box<crate::EmblyError>> {
						Ok(match value.to_lowercase().as_str() {
							#( #variant_strings => Self::#variant_identifiers, )*
							_ => return Err(::std::boxed::Box::new(crate::EmblyError::UnknownVariant {
								value:    value.to_owned(),
								typename: #name_string.to_owned(),
							})),
						})
					}
				}
			}
			.into()
		},
		_ => panic!("Parse cannot be derived for non-enum types."),
	}
}
