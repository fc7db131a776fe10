//! Shared utilities for Sextant procedural macro crates.
//!
//! Provides crate-path resolution so that generated code emits correct
//! fully-qualified paths regardless of whether the consumer depends on
//! an individual Sextant crate or the `sextant` umbrella re-export.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// A Sextant crate that macro-generated code may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SextantCrate {
    /// `sextant_tools`
    Tools,
    /// `sextant_models`
    Models,
    /// `sextant_prompt`
    Prompt,
}

impl SextantCrate {
    /// Returns the `Cargo.toml` package name for this crate.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tools => "sextant_tools",
            Self::Models => "sextant_models",
            Self::Prompt => "sextant_prompt",
        }
    }
}

/// Returns a [`TokenStream`] path for the given Sextant crate.
///
/// Resolution order:
/// 1. Direct dependency (possibly renamed in `Cargo.toml`).
/// 2. Indirect access via the `sextant` umbrella crate (`sextant::<name>`).
/// 3. Fallback to the literal crate name (compile error will point the user
///    to the missing dependency).
#[must_use]
pub fn resolve_crate_path(krate: SextantCrate) -> TokenStream {
    let name = krate.as_str();

    match crate_name(name) {
        Ok(FoundCrate::Itself) => {
            let ident = format_ident!("{}", name);
            quote!(#ident)
        }
        Ok(FoundCrate::Name(found)) => {
            let ident = format_ident!("{}", found);
            quote!(#ident)
        }
        Err(_) => match crate_name("sextant") {
            Ok(FoundCrate::Name(found)) => {
                let sextant = format_ident!("{}", found);
                let ident = format_ident!("{}", name);
                quote!(#sextant::#ident)
            }
            Ok(FoundCrate::Itself) => {
                let ident = format_ident!("{}", name);
                quote!(::sextant::#ident)
            }
            Err(_) => {
                let ident = format_ident!("{}", name);
                quote!(#ident)
            }
        },
    }
}

/// Converts a `snake_case` identifier to `PascalCase`.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_from_snake_case() {
        assert_eq!(to_pascal_case("capital_of"), "CapitalOf");
        assert_eq!(to_pascal_case("add"), "Add");
        assert_eq!(to_pascal_case("__private_fn"), "PrivateFn");
    }

    #[test]
    fn crate_names_match_packages() {
        assert_eq!(SextantCrate::Tools.as_str(), "sextant_tools");
        assert_eq!(SextantCrate::Models.as_str(), "sextant_models");
        assert_eq!(SextantCrate::Prompt.as_str(), "sextant_prompt");
    }
}
