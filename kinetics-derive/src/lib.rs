//! Derive macros for the kinetics particle core.
//!
//! This crate provides one derive macro:
//!
//! - [`StateTag`] - Maps a unit-variant enum onto compact `u32` tags
//!
//! # Usage
//!
//! The macro is re-exported from the main `kinetics` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use kinetics::StateTag;
//!
//! #[derive(StateTag, Clone, Copy, PartialEq, Debug)]
//! enum Species {
//!     Neutral,
//!     ReactantA,
//!     ReactantB,
//!     Product,
//! }
//! ```
//!
//! # The StateTag Macro
//!
//! Tags are what the renderer sees in instance buffers: the simulation keeps
//! a typed enum, the GPU side gets a plain integer.
//!
//! It generates:
//! - `From<EnumName> for u32` - Convert variant to its tag
//! - `From<u32> for EnumName` - Convert back (defaults to first variant)
//! - `EnumName::count() -> u32` - Number of variants
//! - `EnumName::ALL` - Every variant in declaration order
//! - `EnumName::name(&self) -> &'static str` - Variant identifier

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for state tag enums.
///
/// Variants are assigned sequential tags starting from 0, in declaration
/// order. Explicit discriminants are ignored.
///
/// # Generated Items
///
/// For an enum `Phase`:
///
/// - `impl From<Phase> for u32`
/// - `impl From<u32> for Phase` (invalid values map to the first variant)
/// - `Phase::count() -> u32`
/// - `Phase::ALL: [Phase; N]`
/// - `Phase::name(&self) -> &'static str`
///
/// # Requirements
///
/// - Must be an enum with at least one variant
/// - All variants must be unit variants (no fields)
/// - The enum must be `Copy` for `ALL` to be usable by value
///
/// # Example
///
/// ```ignore
/// #[derive(StateTag, Clone, Copy, PartialEq, Debug)]
/// enum Phase {
///     Solid,   // = 0
///     Liquid,  // = 1
///     Gas,     // = 2
///     Plasma,  // = 3
/// }
///
/// let tag: u32 = Phase::Gas.into();       // 2
/// let back: Phase = 3u32.into();          // Phase::Plasma
/// assert_eq!(Phase::count(), 4);
/// assert_eq!(Phase::Liquid.name(), "Liquid");
/// ```
#[proc_macro_derive(StateTag)]
pub fn derive_state_tag(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_state_tag(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_state_tag(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "StateTag derive only supports enums",
            ))
        }
    };

    if variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "StateTag enum must have at least one variant",
        ));
    }

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                format!(
                    "StateTag enum variants must be unit variants (no fields). \
                     Found fields on variant '{}'",
                    variant.ident
                ),
            ));
        }
    }

    let into_arms: Vec<_> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let tag = i as u32;
            quote! { #name::#variant_name => #tag }
        })
        .collect();

    let from_arms: Vec<_> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let tag = i as u32;
            quote! { #tag => #name::#variant_name }
        })
        .collect();

    let name_arms: Vec<_> = variants
        .iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            let label = LitStr::new(&variant_name.to_string(), Span::call_site());
            quote! { #name::#variant_name => #label }
        })
        .collect();

    let all_variants: Vec<_> = variants
        .iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            quote! { #name::#variant_name }
        })
        .collect();

    let first_variant = &variants[0].ident;
    let variant_count = variants.len() as u32;
    let array_len = variants.len();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics From<#name #ty_generics> for u32 #where_clause {
            fn from(value: #name #ty_generics) -> u32 {
                match value {
                    #(#into_arms),*
                }
            }
        }

        impl #impl_generics From<u32> for #name #ty_generics #where_clause {
            fn from(value: u32) -> #name #ty_generics {
                match value {
                    #(#from_arms,)*
                    _ => #name::#first_variant,
                }
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Every variant, in tag order.
            pub const ALL: [#name #ty_generics; #array_len] = [#(#all_variants),*];

            /// Returns the number of variants in this tag enum.
            pub const fn count() -> u32 {
                #variant_count
            }

            /// Returns the variant identifier.
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    })
}
