use super::*;
use proc_macro2::Span;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{
    braced, parenthesized, parse_macro_input, punctuated::Punctuated, token, Ident, LitChar,
    LitInt, Result, Token,
};

struct ModeDef {
    name: Ident,
    _paren: token::Paren,
    flag: LitInt,
    _comma: Token![,],
    mode_char: LitChar,
    _comma2: Token![,],
    prefix: LitChar,
}

struct ModeSet {
    name: Ident,
    _brace: token::Brace,
    items: Punctuated<ModeDef, Token![,]>,
}

impl Parse for ModeDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let content;
        Ok(Self {
            name: input.parse()?,
            _paren: parenthesized!(content in input),
            flag: content.parse()?,
            _comma: content.parse()?,
            mode_char: content.parse()?,
            _comma2: content.parse()?,
            prefix: content.parse()?,
        })
    }
}

impl Parse for ModeSet {
    fn parse(input: ParseStream) -> Result<Self> {
        let content;
        Ok(Self {
            name: input.parse()?,
            _brace: braced!(content in input),
            items: content.parse_terminated(ModeDef::parse)?,
        })
    }
}

/// Flags are listed highest rank first; that order is kept for prefix and
/// mode-letter formatting.
pub fn mode_flags(input: TokenStream) -> TokenStream {
    let modes = parse_macro_input!(input as ModeSet);

    let name_one = Ident::new(&format!("{}Flag", modes.name), Span::call_site());
    let name_set = Ident::new(&format!("{}FlagSet", modes.name), Span::call_site());

    let mut variants = Vec::new();
    let mut names = Vec::new();
    let mut mode_chars = Vec::new();
    let mut prefixes = Vec::new();

    for item in modes.items {
        let name = item.name;
        let flag = item.flag;

        variants.push(quote!( #name = #flag ));
        names.push(name);
        mode_chars.push(item.mode_char);
        prefixes.push(item.prefix);
    }

    let num_items = names.len();

    let output = quote!(
        #[derive(Debug,Clone,Copy,Eq,PartialEq,Hash,serde::Serialize,serde::Deserialize)]
        #[repr(u64)]
        pub enum #name_one
        {
            #( #variants ),*
        }

        impl #name_one
        {
            /// The mode letter used to grant or revoke this flag
            pub fn mode_char(self) -> char
            {
                match self { #( Self::#names => #mode_chars ),* }
            }

            /// The sigil shown before a nick holding this flag
            pub fn prefix(self) -> char
            {
                match self { #( Self::#names => #prefixes ),* }
            }

            pub fn from_mode_char(c: char) -> Option<Self>
            {
                match c { #( #mode_chars => Some(Self::#names), )* _ => None }
            }

            pub fn from_prefix(c: char) -> Option<Self>
            {
                match c { #( #prefixes => Some(Self::#names), )* _ => None }
            }
        }

        #[derive(Debug,Clone,Copy,Default,Eq,PartialEq,Hash,serde::Serialize,serde::Deserialize)]
        pub struct #name_set(u64);

        impl #name_set
        {
            pub const ALL: [#name_one; #num_items] = [ #( #name_one::#names ),* ];

            pub fn new() -> Self { Self(0) }

            pub fn is_set(&self, flag: #name_one) -> bool
            {
                (self.0 & flag as u64) != 0
            }

            pub fn is_empty(&self) -> bool
            {
                self.0 == 0
            }

            pub fn set(&mut self, flag: #name_one)
            {
                self.0 |= flag as u64;
            }

            pub fn unset(&mut self, flag: #name_one)
            {
                self.0 &= !(flag as u64);
            }

            /// Apply a combined change: `added` first, then `removed`
            pub fn apply_change(&mut self, added: #name_set, removed: #name_set)
            {
                self.0 |= added.0;
                self.0 &= !removed.0;
            }

            pub fn iter(&self) -> impl Iterator<Item = #name_one> + '_
            {
                Self::ALL.into_iter().filter(move |f| self.is_set(*f))
            }

            /// The highest-ranked flag present, if any
            pub fn highest(&self) -> Option<#name_one>
            {
                self.iter().next()
            }

            pub fn to_chars(&self) -> String
            {
                self.iter().map(#name_one::mode_char).collect()
            }

            pub fn to_prefixes(&self) -> String
            {
                self.iter().map(#name_one::prefix).collect()
            }
        }

        impl From<#name_one> for #name_set
        {
            fn from(x: #name_one) -> Self { Self(x as u64) }
        }

        impl FromIterator<#name_one> for #name_set
        {
            fn from_iter<I: IntoIterator<Item = #name_one>>(iter: I) -> Self
            {
                let mut set = Self::new();
                for flag in iter { set.set(flag); }
                set
            }
        }

        impl std::ops::BitOr for #name_one
        {
            type Output = #name_set;
            fn bitor(self, rhs: Self) -> #name_set { #name_set(self as u64 | rhs as u64) }
        }

        impl std::ops::BitOr<#name_one> for #name_set
        {
            type Output = Self;
            fn bitor(self, rhs: #name_one) -> Self { Self(self.0 | rhs as u64) }
        }

        impl std::ops::BitOrAssign<#name_one> for #name_set
        {
            fn bitor_assign(&mut self, rhs: #name_one) { self.0 |= rhs as u64; }
        }
    );

    output.into()
}
