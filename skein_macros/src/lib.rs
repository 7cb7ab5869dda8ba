#![allow(clippy::large_enum_variant)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod define_state_changes;

/// Define the closed vocabulary of state-change operations.
///
/// Each struct in the body becomes one operation; the enum named before the
/// `=>` collects them all, and gains conversions to and from the replication
/// record form.
#[proc_macro]
pub fn state_changes(input: TokenStream) -> TokenStream {
    define_state_changes::state_changes(input)
}

mod command_handler;

#[proc_macro_attribute]
pub fn command_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    command_handler::command_handler(attr, item)
}

mod modeflags;

#[proc_macro]
pub fn mode_flags(input: TokenStream) -> TokenStream {
    modeflags::mode_flags(input)
}
