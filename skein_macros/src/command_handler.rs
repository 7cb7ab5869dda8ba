use super::*;

use quote::{quote, quote_spanned};
use syn::{parse::Parse, parse_macro_input, Ident, ItemFn, LitInt, LitStr, Token};

struct CommandHandlerAttr {
    command_name: LitStr,
    min_args: Option<LitInt>,
}

impl Parse for CommandHandlerAttr {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let command_name = input.parse()?;
        let min_args = if input.parse::<Token![,]>().is_ok() {
            Some(input.parse()?)
        } else {
            None
        };
        Ok(Self {
            command_name,
            min_args,
        })
    }
}

/// Register an inbound command handler with the dispatcher.
///
/// `#[command_handler("JOIN", 1)]` registers the annotated function for the
/// `JOIN` command, requiring at least one argument before it is called.
pub fn command_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(attr as CommandHandlerAttr);
    let item = parse_macro_input!(item as ItemFn);

    let name = &item.sig.ident;
    let command_name = input.command_name;

    for c in command_name.value().chars() {
        if !(c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return quote_spanned!(command_name.span()=> compile_error!("Command names should be uppercase or numeric");).into();
        }
    }

    let min_args = match input.min_args {
        Some(n) => quote!(#n),
        None => quote!(0),
    };

    let reg_mod_name = Ident::new(
        &format!(
            "register_{}_for_{}",
            name,
            command_name.value().to_ascii_lowercase()
        ),
        name.span(),
    );

    quote!(
        #item

        mod #reg_mod_name
        {
            inventory::submit!(crate::dispatcher::HandlerRegistration {
                command: #command_name,
                min_args: #min_args,
                handler: super::#name,
            });
        }
    )
    .into()
}
