use super::*;

use proc_macro2::{Literal, Span};
use quote::{quote, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::{braced, parse_macro_input, token, Attribute, Fields, Ident, ItemStruct, LitStr, Result, Token};

struct DefinitionList {
    attrs: Vec<Attribute>,
    enum_name: Ident,
    _arrow: Token![=>],
    _brace: token::Brace,
    items: ItemStructList,
}

struct ItemStructList {
    items: Vec<ItemStruct>,
}

impl Parse for DefinitionList {
    fn parse(input: ParseStream) -> Result<Self> {
        let content;
        Ok(Self {
            attrs: input.call(Attribute::parse_outer)?,
            enum_name: input.parse()?,
            _arrow: input.parse()?,
            _brace: braced!(content in input),
            items: content.parse()?,
        })
    }
}

impl Parse for ItemStructList {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut items = Vec::new();

        while !input.is_empty() {
            items.push(input.parse::<ItemStruct>()?);
        }

        Ok(ItemStructList { items })
    }
}

pub fn state_changes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DefinitionList);
    let attrs = input.attrs;
    let enum_name = input.enum_name;

    let mut output = proc_macro2::TokenStream::new();
    let mut names = Vec::<Ident>::new();
    let mut name_strs = Vec::<LitStr>::new();
    let mut field_lists = Vec::<Vec<Ident>>::new();
    let mut field_counts = Vec::<Literal>::new();

    for item in &input.items.items {
        let name = &item.ident;

        let Fields::Named(named) = &item.fields else {
            return quote_spanned!(name.span()=> compile_error!("State change operations need named fields");)
                .into();
        };

        let fields: Vec<Ident> = named.named.iter().filter_map(|f| f.ident.clone()).collect();

        names.push(name.clone());
        name_strs.push(LitStr::new(&name.to_string(), Span::call_site()));
        field_counts.push(Literal::usize_unsuffixed(fields.len()));
        field_lists.push(fields);

        let item_attrs = &item.attrs;
        let item_fields = &item.fields;

        output.extend(quote!(
            #( #item_attrs )*
            #[derive(Debug,Clone,PartialEq,serde::Serialize,serde::Deserialize)]
            pub struct #name
            #item_fields
        ));
    }

    output.extend(quote!(
        #( #attrs )*
        #[derive(Debug,Clone,PartialEq,serde::Serialize,serde::Deserialize)]
        pub enum #enum_name {
            #( #names(#names) ),*
        }

        #(
            impl From<#names> for #enum_name
            {
                fn from(x: #names) -> Self { Self::#names(x) }
            }

            impl std::convert::TryFrom<#enum_name> for #names
            {
                type Error = WrongChangeTypeError;
                fn try_from(e: #enum_name) -> Result<Self, WrongChangeTypeError>
                {
                    match e {
                        #enum_name::#names(x) => Ok(x),
                        _ => Err(WrongChangeTypeError)
                    }
                }
            }
        )*

        impl #enum_name
        {
            /// Names of every operation in the vocabulary, in declaration order
            pub const NAMES: &'static [&'static str] = &[ #( #name_strs ),* ];

            /// The wire name of this operation
            pub fn name(&self) -> &'static str
            {
                match self {
                    #( Self::#names(_) => #name_strs ),*
                }
            }

            /// Convert to a replication record, with arguments in field declaration order
            pub fn to_record(&self) -> Result<ChangeRecord, serde_json::Error>
            {
                match self {
                    #(
                        Self::#names(detail) => Ok(ChangeRecord {
                            name: #name_strs.to_string(),
                            args: vec![ #( serde_json::to_value(&detail.#field_lists)? ),* ],
                        })
                    ),*
                }
            }

            /// Rebuild an operation from a replication record
            pub fn from_record(record: &ChangeRecord) -> Result<Self, ChangeRecordError>
            {
                match record.name.as_str() {
                    #(
                        #name_strs => {
                            if record.args.len() != #field_counts {
                                return Err(ChangeRecordError::ArgumentCount {
                                    name: #name_strs,
                                    expected: #field_counts,
                                    found: record.args.len(),
                                });
                            }
                            #[allow(unused_mut, unused_variables)]
                            let mut args = record.args.iter().cloned();
                            Ok(Self::#names(#names {
                                #( #field_lists: serde_json::from_value(args.next().unwrap_or_default())?, )*
                            }))
                        }
                    )*
                    other => Err(ChangeRecordError::UnknownOperation(other.to_string())),
                }
            }
        }
    ));

    output.into()
}
