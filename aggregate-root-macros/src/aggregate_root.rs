use crate::derive_utils::apply_derives;
use crate::field_utils::ensure_leading_field;
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitBool, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

const STATE_FIELD: &str = "aggregate_state";

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as AggregateAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[aggregate_root] can only be used on structs")
                .to_compile_error()
                .into();
        }
    };

    let ident = st.ident.clone();
    let generics = st.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "#[aggregate_root] only supports named-field structs")
                .to_compile_error()
                .into();
        }
    };

    let state_ty: Type =
        syn::parse_quote! { ::aggregate_root::aggregate::AggregateState<#ident #ty_generics> };
    ensure_leading_field(fields_named, STATE_FIELD, &state_ty);

    if cfg.debug.unwrap_or(true) {
        apply_derives(&mut st.attrs, vec![syn::parse_quote!(Debug)]);
    }

    let type_name = cfg
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let expanded = quote! {
        #st

        impl #impl_generics ::aggregate_root::aggregate::AggregateRoot for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            fn aggregate_state(&self) -> &::aggregate_root::aggregate::AggregateState<Self> {
                &self.aggregate_state
            }

            fn aggregate_state_mut(&mut self) -> &mut ::aggregate_root::aggregate::AggregateState<Self> {
                &mut self.aggregate_state
            }
        }
    };

    TokenStream::from(expanded)
}

struct AggregateAttrConfig {
    name: Option<LitStr>,
    debug: Option<bool>,
}

impl Parse for AggregateAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<LitStr> = None;
        let mut debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self { name, debug });
        }

        let pairs = Punctuated::<syn::ExprAssign, Token![,]>::parse_terminated(input)?;

        for assign in pairs {
            let key = match *assign.left {
                syn::Expr::Path(p) if p.path.segments.len() == 1 => p.path.segments[0].ident.clone(),
                other => return Err(syn::Error::new(other.span(), "invalid attribute key")),
            };
            match key.to_string().as_str() {
                "name" => {
                    if name.is_some() {
                        return Err(syn::Error::new(key.span(), "duplicate key 'name' in attribute"));
                    }
                    name = Some(syn::parse2(assign.right.to_token_stream())?);
                }
                "debug" => {
                    if debug.is_some() {
                        return Err(syn::Error::new(key.span(), "duplicate key 'debug' in attribute"));
                    }
                    let lit: LitBool = syn::parse2(assign.right.to_token_stream())?;
                    debug = Some(lit.value);
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key in attribute; expected 'name' or 'debug'",
                    ));
                }
            }
        }

        Ok(Self { name, debug })
    }
}
