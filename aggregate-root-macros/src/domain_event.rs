use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let (ident, generics, attrs) = match &mut input {
        Item::Struct(s) => (s.ident.clone(), s.generics.clone(), &mut s.attrs),
        Item::Enum(e) => (e.ident.clone(), e.generics.clone(), &mut e.attrs),
        other => {
            return syn::Error::new(
                other.span(),
                "#[domain_event] can only be used on structs or enums",
            )
            .to_compile_error()
            .into();
        }
    };

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(attrs, required);

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // 未指定时沿用 trait 默认实现（类型全路径）
    let event_type_fn = cfg.event_type.map(|lit| {
        quote! {
            fn event_type() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#lit)
            }
        }
    });

    let expanded = quote! {
        #input

        impl #impl_generics ::aggregate_root::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            #event_type_fn
        }
    };

    TokenStream::from(expanded)
}

struct EventAttrConfig {
    event_type: Option<LitStr>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut event_type: Option<LitStr> = None;

        if input.is_empty() {
            return Ok(Self { event_type });
        }

        let pairs = Punctuated::<syn::ExprAssign, Token![,]>::parse_terminated(input)?;

        for assign in pairs {
            let key = match *assign.left {
                syn::Expr::Path(p) if p.path.segments.len() == 1 => p.path.segments[0].ident.clone(),
                other => return Err(syn::Error::new(other.span(), "invalid attribute key")),
            };
            if key != "event_type" {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'event_type'",
                ));
            }
            if event_type.is_some() {
                return Err(syn::Error::new(key.span(), "duplicate key 'event_type' in attribute"));
            }
            let lit: LitStr = syn::parse2(assign.right.to_token_stream())?;
            if lit.value().trim().is_empty() {
                return Err(syn::Error::new(lit.span(), "'event_type' must not be empty"));
            }
            event_type = Some(lit);
        }

        Ok(Self { event_type })
    }
}
