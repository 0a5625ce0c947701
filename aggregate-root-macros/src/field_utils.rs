use syn::punctuated::Punctuated;
use syn::{Field, FieldsNamed, Token, Type};

/// 确保具名字段结构体以 `name: ty` 开头。
/// 已存在同名字段时沿用其原定义（含属性与可见性），只调整到最前。
pub(crate) fn ensure_leading_field(fields_named: &mut FieldsNamed, name: &str, ty: &Type) {
    let is_target = |f: &Field| f.ident.as_ref().map(|i| i == name).unwrap_or(false);

    let leading: Field = match fields_named.named.iter().find(|f| is_target(f)) {
        Some(existing) => existing.clone(),
        None => {
            let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
            syn::parse_quote! { #ident: #ty }
        }
    };

    let mut reordered: Punctuated<Field, Token![,]> = Punctuated::new();
    reordered.push(leading);
    for f in fields_named.named.iter().filter(|f| !is_target(f)) {
        reordered.push(f.clone());
    }
    fields_named.named = reordered;
}
