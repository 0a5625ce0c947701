use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Attribute, Path, Token};

// 拆出已有 derive 列表，其余属性原样保留
fn take_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<Path>) {
    let mut retained = Vec::new();
    let mut derived = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            derived.extend(list);
        }
    }
    (retained, derived)
}

// 以末段名去重，`Serialize` 与 `serde::Serialize` 视为同一项
fn derive_key(path: &Path) -> String {
    match path.segments.last() {
        Some(last) => match last.ident.to_string().as_str() {
            name @ ("Serialize" | "Deserialize") => format!("serde::{name}"),
            name => name.to_string(),
        },
        None => path.to_token_stream().to_string(),
    }
}

/// 把 `required` 合并进结构体/枚举的 derive 列表（required 在前，去重）
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let (retained, existing) = take_derives(attrs);

    let mut seen = std::collections::HashSet::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    let derive: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive).chain(retained).collect();
}
