use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "f32", "f64", //
    "i8", "i16", "i32", "i64", "i128", "isize", //
    "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Renders a type as a qualified name usable from the generated file.
///
/// Best effort and purely syntactic: primitives are always in scope and
/// stay bare, well-known prelude types get their `::std`/`::core` paths,
/// `Self` becomes the owner, a bare local name is assumed to live in the
/// class module, and an already-segmented path passes through as written.
/// `None` means the reference cannot be rendered (impl/dyn/fn types,
/// explicit lifetimes) and the member carries the unresolved sentinel.
pub fn qualify(ty: &Type, owner: &str, module: &str) -> Option<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => qualify_path(&path.path, owner, module),
        Type::Reference(reference) => {
            if reference.lifetime.is_some() {
                return None;
            }
            let inner = qualify(&reference.elem, owner, module)?;
            Some(if reference.mutability.is_some() {
                format!("&mut {inner}")
            } else {
                format!("&{inner}")
            })
        }
        Type::Tuple(tuple) => {
            let elems = tuple
                .elems
                .iter()
                .map(|elem| qualify(elem, owner, module))
                .collect::<Option<Vec<_>>>()?;
            Some(match elems.len() {
                0 => "()".to_string(),
                1 => format!("({},)", elems[0]),
                _ => format!("({})", elems.join(", ")),
            })
        }
        Type::Slice(slice) => Some(format!("[{}]", qualify(&slice.elem, owner, module)?)),
        Type::Array(array) => Some(format!(
            "[{}; {}]",
            qualify(&array.elem, owner, module)?,
            array.len.to_token_stream()
        )),
        Type::Paren(paren) => qualify(&paren.elem, owner, module),
        Type::Group(group) => qualify(&group.elem, owner, module),
        _ => None,
    }
}

fn qualify_path(path: &syn::Path, owner: &str, module: &str) -> Option<String> {
    if path.segments.len() == 1 && path.leading_colon.is_none() {
        let segment = path.segments.first()?;
        let ident = segment.ident.to_string();

        return match &segment.arguments {
            PathArguments::None => {
                if ident == "Self" {
                    return Some(owner.to_string());
                }
                if PRIMITIVES.contains(&ident.as_str()) {
                    return Some(ident);
                }
                if ident == "String" {
                    return Some("::std::string::String".to_string());
                }
                // a bare name, assume it lives next to the owner
                Some(format!("{module}::{ident}"))
            }
            PathArguments::AngleBracketed(args) => {
                let inner = qualify_args(args, owner, module)?;
                let head = match (ident.as_str(), inner.len()) {
                    ("Option", 1) => "::core::option::Option".to_string(),
                    ("Vec", 1) => "::std::vec::Vec".to_string(),
                    ("Box", 1) => "::std::boxed::Box".to_string(),
                    ("Result", 2) => "::core::result::Result".to_string(),
                    _ => format!("{module}::{ident}"),
                };
                Some(format!("{head}<{}>", inner.join(", ")))
            }
            PathArguments::Parenthesized(_) => None,
        };
    }

    // already a segmented path, keep it as written
    let mut out = String::new();
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    for (index, segment) in path.segments.iter().enumerate() {
        if index > 0 {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
        match &segment.arguments {
            PathArguments::None => {}
            PathArguments::AngleBracketed(args) => {
                let inner = qualify_args(args, owner, module)?;
                out.push('<');
                out.push_str(&inner.join(", "));
                out.push('>');
            }
            PathArguments::Parenthesized(_) => return None,
        }
    }
    Some(out)
}

fn qualify_args(
    args: &syn::AngleBracketedGenericArguments,
    owner: &str,
    module: &str,
) -> Option<Vec<String>> {
    args.args
        .iter()
        .map(|arg| match arg {
            GenericArgument::Type(ty) => qualify(ty, owner, module),
            _ => None,
        })
        .collect()
}
