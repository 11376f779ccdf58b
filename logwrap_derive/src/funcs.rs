use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, ReturnType, Type, Visibility};

use crate::{
    attrs::{collect_docs, strip_marker, ClassMeta},
    data,
    error::Error,
    qualify::qualify,
};

pub fn expand(args: TokenStream, block: &ItemImpl) -> TokenStream {
    let meta = match ClassMeta::parse(args) {
        Ok(meta) => meta,
        Err(err) => return err.into_compile_error(),
    };

    if let Some(param) = block.generics.params.first() {
        return Error::Generics(param.span()).into_compile_error();
    }

    let Some(name) = class_name(&block.self_ty) else {
        return Error::UnsupportedSelfType(block.self_ty.span()).into_compile_error();
    };
    let owner = format!("{}::{}", meta.module, name);

    let mut stripped = block.clone();
    let mut functions = Vec::new();
    let mut errors = Vec::new();

    for item in &mut stripped.items {
        let ImplItem::Fn(func) = item else { continue };

        match strip_marker(&mut func.attrs) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(err) => {
                errors.push(err);
                continue;
            }
        }

        match collect_function(func, &owner, &meta.module) {
            Ok(function) => functions.push(function),
            Err(err) => errors.push(err.into_syn_error()),
        }
    }

    if let Some(combined) = errors.into_iter().reduce(|mut left, right| {
        left.combine(right);
        left
    }) {
        return combined.into_compile_error();
    }

    let functions = functions.iter().map(quote_function);
    let self_ty = &block.self_ty;
    let ClassMeta { module, tag } = meta;

    quote! {
        #stripped

        impl logwrap::LogWrap for #self_ty {
            fn class() -> logwrap::Class {
                logwrap::Class {
                    name: #name.into(),
                    module: #module.into(),
                    tag: #tag.into(),
                    source: ::core::option::Option::Some(
                        ::std::path::PathBuf::from(::core::file!()),
                    ),
                    functions: ::std::vec![ #( #functions ),* ],
                }
            }
        }
    }
}

fn class_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if !segment.arguments.is_none() {
        return None;
    }
    Some(segment.ident.to_string())
}

fn collect_function(func: &ImplItemFn, owner: &str, module: &str) -> Result<data::Function, Error> {
    if let Some(param) = func.sig.generics.params.first() {
        return Err(Error::Generics(param.span()));
    }

    let mut receiver = None;
    let mut params = Vec::new();

    for input in &func.sig.inputs {
        match input {
            FnArg::Receiver(recv) => {
                if recv.colon_token.is_some() {
                    return Err(Error::UnsupportedReceiver(recv.span()));
                }
                receiver = Some(match (&recv.reference, &recv.mutability) {
                    (Some(_), Some(_)) => data::Receiver::Unique,
                    (Some(_), None) => data::Receiver::Shared,
                    (None, _) => data::Receiver::Owned,
                });
            }
            FnArg::Typed(pat) => {
                let name = match &*pat.pat {
                    Pat::Ident(ident) => Some(ident.ident.to_string()),
                    _ => None,
                };
                let ty = match qualify(&pat.ty, owner, module) {
                    Some(named) => data::Ty::Named(named),
                    None => data::Ty::Unresolved,
                };
                params.push(data::Param { name, ty });
            }
        }
    }

    let ret = match &func.sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => match &**ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => None,
            ty => Some(match qualify(ty, owner, module) {
                Some(named) => data::Ty::Named(named),
                None => data::Ty::Unresolved,
            }),
        },
    };

    Ok(data::Function {
        name: func.sig.ident.to_string(),
        receiver,
        params,
        ret,
        is_async: func.sig.asyncness.is_some(),
        public: matches!(func.vis, Visibility::Public(_)),
        docs: collect_docs(&func.attrs),
    })
}

fn quote_ty(ty: &data::Ty) -> TokenStream {
    match ty {
        data::Ty::Named(name) => quote! { logwrap::TypeRef::Named(#name.into()) },
        data::Ty::Unresolved => quote! { logwrap::TypeRef::Unresolved },
    }
}

fn quote_function(func: &data::Function) -> TokenStream {
    let data::Function {
        name,
        receiver,
        params,
        ret,
        is_async,
        public,
        docs,
    } = func;

    let receiver = match receiver {
        Some(data::Receiver::Shared) => {
            quote!(::core::option::Option::Some(logwrap::Receiver::Shared))
        }
        Some(data::Receiver::Unique) => {
            quote!(::core::option::Option::Some(logwrap::Receiver::Unique))
        }
        Some(data::Receiver::Owned) => {
            quote!(::core::option::Option::Some(logwrap::Receiver::Owned))
        }
        None => quote!(::core::option::Option::None),
    };

    let params = params.iter().map(|data::Param { name, ty }| {
        let name = match name {
            Some(name) => quote!(::core::option::Option::Some(#name.into())),
            None => quote!(::core::option::Option::None),
        };
        let ty = quote_ty(ty);
        quote! { logwrap::Param { name: #name, ty: #ty } }
    });

    let ret = match ret {
        Some(ty) => {
            let ty = quote_ty(ty);
            quote!(logwrap::Return::Value(#ty))
        }
        None => quote!(logwrap::Return::Unit),
    };

    quote! {
        logwrap::Function {
            name: #name.into(),
            receiver: #receiver,
            params: ::std::vec![ #( #params ),* ],
            ret: #ret,
            is_async: #is_async,
            public: #public,
            origin: logwrap::Origin::Source,
            docs: ::std::vec![ #( ::std::string::String::from(#docs) ),* ],
        }
    }
}
