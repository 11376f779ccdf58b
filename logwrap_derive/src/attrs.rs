use proc_macro2::TokenStream;
use syn::{parse::Parser, spanned::Spanned, Attribute, Expr, ExprLit, Lit, LitStr};

use crate::error::Error;

/// Arguments of the class-level marker
pub struct ClassMeta {
    pub module: String,
    pub tag: String,
}

impl ClassMeta {
    pub fn parse(args: TokenStream) -> Result<Self, Error> {
        let mut module = String::new();
        let mut tag = String::new();

        if !args.is_empty() {
            syn::meta::parser(|meta| {
                if meta.path.is_ident("module") {
                    if !module.is_empty() {
                        return Err(Error::DuplicateAttr(meta.path.span()).into_syn_error());
                    }
                    module = parse_value(&meta)?;
                    return Ok(());
                }

                if meta.path.is_ident("tag") {
                    if !tag.is_empty() {
                        return Err(Error::DuplicateAttr(meta.path.span()).into_syn_error());
                    }
                    tag = parse_value(&meta)?;
                    return Ok(());
                }

                let raw = meta.path.require_ident()?.to_string();
                Err(meta.error(format!("unknown ident: {raw}, supported: module, tag")))
            })
            .parse2(args)?;
        }

        if module.is_empty() {
            module = "crate".to_string();
        }
        if tag.is_empty() {
            tag = "logwrap".to_string();
        }

        Ok(Self { module, tag })
    }
}

fn parse_value(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<String, syn::Error> {
    let value = meta.value()?;
    let lit = value.parse::<LitStr>()?;
    let data = lit.value();
    if data.trim().is_empty() {
        return Err(Error::EmptyAttr(lit.span()).into_syn_error());
    }
    Ok(data)
}

/// Removes every `#[log_wrap(..)]` attribute from a method, returning
/// whether the method asked to be ignored
pub fn strip_marker(attrs: &mut Vec<Attribute>) -> Result<bool, syn::Error> {
    let mut ignore = false;
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("log_wrap") {
            kept.push(attr);
            continue;
        }

        attr.meta.require_list()?.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                ignore = true;
                return Ok(());
            }
            let raw = meta.path.require_ident()?.to_string();
            Err(meta.error(format!("unknown ident: {raw}, supported: ignore")))
        })?;
    }

    *attrs = kept;
    Ok(ignore)
}

pub fn collect_docs(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter_map(|attr| {
            let nv = attr.meta.require_name_value().ok()?;
            if !nv.path.is_ident("doc") {
                return None;
            }
            match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) => Some(lit.value().trim().to_string()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn defaults_apply_when_no_args_given() {
        let meta = ClassMeta::parse(TokenStream::new()).unwrap();
        assert_eq!(meta.module, "crate");
        assert_eq!(meta.tag, "logwrap");
    }

    #[test]
    fn module_and_tag_are_parsed() {
        let meta = ClassMeta::parse(quote!(module = "crate::shapes", tag = "shape")).unwrap();
        assert_eq!(meta.module, "crate::shapes");
        assert_eq!(meta.tag, "shape");
    }

    #[test]
    fn duplicate_and_empty_values_are_rejected() {
        assert!(ClassMeta::parse(quote!(module = "a", module = "b")).is_err());
        assert!(ClassMeta::parse(quote!(tag = "  ")).is_err());
        assert!(ClassMeta::parse(quote!(nope = "x")).is_err());
    }

    #[test]
    fn marker_attrs_are_stripped_from_methods() {
        let mut attrs = vec![
            syn::parse_quote!(#[log_wrap(ignore)]),
            syn::parse_quote!(#[inline]),
        ];
        assert!(strip_marker(&mut attrs).unwrap());
        assert_eq!(attrs.len(), 1);
        assert!(attrs[0].path().is_ident("inline"));
    }

    #[test]
    fn doc_lines_are_collected() {
        let attrs: Vec<Attribute> = vec![
            syn::parse_quote!(#[doc = " Touch the foo."]),
            syn::parse_quote!(#[inline]),
            syn::parse_quote!(#[doc = " Twice."]),
        ];
        assert_eq!(collect_docs(&attrs), ["Touch the foo.", "Twice."]);
    }
}
