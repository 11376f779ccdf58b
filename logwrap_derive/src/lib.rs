use syn::{parse_macro_input, Item};

#[proc_macro_attribute]
pub fn log_wrap(
    args: proc_macro::TokenStream,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    let item = parse_macro_input!(input as Item);
    match &item {
        Item::Impl(block) if block.trait_.is_none() => funcs::expand(args, block).into(),
        // the marker on anything else is not an error, the item is kept as-is
        _ => quote::quote!(#item).into(),
    }
}

mod attrs;
mod data;
mod error;
mod funcs;
mod qualify;
