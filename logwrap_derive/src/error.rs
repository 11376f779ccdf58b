#[derive(Debug)]
pub enum Error {
    Syn(syn::Error),
    Generics(proc_macro2::Span),
    UnsupportedReceiver(proc_macro2::Span),
    UnsupportedSelfType(proc_macro2::Span),
    DuplicateAttr(proc_macro2::Span),
    EmptyAttr(proc_macro2::Span),
}

impl From<syn::Error> for Error {
    fn from(value: syn::Error) -> Self {
        Self::Syn(value)
    }
}

impl Error {
    pub fn into_syn_error(self) -> syn::Error {
        let (span, msg) = match self {
            Self::Syn(syn) => return syn,
            Self::Generics(span) => (span, "generic parameters are not supported"),
            Self::UnsupportedReceiver(span) => {
                (span, "only `self`, `&self` and `&mut self` receivers are supported")
            }
            Self::UnsupportedSelfType(span) => (span, "expected a plain type name"),
            Self::DuplicateAttr(span) => (span, "duplicate attribute found"),
            Self::EmptyAttr(span) => (span, "attribute cannot be empty"),
        };
        syn::Error::new(span, msg)
    }

    pub fn into_compile_error(self) -> proc_macro2::TokenStream {
        self.into_syn_error().into_compile_error()
    }
}
