use std::io::Write;
use std::path::PathBuf;

pub use crate::processor::{
    Annotated, CodeSink, Dependency, Diagnostics, Environment, FsSink, LogDiagnostics, MemorySink,
    Processor, Resolver, StaticResolver,
};

mod processor;

/// Exposes the extracted class declaration for a marked type
pub trait LogWrap {
    /// Get the declaration recorded by the marker attribute
    fn class() -> Class;
}

/// A resolved class declaration: one marked type and its visible functions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub module: String,
    pub tag: String,
    pub source: Option<PathBuf>,
    pub functions: Vec<Function>,
}

impl Class {
    /// The module-qualified name of the wrapped type
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }

    /// Deterministic name of the companion file, without extension
    pub fn file_name(&self) -> String {
        format!("{}_LogWrapper", self.name)
    }
}

/// One visible function on a marked type
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub ret: Return,
    pub is_async: bool,
    pub public: bool,
    pub origin: Origin,
    pub docs: Vec<String>,
}

impl Function {
    /// A function gets a wrapper iff it is public, comes from user-authored
    /// source, and is not the constructor
    pub fn is_wrappable(&self) -> bool {
        self.public && self.origin == Origin::Source && self.name != "new"
    }

    /// Whether every type reference in the signature resolved to a name
    pub fn is_resolved(&self) -> bool {
        let ret_ok = !matches!(self.ret, Return::Value(TypeRef::Unresolved));
        ret_ok && self.params.iter().all(|p| matches!(p.ty, TypeRef::Named(_)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeRef,
}

/// How a function takes its owner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Unique,
    /// `self`
    Owned,
}

/// A type reference, either rendered to a qualified name or unresolvable
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    Unresolved,
}

/// Whether a function produces a value, decided once at extraction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Return {
    Value(TypeRef),
    Unit,
}

/// Where a function declaration came from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// User-authored source
    Source,
    /// Synthesized by some tool; never wrapped
    Synthesized,
}

/// Generate the companion source for a marked [`type`](LogWrap)
///
/// This'll append to the writer passed into it
pub fn generate<T>(out: &mut impl Write) -> std::io::Result<()>
where
    T: LogWrap,
{
    generate_class(out, &T::class())
}

/// Generate the full companion source for one class: a header naming the
/// wrapped type, the fixed logging import, then one wrapper per function
/// that passes the wrap filter
///
/// Functions with unresolved type references are skipped here; callers that
/// want a diagnostic for them check [`Function::is_resolved`] first.
pub fn generate_class(out: &mut impl Write, class: &Class) -> std::io::Result<()> {
    writeln!(out, "//! Generated logging wrappers for `{}`.", class.qualified_name())?;
    writeln!(out)?;
    writeln!(out, "use log::debug;")?;
    writeln!(out)?;

    for function in class.functions.iter().filter(|f| f.is_wrappable()) {
        generate_function(out, class, function)?;
    }

    Ok(())
}

/// Generate a single wrapper function
///
/// This'll append to the writer passed into it
pub fn generate_function(out: &mut impl Write, class: &Class, function: &Function) -> std::io::Result<()> {
    let Some(sig) = Signature::of(function) else {
        return Ok(());
    };

    let qualified = class.qualified_name();

    for doc in &function.docs {
        writeln!(out, "/// {doc}")?;
    }

    write!(out, "pub ")?;
    if function.is_async {
        write!(out, "async ")?;
    }
    write!(out, "fn {}(", function.name)?;

    let mut pieces = Vec::with_capacity(sig.params.len() + 1);
    match function.receiver {
        Some(Receiver::Shared) => pieces.push(format!("recv: &{qualified}")),
        Some(Receiver::Unique) => pieces.push(format!("recv: &mut {qualified}")),
        Some(Receiver::Owned) => pieces.push(format!("recv: {qualified}")),
        None => {}
    }
    for (name, ty) in &sig.params {
        pieces.push(format!("{name}: {ty}"));
    }
    write!(out, "{})", pieces.join(", "))?;

    if let Some(ty) = &sig.ret {
        write!(out, " -> {ty}")?;
    }
    writeln!(out, " {{")?;

    writeln!(out, "    debug!(target: {:?}, \"{} called\");", class.tag, function.name)?;

    let args = sig
        .params
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut call = match function.receiver {
        Some(_) => format!("recv.{}({args})", function.name),
        None => format!("{qualified}::{}({args})", function.name),
    };
    if function.is_async {
        call.push_str(".await");
    }
    match sig.ret {
        Some(_) => writeln!(out, "    {call}")?,
        None => writeln!(out, "    {call};")?,
    }

    writeln!(out, "}}")?;
    writeln!(out)
}

/// A fully rendered signature, with fallback parameter names applied
struct Signature {
    params: Vec<(String, String)>,
    ret: Option<String>,
}

impl Signature {
    /// `None` when any type reference in the function is unresolved
    fn of(function: &Function) -> Option<Self> {
        let mut params = Vec::with_capacity(function.params.len());
        for (index, param) in function.params.iter().enumerate() {
            let TypeRef::Named(ty) = &param.ty else {
                return None;
            };
            // nameless parameters get distinct synthesized names
            let name = param
                .name
                .clone()
                .unwrap_or_else(|| format!("arg{index}"));
            params.push((name, ty.clone()));
        }

        let ret = match &function.ret {
            Return::Unit => None,
            Return::Value(TypeRef::Named(ty)) => Some(ty.clone()),
            Return::Value(TypeRef::Unresolved) => return None,
        };

        Some(Self { params, ret })
    }
}
