//! Compile-time generation of logging wrappers
//!
//! Mark an inherent `impl` block with [`log_wrap`] and every public method
//! gets a companion wrapper function: a free function that logs
//! `"<name> called"` through the [`log`](https://docs.rs/log) facade and
//! then delegates to the original method. One companion source file is
//! generated per marked type, named `<Type>_LogWrapper`.
//!
//! # Supported attributes:
//! #### on the impl block
//! `#[log_wrap(module = "crate::path", tag = "target")]`
//!
//! | attribute | description | required |
//! | --- | --- | --- |
//! | `module` | the module the type lives in, used to address the generated file and to qualify bare type names (defaults to `crate`) | no |
//! | `tag` | the log target used by the generated wrappers (defaults to `logwrap`) | no |
//!
//! #### on methods
//! `#[log_wrap(ignore)]`
//!
//! | attribute | description | required |
//! | --- | --- | --- |
//! | `ignore` | skips this method entirely | no |
//!
//! # Which methods get wrappers
//! A method is wrapped iff it is `pub`, comes from user-authored source,
//! and is not named `new`. Private methods, `new`, and ignored methods are
//! left alone. Methods whose signature cannot be rendered with a qualified
//! type name (`impl Trait`, explicit lifetimes, `dyn` types) are skipped
//! with a warning through the diagnostic sink.
//!
//! # Example
//! ```rust,ignore
//! use logwrap::{log_wrap, Environment, LogDiagnostics, FsSink, Processor, StaticResolver};
//!
//! struct Counter {
//!     value: i32,
//! }
//!
//! #[log_wrap(module = "crate::counters", tag = "counter")]
//! impl Counter {
//!     pub fn new() -> Self {
//!         Self { value: 0 }
//!     }
//!
//!     /// Bump the counter.
//!     pub fn increment(&mut self, by: i32) -> i32 {
//!         self.value += by;
//!         self.value
//!     }
//! }
//!
//! let resolver = StaticResolver::new().with::<Counter>();
//! let env = Environment {
//!     code_sink: FsSink::new("generated"),
//!     diagnostics: LogDiagnostics,
//! };
//! Processor::new(env).process(&resolver)?;
//! // -> generated/crate/counters/Counter_LogWrapper.rs
//! ```
//!
//! # Notes
//! - Enumeration order of marked types is whatever the resolver yields;
//!   only per-file content is guaranteed stable.
//! - Type qualification is syntactic and best effort; spell types with
//!   their full paths when the generated file must compile as-is.
//!
pub use logwrap_derive::log_wrap;
pub use logwrap_impl::{
    generate, generate_class, generate_function, Annotated, Class, CodeSink, Dependency,
    Diagnostics, Environment, FsSink, Function, LogDiagnostics, LogWrap, MemorySink, Origin,
    Param, Processor, Receiver, Resolver, Return, StaticResolver, TypeRef,
};
