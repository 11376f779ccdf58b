use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{generate_class, Class, LogWrap};

/// A declaration carrying the marker annotation
///
/// Only class declarations produce output; anything else the marker landed
/// on is carried through so the processor can discard it silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Annotated {
    Class(Class),
    Other { name: String },
}

/// The symbol-resolution interface
///
/// A resolver yields every declaration carrying the marker, with visible
/// functions (own and inherited) already enumerated, origin-tagged, and
/// their type references resolved. Enumeration order is whatever the
/// resolver produces; nothing downstream may assume it is stable.
pub trait Resolver {
    fn annotated_symbols(&self) -> Vec<Annotated>;
}

/// A resolver over types registered at compile time through the marker
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    symbols: Vec<Annotated>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a marked type
    pub fn with<T: LogWrap>(mut self) -> Self {
        self.symbols.push(Annotated::Class(T::class()));
        self
    }

    /// Register an arbitrary annotated symbol, for hand-rolled harnesses
    pub fn push(&mut self, symbol: Annotated) {
        self.symbols.push(symbol);
    }
}

impl Resolver for StaticResolver {
    fn annotated_symbols(&self) -> Vec<Annotated> {
        self.symbols.clone()
    }
}

/// The code-emission sink: creates output files addressed by module path
/// and file name, recording `origin` as the incremental dependency
pub trait CodeSink {
    fn create_file(
        &mut self,
        module: &str,
        name: &str,
        origin: Option<&Path>,
    ) -> io::Result<Box<dyn Write>>;
}

/// An input file a generated file was derived from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub generated: PathBuf,
    pub origin: PathBuf,
}

/// A sink writing generated files under a root directory, one `.rs` file
/// per class, nested by module path
#[derive(Debug)]
pub struct FsSink {
    root: PathBuf,
    dependencies: Vec<Dependency>,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dependencies: Vec::new(),
        }
    }

    /// The (generated, origin) pairs recorded so far, for hosts that
    /// invalidate generated files when their inputs change
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

impl CodeSink for FsSink {
    fn create_file(
        &mut self,
        module: &str,
        name: &str,
        origin: Option<&Path>,
    ) -> io::Result<Box<dyn Write>> {
        let mut path = self.root.clone();
        for segment in module.split("::") {
            path.push(segment);
        }
        fs::create_dir_all(&path)?;
        path.push(format!("{name}.rs"));

        if let Some(origin) = origin {
            self.dependencies.push(Dependency {
                generated: path.clone(),
                origin: origin.to_path_buf(),
            });
        }

        Ok(Box::new(BufWriter::new(fs::File::create(path)?)))
    }
}

/// An in-memory sink for test harnesses
///
/// Clones share the underlying map, so a handle kept before processing can
/// read the files written through the sink afterwards. Content is committed
/// when the processor releases the file writer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The content of one generated file, if it was written
    pub fn file(&self, module: &str, name: &str) -> Option<String> {
        let files = self.files.borrow();
        let content = files.get(&Self::key(module, name))?;
        Some(String::from_utf8_lossy(content).into_owned())
    }

    /// Paths of every generated file, in sorted order
    pub fn paths(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    fn key(module: &str, name: &str) -> String {
        format!("{}/{name}.rs", module.replace("::", "/"))
    }
}

struct MemoryFile {
    key: String,
    buf: Vec<u8>,
    files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.files.borrow_mut().insert(std::mem::take(&mut self.key), buf);
    }
}

impl CodeSink for MemorySink {
    fn create_file(
        &mut self,
        module: &str,
        name: &str,
        _origin: Option<&Path>,
    ) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(MemoryFile {
            key: Self::key(module, name),
            buf: Vec::new(),
            files: Rc::clone(&self.files),
        }))
    }
}

/// The diagnostic sink
pub trait Diagnostics {
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Forwards diagnostics to the `log` facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, message: &str) {
        log::warn!(target: "logwrap", "{message}");
    }

    fn error(&mut self, message: &str) {
        log::error!(target: "logwrap", "{message}");
    }
}

/// A collecting sink for test harnesses
impl Diagnostics for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(format!("warning: {message}"));
    }

    fn error(&mut self, message: &str) {
        self.push(format!("error: {message}"));
    }
}

/// The host environment: a code-emission sink and a diagnostic sink
#[derive(Debug)]
pub struct Environment<S, D> {
    pub code_sink: S,
    pub diagnostics: D,
}

/// The wrapper processor: one generated file per annotated class
#[derive(Debug)]
pub struct Processor<S, D> {
    env: Environment<S, D>,
}

impl<S: CodeSink, D: Diagnostics> Processor<S, D> {
    /// Construct a processor for the given environment
    pub fn new(env: Environment<S, D>) -> Self {
        Self { env }
    }

    /// Run one generation pass over the resolver
    ///
    /// Annotated symbols that are not classes are discarded silently. An
    /// I/O failure aborts the pass; files for classes already completed
    /// remain in the sink. The returned symbols would be deferred to a
    /// later round; this processor defers nothing.
    pub fn process(&mut self, resolver: &dyn Resolver) -> io::Result<Vec<Annotated>> {
        for symbol in resolver.annotated_symbols() {
            let Annotated::Class(class) = symbol else {
                continue;
            };
            self.generate_one(&class)?;
        }
        Ok(Vec::new())
    }

    /// Hand the environment back, releasing the processor
    pub fn into_environment(self) -> Environment<S, D> {
        self.env
    }

    fn generate_one(&mut self, class: &Class) -> io::Result<()> {
        for function in &class.functions {
            if function.is_wrappable() && !function.is_resolved() {
                self.env.diagnostics.warn(&format!(
                    "skipping `{}::{}`: unresolved type reference",
                    class.qualified_name(),
                    function.name
                ));
            }
        }

        let mut out = self.env.code_sink.create_file(
            &class.module,
            &class.file_name(),
            class.source.as_deref(),
        )?;
        generate_class(&mut out, class)?;
        out.flush()
        // writer dropped here on every path, releasing the file handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Function, Origin, Param, Receiver, Return, TypeRef};

    fn class(name: &str, functions: Vec<Function>) -> Class {
        Class {
            name: name.into(),
            module: "crate::p".into(),
            tag: "logwrap".into(),
            source: Some(PathBuf::from("src/p.rs")),
            functions,
        }
    }

    fn function(name: &str) -> Function {
        Function {
            name: name.into(),
            receiver: Some(Receiver::Shared),
            params: vec![],
            ret: Return::Unit,
            is_async: false,
            public: true,
            origin: Origin::Source,
            docs: vec![],
        }
    }

    fn resolver(symbols: Vec<Annotated>) -> StaticResolver {
        let mut resolver = StaticResolver::new();
        for symbol in symbols {
            resolver.push(symbol);
        }
        resolver
    }

    #[test]
    fn one_file_per_class_and_nothing_deferred() {
        let sink = MemorySink::new();
        let mut processor = Processor::new(Environment {
            code_sink: sink.clone(),
            diagnostics: Vec::<String>::new(),
        });

        let deferred = processor
            .process(&resolver(vec![
                Annotated::Class(class("Foo", vec![function("touch")])),
                Annotated::Class(class("Bar", vec![])),
                Annotated::Other { name: "helper".into() },
            ]))
            .unwrap();

        assert!(deferred.is_empty());
        assert_eq!(
            sink.paths(),
            ["crate/p/Bar_LogWrapper.rs", "crate/p/Foo_LogWrapper.rs"]
        );

        let content = sink.file("crate::p", "Foo_LogWrapper").unwrap();
        assert!(content.starts_with("//! Generated logging wrappers for `crate::p::Foo`.\n"));
        assert!(content.contains("use log::debug;\n"));
        assert!(content.contains("pub fn touch(recv: &crate::p::Foo) {\n"));
    }

    #[test]
    fn repeated_passes_are_byte_identical() {
        let sink = MemorySink::new();
        let mut processor = Processor::new(Environment {
            code_sink: sink.clone(),
            diagnostics: Vec::<String>::new(),
        });
        let input = resolver(vec![Annotated::Class(class("Foo", vec![function("touch")]))]);

        processor.process(&input).unwrap();
        let first = sink.file("crate::p", "Foo_LogWrapper").unwrap();
        processor.process(&input).unwrap();
        let second = sink.file("crate::p", "Foo_LogWrapper").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn unresolved_member_is_reported_and_skipped() {
        let sink = MemorySink::new();
        let mut processor = Processor::new(Environment {
            code_sink: sink.clone(),
            diagnostics: Vec::<String>::new(),
        });

        let broken = Function {
            params: vec![Param {
                name: Some("cb".into()),
                ty: TypeRef::Unresolved,
            }],
            ..function("broken")
        };
        processor
            .process(&resolver(vec![Annotated::Class(class(
                "Foo",
                vec![broken, function("fine")],
            ))]))
            .unwrap();

        let env = processor.into_environment();
        assert_eq!(
            env.diagnostics,
            ["warning: skipping `crate::p::Foo::broken`: unresolved type reference"]
        );

        let content = sink.file("crate::p", "Foo_LogWrapper").unwrap();
        assert!(!content.contains("broken"));
        assert!(content.contains("pub fn fine"));
    }

    #[test]
    fn fs_sink_writes_under_the_module_path_and_records_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let mut processor = Processor::new(Environment {
            code_sink: FsSink::new(dir.path()),
            diagnostics: LogDiagnostics,
        });

        processor
            .process(&resolver(vec![Annotated::Class(class(
                "Foo",
                vec![function("touch")],
            ))]))
            .unwrap();

        let generated = dir.path().join("crate/p/Foo_LogWrapper.rs");
        let content = fs::read_to_string(&generated).unwrap();
        assert!(content.contains("pub fn touch"));

        let env = processor.into_environment();
        assert_eq!(
            env.code_sink.dependencies(),
            [Dependency {
                generated,
                origin: PathBuf::from("src/p.rs"),
            }]
        );
    }

    #[test]
    fn write_failure_aborts_the_pass_but_keeps_finished_files() {
        struct FailAfter {
            inner: MemorySink,
            remaining: usize,
        }

        impl CodeSink for FailAfter {
            fn create_file(
                &mut self,
                module: &str,
                name: &str,
                origin: Option<&Path>,
            ) -> io::Result<Box<dyn Write>> {
                if self.remaining == 0 {
                    return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
                }
                self.remaining -= 1;
                self.inner.create_file(module, name, origin)
            }
        }

        let sink = MemorySink::new();
        let mut processor = Processor::new(Environment {
            code_sink: FailAfter {
                inner: sink.clone(),
                remaining: 1,
            },
            diagnostics: Vec::<String>::new(),
        });

        let err = processor
            .process(&resolver(vec![
                Annotated::Class(class("Foo", vec![function("touch")])),
                Annotated::Class(class("Bar", vec![])),
            ]))
            .unwrap_err();

        assert_eq!(err.to_string(), "sink full");
        assert_eq!(sink.paths(), ["crate/p/Foo_LogWrapper.rs"]);
    }
}
