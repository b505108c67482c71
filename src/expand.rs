//! Expansion driver: walk every file's top-level functions, expand each
//! eligible type switch from its call-site witnesses, and hand the
//! re-formatted bytes to the host's per-file writer.
//!
//! Error policy: a rejected view or an unmatched incoming type is skipped
//! silently (the template stays as the runtime fallback); per-file write
//! failures are logged and processing continues with the next file. Only
//! program load and analysis are fatal, and they happen before any file
//! is touched.

use crate::analysis;
use crate::collect;
use crate::error::Error;
use crate::oracle::{CallGraph, TypeOracle};
use crate::program::Program;
use crate::view::TypeSwitchView;
use go_syntax::ast::{Stmt, TopLevelDecl};
use go_syntax::print_file;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Host-facing options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Overwrite input files instead of writing to stdout.
    pub write: bool,
    /// Package anchoring call-graph analysis; empty means the loaded
    /// files' own packages.
    pub main_pkg: String,
    /// Trace diagnostics to stderr.
    pub verbose: bool,
}

pub struct Rewriter {
    pub options: Options,
}

impl Rewriter {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Expand every file in the program, then emit each file through
    /// `writer_for`. Returning `None` from `writer_for` skips the file's
    /// output (it is still expanded, since its types may feed others).
    ///
    /// The writer is closed (dropped) exactly once per file, on success
    /// and failure paths alike.
    pub fn rewrite_files<F>(&self, program: &mut Program, mut writer_for: F) -> Result<(), Error>
    where
        F: FnMut(&Path) -> Option<Box<dyn Write>>,
    {
        let main_pkg = (!self.options.main_pkg.is_empty()).then_some(self.options.main_pkg.as_str());
        let analysis = analysis::analyze(program, main_pkg)?;

        self.expand_program(program, &analysis);

        for loaded in &program.files {
            let Some(mut writer) = writer_for(&loaded.path) else {
                continue;
            };
            let formatted = print_file(&program.arena, &program.interner, &loaded.file);
            let result = writer
                .write_all(formatted.as_bytes())
                .and_then(|()| writer.flush());
            if let Err(source) = result {
                let err = Error::Write {
                    path: loaded.path.clone(),
                    source,
                };
                warn!(error = %err, "continuing with the next file");
            }
            drop(writer);
        }
        Ok(())
    }

    /// Expand all switches in place without emitting anything.
    pub fn expand_program<O>(&self, program: &mut Program, oracle: &O) -> usize
    where
        O: TypeOracle + CallGraph,
    {
        let mut total = 0;
        for file_idx in 0..program.files.len() {
            total += self.expand_file(program, oracle, file_idx);
        }
        total
    }

    fn expand_file<O>(&self, program: &mut Program, oracle: &O, file_idx: usize) -> usize
    where
        O: TypeOracle + CallGraph,
    {
        let decls: Vec<_> = program
            .arena
            .top_decls(program.files[file_idx].file.decls)
            .to_vec();

        let mut generated = 0;
        for decl in decls {
            let TopLevelDecl::Func(func_id) = decl else {
                continue;
            };
            let func = program.arena.funcs[func_id];
            let Some(body) = func.body else {
                // Declaration without source; nothing to scan.
                continue;
            };
            let func_name = program.interner.resolve(func.name).to_string();

            // Only the body's top-level statements are scanned; nested
            // switches are left alone.
            let stmts: Vec<_> = program.arena.stmts_list(body.stmts).to_vec();
            for stmt in stmts {
                if !matches!(program.arena.stmts[stmt], Stmt::TypeSwitch { .. }) {
                    continue;
                }
                let Some(view) =
                    TypeSwitchView::from_stmt(&program.arena, &program.interner, stmt, oracle)
                else {
                    debug!(func = func_name, "type switch rejected; skipping");
                    continue;
                };
                if !view.has_templates() {
                    continue;
                }

                let incoming = collect::incoming_types_for(
                    &program.arena,
                    &func_name,
                    func_id,
                    view.target,
                    oracle,
                );
                debug!(
                    func = func_name,
                    incoming = incoming.len(),
                    "expanding type switch"
                );
                generated +=
                    view.expand(&mut program.arena, &mut program.interner, oracle, &incoming);
            }
        }
        generated
    }
}

/// Convenience pipeline: expand one in-memory source with the bundled
/// analysis and return the formatted result.
pub fn expand_source(src: &str, options: &Options) -> Result<String, Error> {
    let mut program = Program::from_sources(&[("input.go", src)])?;
    let main_pkg = (!options.main_pkg.is_empty()).then_some(options.main_pkg.as_str());
    let analysis = analysis::analyze(&program, main_pkg)?;
    let rewriter = Rewriter::new(options.clone());
    rewriter.expand_program(&mut program, &analysis);
    Ok(print_file(
        &program.arena,
        &program.interner,
        &program.files[0].file,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_src(src: &str) -> String {
        expand_source(src, &Options::default()).expect("expand")
    }

    #[test]
    fn nested_switches_are_not_scanned() {
        let src = r#"
package p

type T interface{}

func main() {
	Foo(map[string]int{})
}

func Foo(x interface{}) {
	if true {
		switch x := x.(type) {
		case map[string]T:
			_ = x
		}
	}
}
"#;
        let out = expand_src(src);
        assert!(!out.contains("case map[string]int:"), "{out}");
    }

    #[test]
    fn top_level_switch_expands() {
        let src = r#"
package p

type T interface{}

func main() {
	Foo(map[string]int{})
}

func Foo(x interface{}) {
	switch x := x.(type) {
	case map[string]T:
		_ = x
	}
}
"#;
        let out = expand_src(src);
        assert!(out.contains("case map[string]int:"), "{out}");
        assert!(out.contains("case map[string]T:"), "{out}");
    }
}
