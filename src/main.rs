use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use tsgen::{analysis, expand, program::Program, sort};

#[derive(Parser)]
#[command(name = "tsgen", version, about = "Expand or sort type switch case clauses")]
struct Args {
    /// What to do with the file's type switches
    #[arg(value_enum)]
    mode: Mode,

    /// Go source file to process
    file: PathBuf,

    /// Overwrite the input file instead of printing to stdout
    #[arg(short = 'w', long)]
    write: bool,

    /// Package anchoring call-graph analysis (default: the file's package)
    #[arg(long = "main", value_name = "PKG", default_value = "")]
    main_pkg: String,

    /// Diagnostic tracing on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Inflate template clauses from call-site argument types
    Expand,
    /// Reorder case clauses by interface popularity
    Sort,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tsgen: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), tsgen::Error> {
    let mut program = Program::load(std::slice::from_ref(&args.file))?;

    match args.mode {
        Mode::Expand => {
            let options = expand::Options {
                write: args.write,
                main_pkg: args.main_pkg.clone(),
                verbose: args.verbose,
            };
            let rewriter = expand::Rewriter::new(options);
            let target = args.file.clone();
            let write = args.write;
            rewriter.rewrite_files(&mut program, move |path| {
                if path != target.as_path() {
                    return None;
                }
                if write {
                    match std::fs::File::create(path) {
                        Ok(file) => Some(Box::new(file) as Box<dyn Write>),
                        Err(err) => {
                            eprintln!("tsgen: {}: {err}", path.display());
                            None
                        }
                    }
                } else {
                    Some(Box::new(std::io::stdout()))
                }
            })?;
        }
        Mode::Sort => {
            let oracle = analysis::analyze(&program, None)?;
            let source_file = program.files[0].file;
            let path = program.files[0].path.clone();
            sort::sort_file_type_switches(
                &mut program.arena,
                &program.interner,
                &source_file,
                &oracle,
            );
            let formatted =
                go_syntax::print_file(&program.arena, &program.interner, &source_file);
            if args.write {
                // Write failures are logged, never fatal.
                if let Err(source) = std::fs::write(&path, formatted) {
                    let err = tsgen::Error::Write { path, source };
                    tracing::warn!(error = %err, "continuing");
                }
            } else {
                print!("{formatted}");
            }
        }
    }

    Ok(())
}
