//! mlisp-drv - REPL driver
//!
//! The embedding contract (`mlisp-runtime::Interpreter`) is the whole
//! interpreter; this crate is only the thin host shell spec.md §1 keeps
//! out of the core — argument parsing, file/stdin reading, and printing
//! results with some color, the same job `original_source/repl.c`'s
//! `main` does for the C original: register printers, create the
//! interpreter, read a line at a time, evaluate, destroy on exit.
//!
//! USAGE:
//!
//! Run the REPL, reading one line at a time from stdin:
//!   mlisp
//!
//! Evaluate a file and exit:
//!   mlisp program.mlisp
//!
//! Options:
//!   --heap-bytes N   semispace size passed to `Interpreter::create` (default 40000)
//!   --no-color       disable ANSI coloring of the output/error sinks

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use mlisp_heap::Handle;
use mlisp_runtime::Interpreter;

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Driver configuration. Grounded on `original_source/repl.c`'s hardcoded
/// `lisp_create(40000)` for the default heap size.
#[derive(Debug, Clone)]
pub struct Config {
    /// A source file to evaluate once and exit, or `None` to run the
    /// line-at-a-time REPL against stdin.
    pub source: Option<PathBuf>,
    pub heap_bytes: usize,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: None,
            heap_bytes: 40_000,
            color: true,
        }
    }
}

impl Config {
    /// Hand-rolled argument parsing, no `clap`: `mlisp [--heap-bytes N]
    /// [--no-color] [file]`. The first argument not recognized as a flag
    /// is taken as the source file.
    pub fn parse_args(args: impl Iterator<Item = String>) -> Result<Config, DrvError> {
        let mut config = Config::default();
        let mut args = args.into_iter();
        args.next(); // argv[0]
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--heap-bytes" => {
                    let value = args
                        .next()
                        .ok_or_else(|| DrvError::InvalidArguments("--heap-bytes requires a value".into()))?;
                    config.heap_bytes = value
                        .parse()
                        .map_err(|_| DrvError::InvalidArguments(format!("not a number: {value}")))?;
                }
                "--no-color" => config.color = false,
                other => config.source = Some(PathBuf::from(other)),
            }
        }
        Ok(config)
    }
}

/// Driver-level error, collapsing into `anyhow::Error` at the process
/// boundary (`main` below) the way the teacher's own `CompileError` does
/// for its driver.
#[derive(Debug)]
pub enum DrvError {
    InvalidArguments(String),
    Io(PathBuf, io::Error),
    Runtime(mlisp_runtime::RuntimeError),
}

impl std::fmt::Display for DrvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrvError::InvalidArguments(s) => write!(f, "invalid arguments: {s}"),
            DrvError::Io(path, e) => write!(f, "failed to read {}: {e}", path.display()),
            DrvError::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DrvError {}

impl From<mlisp_runtime::RuntimeError> for DrvError {
    fn from(e: mlisp_runtime::RuntimeError) -> Self {
        DrvError::Runtime(e)
    }
}

/// One REPL invocation's state: the interpreter, the global environment
/// `create` seeded, and the configuration that built both.
pub struct Session {
    interpreter: Interpreter,
    env: Handle,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, DrvError> {
        let mut interpreter = Interpreter::new();
        let env = interpreter.create(config.heap_bytes)?;
        let color = config.color;
        interpreter.set_printers(
            move |s: &str| {
                if color {
                    println!("{ANSI_GREEN}{s}{ANSI_RESET}");
                } else {
                    println!("{s}");
                }
            },
            move |s: &str| {
                if color {
                    eprintln!("{ANSI_RED}{s}{ANSI_RESET}");
                } else {
                    eprintln!("{s}");
                }
            },
        );
        Ok(Session { interpreter, env, config })
    }

    pub fn run(&mut self) -> Result<(), DrvError> {
        match self.config.source.clone() {
            Some(path) => self.run_file(&path),
            None => self.run_repl(),
        }
    }

    fn run_file(&mut self, path: &Path) -> Result<(), DrvError> {
        let text = std::fs::read_to_string(path).map_err(|e| DrvError::Io(path.to_path_buf(), e))?;
        let _ = self.interpreter.eval_source(&self.env, &text);
        Ok(())
    }

    /// One line-at-a-time loop, the same shape as
    /// `original_source/repl.c`'s `fgets`-then-`lisp_eval` loop: a form
    /// that errors is reported to the error sink and the loop carries on
    /// to the next line regardless (spec §7: "the interpreter instance
    /// remains usable afterwards").
    fn run_repl(&mut self) -> Result<(), DrvError> {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.map_err(|e| DrvError::Io(PathBuf::from("<stdin>"), e))?;
            let _ = self.interpreter.eval_source(&self.env, &line);
        }
        Ok(())
    }
}

/// Entry point `main.rs` calls; collapses every error into
/// `anyhow::Error` at the process boundary (spec §2.1).
pub fn main() -> anyhow::Result<()> {
    let config = Config::parse_args(std::env::args())?;
    let mut session = Session::new(config)?;
    session.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_defaults_to_stdin_repl() {
        let config = Config::parse_args(["mlisp".to_string()].into_iter()).unwrap();
        assert!(config.source.is_none());
        assert_eq!(config.heap_bytes, 40_000);
        assert!(config.color);
    }

    #[test]
    fn parse_args_reads_heap_bytes_and_no_color() {
        let config = Config::parse_args(
            ["mlisp".to_string(), "--heap-bytes".to_string(), "8000".to_string(), "--no-color".to_string()].into_iter(),
        )
        .unwrap();
        assert_eq!(config.heap_bytes, 8000);
        assert!(!config.color);
    }

    #[test]
    fn parse_args_takes_a_bare_path_as_the_source_file() {
        let config = Config::parse_args(["mlisp".to_string(), "program.mlisp".to_string()].into_iter()).unwrap();
        assert_eq!(config.source, Some(PathBuf::from("program.mlisp")));
    }

    #[test]
    fn missing_heap_bytes_value_is_invalid_arguments() {
        let err = Config::parse_args(["mlisp".to_string(), "--heap-bytes".to_string()].into_iter()).unwrap_err();
        assert!(matches!(err, DrvError::InvalidArguments(_)));
    }

    #[test]
    fn session_runs_a_file_to_completion() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mlisp-drv-test-{}.mlisp", std::process::id()));
        std::fs::write(&path, "(define x 1) (print (+ x 1))").unwrap();
        let mut config = Config::default();
        config.source = Some(path.clone());
        let mut session = Session::new(config).unwrap();
        session.run().unwrap();
        std::fs::remove_file(&path).unwrap();
    }
}
