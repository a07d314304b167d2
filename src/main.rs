// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2026 Pegasus Heavy Industries, LLC

//! Flint - A compact bytecode scripting engine, written in Rust
//!
//! This is the main entry point for the flint CLI/REPL.
//!
//! ## Features
//!
//! - Interactive REPL with syntax highlighting and history
//! - Script file execution with conventional exit codes
//! - Inline expression evaluation with `-e`

mod repl;

use clap::Parser;
use flint_vm::{InterpretError, Vm};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for a script that failed to compile.
const EXIT_COMPILE_ERROR: u8 = 65;
/// Exit code for a script that faulted while running.
const EXIT_RUNTIME_ERROR: u8 = 70;

/// The Flint scripting language.
#[derive(Debug, Parser)]
#[command(name = "flint", version, about, long_about = None)]
struct Cli {
    /// Script file to execute; starts the REPL when omitted
    script: Option<PathBuf>,

    /// Evaluate an expression and print its value
    #[arg(short, long, value_name = "CODE", conflicts_with = "script")]
    eval: Option<String>,
}

fn main() -> ExitCode {
    // Diagnostics go to stderr so they never mix with evaluated output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(code) = cli.eval {
        return run_eval(&code);
    }
    if let Some(path) = cli.script {
        return run_file(&path);
    }
    run_repl()
}

/// Start the interactive REPL
fn run_repl() -> ExitCode {
    match repl::Repl::new() {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Execute a Flint script from a file.
fn run_file(path: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "{}: could not read '{}': {}",
                "Error".red().bold(),
                path.display().cyan(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let mut vm = Vm::new();
    match vm.interpret(&source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Evaluate an expression from the command line and print its value.
fn run_eval(code: &str) -> ExitCode {
    let mut vm = Vm::new();
    match vm.interpret(code) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Print an interpretation failure and map it to the conventional exit
/// code for its phase.
fn report(error: &InterpretError) -> ExitCode {
    eprintln!("{}", error.to_string().red());
    match error {
        InterpretError::Compile(_) => ExitCode::from(EXIT_COMPILE_ERROR),
        InterpretError::Runtime(_) => ExitCode::from(EXIT_RUNTIME_ERROR),
    }
}
