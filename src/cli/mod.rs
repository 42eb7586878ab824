//! The plotscript command-line interface.
//!
//! Parses arguments, installs the log subscriber and dispatches to the REPL,
//! one-shot evaluation or the procedure listing.

use std::io;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::args::{Command, PlotscriptArgs};
use crate::diagnostics::PlotscriptError;
use crate::engine::{Interpreter, InterpreterConfig};
use crate::render::Scene;
use crate::repl::{self, EVAL_STACK_SIZE};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = PlotscriptArgs::parse();
    init_logging(args.session.verbose);
    let config = args.session.interpreter_config();

    let result = match args.command {
        None | Some(Command::Repl) => handle_repl(config),
        Some(Command::Eval { expr, json }) => handle_eval(expr, json, config),
        Some(Command::ListProcedures) => handle_list_procedures(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a log subscriber was already installed");
    }
}

fn handle_repl(config: InterpreterConfig) -> Result<(), PlotscriptError> {
    Ok(repl::run_repl(config)?)
}

/// Evaluates on a large-stack thread, as the REPL kernel does.
fn handle_eval(source: String, json: bool, config: InterpreterConfig) -> Result<(), PlotscriptError> {
    let worker = thread::Builder::new()
        .name("plotscript-eval".into())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(move || evaluate_source(&source, json, config))?;
    worker
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("evaluation thread panicked").into()))
}

fn evaluate_source(source: &str, json: bool, config: InterpreterConfig) -> Result<(), PlotscriptError> {
    let mut interpreter = Interpreter::with_config(config)?;
    let result = interpreter.run(source)?;
    if json {
        let text = Scene::from_expression(&result)?.to_json()?;
        output::print_json(&text);
    } else {
        output::print_result(&result);
    }
    Ok(())
}

fn handle_list_procedures(config: InterpreterConfig) -> Result<(), PlotscriptError> {
    let interpreter = Interpreter::with_config(config)?;
    output::print_procedures(&interpreter.environment().procedure_names());
    Ok(())
}
