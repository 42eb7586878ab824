//! Command-line arguments and subcommands for the plotscript binary.

use clap::{Args, Parser, Subcommand};

use crate::engine::InterpreterConfig;
use crate::runtime::DEFAULT_MAX_DEPTH;

#[derive(Debug, Parser)]
#[command(
    name = "plotscript",
    version,
    about = "A small Scheme-like language with complex arithmetic and plot geometry."
)]
pub struct PlotscriptArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Runs the REPL when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Log interpreter activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ceiling on nested evaluation frames.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Start without the make-point, make-line and make-text constructors.
    #[arg(long, global = true)]
    pub no_prelude: bool,
}

impl SessionArgs {
    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            max_depth: self.max_depth,
            load_prelude: !self.no_prelude,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive REPL.
    Repl,
    /// Evaluate one expression and print the result.
    Eval {
        /// The program text, e.g. "(+ 1 2)".
        #[arg(required = true)]
        expr: String,
        /// Print the rendered scene as JSON instead of the display form.
        #[arg(long)]
        json: bool,
    },
    /// List the built-in procedures.
    ListProcedures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_interpreter_config() {
        let args = PlotscriptArgs::parse_from(["plotscript", "eval", "(+ 1 2)", "--max-depth", "8", "--no-prelude"]);
        let config = args.session.interpreter_config();
        assert_eq!(config.max_depth, 8);
        assert!(!config.load_prelude);
        assert!(matches!(args.command, Some(Command::Eval { json: false, .. })));
    }

    #[test]
    fn no_subcommand_means_repl() {
        let args = PlotscriptArgs::parse_from(["plotscript"]);
        assert!(args.command.is_none());
        assert_eq!(args.session.interpreter_config(), InterpreterConfig::default());
    }
}
