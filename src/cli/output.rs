//! User-facing output for the CLI: results, scene JSON and diagnostics.

use std::io::Write;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Expression;
use crate::diagnostics::PlotscriptError;

/// Prints an evaluation result in its display form.
pub fn print_result(result: &Expression) {
    println!("{}", result);
}

pub fn print_json(json: &str) {
    println!("{}", json);
}

/// Prints one procedure name per line.
pub fn print_procedures(names: &[String]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for name in names {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(stdout, "{}", name);
        let _ = stdout.reset();
        let _ = writeln!(stdout);
    }
}

/// Prints an error to stderr. Parse errors go through miette for a labelled snippet.
pub fn print_error(error: PlotscriptError) {
    match error {
        PlotscriptError::Parse(parse) => eprintln!("{:?}", Report::new(parse)),
        other => {
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
            let _ = writeln!(stderr, "{}", other);
            let _ = stderr.reset();
        }
    }
}
