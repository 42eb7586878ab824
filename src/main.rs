use std::process::ExitCode;

fn main() -> ExitCode {
    plotscript::cli::run()
}
