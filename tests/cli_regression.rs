// CLI regression tests for the plotscript binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn plotscript() -> Command {
    Command::cargo_bin("plotscript").unwrap()
}

#[test]
fn eval_prints_the_display_form() {
    plotscript()
        .args(["eval", "(+ 1 2)"])
        .assert()
        .success()
        .stdout("(3)\n");
}

#[test]
fn eval_reports_parse_errors_with_miette() {
    plotscript()
        .args(["eval", "(+ 1"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid Expression").and(contains("plotscript::parse")));
}

#[test]
fn eval_rejects_deep_nesting_without_crashing() {
    let program = format!("{}1{}", "(+ 1 ".repeat(3000), ")".repeat(3000));
    plotscript()
        .args(["eval", program.as_str()])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid Expression"));
}

#[test]
fn eval_reaches_the_depth_ceiling_on_the_main_command() {
    let program = format!("{}1{}", "(+ 1 ".repeat(1000), ")".repeat(1000));
    plotscript()
        .args(["eval", program.as_str()])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("maximum evaluation depth"));
}

#[test]
fn eval_reports_semantic_errors() {
    plotscript()
        .args(["eval", "(first (list))"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}

#[test]
fn eval_json_emits_a_scene() {
    plotscript()
        .args(["eval", "--json", "(discrete-plot (list (list -1 -1) (list 1 1)))"])
        .assert()
        .success()
        .stdout(contains("\"kind\": \"point\"").and(contains("\"kind\": \"line\"")));
}

#[test]
fn no_prelude_flag_drops_constructors() {
    plotscript()
        .args(["--no-prelude", "eval", "(make-point 1 2)"])
        .assert()
        .failure();
}

#[test]
fn list_procedures_includes_builtins() {
    plotscript()
        .arg("list-procedures")
        .assert()
        .success()
        .stdout(contains("range").and(contains("sqrt")));
}

#[test]
fn repl_reads_stdin_until_exit() {
    plotscript()
        .arg("repl")
        .write_stdin("(define a 2)\n(* a 21)\n%exit\n")
        .assert()
        .success()
        .stdout(contains("plotscript> ").and(contains("(42)")));
}
