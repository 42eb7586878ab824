//! Plotscript reader.
//!
//! Converts program text into a single [`Expression`]. The reader is purely
//! syntactic: it never consults an environment.
//!
//! Both pest and the tree builder recurse once per nesting level, so input
//! nested deeper than [`MAX_NESTING_DEPTH`] is rejected before either runs.

use miette::SourceSpan;
use pest::{error::InputLocation, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::ast::{Atom, Expression};
use crate::diagnostics::ParseError;

/// Deepest parenthesis nesting the reader accepts.
pub const MAX_NESTING_DEPTH: usize = 1024;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct PlotscriptParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses exactly one top-level expression.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::new(source, SourceSpan::from((0, 0)), "empty input")
            .with_help("a program is a single parenthesized expression"));
    }

    if let Some(offset) = find_excess_nesting(source, MAX_NESTING_DEPTH) {
        return Err(ParseError::new(
            source,
            SourceSpan::from((offset, 1)),
            format!("nesting deeper than {} levels", MAX_NESTING_DEPTH),
        ));
    }

    let mut pairs = PlotscriptParser::parse(Rule::program, source)
        .map_err(|e| convert_parse_error(e, source))?;

    let list = pairs
        .next()
        .and_then(|program| program.into_inner().find(|p| p.as_rule() == Rule::list))
        .ok_or_else(|| {
            ParseError::new(
                source,
                SourceSpan::from((0, source.len())),
                "missing expression",
            )
        })?;

    build_expression(list, source)
}

// ============================================================================
// TREE BUILDERS
// ============================================================================

fn build_expression(pair: Pair<Rule>, source: &str) -> Result<Expression, ParseError> {
    match pair.as_rule() {
        Rule::list => {
            let span = get_span(&pair);
            let mut inner = pair.into_inner();
            let head = inner
                .next()
                .ok_or_else(|| ParseError::new(source, span, "expression has no head"))?;
            let head = build_atom(head, source)?;
            let children = inner
                .map(|p| build_expression(p, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::with_tail(head, children))
        }
        Rule::number | Rule::string | Rule::symbol => Ok(Expression::new(build_atom(pair, source)?)),
        rule => Err(ParseError::new(
            source,
            get_span(&pair),
            format!("unexpected rule: {:?}", rule),
        )),
    }
}

fn build_atom(pair: Pair<Rule>, source: &str) -> Result<Atom, ParseError> {
    let span = get_span(&pair);
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::number => text
            .parse::<f64>()
            .map(Atom::Number)
            .map_err(|_| ParseError::new(source, span, format!("invalid number literal '{}'", text))),
        Rule::string | Rule::symbol => Ok(Atom::symbol(text)),
        _ => Err(ParseError::new(source, span, "expected an atom in head position")
            .with_help("the first element of an expression must be a symbol, number or string")),
    }
}

/// Byte offset of the first `(` nested deeper than `limit`, skipping strings
/// and comments.
fn find_excess_nesting(source: &str, limit: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut in_comment = false;
    for (offset, ch) in source.char_indices() {
        match ch {
            '\n' if in_comment => in_comment = false,
            _ if in_comment => {}
            '"' => in_string = !in_string,
            _ if in_string => {}
            ';' => in_comment = true,
            '(' => {
                depth += 1;
                if depth > limit {
                    return Some(offset);
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn get_span(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from((span.start(), span.end() - span.start()))
}

fn convert_parse_error(error: pest::error::Error<Rule>, source: &str) -> ParseError {
    let span = match error.location {
        InputLocation::Pos(pos) => SourceSpan::from((pos, 0)),
        InputLocation::Span((start, end)) => SourceSpan::from((start, end - start)),
    };
    let offset = span.offset();

    let (reason, help) = if offset >= source.trim_end().len() {
        ("unexpected end of input", Some("add the missing ')'"))
    } else if source[offset..].starts_with(')') {
        ("unexpected ')'", Some("an expression needs a head atom and balanced parentheses"))
    } else if source[offset..].starts_with('(') {
        ("a nested expression cannot be used here", None)
    } else if source.trim_start().starts_with('(') {
        ("malformed token", None)
    } else {
        ("expected '('", Some("a program is a single parenthesized expression"))
    };

    let err = ParseError::new(source, span, reason);
    match help {
        Some(help) => err.with_help(help),
        None => err,
    }
}
