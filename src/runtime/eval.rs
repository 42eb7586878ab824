//! Evaluation of plotscript expressions.
//!
//! `evaluate` is a structural post-order recursion over [`Expression`]. Each
//! call first checks the head for a special form and otherwise evaluates every
//! child before applying a closure or built-in procedure.
//!
//! ## Depth Ceiling
//!
//! Every frame carries its depth. Exceeding `max_depth` fails with a
//! [`SemanticError`] rather than exhausting the host stack.
//!
//! ## Closures
//!
//! A closure call evaluates its arguments in the caller's environment, binds
//! the parameters in a copy of that environment and evaluates the body there.
//! Nothing defined during the call escapes it.

use tracing::debug;

use crate::ast::{Atom, Expression, LAMBDA};
use crate::diagnostics::SemanticError;
use crate::plot;
use crate::runtime::environment::{Environment, SPECIAL_FORMS};
use crate::semantic_err;

/// Default ceiling on nested evaluation frames.
pub const DEFAULT_MAX_DEPTH: usize = 512;

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

/// State threaded through a single evaluation.
pub struct EvaluationContext<'a> {
    pub env: &'a mut Environment,
    pub max_depth: usize,
    pub depth: usize,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(env: &'a mut Environment, max_depth: usize) -> Self {
        Self {
            env,
            max_depth,
            depth: 0,
        }
    }

    /// Evaluates `expr` one frame deeper than the current one.
    pub fn eval_nested(&mut self, expr: &Expression) -> Result<Expression, SemanticError> {
        self.depth += 1;
        let result = evaluate(expr, self);
        self.depth -= 1;
        result
    }

    fn eval_all(&mut self, exprs: &[Expression]) -> Result<Vec<Expression>, SemanticError> {
        exprs.iter().map(|e| self.eval_nested(e)).collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Evaluates `expr` in `env` with the default depth ceiling.
pub fn eval(expr: &Expression, env: &mut Environment) -> Result<Expression, SemanticError> {
    let mut context = EvaluationContext::new(env, DEFAULT_MAX_DEPTH);
    evaluate(expr, &mut context)
}

/// Applies the built-in procedure named by `op` to evaluated arguments.
pub fn apply(op: &Atom, args: &[Expression], env: &Environment) -> Result<Expression, SemanticError> {
    let Some(name) = op.as_symbol() else {
        return Err(semantic_err!("procedure name not symbol"));
    };
    if !env.is_procedure(name) {
        return Err(semantic_err!("symbol '{}' does not name a procedure", name));
    }
    env.lookup_procedure(name)(args)
}

/// Evaluates one expression within an existing context.
pub fn evaluate(expr: &Expression, context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if context.depth > context.max_depth {
        return Err(semantic_err!(
            "maximum evaluation depth of {} exceeded",
            context.max_depth
        ));
    }

    if expr.is_leaf() && !expr.is_list() {
        return evaluate_terminal(expr, context);
    }

    let special_form = expr.head().as_symbol().unwrap_or_default();
    match special_form {
        "begin" => evaluate_begin(expr.tail(), context),
        "define" => evaluate_define(expr.tail(), context),
        "lambda" => evaluate_lambda(expr.tail()),
        "apply" => evaluate_apply(expr.tail(), context),
        "map" => evaluate_map(expr.tail(), context),
        "set-property" => evaluate_set_property(expr.tail(), context),
        "get-property" => evaluate_get_property(expr.tail(), context),
        "discrete-plot" => plot::discrete_plot(expr.tail(), context),
        "continuous-plot" => plot::continuous_plot(expr.tail(), context),
        _ => evaluate_application(expr, context),
    }
}

/// Calls a closure value on evaluated arguments.
pub fn invoke_closure(
    closure: &Expression,
    args: Vec<Expression>,
    context: &mut EvaluationContext,
) -> Result<Expression, SemanticError> {
    let (params, body) = closure
        .closure_parts()
        .ok_or_else(|| semantic_err!("malformed lambda value"))?;

    if params.len() != args.len() {
        return Err(semantic_err!(
            "invalid arguments to the lambda function (expected {}, got {})",
            params.len(),
            args.len()
        ));
    }

    let mut scope = context.env.clone();
    for (param, arg) in params.iter().zip(args) {
        scope.bind(param, arg)?;
    }
    debug!(params = ?params, depth = context.depth, "closure call");

    let mut inner = EvaluationContext {
        env: &mut scope,
        max_depth: context.max_depth,
        depth: context.depth + 1,
    };
    evaluate(body, &mut inner)
}

// ============================================================================
// TERMINALS AND APPLICATION
// ============================================================================

fn evaluate_terminal(expr: &Expression, context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    match expr.head() {
        Atom::Symbol(s) if s.starts_with('"') => Ok(Expression::new(expr.head().clone())),
        Atom::Symbol(s) => context.env.lookup_value(s).cloned(),
        Atom::Number(_) | Atom::Complex(_) => Ok(Expression::new(expr.head().clone())),
        Atom::None => Err(semantic_err!("invalid type in terminal expression")),
    }
}

fn evaluate_application(expr: &Expression, context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    let args = context.eval_all(expr.tail())?;

    if let Some(name) = expr.head().as_symbol() {
        if context.env.is_closure(name) {
            let closure = context.env.lookup_value(name)?.clone();
            return invoke_closure(&closure, args, context);
        }
    }
    apply(expr.head(), &args, context.env)
}

/// Resolves the bare procedure or closure name used by `apply`, `map` and `continuous-plot`.
enum Callable {
    Procedure(String),
    Closure(Expression),
}

impl Callable {
    fn resolve(expr: &Expression, env: &Environment, form: &str) -> Result<Self, SemanticError> {
        let name = match expr.head() {
            Atom::Symbol(s) if expr.is_leaf() && !s.starts_with('"') => s,
            _ => return Err(semantic_err!("first argument to {} not a procedure", form)),
        };
        if env.is_procedure(name) {
            Ok(Callable::Procedure(name.clone()))
        } else if env.is_closure(name) {
            Ok(Callable::Closure(env.lookup_value(name)?.clone()))
        } else {
            Err(semantic_err!("first argument to {} not a procedure", form))
        }
    }

    fn call(&self, args: Vec<Expression>, context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
        match self {
            Callable::Procedure(name) => context.env.lookup_procedure(name)(&args),
            Callable::Closure(closure) => invoke_closure(closure, args, context),
        }
    }
}

// ============================================================================
// SPECIAL FORMS
// ============================================================================

fn evaluate_begin(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    let Some((last, init)) = tail.split_last() else {
        return Err(semantic_err!("zero arguments to begin"));
    };
    for expr in init {
        context.eval_nested(expr)?;
    }
    context.eval_nested(last)
}

fn evaluate_define(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if tail.len() != 2 {
        return Err(semantic_err!("invalid number of arguments to define"));
    }
    let name = match tail[0].head() {
        Atom::Symbol(s) if tail[0].is_leaf() && !s.starts_with('"') => s.as_str(),
        _ => return Err(semantic_err!("first argument to define not symbol")),
    };
    if SPECIAL_FORMS.contains(&name) {
        return Err(semantic_err!("attempt to redefine a special-form '{}'", name));
    }
    if context.env.is_procedure(name) {
        return Err(semantic_err!("attempt to redefine a built-in procedure '{}'", name));
    }
    if tail[1].head().is_named(LAMBDA) && context.env.is_bound(name) {
        return Err(semantic_err!(
            "attempt to redefine a previously defined symbol '{}'",
            name
        ));
    }

    let value = context.eval_nested(&tail[1])?;
    context.env.bind(name, value.clone())?;
    Ok(value)
}

fn evaluate_lambda(tail: &[Expression]) -> Result<Expression, SemanticError> {
    if tail.len() != 2 {
        return Err(semantic_err!("invalid number of arguments to lambda"));
    }
    // `(x y z)` reads as head `x` with children `y` and `z`.
    let param_list = &tail[0];
    let mut params = vec![parameter_name(param_list.head())?];
    for param in param_list.tail() {
        if !param.is_leaf() {
            return Err(semantic_err!("lambda parameters must be symbols"));
        }
        params.push(parameter_name(param.head())?);
    }
    Ok(Expression::closure(params, tail[1].clone()))
}

fn parameter_name(atom: &Atom) -> Result<String, SemanticError> {
    match atom {
        Atom::Symbol(s) if !s.starts_with('"') => Ok(s.clone()),
        _ => Err(semantic_err!("lambda parameters must be symbols")),
    }
}

fn evaluate_apply(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if tail.len() != 2 {
        return Err(semantic_err!("invalid number of arguments to apply"));
    }
    let callable = Callable::resolve(&tail[0], context.env, "apply")?;
    let list = context.eval_nested(&tail[1])?;
    if !list.is_list() {
        return Err(semantic_err!("second argument to apply not a list"));
    }
    callable.call(list.into_tail(), context)
}

fn evaluate_map(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if tail.len() != 2 {
        return Err(semantic_err!("invalid number of arguments to map"));
    }
    let callable = Callable::resolve(&tail[0], context.env, "map")?;
    let list = context.eval_nested(&tail[1])?;
    if !list.is_list() {
        return Err(semantic_err!("second argument to map not a list"));
    }
    let results = list
        .into_tail()
        .into_iter()
        .map(|item| callable.call(vec![item], context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::list(results))
}

fn property_key<'a>(key: &'a Expression, form: &str) -> Result<&'a str, SemanticError> {
    if key.is_leaf() {
        if let Some(contents) = key.head().string_contents() {
            return Ok(contents);
        }
    }
    Err(semantic_err!("first argument to {} not a string", form))
}

fn evaluate_set_property(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if tail.len() != 3 {
        return Err(semantic_err!("invalid number of arguments to set-property"));
    }
    let key = property_key(&tail[0], "set-property")?;
    let mut target = context.eval_nested(&tail[2])?;
    let value = context.eval_nested(&tail[1])?;
    target.set_property(key, value);
    Ok(target)
}

fn evaluate_get_property(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if tail.len() != 2 {
        return Err(semantic_err!("invalid number of arguments to get-property"));
    }
    let key = property_key(&tail[0], "get-property")?;
    let target = context.eval_nested(&tail[1])?;
    Ok(target
        .property(key)
        .cloned()
        .unwrap_or_else(Expression::none_marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn run(program: &str) -> Result<Expression, SemanticError> {
        let mut env = Environment::new();
        eval(&parse(program).unwrap(), &mut env)
    }

    #[test]
    fn evaluates_arithmetic() {
        assert_eq!(
            run("(begin (define r 10) (* pi (* r r)))").unwrap(),
            Expression::number(std::f64::consts::PI * 100.0)
        );
    }

    #[test]
    fn procedure_names_are_not_values() {
        assert!(run("(+)").is_err());
        assert!(run("(define x +)").is_err());
    }

    #[test]
    fn unknown_head_is_an_error() {
        let err = run("(@ none)").unwrap_err();
        assert!(err.message().contains("does not name a procedure"));
        assert!(run("(1 2)").is_err());
    }

    #[test]
    fn lambda_builds_closure_value() {
        let closure = run("(lambda (x y) (+ x y))").unwrap();
        let (params, _) = closure.closure_parts().unwrap();
        assert_eq!(params, vec!["x", "y"]);
    }

    #[test]
    fn depth_ceiling_is_enforced() {
        let mut env = Environment::new();
        let mut context = EvaluationContext::new(&mut env, 4);
        let program = parse("(+ 1 (+ 1 (+ 1 (+ 1 (+ 1 (+ 1 1))))))").unwrap();
        let err = evaluate(&program, &mut context).unwrap_err();
        assert!(err.message().contains("maximum evaluation depth"));
        assert_eq!(context.depth, 0);
    }
}
