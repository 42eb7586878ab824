//! List procedures.
//!
//! Lists are expressions headed by `list`; every procedure here returns a new
//! list and never modifies its arguments.

use crate::ast::Expression;
use crate::procedures::helpers::{list_arg, real_arg, require_arity};
use crate::runtime::environment::{Environment, Procedure};
use crate::semantic_err;

/// Packs its arguments into a list.
///
/// Usage: (list <a> <b> ...)
pub const LIST: Procedure = |args| Ok(Expression::list(args.to_vec()));

/// First element of a non-empty list.
pub const FIRST: Procedure = |args| {
    require_arity(args, 1, "first")?;
    list_arg(&args[0], "first")?
        .first()
        .cloned()
        .ok_or_else(|| semantic_err!("argument to first is an empty list"))
};

/// Everything but the first element of a non-empty list.
pub const REST: Procedure = |args| {
    require_arity(args, 1, "rest")?;
    match list_arg(&args[0], "rest")? {
        [] => Err(semantic_err!("argument to rest is an empty list")),
        [_, rest @ ..] => Ok(Expression::list(rest.to_vec())),
    }
};

pub const LENGTH: Procedure = |args| {
    require_arity(args, 1, "length")?;
    let items = list_arg(&args[0], "length")?;
    Ok(Expression::number(items.len() as f64))
};

/// Returns a new list with the second argument added at the end.
///
/// Usage: (append <list> <value>)
pub const APPEND: Procedure = |args| {
    require_arity(args, 2, "append")?;
    let mut items = list_arg(&args[0], "append")?.to_vec();
    items.push(args[1].clone());
    Ok(Expression::list(items))
};

/// Concatenates two lists.
pub const JOIN: Procedure = |args| {
    require_arity(args, 2, "join")?;
    let mut items = list_arg(&args[0], "join")?.to_vec();
    items.extend_from_slice(list_arg(&args[1], "join")?);
    Ok(Expression::list(items))
};

/// Evenly spaced numbers from `begin` up to and including `end`.
///
/// Usage: (range <begin> <end> <increment>)
///
/// Example:
///   (range 0 5 1) ; => ((0) (1) (2) (3) (4) (5))
pub const RANGE: Procedure = |args| {
    require_arity(args, 3, "range")?;
    let begin = real_arg(&args[0], "range")?;
    let end = real_arg(&args[1], "range")?;
    let increment = real_arg(&args[2], "range")?;

    if increment <= 0.0 {
        return Err(semantic_err!("negative or zero increment in range"));
    }
    if begin > 0.0 && end < 0.0 {
        return Err(semantic_err!("begin greater than end in range"));
    }

    let steps = ((end - begin) / increment).floor();
    let count = if steps.is_finite() && steps >= 0.0 {
        steps as usize + 1
    } else {
        0
    };
    let items = (0..count)
        .map(|i| Expression::number(begin + i as f64 * increment))
        .collect();
    Ok(Expression::list(items))
};

/// Bound to the plot names; packs already-built plot geometry into a list.
pub const PACK_GEOMETRY: Procedure = |args| Ok(Expression::list(args.to_vec()));

pub fn register_collection_procedures(env: &mut Environment) {
    env.register("list", LIST);
    env.register("first", FIRST);
    env.register("rest", REST);
    env.register("length", LENGTH);
    env.register("append", APPEND);
    env.register("join", JOIN);
    env.register("range", RANGE);
    env.register("discrete-plot", PACK_GEOMETRY);
    env.register("continuous-plot", PACK_GEOMETRY);
}
