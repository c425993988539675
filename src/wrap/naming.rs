//! Variable names for unnamed parameters and results.

use std::collections::HashSet;

/// Rendered form of the standard context type.
pub const CONTEXT_TYPE: &str = "context.Context";
/// Rendered form of the predeclared error interface.
pub const ERROR_TYPE: &str = "error";

const FALLBACK_NAME: &str = "v";

/// Pick a short variable name for a value of type `type_expr` that is not
/// yet in `used`.
///
/// `context.Context` becomes `ctx` and `error` becomes `err`. Any other
/// expression contributes the lowercased first letter of its last
/// `.`-separated segment, so `*store.Item` gives `i` and `[]byte` gives `b`.
/// Collisions are resolved with numeric suffixes: `s`, `s1`, `s2`, ...
///
/// The caller registers the returned name in `used`.
pub fn synthesize(type_expr: &str, used: &HashSet<String>) -> String {
    let base = base_name(type_expr);
    if !used.contains(&base) {
        return base;
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{}{}", base, n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn base_name(type_expr: &str) -> String {
    match type_expr {
        CONTEXT_TYPE => return "ctx".to_string(),
        ERROR_TYPE => return "err".to_string(),
        _ => {}
    }

    let simple = type_expr.rsplit('.').next().unwrap_or(type_expr);
    simple
        .chars()
        .find(|c| c.is_alphabetic())
        .or_else(|| type_expr.chars().find(|c| c.is_alphabetic()))
        .map(|c| c.to_lowercase().next().unwrap_or(c).to_string())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}
