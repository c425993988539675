//! Conversion of raw parameters into template-ready [`Param`] records.

use super::model::Param;
use super::naming::synthesize;
use crate::types::{Qualifier, Var};
use std::collections::HashSet;

/// Normalize one parameter or result.
///
/// `used` holds the names already taken in the same list and gains the name
/// chosen here. Explicit names are kept as written. When `variadic` is set
/// the stored type is the element type of the slice, and the flag alone
/// tells the renderer to emit `...`.
pub fn normalize(
    var: &Var,
    used: &mut HashSet<String>,
    qualifier: &Qualifier,
    variadic: bool,
) -> Param {
    let ty = match var.ty.slice_elem() {
        Some(elem) if variadic => elem,
        _ => &var.ty,
    };
    let rendered = ty.render(qualifier);

    let name = if var.is_named() {
        var.name.clone()
    } else {
        synthesize(&rendered, used)
    };
    used.insert(name.clone());

    Param {
        name,
        ty: rendered,
        variadic,
    }
}

/// Normalize a whole parameter or result list with its own name scope.
/// Explicit names are reserved before any name is synthesized.
pub fn normalize_list(vars: &[Var], qualifier: &Qualifier, variadic: bool) -> Vec<Param> {
    let mut used: HashSet<String> = vars
        .iter()
        .filter(|v| v.is_named())
        .map(|v| v.name.clone())
        .collect();
    let last = vars.len().saturating_sub(1);
    vars.iter()
        .enumerate()
        .map(|(i, var)| normalize(var, &mut used, qualifier, variadic && i == last))
        .collect()
}
