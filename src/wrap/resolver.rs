//! Method-set resolution for the type being wrapped.
//!
//! [`resolve`] finds the target declaration, merges its value-form and
//! pointer-form method sets, and turns each exported method into a
//! [`Method`] record with normalized parameters and the context/error
//! conventions tagged.

use super::model::{Method, WrappedType};
use super::naming::CONTEXT_TYPE;
use super::params::normalize_list;
use crate::errors::{Error, Result};
use crate::types::{is_exported, Func, Qualifier, TypeExpr, TypeLoader, TypeName};
use std::collections::HashSet;
use tracing::{debug, debug_span};

/// Resolve `type_name` against `loader` into a [`WrappedType`] for code
/// generated in `target_package`.
///
/// The first package declaring the name wins. Packages other than the
/// target only expose exported names. Fails with
/// [`Error::TypeNotFound`] when no package declares it.
pub fn resolve<L: TypeLoader + ?Sized>(
    type_name: &str,
    loader: &L,
    target_package: &str,
) -> Result<WrappedType> {
    let _span = debug_span!("resolve", type_name, target_package).entered();

    let package = loader
        .packages()
        .iter()
        .find(|p| {
            if p.name() == target_package {
                p.lookup(type_name).is_some()
            } else {
                p.lookup_exported(type_name).is_some()
            }
        })
        .ok_or_else(|| Error::type_not_found(type_name))?;

    let value_form = TypeExpr::Named(TypeName::new(package.name(), type_name));
    let pointer_form = TypeExpr::pointer(value_form.clone());
    let is_interface = loader.is_interface(&value_form);
    let qualifier = Qualifier::new(target_package);

    let mut recorded = HashSet::new();
    let mut methods = Vec::new();
    for form in [&value_form, &pointer_form] {
        for func in loader.method_set(form) {
            if !func.is_exported() || !recorded.insert(func.name.as_str()) {
                continue;
            }
            methods.push(normalize_method(loader, func, &qualifier));
        }
    }

    debug!(
        source_package = package.name(),
        is_interface,
        methods = methods.len(),
        "resolved wrapped type"
    );

    Ok(WrappedType {
        name: type_name.to_string(),
        source_package: package.name().to_string(),
        target_package: target_package.to_string(),
        is_interface,
        methods,
    })
}

fn normalize_method<L: TypeLoader + ?Sized>(loader: &L, func: &Func, qualifier: &Qualifier) -> Method {
    let signature = &func.signature;
    let params = normalize_list(&signature.params, qualifier, signature.variadic);
    let results = normalize_list(&signature.results, qualifier, false);

    let accepts_context = params
        .first()
        .is_some_and(|p| !p.variadic && p.ty == CONTEXT_TYPE);
    let returns_error = signature
        .results
        .last()
        .is_some_and(|r| is_error_type(loader, &r.ty));

    Method {
        name: func.name.clone(),
        params,
        results,
        accepts_context,
        returns_error,
    }
}

/// Structural check for the error interface: exactly one method, named
/// `Error`, taking nothing and returning one string-typed value.
pub fn is_error_type<L: TypeLoader + ?Sized>(loader: &L, ty: &TypeExpr) -> bool {
    if !loader.is_interface(ty) {
        return false;
    }
    let methods = loader.method_set(ty);
    match methods.lookup("Error") {
        Some(method) if methods.len() == 1 => is_error_method(loader, method),
        _ => false,
    }
}

fn is_error_method<L: TypeLoader + ?Sized>(loader: &L, method: &Func) -> bool {
    let sig = &method.signature;
    method.name == "Error"
        && sig.params.is_empty()
        && sig.results.len() == 1
        && matches!(loader.underlying(&sig.results[0].ty), TypeExpr::Basic(b) if b == "string")
}
