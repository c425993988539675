use super::method_set::{self, MethodSet};
use super::{Package, TypeDecl, TypeExpr, TypeName};

/// Queryable, read-only view of loaded packages.
///
/// Implementors only provide the package list and named-type lookup;
/// underlying-type resolution and method sets are derived from those two.
/// The resolver never mutates a loader, so one loader can serve any number
/// of concurrent resolutions.
pub trait TypeLoader {
    /// Loaded packages in load order
    fn packages(&self) -> &[Package];

    /// Declaration a named-type reference points at
    fn declaration(&self, name: &TypeName) -> Option<&TypeDecl>;

    /// Underlying type, following chains of named types
    fn underlying<'a>(&'a self, ty: &'a TypeExpr) -> &'a TypeExpr {
        method_set::underlying(self, ty)
    }

    fn is_interface(&self, ty: &TypeExpr) -> bool {
        matches!(self.underlying(ty), TypeExpr::Interface(_))
    }

    /// Method set of `ty`. Pass `TypeExpr::Pointer` for the pointer form.
    fn method_set<'a>(&'a self, ty: &'a TypeExpr) -> MethodSet<'a> {
        method_set::compute(self, ty)
    }
}
