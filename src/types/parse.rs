//! Parser for Go type expressions as written in package manifests.
//!
//! Unqualified identifiers that are not predeclared resolve to the package
//! the expression appears in, so `*Item` inside package `store` becomes
//! `*store.Item`.

use super::{
    ChanDir, Field, Func, InterfaceType, Receiver, Signature, TypeExpr, TypeName, Var,
    BASIC_TYPES, UNIVERSE_TYPES,
};
use crate::errors::{Error, Result};

/// Parse a complete type expression.
pub fn parse_type(src: &str, package: &str) -> Result<TypeExpr> {
    let mut parser = TypeParser::new(src, package);
    let ty = parser.parse_type()?;
    parser.expect_end()?;
    Ok(ty)
}

/// Parse a parameter type, which may carry a leading `...`.
///
/// Returns the stored type (a slice for variadic parameters) and whether
/// the `...` marker was present.
pub fn parse_param_type(src: &str, package: &str) -> Result<(TypeExpr, bool)> {
    let trimmed = src.trim_start();
    match trimmed.strip_prefix("...") {
        Some(rest) => Ok((TypeExpr::slice(parse_type(rest, package)?), true)),
        None => Ok((parse_type(trimmed, package)?, false)),
    }
}

fn resolve_ident(ident: &str, package: &str) -> TypeExpr {
    if BASIC_TYPES.contains(&ident) {
        TypeExpr::Basic(ident.to_string())
    } else if UNIVERSE_TYPES.contains(&ident) {
        TypeExpr::Named(TypeName::universe(ident))
    } else {
        TypeExpr::Named(TypeName::new(package, ident))
    }
}

/// One comma-separated entry of a parameter list before grouping.
struct RawParam {
    name: Option<String>,
    ty: TypeExpr,
    ellipsis: bool,
    /// Set when the entry was a bare identifier that may turn out to be a name.
    bare_ident: Option<String>,
}

struct TypeParser<'s> {
    src: &'s str,
    pos: usize,
    package: &'s str,
}

impl<'s> TypeParser<'s> {
    fn new(src: &'s str, package: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            package,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::type_syntax(
            self.src,
            format!("{} (at offset {})", message.into(), self.pos),
        )
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        self.pos += rest.len() - trimmed.len();
    }

    fn skip_ws_and_newlines(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", token)))
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_ws_and_newlines();
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    /// Keyword match that does not swallow a longer identifier.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        let after = rest[keyword.len()..].chars().next();
        if after.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn ident(&mut self) -> Option<&'s str> {
        self.skip_ws();
        let rest = self.rest();
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            let ok = if i == 0 {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || c == '_'
            };
            if !ok {
                break;
            }
            end = i + c.len_utf8();
        }
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }

    /// Whether the upcoming input can start a type.
    fn at_type_start(&mut self) -> bool {
        self.skip_ws();
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => true,
            Some('*') | Some('[') | Some('(') => true,
            Some('<') => self.rest().starts_with("<-"),
            _ => false,
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        self.skip_ws();
        if self.eat("*") {
            return Ok(TypeExpr::pointer(self.parse_type()?));
        }
        if self.eat("<-") {
            if !self.eat_keyword("chan") {
                return Err(self.error("expected `chan` after `<-`"));
            }
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(elem),
            });
        }
        if self.eat("[") {
            if self.eat("]") {
                return Ok(TypeExpr::slice(self.parse_type()?));
            }
            let len = self.array_len()?;
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Array {
                len,
                elem: Box::new(elem),
            });
        }
        if self.eat("(") {
            let inner = self.parse_type()?;
            self.expect(")")?;
            return Ok(inner);
        }
        if self.eat_keyword("map") {
            self.expect("[")?;
            let key = self.parse_type()?;
            self.expect("]")?;
            let value = self.parse_type()?;
            return Ok(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }
        if self.eat_keyword("chan") {
            let dir = if self.eat("<-") {
                ChanDir::Send
            } else {
                ChanDir::Both
            };
            let elem = self.parse_type()?;
            return Ok(TypeExpr::Chan {
                dir,
                elem: Box::new(elem),
            });
        }
        if self.eat_keyword("func") {
            return Ok(TypeExpr::Func(self.signature()?));
        }
        if self.eat_keyword("interface") {
            return self.interface_body().map(TypeExpr::Interface);
        }
        if self.eat_keyword("struct") {
            return self.struct_body().map(TypeExpr::Struct);
        }
        self.type_name()
    }

    fn array_len(&mut self) -> Result<String> {
        self.skip_ws();
        let rest = self.rest();
        let end = rest
            .find(']')
            .ok_or_else(|| self.error("unterminated array length"))?;
        let len = rest[..end].trim().to_string();
        if len.is_empty() {
            return Err(self.error("empty array length"));
        }
        self.pos += end + 1;
        Ok(len)
    }

    fn type_name(&mut self) -> Result<TypeExpr> {
        let first = self
            .ident()
            .ok_or_else(|| self.error("expected a type"))?;
        if self.rest().starts_with('.') {
            self.pos += 1;
            let second = self
                .ident()
                .ok_or_else(|| self.error("expected type name after `.`"))?;
            return Ok(TypeExpr::named(first, second));
        }
        Ok(resolve_ident(first, self.package))
    }

    fn signature(&mut self) -> Result<Signature> {
        self.expect("(")?;
        let (params, variadic) = self.param_list()?;

        let results = if self.eat("(") {
            let (results, ellipsis) = self.param_list()?;
            if ellipsis {
                return Err(self.error("`...` is not allowed in results"));
            }
            results
        } else if self.at_result_start() {
            vec![Var::unnamed(self.parse_type()?)]
        } else {
            Vec::new()
        };

        let mut signature = Signature::new(params, results);
        signature.variadic = variadic;
        Ok(signature)
    }

    /// A single unparenthesized result must start on the same line.
    fn at_result_start(&mut self) -> bool {
        self.skip_ws();
        self.at_type_start()
    }

    /// Parse a parameter list after the opening `(`, consuming the `)`.
    fn param_list(&mut self) -> Result<(Vec<Var>, bool)> {
        let mut raw = Vec::new();
        loop {
            self.skip_ws_and_newlines();
            if self.eat(")") {
                break;
            }
            raw.push(self.raw_param()?);
            self.skip_ws_and_newlines();
            if self.eat(",") {
                continue;
            }
            self.expect(")")?;
            break;
        }
        self.group_params(raw)
    }

    fn raw_param(&mut self) -> Result<RawParam> {
        if self.eat("...") {
            let elem = self.parse_type()?;
            return Ok(RawParam {
                name: None,
                ty: TypeExpr::slice(elem),
                ellipsis: true,
                bare_ident: None,
            });
        }

        let start = self.pos;
        let Some(ident) = self.ident() else {
            let ty = self.parse_type()?;
            return Ok(RawParam {
                name: None,
                ty,
                ellipsis: false,
                bare_ident: None,
            });
        };

        // `pkg.Type` or a keyword-led type: re-parse from the start as a type.
        if self.rest().starts_with('.')
            || matches!(ident, "map" | "chan" | "func" | "interface" | "struct")
        {
            self.pos = start;
            let ty = self.parse_type()?;
            return Ok(RawParam {
                name: None,
                ty,
                ellipsis: false,
                bare_ident: None,
            });
        }

        self.skip_ws();
        if self.eat("...") {
            let elem = self.parse_type()?;
            return Ok(RawParam {
                name: Some(ident.to_string()),
                ty: TypeExpr::slice(elem),
                ellipsis: true,
                bare_ident: None,
            });
        }
        if self.at_type_start() {
            let ty = self.parse_type()?;
            return Ok(RawParam {
                name: Some(ident.to_string()),
                ty,
                ellipsis: false,
                bare_ident: None,
            });
        }

        Ok(RawParam {
            name: None,
            ty: resolve_ident(ident, self.package),
            ellipsis: false,
            bare_ident: Some(ident.to_string()),
        })
    }

    /// Apply Go's grouping rule: in `(a, b int)` the bare `a` is a name that
    /// shares the type of the next named entry.
    fn group_params(&self, raw: Vec<RawParam>) -> Result<(Vec<Var>, bool)> {
        let any_named = raw.iter().any(|p| p.name.is_some());
        let count = raw.len();
        let variadic = raw.last().is_some_and(|p| p.ellipsis);
        if raw.iter().take(count.saturating_sub(1)).any(|p| p.ellipsis) {
            return Err(self.error("only the final parameter may be variadic"));
        }

        if !any_named {
            let vars = raw.into_iter().map(|p| Var::unnamed(p.ty)).collect();
            return Ok((vars, variadic));
        }

        let mut vars: Vec<Var> = Vec::with_capacity(count);
        let mut pending: Vec<String> = Vec::new();
        for param in raw {
            match (param.name, param.bare_ident) {
                (Some(name), _) => {
                    for waiting in pending.drain(..) {
                        vars.push(Var::named(waiting, param.ty.clone()));
                    }
                    vars.push(Var::named(name, param.ty));
                }
                (None, Some(ident)) => pending.push(ident),
                (None, None) => {
                    return Err(self.error("mixed named and unnamed parameters"));
                }
            }
        }
        if !pending.is_empty() {
            return Err(self.error("missing type for named parameters"));
        }
        Ok((vars, variadic))
    }

    fn interface_body(&mut self) -> Result<InterfaceType> {
        self.expect("{")?;
        let mut iface = InterfaceType::default();
        loop {
            self.skip_members_separators();
            if self.eat("}") {
                break;
            }
            let start = self.pos;
            match self.ident() {
                Some(name) if self.rest().starts_with('(') => {
                    let signature = self.signature()?;
                    iface
                        .methods
                        .push(Func::new(name, Receiver::Value, signature));
                }
                Some(_) => {
                    self.pos = start;
                    iface.embeds.push(self.parse_type()?);
                }
                None => return Err(self.error("expected method or embedded interface")),
            }
        }
        Ok(iface)
    }

    fn struct_body(&mut self) -> Result<Vec<Field>> {
        self.expect("{")?;
        let mut fields = Vec::new();
        loop {
            self.skip_members_separators();
            if self.eat("}") {
                break;
            }
            if self.rest().starts_with('*') {
                fields.push(Field::embedded(self.parse_type()?));
                continue;
            }
            let start = self.pos;
            let ident = self
                .ident()
                .ok_or_else(|| self.error("expected field"))?;
            if self.rest().starts_with('.') {
                self.pos = start;
                fields.push(Field::embedded(self.parse_type()?));
                continue;
            }
            self.skip_ws();
            if matches!(self.peek(), Some(';') | Some('}') | Some('\n') | None) {
                fields.push(Field::embedded(resolve_ident(ident, self.package)));
                continue;
            }
            let ty = self.parse_type()?;
            fields.push(Field::new(ident, ty));
        }
        Ok(fields)
    }

    fn skip_members_separators(&mut self) {
        loop {
            self.skip_ws_and_newlines();
            if !self.eat(";") {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Qualifier;

    fn roundtrip(src: &str) -> String {
        parse_type(src, "local").unwrap().render(&Qualifier::new("main"))
    }

    #[test]
    fn test_unqualified_names_belong_to_declaring_package() {
        assert_eq!(
            parse_type("*Item", "store").unwrap(),
            TypeExpr::pointer(TypeExpr::named("store", "Item"))
        );
    }

    #[test]
    fn test_predeclared_names() {
        assert_eq!(parse_type("string", "p").unwrap(), TypeExpr::basic("string"));
        assert_eq!(parse_type("error", "p").unwrap(), TypeExpr::error());
    }

    #[test]
    fn test_composite_types_render_back() {
        assert_eq!(roundtrip("[]byte"), "[]byte");
        assert_eq!(roundtrip("map[string][]*io.Reader"), "map[string][]*io.Reader");
        assert_eq!(roundtrip("[4]int"), "[4]int");
        assert_eq!(roundtrip("chan<- int"), "chan<- int");
        assert_eq!(roundtrip("<-chan error"), "<-chan error");
        assert_eq!(roundtrip("Thing"), "local.Thing");
    }

    #[test]
    fn test_func_types() {
        assert_eq!(roundtrip("func()"), "func()");
        assert_eq!(roundtrip("func(int, string) error"), "func(int, string) error");
        assert_eq!(
            roundtrip("func(a, b int) (n int, err error)"),
            "func(a int, b int) (n int, err error)"
        );
        assert_eq!(roundtrip("func(format string, args ...any)"), "func(format string, args ...any)");
    }

    #[test]
    fn test_interface_literal() {
        let ty = parse_type("interface{ Error() string }", "p").unwrap();
        let TypeExpr::Interface(iface) = &ty else {
            panic!("expected interface, got {:?}", ty);
        };
        assert_eq!(iface.methods.len(), 1);
        assert_eq!(iface.methods[0].name, "Error");
        assert_eq!(roundtrip("interface{}"), "interface{}");
        assert_eq!(
            roundtrip("interface{ io.Reader; Close() error }"),
            "interface{io.Reader; Close() error}"
        );
    }

    #[test]
    fn test_struct_literal_with_embedded_fields() {
        let ty = parse_type("struct{ *Base; sync.Mutex; size int }", "p").unwrap();
        let TypeExpr::Struct(fields) = ty else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 3);
        assert!(fields[0].embedded);
        assert_eq!(fields[0].name, "Base");
        assert!(fields[1].embedded);
        assert_eq!(fields[1].name, "Mutex");
        assert!(!fields[2].embedded);
        assert_eq!(fields[2].name, "size");
    }

    #[test]
    fn test_variadic_param_type() {
        let (ty, variadic) = parse_param_type("...string", "p").unwrap();
        assert!(variadic);
        assert_eq!(ty, TypeExpr::slice(TypeExpr::basic("string")));

        let (ty, variadic) = parse_param_type("[]string", "p").unwrap();
        assert!(!variadic);
        assert_eq!(ty, TypeExpr::slice(TypeExpr::basic("string")));
    }

    #[test]
    fn test_rejects_malformed_expressions() {
        assert!(parse_type("", "p").is_err());
        assert!(parse_type("map[string", "p").is_err());
        assert!(parse_type("[]int extra", "p").is_err());
        assert!(parse_type("func(...int, string)", "p").is_err());
        assert!(matches!(
            parse_type("pkg.", "p"),
            Err(Error::TypeSyntax { .. })
        ));
    }
}
