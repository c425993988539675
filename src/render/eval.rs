//! Template evaluation against a [`WrappedType`].

use super::template::{Command, Pipeline, Segment, Term};
use crate::errors::{Error, Result};
use crate::wrap::{Method, Param, WrappedType};

/// A record templates can read fields from
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scope<'a> {
    Type(&'a WrappedType),
    Method(&'a Method),
    Param(&'a Param),
}

#[derive(Debug, Clone)]
pub(crate) enum Value<'a> {
    Str(String),
    Bool(bool),
    Scope(Scope<'a>),
    List(Vec<Scope<'a>>),
}

impl Value<'_> {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Scope(_) => true,
            Value::List(items) => !items.is_empty(),
        }
    }

    fn into_text(self, line: usize) -> Result<String> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Scope(_) => Err(render_error(line, "cannot print a record; select a field")),
            Value::List(_) => Err(render_error(line, "cannot print a list; use range")),
        }
    }
}

fn render_error(line: usize, message: impl std::fmt::Display) -> Error {
    Error::render(format!("line {}: {}", line, message))
}

fn no_args(name: &str, args: &[String]) -> std::result::Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("{} takes no arguments", name))
    }
}

impl<'a> Scope<'a> {
    fn kind(&self) -> &'static str {
        match self {
            Scope::Type(_) => "type",
            Scope::Method(_) => "method",
            Scope::Param(_) => "param",
        }
    }

    fn field(self, name: &str, args: &[String]) -> std::result::Result<Value<'a>, String> {
        if let (Scope::Method(m), "ReturnStruct") = (self, name) {
            return match args {
                [struct_name] => Ok(Value::Str(m.return_struct(struct_name))),
                _ => Err("ReturnStruct takes exactly one argument".to_string()),
            };
        }
        no_args(name, args)?;

        let value = match self {
            Scope::Type(t) => match name {
                "Name" | "Type" => Value::Str(t.name.clone()),
                "SourcePackage" | "Pkg" => Value::Str(t.source_package.clone()),
                "TargetPackage" | "PwdPkg" => Value::Str(t.target_package.clone()),
                "IsInterface" => Value::Bool(t.is_interface),
                "Methods" => Value::List(t.methods.iter().map(Scope::Method).collect()),
                "Receiver" | "Camelize" => Value::Str(t.receiver_name()),
                "Base" => Value::Str(t.base()),
                "QualifiedName" => Value::Str(t.qualified_name()),
                "NeedsQualifier" => Value::Bool(t.needs_qualifier()),
                _ => return Err(self.unknown(name)),
            },
            Scope::Method(m) => match name {
                "Name" => Value::Str(m.name.clone()),
                "Params" => Value::List(m.params.iter().map(Scope::Param).collect()),
                "Results" => Value::List(m.results.iter().map(Scope::Param).collect()),
                "AcceptsContext" => Value::Bool(m.accepts_context),
                "ReturnsError" => Value::Bool(m.returns_error),
                "Signature" => Value::Str(m.signature()),
                "Declaration" => Value::Str(m.declaration()),
                "Call" => Value::Str(m.call()),
                "ParamsNames" => Value::Str(m.params_names()),
                "ResultsNames" => Value::Str(m.results_names()),
                "ParamsStruct" => Value::Str(m.params_struct()),
                "ResultsStruct" => Value::Str(m.results_struct()),
                "ParamsMap" => Value::Str(m.params_map()),
                "ResultsMap" => Value::Str(m.results_map()),
                "HasParams" => Value::Bool(m.has_params()),
                "HasResults" => Value::Bool(m.has_results()),
                _ => return Err(self.unknown(name)),
            },
            Scope::Param(p) => match name {
                "Name" => Value::Str(p.name.clone()),
                "Type" => Value::Str(p.ty.clone()),
                "Variadic" => Value::Bool(p.variadic),
                "Pass" => Value::Str(p.pass()),
                "Declaration" => Value::Str(p.declaration()),
                _ => return Err(self.unknown(name)),
            },
        };
        Ok(value)
    }

    fn unknown(&self, name: &str) -> String {
        format!("{} has no field `{}`", self.kind(), name)
    }
}

pub(crate) struct Evaluator<'a> {
    root: &'a WrappedType,
    out: String,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(root: &'a WrappedType) -> Self {
        Self {
            root,
            out: String::new(),
        }
    }

    pub(crate) fn run(mut self, segments: &[Segment]) -> Result<String> {
        let dot = Scope::Type(self.root);
        self.walk(segments, dot)?;
        Ok(self.out)
    }

    fn walk(&mut self, segments: &[Segment], dot: Scope<'a>) -> Result<()> {
        for segment in segments {
            match segment {
                Segment::Text(text) => self.out.push_str(text),
                Segment::Action(pipeline) => {
                    let text = self.pipeline(pipeline, dot)?.into_text(pipeline.line)?;
                    self.out.push_str(&text);
                }
                Segment::If {
                    pipeline,
                    then_body,
                    else_body,
                } => {
                    if self.pipeline(pipeline, dot)?.is_truthy() {
                        self.walk(then_body, dot)?;
                    } else {
                        self.walk(else_body, dot)?;
                    }
                }
                Segment::Range {
                    pipeline,
                    body,
                    else_body,
                } => match self.pipeline(pipeline, dot)? {
                    Value::List(items) if items.is_empty() => self.walk(else_body, dot)?,
                    Value::List(items) => {
                        for item in items {
                            self.walk(body, item)?;
                        }
                    }
                    _ => return Err(render_error(pipeline.line, "range over a non-list value")),
                },
            }
        }
        Ok(())
    }

    fn pipeline(&self, pipeline: &Pipeline, dot: Scope<'a>) -> Result<Value<'a>> {
        let line = pipeline.line;
        let mut piped: Option<Value<'a>> = None;
        for command in &pipeline.commands {
            piped = Some(self.command(command, dot, piped.take(), line)?);
        }
        piped.ok_or_else(|| render_error(line, "empty pipeline"))
    }

    fn command(
        &self,
        command: &Command,
        dot: Scope<'a>,
        piped: Option<Value<'a>>,
        line: usize,
    ) -> Result<Value<'a>> {
        match command {
            Command::Helper { helper, arg } => {
                let input = match (arg, piped) {
                    (Some(_), Some(_)) => {
                        return Err(render_error(
                            line,
                            format!("{} takes a single argument", helper.name()),
                        ))
                    }
                    (Some(term), None) => self.term(term, dot, None, line)?,
                    (None, Some(value)) => value,
                    (None, None) => {
                        return Err(render_error(
                            line,
                            format!("{} needs an argument", helper.name()),
                        ))
                    }
                };
                let text = input.into_text(line)?;
                Ok(Value::Str(helper.apply(&text)))
            }
            Command::Term(term) => self.term(term, dot, piped, line),
        }
    }

    fn term(
        &self,
        term: &Term,
        dot: Scope<'a>,
        piped: Option<Value<'a>>,
        line: usize,
    ) -> Result<Value<'a>> {
        if piped.is_some() && !matches!(term, Term::Field { .. }) {
            return Err(render_error(line, "cannot pipe into a non-field value"));
        }
        match term {
            Term::Dot => Ok(Value::Scope(dot)),
            Term::Root => Ok(Value::Scope(Scope::Type(self.root))),
            Term::Literal(s) => Ok(Value::Str(s.clone())),
            Term::Field {
                from_root,
                path,
                args,
            } => {
                let mut scope = if *from_root {
                    Scope::Type(self.root)
                } else {
                    dot
                };
                let (last, parents) = path
                    .split_last()
                    .ok_or_else(|| render_error(line, "empty field path"))?;
                for name in parents {
                    match scope.field(name, &[]).map_err(|e| render_error(line, e))? {
                        Value::Scope(inner) => scope = inner,
                        _ => {
                            return Err(render_error(
                                line,
                                format!("`{}` is not a record", name),
                            ))
                        }
                    }
                }

                let mut args = args.clone();
                if let Some(value) = piped {
                    args.push(value.into_text(line)?);
                }
                scope.field(last, &args).map_err(|e| render_error(line, e))
            }
        }
    }
}
