//! Template parsing.
//!
//! The syntax is a small subset of Go's `text/template`:
//!
//! ```text
//! {{ .Name }}                      field of the current value
//! {{ $.Base }}                     field of the wrapped type from anywhere
//! {{ .ReturnStruct "res" }}        field with string arguments
//! {{ .Name | camelize }}           pipe into a helper
//! {{ range .Methods }}...{{ end }}
//! {{ if .ReturnsError }}...{{ else if .HasResults }}...{{ else }}...{{ end }}
//! {{/* comment */}}
//! {{- trims whitespace before, -}} trims whitespace after
//! ```

use super::helpers::TemplateHelper;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Action(Pipeline),
    Range {
        pipeline: Pipeline,
        body: Vec<Segment>,
        else_body: Vec<Segment>,
    },
    If {
        pipeline: Pipeline,
        then_body: Vec<Segment>,
        else_body: Vec<Segment>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pipeline {
    pub commands: Vec<Command>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Term(Term),
    Helper {
        helper: TemplateHelper,
        arg: Option<Term>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Term {
    /// `.`
    Dot,
    /// `$`
    Root,
    /// `.A.B "arg"` or `$.A`
    Field {
        from_root: bool,
        path: Vec<String>,
        args: Vec<String>,
    },
    Literal(String),
}

/// Raw piece of template source before tree building
#[derive(Debug)]
enum Piece {
    Text(String),
    Action { body: String, line: usize },
}

enum Terminator {
    End,
    Else,
    ElseIf(Pipeline),
    Eof,
}

/// Parse template source into a segment tree.
pub(crate) fn parse(source: &str) -> Result<Vec<Segment>> {
    let pieces = split_pieces(source)?;
    let mut cursor = 0;
    let (segments, terminator) = parse_list(&pieces, &mut cursor)?;
    match terminator {
        Terminator::Eof => Ok(segments),
        Terminator::End => Err(Error::template_syntax(
            line_of(&pieces, cursor),
            "unexpected {{end}}",
        )),
        Terminator::Else | Terminator::ElseIf(_) => Err(Error::template_syntax(
            line_of(&pieces, cursor),
            "unexpected {{else}}",
        )),
    }
}

fn line_of(pieces: &[Piece], cursor: usize) -> usize {
    pieces[..cursor.min(pieces.len())]
        .iter()
        .rev()
        .find_map(|p| match p {
            Piece::Action { line, .. } => Some(*line),
            Piece::Text(_) => None,
        })
        .unwrap_or(1)
}

fn split_pieces(source: &str) -> Result<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    while let Some(offset) = source[pos..].find("{{") {
        let open = pos + offset;
        let line = source[..open].matches('\n').count() + 1;

        let mut text = &source[pos..open];
        if trim_next {
            text = text.trim_start();
        }

        let close = source[open + 2..]
            .find("}}")
            .map(|i| open + 2 + i)
            .ok_or_else(|| Error::template_syntax(line, "unclosed action"))?;
        let mut inner = &source[open + 2..close];

        let trim_before = match inner.strip_prefix('-') {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                inner = rest;
                true
            }
            _ => false,
        };
        trim_next = match inner.strip_suffix('-') {
            Some(rest) if rest.is_empty() || rest.ends_with(char::is_whitespace) => {
                inner = rest;
                true
            }
            _ => false,
        };

        if trim_before {
            text = text.trim_end();
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text.to_string()));
        }
        pieces.push(Piece::Action {
            body: inner.trim().to_string(),
            line,
        });
        pos = close + 2;
    }

    let mut tail = &source[pos..];
    if trim_next {
        tail = tail.trim_start();
    }
    if !tail.is_empty() {
        pieces.push(Piece::Text(tail.to_string()));
    }
    Ok(pieces)
}

fn parse_list(pieces: &[Piece], cursor: &mut usize) -> Result<(Vec<Segment>, Terminator)> {
    let mut segments = Vec::new();
    while let Some(piece) = pieces.get(*cursor) {
        *cursor += 1;
        let (body, line) = match piece {
            Piece::Text(text) => {
                segments.push(Segment::Text(text.clone()));
                continue;
            }
            Piece::Action { body, line } => (body.as_str(), *line),
        };

        if body.starts_with("/*") {
            if !body.ends_with("*/") {
                return Err(Error::template_syntax(line, "unclosed comment"));
            }
            continue;
        }

        let (keyword, rest) = split_keyword(body);
        match keyword {
            "end" if rest.is_empty() => return Ok((segments, Terminator::End)),
            "else" if rest.is_empty() => return Ok((segments, Terminator::Else)),
            "else" => {
                let (next, cond) = split_keyword(rest);
                if next != "if" {
                    return Err(Error::template_syntax(line, "expected `if` after `else`"));
                }
                let pipeline = parse_pipeline(cond, line)?;
                return Ok((segments, Terminator::ElseIf(pipeline)));
            }
            "range" => {
                let pipeline = parse_pipeline(rest, line)?;
                segments.push(parse_range(pieces, cursor, pipeline)?);
            }
            "if" => {
                let pipeline = parse_pipeline(rest, line)?;
                segments.push(parse_if(pieces, cursor, pipeline)?);
            }
            _ => segments.push(Segment::Action(parse_pipeline(body, line)?)),
        }
    }
    Ok((segments, Terminator::Eof))
}

fn parse_range(pieces: &[Piece], cursor: &mut usize, pipeline: Pipeline) -> Result<Segment> {
    let line = pipeline.line;
    let (body, terminator) = parse_list(pieces, cursor)?;
    let else_body = match terminator {
        Terminator::End => Vec::new(),
        Terminator::Else => expect_end(pieces, cursor, line)?,
        Terminator::ElseIf(_) => {
            return Err(Error::template_syntax(line, "{{else if}} is not allowed in range"))
        }
        Terminator::Eof => return Err(Error::template_syntax(line, "unclosed {{range}}")),
    };
    Ok(Segment::Range {
        pipeline,
        body,
        else_body,
    })
}

fn parse_if(pieces: &[Piece], cursor: &mut usize, pipeline: Pipeline) -> Result<Segment> {
    let line = pipeline.line;
    let (then_body, terminator) = parse_list(pieces, cursor)?;
    let else_body = match terminator {
        Terminator::End => Vec::new(),
        Terminator::Else => expect_end(pieces, cursor, line)?,
        Terminator::ElseIf(nested) => vec![parse_if(pieces, cursor, nested)?],
        Terminator::Eof => return Err(Error::template_syntax(line, "unclosed {{if}}")),
    };
    Ok(Segment::If {
        pipeline,
        then_body,
        else_body,
    })
}

fn expect_end(pieces: &[Piece], cursor: &mut usize, line: usize) -> Result<Vec<Segment>> {
    match parse_list(pieces, cursor)? {
        (body, Terminator::End) => Ok(body),
        (_, Terminator::Eof) => Err(Error::template_syntax(line, "missing {{end}}")),
        (_, _) => Err(Error::template_syntax(line, "duplicate {{else}}")),
    }
}

fn split_keyword(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], body[i..].trim_start()),
        None => (body, ""),
    }
}

fn parse_pipeline(src: &str, line: usize) -> Result<Pipeline> {
    let tokens = tokenize(src, line)?;
    let mut commands = Vec::new();
    for group in tokens.split(|t| t == "|") {
        commands.push(parse_command(group, line)?);
    }
    if commands.is_empty() {
        return Err(Error::template_syntax(line, "empty action"));
    }
    Ok(Pipeline { commands, line })
}

fn parse_command(tokens: &[String], line: usize) -> Result<Command> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(Error::template_syntax(line, "empty command"));
    };

    if is_identifier(first) {
        let helper = TemplateHelper::from_name(first).ok_or_else(|| {
            Error::template_syntax(line, format!("unknown function `{}`", first))
        })?;
        let arg = match rest {
            [] => None,
            [only] => Some(parse_term(only, &[], line)?),
            _ => {
                return Err(Error::template_syntax(
                    line,
                    format!("`{}` takes a single argument", first),
                ))
            }
        };
        return Ok(Command::Helper { helper, arg });
    }

    Ok(Command::Term(parse_term(first, rest, line)?))
}

fn parse_term(token: &str, args: &[String], line: usize) -> Result<Term> {
    let term = if token == "." {
        Term::Dot
    } else if token == "$" {
        Term::Root
    } else if let Some(literal) = token.strip_prefix('"') {
        Term::Literal(literal.to_string())
    } else if let Some(path) = token.strip_prefix("$.") {
        field_term(path, true, args, line)?
    } else if let Some(path) = token.strip_prefix('.') {
        field_term(path, false, args, line)?
    } else {
        return Err(Error::template_syntax(
            line,
            format!("unexpected `{}`", token),
        ));
    };

    if !args.is_empty() && !matches!(term, Term::Field { .. }) {
        return Err(Error::template_syntax(
            line,
            format!("`{}` does not take arguments", token),
        ));
    }
    Ok(term)
}

fn field_term(path: &str, from_root: bool, args: &[String], line: usize) -> Result<Term> {
    let path: Vec<String> = path.split('.').map(String::from).collect();
    if path.iter().any(|p| !is_identifier(p)) {
        return Err(Error::template_syntax(line, "malformed field reference"));
    }
    let args = args
        .iter()
        .map(|a| {
            a.strip_prefix('"')
                .map(String::from)
                .ok_or_else(|| Error::template_syntax(line, "field arguments must be strings"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Term::Field {
        from_root,
        path,
        args,
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Split an action body into tokens. String literals come back with a
/// leading `"` marker and their escapes resolved.
fn tokenize(src: &str, line: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '|' {
            chars.next();
            tokens.push("|".to_string());
        } else if c == '"' {
            chars.next();
            let mut literal = String::from("\"");
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => literal.push('\n'),
                        Some('t') => literal.push('\t'),
                        Some(other) => literal.push(other),
                        None => return Err(Error::template_syntax(line, "unterminated string")),
                    },
                    Some(other) => literal.push(other),
                    None => return Err(Error::template_syntax(line, "unterminated string")),
                }
            }
            tokens.push(literal);
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '|' || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(word);
        }
    }
    Ok(tokens)
}
