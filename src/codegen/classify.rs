use crate::frontend::lexer::{is_ident_continue, is_ident_start, Keyword};
use crate::frontend::source::leading_keyword;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineStmt<'a> {
    Declaration(Declaration<'a>),
    /// Argument text between the parentheses of `poro(...)`.
    Input(&'a str),
    Output(OutputForm),
    Branch(Branch, &'a str),
    Return(&'a str),
    Loop {
        header: &'a str,
        init: Option<LoopInit<'a>>,
    },
    /// Emitted unchanged; may still record an assignment.
    Verbatim {
        line: &'a str,
        assigns: Option<Assignment<'a>>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub ty: &'static str,
    /// Declared text, including any `[size]` suffix.
    pub name: &'a str,
    pub init: Option<&'a str>,
}

impl Declaration<'_> {
    pub fn base_name(&self) -> &str {
        base_name(self.name)
    }

    pub fn is_array(&self) -> bool {
        self.name.contains('[')
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    If,
    ElseIf,
    Else,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputForm {
    Newline,
    Segments(Vec<Segment>),
    Expr(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expr(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopInit<'a> {
    pub ty: &'static str,
    pub name: &'a str,
    pub value: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub target: &'a str,
    pub value: String,
}

/// `line` is trimmed, comment-free and has no leading `}`.
pub fn classify_line(line: &str) -> LineStmt<'_> {
    let Some((kw, rest)) = leading_keyword(line) else {
        return verbatim(line);
    };
    let stmt = match kw {
        Keyword::Jodi => Some(LineStmt::Branch(Branch::If, rest)),
        Keyword::NahoyJodi => Some(LineStmt::Branch(Branch::ElseIf, rest)),
        Keyword::Nahoy => Some(LineStmt::Branch(Branch::Else, rest)),
        Keyword::Poro => parse_input(rest).map(LineStmt::Input),
        Keyword::Dekhao => Some(LineStmt::Output(parse_output(rest))),
        Keyword::FerotDao => Some(LineStmt::Return(strip_terminator(rest))),
        Keyword::Loop => Some(LineStmt::Loop {
            header: rest,
            init: loop_init(rest),
        }),
        Keyword::Shuru | Keyword::Shesh => None,
        decl => decl
            .value_type()
            .and_then(|ty| parse_declaration(ty, rest))
            .map(LineStmt::Declaration),
    };
    stmt.unwrap_or_else(|| verbatim(line))
}

fn verbatim(line: &str) -> LineStmt<'_> {
    LineStmt::Verbatim {
        line,
        assigns: parse_assignment(line),
    }
}

pub fn parse_declaration<'a>(ty: &'static str, rest: &'a str) -> Option<Declaration<'a>> {
    let (name, init) = match rest.split_once('=') {
        Some((name, init)) => (name, Some(strip_terminator(init))),
        None => (rest, None),
    };
    let name = strip_terminator(name);
    if base_name(name).is_empty() {
        return None;
    }
    Some(Declaration {
        ty,
        name,
        init: init.filter(|text| !text.is_empty()),
    })
}

pub fn parse_input(rest: &str) -> Option<&str> {
    let open = rest.find('(')?;
    let close = matching_paren(rest, open)?;
    let arg = strip_terminator(&rest[open + 1..close]);
    (!arg.is_empty()).then_some(arg)
}

pub fn parse_output(rest: &str) -> OutputForm {
    let body = strip_terminator(rest);
    if body == r"\n" {
        return OutputForm::Newline;
    }
    if body.is_empty() {
        return OutputForm::Segments(Vec::new());
    }
    match single_literal(body) {
        Some(inner) => OutputForm::Segments(split_interpolation(inner)),
        None => OutputForm::Expr(body.to_string()),
    }
}

/// Interior of `text` when it is exactly one double-quoted literal.
fn single_literal(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut escaped = false;
    for ch in inner.chars() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return None,
            _ => {}
        }
    }
    (!escaped).then_some(inner)
}

/// Splits literal text on unescaped `{expr}` holes. `\{` and `\}` stay
/// literal braces; a `{` without a closer is kept as literal text.
pub fn split_interpolation(inner: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut chars = inner.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, brace @ ('{' | '}'))) => literal.push(brace),
                Some((_, other)) => {
                    literal.push('\\');
                    literal.push(other);
                }
                None => literal.push('\\'),
            },
            '{' => match inner[idx + 1..].find('}') {
                Some(len) => {
                    flush_literal(&mut out, &mut literal);
                    let expr = inner[idx + 1..idx + 1 + len].trim();
                    if !expr.is_empty() {
                        out.push(Segment::Expr(expr.to_string()));
                    }
                    while chars.next_if(|(at, _)| *at <= idx + 1 + len).is_some() {}
                }
                None => literal.push('{'),
            },
            _ => literal.push(ch),
        }
    }
    flush_literal(&mut out, &mut literal);
    out
}

fn flush_literal(out: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        out.push(Segment::Literal(std::mem::take(literal)));
    }
}

const CPP_TYPES: &[(&str, &str)] = &[
    ("int", "int"),
    ("double", "double"),
    ("std::string", "std::string"),
    ("string", "std::string"),
    ("char", "char"),
    ("bool", "bool"),
];

/// Variable introduced by the init clause of a loop header, if it declares one.
pub fn loop_init(header: &str) -> Option<LoopInit<'_>> {
    let open = header.find('(')?;
    let clause = first_clause(&header[open + 1..])?.trim();
    let (ty, rest) = match leading_keyword(clause) {
        Some((kw, rest)) => (kw.value_type()?, rest),
        None => CPP_TYPES.iter().find_map(|(word, ty)| {
            let rest = clause.strip_prefix(word)?;
            rest.starts_with([' ', '\t']).then_some((*ty, rest.trim_start()))
        })?,
    };
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (rest.trim(), None),
    };
    if !is_plain_name(name) {
        return None;
    }
    Some(LoopInit {
        ty,
        name,
        value: value.filter(|v| !v.is_empty()),
    })
}

/// Text up to the first `;` at the header's own paren depth.
fn first_clause(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return None,
            ')' => depth -= 1,
            ';' if depth == 0 => return Some(&text[..idx]),
            _ => {}
        }
    }
    None
}

/// Assignment recorded by a fallback line such as `x = 5;` or `total += n;`.
/// Comparisons are not assignments.
pub fn parse_assignment(line: &str) -> Option<Assignment<'_>> {
    if !line.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let eq = line.find('=')?;
    let (lhs, rhs) = (&line[..eq], &line[eq + 1..]);
    if rhs.starts_with('=') || lhs.ends_with(['<', '>', '!']) {
        return None;
    }
    let rhs = strip_terminator(rhs);
    let (target, value) = match lhs.trim_end().strip_suffix(['+', '-', '*', '/', '%']) {
        Some(target) => {
            let op = &lhs.trim_end()[target.len()..];
            (target, format!("{op}= {rhs}"))
        }
        None => (lhs, rhs.to_string()),
    };
    let target = base_name(target);
    is_plain_name(target).then(|| Assignment { target, value })
}

/// Name without any `[index]` suffix.
pub fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name).trim()
}

fn is_plain_name(name: &str) -> bool {
    name.starts_with(is_ident_start) && name.chars().all(is_ident_continue)
}

fn strip_terminator(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix(';').unwrap_or(text).trim_end()
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}
