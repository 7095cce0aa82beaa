use crate::frontend::diagnostic::{Diagnostic, DiagnosticKind};
use crate::frontend::lexer::{Keyword, Token, TokenKind};

use super::tokens::identifier_error;

type Check = Result<(), Diagnostic>;

/// Position over a token list that always ends in EndOfInput; never moves
/// past that final token.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    fn prev(&self) -> &'a Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn bump(&mut self) -> &'a Token {
        let tok = self.peek();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.peek().is_op(op) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// `;`, `}`, end of input or the start of another statement.
    fn at_boundary(&self) -> bool {
        let tok = self.peek();
        tok.is_eof()
            || tok.is_op(";")
            || tok.is_op("}")
            || tok.keyword().is_some_and(Keyword::is_statement_start)
    }
}

pub fn check_statements(tokens: &[Token]) -> Vec<Diagnostic> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut cur = TokenCursor::new(tokens);
    let mut out = Vec::new();
    while !cur.at_eof() {
        let tok = cur.bump();
        let Some(kw) = tok.keyword().filter(|kw| kw.is_statement_start()) else {
            continue;
        };
        if let Err(diag) = check_statement(kw, tok, &mut cur) {
            out.push(diag);
        }
        synchronize(&mut cur);
    }
    out
}

fn check_statement(kw: Keyword, start: &Token, cur: &mut TokenCursor) -> Check {
    match kw {
        Keyword::Jodi | Keyword::NahoyJodi => {
            expect_open_paren(kw, cur)?;
            consume_parens(kw, cur).map(|_| ())
        }
        Keyword::Loop => {
            expect_open_paren(kw, cur)?;
            let open = cur.prev();
            let separators = consume_parens(kw, cur)?;
            if separators != 2 {
                return Err(syntax(
                    open,
                    format!("Loop header needs exactly two ';', found {}", separators),
                    kw,
                ));
            }
            Ok(())
        }
        Keyword::Poro => check_input(cur),
        Keyword::Dekhao => {
            if cur.at_boundary() {
                return Err(syntax(cur.peek(), "Nothing to print after 'dekhao'", kw));
            }
            Ok(())
        }
        Keyword::FerotDao => {
            if cur.at_boundary() {
                return Err(syntax(cur.peek(), "Missing value after 'ferot dao'", kw));
            }
            Ok(())
        }
        decl if decl.is_declaration() => check_declaration(decl, start, cur),
        _ => Ok(()),
    }
}

fn check_declaration(kw: Keyword, start: &Token, cur: &mut TokenCursor) -> Check {
    let first = cur.peek();
    if cur.at_boundary() || first.line() != start.line() {
        return Err(syntax(
            first,
            format!("Expected a variable name after '{}'", kw.as_str()),
            kw,
        ));
    }
    let (name, parts) = assemble_name(cur);
    if parts == 0 {
        return Err(syntax(
            first,
            format!("Expected a variable name after '{}', found '{}'", kw.as_str(), first.lexeme),
            kw,
        ));
    }
    if (parts > 1 || first.kind != TokenKind::Identifier)
        && let Some(err) = identifier_error(&name, first.line(), first.column())
    {
        return Err(err);
    }

    if cur.eat_op("[") {
        let size = cur.peek();
        if !matches!(size.kind, TokenKind::Number | TokenKind::Identifier) {
            return Err(syntax(size, "Expected an array size inside '[ ]'", kw));
        }
        cur.bump();
        if !cur.eat_op("]") {
            return Err(syntax(cur.peek(), "Expected ']' after the array size", kw));
        }
    }

    if cur.eat_op("=") {
        if cur.at_boundary() || cur.peek().line() != start.line() {
            return Err(syntax(cur.peek(), "Expected a value after '='", kw));
        }
        while !cur.at_boundary() && cur.peek().line() == start.line() {
            if cur.bump().kind == TokenKind::LexError {
                return Ok(());
            }
        }
    }

    let next = cur.peek();
    if next.is_op(";") && next.line() == start.line() {
        return Ok(());
    }
    let last = cur.prev();
    if next.line() == start.line() && !cur.at_boundary() {
        return Err(syntax(
            next,
            format!("Expected ';' or '=' after '{}', found '{}'", name, next.lexeme),
            kw,
        ));
    }
    Err(Diagnostic::error(
        DiagnosticKind::Syntax,
        last.line(),
        last.end_column(),
        "Missing ';' at end of declaration",
    )
    .fix(format!("Use: {}", kw.usage())))
}

/// Joins a declared name from adjacent tokens with no gap between them,
/// so `my-var` comes back as one name made of three parts.
fn assemble_name(cur: &mut TokenCursor) -> (String, usize) {
    let mut name = String::new();
    let mut parts = 0;
    loop {
        let tok = cur.peek();
        let name_like = matches!(
            tok.kind,
            TokenKind::Identifier | TokenKind::Number | TokenKind::Keyword
        ) || (parts > 0 && tok.is_op("-"));
        let touching = parts == 0 || cur.prev().span.end == tok.span.start;
        if !name_like || !touching || (parts == 0 && cur.at_boundary()) {
            break;
        }
        name.push_str(&tok.lexeme);
        parts += 1;
        cur.bump();
    }
    (name, parts)
}

fn check_input(cur: &mut TokenCursor) -> Check {
    let kw = Keyword::Poro;
    expect_open_paren(kw, cur)?;
    let target = cur.peek();
    if target.kind != TokenKind::Identifier {
        return Err(syntax(target, "Expected a variable name inside poro( )", kw));
    }
    cur.bump();
    if cur.eat_op("[") {
        while !cur.peek().is_op("]") {
            if cur.at_boundary() || cur.peek().is_op(")") {
                return Err(syntax(cur.peek(), "Expected ']' after the index", kw));
            }
            cur.bump();
        }
        cur.bump();
    }
    if !cur.eat_op(")") {
        return Err(syntax(cur.peek(), "Expected ')' after the variable", kw));
    }
    Ok(())
}

fn expect_open_paren(kw: Keyword, cur: &mut TokenCursor) -> Check {
    if cur.eat_op("(") {
        return Ok(());
    }
    Err(syntax(
        cur.peek(),
        format!("Expected '(' after '{}'", kw.as_str()),
        kw,
    ))
}

/// Consumes through the `)` matching an already-consumed `(`. Returns the
/// number of `;` seen at depth 1.
fn consume_parens(kw: Keyword, cur: &mut TokenCursor) -> Result<usize, Diagnostic> {
    let mut depth = 1usize;
    let mut separators = 0;
    loop {
        let tok = cur.peek();
        if tok.is_eof() || tok.is_op("{") || tok.is_op("}") {
            return Err(syntax(tok, "Expected ')' to close the header", kw));
        }
        cur.bump();
        if tok.is_op("(") {
            depth += 1;
        } else if tok.is_op(")") {
            depth -= 1;
            if depth == 0 {
                return Ok(separators);
            }
        } else if tok.is_op(";") && depth == 1 {
            separators += 1;
        }
    }
}

/// Skips to the next statement boundary. `;` and `{` are consumed; `}` and
/// statement keywords are left for the main loop.
fn synchronize(cur: &mut TokenCursor) {
    loop {
        let tok = cur.peek();
        if tok.is_eof() || tok.is_op("}") || tok.keyword().is_some_and(Keyword::is_statement_start)
        {
            return;
        }
        cur.bump();
        if tok.is_op(";") || tok.is_op("{") {
            return;
        }
    }
}

fn syntax(at: &Token, message: impl Into<String>, kw: Keyword) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::Syntax, at.line(), at.column(), message)
        .fix(format!("Use: {}", kw.usage()))
}
