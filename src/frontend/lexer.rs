use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    /// Column just past the last character; tokens never span lines.
    pub end_column: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    Operator,
    EndOfInput,
    LexError,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    pub fn end_column(&self) -> usize {
        self.span.end_column
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == op
    }

    /// Typed view of a keyword token; `None` for other kinds and for
    /// single words such as `purno` that only occur inside a compound.
    pub fn keyword(&self) -> Option<Keyword> {
        if self.kind != TokenKind::Keyword {
            return None;
        }
        Keyword::from_lexeme(&self.lexeme)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Shuru,
    Shesh,
    PurnoSonkha,
    DosomikSonkha,
    Lekha,
    Akkhor,
    SottoMittha,
    Jodi,
    NahoyJodi,
    Nahoy,
    Poro,
    Dekhao,
    Loop,
    FerotDao,
}

impl Keyword {
    pub const ALL: [Keyword; 14] = [
        Keyword::Shuru,
        Keyword::Shesh,
        Keyword::PurnoSonkha,
        Keyword::DosomikSonkha,
        Keyword::Lekha,
        Keyword::Akkhor,
        Keyword::SottoMittha,
        Keyword::Jodi,
        Keyword::NahoyJodi,
        Keyword::Nahoy,
        Keyword::Poro,
        Keyword::Dekhao,
        Keyword::Loop,
        Keyword::FerotDao,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Shuru => "shuru",
            Keyword::Shesh => "shesh",
            Keyword::PurnoSonkha => "purno sonkha",
            Keyword::DosomikSonkha => "dosomik sonkha",
            Keyword::Lekha => "lekha",
            Keyword::Akkhor => "akkhor",
            Keyword::SottoMittha => "sotto-mittha",
            Keyword::Jodi => "jodi",
            Keyword::NahoyJodi => "nahoy jodi",
            Keyword::Nahoy => "nahoy",
            Keyword::Poro => "poro",
            Keyword::Dekhao => "dekhao",
            Keyword::Loop => "loop",
            Keyword::FerotDao => "ferot dao",
        }
    }

    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == lexeme)
    }

    /// C++ type a declaration keyword introduces.
    pub fn value_type(self) -> Option<&'static str> {
        match self {
            Keyword::PurnoSonkha => Some("int"),
            Keyword::DosomikSonkha => Some("double"),
            Keyword::Lekha => Some("std::string"),
            Keyword::Akkhor => Some("char"),
            Keyword::SottoMittha => Some("bool"),
            _ => None,
        }
    }

    pub fn is_declaration(self) -> bool {
        self.value_type().is_some()
    }

    pub fn is_statement_start(self) -> bool {
        !matches!(self, Keyword::Shuru | Keyword::Shesh | Keyword::Nahoy)
    }

    /// Canonical statement form, used as the fix text of shape diagnostics.
    pub fn usage(self) -> String {
        match self {
            Keyword::Shuru => "shuru (first line of the program)".to_string(),
            Keyword::Shesh => "shesh (last line of the program)".to_string(),
            Keyword::Jodi => "jodi (condition) { ... }".to_string(),
            Keyword::NahoyJodi => "nahoy jodi (condition) { ... }".to_string(),
            Keyword::Nahoy => "nahoy { ... }".to_string(),
            Keyword::Poro => "poro(variable);".to_string(),
            Keyword::Dekhao => "dekhao \"text {variable}\"; or dekhao variable;".to_string(),
            Keyword::Loop => "loop (init; condition; update) { ... }".to_string(),
            Keyword::FerotDao => "ferot dao value;".to_string(),
            decl => format!("{} name = value;", decl.as_str()),
        }
    }
}

/// Words the lexer classifies as keywords when no compound phrase applies.
pub const LEXER_WORDS: &[&str] = &[
    "shuru", "shesh", "purno", "sonkha", "dosomik", "lekha", "akkhor", "jodi", "nahoy", "poro",
    "dekhao", "loop", "ferot", "dao",
];

// first word -> second words joined by intra-line whitespace
const SPACED_PHRASES: PhraseTable = &[
    ("purno", &["sonkha"]),
    ("dosomik", &["sonkha"]),
    ("ferot", &["dao"]),
    ("nahoy", &["jodi"]),
];

// first word -> second words joined by a single hyphen
const HYPHENATED_PHRASES: PhraseTable = &[("sotto", &["mittha"])];

/// Two-character operators come first so lookups read longest-match-first.
pub const OPERATORS: &[&str] = &[
    "++", "--", "+=", "-=", "*=", "/=", "%=", "<=", ">=", "==", "!=", "&&", "||", "+", "-", "*",
    "/", "%", "<", ">", "!", "=", "&", "|", "(", ")", "{", "}", "[", "]", ";", ",",
];

pub fn is_operator(lexeme: &str) -> bool {
    OPERATORS.contains(&lexeme)
}

pub fn is_keyword(lexeme: &str) -> bool {
    Keyword::from_lexeme(lexeme).is_some()
}

/// Any spelling the lexer would never hand out as an identifier.
pub fn is_reserved_word(lexeme: &str) -> bool {
    is_keyword(lexeme) || LEXER_WORDS.contains(&lexeme)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cursor {
    idx: usize,
    line: usize,
    col: usize,
}

impl Cursor {
    fn start() -> Self {
        Self {
            idx: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(self, src: &str) -> Option<char> {
        src[self.idx..].chars().next()
    }

    fn peek_next(self, src: &str) -> Option<char> {
        src[self.idx..].chars().nth(1)
    }

    fn bump(self, src: &str) -> Self {
        let Some(ch) = self.peek(src) else {
            return self;
        };
        if ch == '\n' {
            Self {
                idx: self.idx + 1,
                line: self.line + 1,
                col: 1,
            }
        } else {
            Self {
                idx: self.idx + ch.len_utf8(),
                line: self.line,
                col: self.col + 1,
            }
        }
    }

    fn span_to(self, end: Cursor) -> Span {
        Span {
            start: self.idx,
            end: end.idx,
            line: self.line,
            column: self.col,
            end_column: end.col,
        }
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    cursor: Cursor,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            cursor: Cursor::start(),
        }
    }

    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let start = self.cursor;
        let Some(ch) = start.peek(self.src) else {
            return Token::new(TokenKind::EndOfInput, "", start.span_to(start));
        };
        let (tok, next) = if is_ident_start(ch) {
            lex_word(self.src, start)
        } else if ch.is_ascii_digit() {
            lex_number(self.src, start)
        } else if ch == '"' {
            lex_string(self.src, start)
        } else {
            lex_operator(self.src, start)
        };
        self.cursor = next;
        tok
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.peek(self.src) {
                Some(ch) if ch.is_whitespace() => {
                    self.cursor = self.cursor.bump(self.src);
                }
                Some('/') if self.cursor.peek_next(self.src) == Some('/') => {
                    self.cursor = scan_while(self.src, self.cursor, |c| c != '\n');
                }
                _ => return,
            }
        }
    }
}

fn scan_while(src: &str, mut at: Cursor, f: impl Fn(char) -> bool) -> Cursor {
    while let Some(ch) = at.peek(src) {
        if !f(ch) {
            break;
        }
        at = at.bump(src);
    }
    at
}

fn scan_ident(src: &str, at: Cursor) -> Option<(&str, Cursor)> {
    if !at.peek(src).is_some_and(is_ident_start) {
        return None;
    }
    let end = scan_while(src, at, is_ident_continue);
    Some((&src[at.idx..end.idx], end))
}

fn lex_word(src: &str, start: Cursor) -> (Token, Cursor) {
    let end = scan_while(src, start, is_ident_continue);
    let first = &src[start.idx..end.idx];
    if let Some((phrase, next)) = match_compound(src, first, end) {
        return (
            Token::new(TokenKind::Keyword, phrase, start.span_to(next)),
            next,
        );
    }
    let kind = if LEXER_WORDS.contains(&first) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    };
    (Token::new(kind, first, start.span_to(end)), end)
}

/// Looks past `first` without consuming; returns the joined canonical
/// phrase and the cursor just after its second word.
fn match_compound(src: &str, first: &str, after_first: Cursor) -> Option<(String, Cursor)> {
    if let Some(seconds) = phrase_tails(SPACED_PHRASES, first) {
        let gap = scan_while(src, after_first, is_inline_space);
        if let Some((second, next)) = scan_ident(src, gap)
            && seconds.contains(&second)
        {
            return Some((format!("{first} {second}"), next));
        }
    }
    if let Some(seconds) = phrase_tails(HYPHENATED_PHRASES, first)
        && after_first.peek(src) == Some('-')
    {
        let gap = after_first.bump(src);
        if let Some((second, next)) = scan_ident(src, gap)
            && seconds.contains(&second)
        {
            return Some((format!("{first}-{second}"), next));
        }
    }
    None
}

type PhraseTable = &'static [(&'static str, &'static [&'static str])];

fn phrase_tails(table: PhraseTable, first: &str) -> Option<&'static [&'static str]> {
    table
        .iter()
        .find(|(head, _)| *head == first)
        .map(|(_, tails)| *tails)
}

fn lex_number(src: &str, start: Cursor) -> (Token, Cursor) {
    let mut cur = start;
    let mut seen_dot = false;
    while let Some(ch) = cur.peek(src) {
        if ch.is_ascii_digit() {
            cur = cur.bump(src);
        } else if ch == '.' && !seen_dot {
            seen_dot = true;
            cur = cur.bump(src);
        } else {
            break;
        }
    }
    (
        Token::new(TokenKind::Number, &src[start.idx..cur.idx], start.span_to(cur)),
        cur,
    )
}

fn lex_string(src: &str, start: Cursor) -> (Token, Cursor) {
    let mut cur = start.bump(src); // opening quote
    loop {
        match cur.peek(src) {
            None | Some('\n') => {
                let text = src[start.idx..cur.idx].trim_end_matches('\r');
                return (
                    Token::new(TokenKind::LexError, text, start.span_to(cur)),
                    cur,
                );
            }
            Some('\\') => {
                let esc = cur.bump(src);
                match esc.peek(src) {
                    None | Some('\n') => cur = esc,
                    Some(_) => cur = esc.bump(src),
                }
            }
            Some('"') => {
                cur = cur.bump(src);
                return (
                    Token::new(TokenKind::String, &src[start.idx..cur.idx], start.span_to(cur)),
                    cur,
                );
            }
            Some(_) => cur = cur.bump(src),
        }
    }
}

fn lex_operator(src: &str, start: Cursor) -> (Token, Cursor) {
    let one = start.bump(src);
    let two = one.bump(src);
    if two != one {
        let pair = &src[start.idx..two.idx];
        if is_operator(pair) {
            return (
                Token::new(TokenKind::Operator, pair, start.span_to(two)),
                two,
            );
        }
    }
    (
        Token::new(TokenKind::Operator, &src[start.idx..one.idx], start.span_to(one)),
        one,
    )
}

pub fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_inline_space(ch: char) -> bool {
    ch.is_whitespace() && ch != '\n'
}

#[cfg(test)]
mod tests {
    use super::{Keyword, Lexer, Token, TokenKind};

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).lex_all()
    }

    fn kinds_and_lexemes(src: &str) -> Vec<(TokenKind, String)> {
        lex(src)
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn token_list_ends_in_single_end_of_input() {
        for src in ["", "   \n\n", "shuru\nshesh", "dekhao \"open", "@#$"] {
            let tokens = lex(src);
            let eofs = tokens.iter().filter(|t| t.is_eof()).count();
            assert_eq!(eofs, 1, "source {:?}", src);
            assert!(tokens.last().expect("non-empty").is_eof());
        }
    }

    #[test]
    fn compound_keywords_tolerate_intra_line_whitespace() {
        let cases = [
            ("purno sonkha", "purno sonkha"),
            ("purno    sonkha", "purno sonkha"),
            ("dosomik\t sonkha", "dosomik sonkha"),
            ("ferot  dao", "ferot dao"),
            ("nahoy \t jodi", "nahoy jodi"),
            ("sotto-mittha", "sotto-mittha"),
        ];
        for (src, canonical) in cases {
            let tokens = lex(src);
            assert_eq!(tokens.len(), 2, "source {:?} gave {:?}", src, tokens);
            assert_eq!(tokens[0].kind, TokenKind::Keyword);
            assert_eq!(tokens[0].lexeme, canonical);
            assert_eq!(tokens[0].column(), 1);
            assert_eq!(tokens[0].end_column(), src.chars().count() + 1);
        }
    }

    #[test]
    fn compound_lookahead_does_not_cross_lines() {
        let got = kinds_and_lexemes("purno\nsonkha");
        assert_eq!(
            got,
            vec![
                (TokenKind::Keyword, "purno".to_string()),
                (TokenKind::Keyword, "sonkha".to_string()),
                (TokenKind::EndOfInput, String::new()),
            ]
        );
    }

    #[test]
    fn compound_lookahead_backs_off_on_partial_match() {
        let got = kinds_and_lexemes("purno sonkhax nahoy x");
        assert_eq!(got[0], (TokenKind::Keyword, "purno".to_string()));
        assert_eq!(got[1], (TokenKind::Identifier, "sonkhax".to_string()));
        assert_eq!(got[2], (TokenKind::Keyword, "nahoy".to_string()));
        assert_eq!(got[3], (TokenKind::Identifier, "x".to_string()));

        let spaced = kinds_and_lexemes("sotto - mittha");
        assert_eq!(spaced[0], (TokenKind::Identifier, "sotto".to_string()));
        assert_eq!(spaced[1], (TokenKind::Operator, "-".to_string()));
        assert_eq!(spaced[2], (TokenKind::Identifier, "mittha".to_string()));
    }

    #[test]
    fn unterminated_string_is_one_lex_error_at_opening_quote() {
        let tokens = lex("dekhao \"hello\nshesh");
        let errors: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::LexError)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line(), 1);
        assert_eq!(errors[0].column(), 8);
        assert_eq!(errors[0].lexeme, "\"hello");
        assert_eq!(tokens[2].lexeme, "shesh");
    }

    #[test]
    fn strings_keep_escape_pairs_verbatim() {
        let tokens = lex(r#"dekhao "say \"hi\"\n";"#);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, r#""say \"hi\"\n""#);
        assert!(tokens[2].is_op(";"));
    }

    #[test]
    fn numbers_take_at_most_one_dot() {
        let got = kinds_and_lexemes("3.14 1.2.3 7");
        assert_eq!(got[0], (TokenKind::Number, "3.14".to_string()));
        assert_eq!(got[1], (TokenKind::Number, "1.2".to_string()));
        assert_eq!(got[2], (TokenKind::Operator, ".".to_string()));
        assert_eq!(got[3], (TokenKind::Number, "3".to_string()));
        assert_eq!(got[4], (TokenKind::Number, "7".to_string()));
    }

    #[test]
    fn operators_prefer_two_character_matches() {
        let got: Vec<String> = lex("i++ <= != % @ [")
            .into_iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.lexeme)
            .collect();
        assert_eq!(got, vec!["++", "<=", "!=", "%", "@", "["]);
    }

    #[test]
    fn comments_and_positions() {
        let tokens = lex("// heading\n  jodi (x) // trailing\n{");
        assert_eq!(tokens[0].lexeme, "jodi");
        assert_eq!((tokens[0].line(), tokens[0].column()), (2, 3));
        assert_eq!(tokens[0].keyword(), Some(Keyword::Jodi));
        assert_eq!(tokens[4].lexeme, "{");
        assert_eq!(tokens[4].line(), 3);
    }

    #[test]
    fn lone_compound_halves_are_keywords_without_typed_view() {
        let tokens = lex("ferot x");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].keyword(), None);
    }
}
