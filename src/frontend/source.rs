//! Line view of raw source shared by the code generator and the raw-line audit.

use std::cmp::Reverse;

use super::lexer::{is_ident_continue, Keyword};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// 1-based column of the first non-blank character.
    pub column: usize,
    /// Trimmed text with any trailing line comment removed.
    pub text: &'a str,
}

pub fn source_lines(src: &str) -> impl Iterator<Item = SourceLine<'_>> {
    src.lines().enumerate().map(|(idx, raw)| {
        let leading = raw.len() - raw.trim_start().len();
        SourceLine {
            number: idx + 1,
            column: raw[..leading].chars().count() + 1,
            text: strip_line_comment(raw).trim(),
        }
    })
}

/// Cuts `//` and everything after it unless it sits inside a string or
/// character literal.
pub fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev_slash = false;
    for (idx, ch) in line.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                prev_slash = false;
            }
            '/' if prev_slash => return &line[..idx - 1],
            '/' => prev_slash = true,
            _ => prev_slash = false,
        }
    }
    line
}

/// Splits off leading `}` characters, tolerating blanks between them.
pub fn strip_leading_closers(line: &str) -> (usize, &str) {
    let mut rest = line.trim_start();
    let mut count = 0;
    while let Some(tail) = rest.strip_prefix('}') {
        count += 1;
        rest = tail.trim_start();
    }
    (count, rest)
}

pub fn is_program_marker(line: &str) -> bool {
    line == "shuru" || line == "shesh"
}

/// Matches `kw` at the start of `line`, accepting any run of spaces or tabs
/// between the words of a compound keyword. The keyword must end at a word
/// boundary. Returns the remainder with leading blanks removed.
pub fn strip_keyword(line: &str, kw: Keyword) -> Option<&str> {
    let mut rest = line;
    let mut words = kw.as_str().split(' ').peekable();
    while let Some(word) = words.next() {
        rest = rest.strip_prefix(word)?;
        if words.peek().is_some() {
            let gap = rest.trim_start_matches([' ', '\t']);
            if gap.len() == rest.len() {
                return None;
            }
            rest = gap;
        }
    }
    if rest.chars().next().is_some_and(is_ident_continue) {
        return None;
    }
    Some(rest.trim_start())
}

/// Longest keyword prefix of `line`, so `nahoy jodi` wins over `nahoy`.
pub fn leading_keyword(line: &str) -> Option<(Keyword, &str)> {
    let mut by_length = Keyword::ALL;
    by_length.sort_by_key(|kw| Reverse(kw.as_str().len()));
    by_length
        .into_iter()
        .find_map(|kw| strip_keyword(line, kw).map(|rest| (kw, rest)))
}

pub fn leading_word(line: &str) -> Option<&str> {
    let end = line
        .find(|c: char| !is_ident_continue(c))
        .unwrap_or(line.len());
    (end > 0).then(|| &line[..end])
}
