use once_cell::sync::Lazy;
use regex::Regex;

use crate::frontend::diagnostic::{Diagnostic, DiagnosticKind};
use crate::frontend::lexer::{
    is_keyword, is_operator, is_reserved_word, Keyword, Token, TokenKind, OPERATORS,
};
use crate::frontend::suggest::{did_you_mean, keyword_hint};

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("number pattern"));
static STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"([^"\\]|\\.)*"$"#).expect("string pattern"));

const DISCOURAGED_NAMES: &[&str] = &["temp", "tmp", "var"];

pub fn check_tokens(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for tok in tokens {
        let (line, col) = (tok.line(), tok.column());
        match tok.kind {
            TokenKind::Number if !NUMBER_RE.is_match(&tok.lexeme) => out.push(
                Diagnostic::error(
                    DiagnosticKind::InvalidNumber,
                    line,
                    col,
                    format!("Invalid number '{}'", tok.lexeme),
                )
                .fix("Write digits with at most one decimal part, e.g. 42 or 3.14"),
            ),
            TokenKind::String if !STRING_RE.is_match(&tok.lexeme) => out.push(
                Diagnostic::error(
                    DiagnosticKind::InvalidString,
                    line,
                    col,
                    format!("Malformed string literal {}", tok.lexeme),
                )
                .fix("Escape inner quotes as \\\""),
            ),
            TokenKind::Operator if !is_operator(&tok.lexeme) => {
                let fix = did_you_mean(&tok.lexeme, OPERATORS.iter().copied())
                    .unwrap_or_else(|| format!("Remove '{}'", tok.lexeme));
                out.push(
                    Diagnostic::error(
                        DiagnosticKind::InvalidOperator,
                        line,
                        col,
                        format!("Unknown operator '{}'", tok.lexeme),
                    )
                    .fix(fix),
                );
            }
            TokenKind::Keyword if !is_keyword(&tok.lexeme) => {
                let fix = keyword_hint(&tok.lexeme)
                    .unwrap_or_else(|| "Check the keyword spelling".to_string());
                out.push(
                    Diagnostic::error(
                        DiagnosticKind::InvalidKeyword,
                        line,
                        col,
                        format!("Unknown keyword '{}'", tok.lexeme),
                    )
                    .fix(fix),
                );
            }
            TokenKind::LexError => out.push(
                Diagnostic::error(
                    DiagnosticKind::UnclosedString,
                    line,
                    col,
                    format!("Unclosed string literal {}", tok.lexeme),
                )
                .fix("Add a closing '\"' before the end of the line"),
            ),
            TokenKind::Identifier => out.extend(check_identifier(&tok.lexeme, line, col)),
            _ => {}
        }
    }
    out
}

/// Fatal identifier defect, if any. Rules are ordered; the first hit wins.
pub fn identifier_error(name: &str, line: usize, col: usize) -> Option<Diagnostic> {
    let bad_shape = name.is_empty()
        || name
            .chars()
            .any(|c| !(c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()));
    if bad_shape {
        return Some(
            Diagnostic::error(
                DiagnosticKind::InvalidIdentifier,
                line,
                col,
                format!("Invalid identifier '{}'", name),
            )
            .fix("Use letters, digits and '_' only"),
        );
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(
            Diagnostic::error(
                DiagnosticKind::InvalidIdentifier,
                line,
                col,
                format!("Identifier '{}' starts with a digit", name),
            )
            .fix(format!("Start the name with a letter, e.g. 'n{}'", name)),
        );
    }
    if name.contains(|c: char| c == '-' || c.is_whitespace()) {
        let fixed: String = name
            .chars()
            .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
            .collect();
        return Some(
            Diagnostic::error(
                DiagnosticKind::InvalidIdentifier,
                line,
                col,
                format!("Identifier '{}' contains invalid characters", name),
            )
            .fix(format!("did you mean '{}'?", fixed)),
        );
    }
    if is_reserved_word(name) {
        return Some(
            Diagnostic::error(
                DiagnosticKind::ReservedKeyword,
                line,
                col,
                format!("'{}' is a reserved keyword", name),
            )
            .fix(format!("Rename it, e.g. '{}_value'", name.replace([' ', '-'], "_"))),
        );
    }
    None
}

pub fn check_identifier(name: &str, line: usize, col: usize) -> Vec<Diagnostic> {
    if let Some(err) = identifier_error(name, line, col) {
        return vec![err];
    }
    let mut out = Vec::new();
    let style = |msg: String, fix: &str| {
        Diagnostic::warning(DiagnosticKind::NamingConvention, line, col, msg).fix(fix)
    };
    if name.chars().count() == 1 {
        out.push(style(
            format!("Single-letter name '{}'", name),
            "Prefer a descriptive name, e.g. 'count'",
        ));
    }
    if DISCOURAGED_NAMES.contains(&name) {
        out.push(style(
            format!("Vague name '{}'", name),
            "Name the variable after what it holds",
        ));
    }
    let all_caps = name.chars().count() > 1
        && !name.chars().any(|c| c.is_lowercase())
        && name.chars().any(|c| c.is_uppercase());
    if all_caps {
        out.push(style(
            format!("All-caps name '{}'", name),
            "Use lowercase or snake_case for variables",
        ));
    }
    out
}

struct Pair {
    open: &'static str,
    close: &'static str,
    noun: &'static str,
    unmatched: DiagnosticKind,
    unclosed: DiagnosticKind,
}

const PAIRS: [Pair; 3] = [
    Pair {
        open: "{",
        close: "}",
        noun: "brace",
        unmatched: DiagnosticKind::UnmatchedBrace,
        unclosed: DiagnosticKind::UnclosedBrace,
    },
    Pair {
        open: "(",
        close: ")",
        noun: "parenthesis",
        unmatched: DiagnosticKind::UnmatchedParen,
        unclosed: DiagnosticKind::UnclosedParen,
    },
    Pair {
        open: "[",
        close: "]",
        noun: "bracket",
        unmatched: DiagnosticKind::UnmatchedBracket,
        unclosed: DiagnosticKind::UnclosedBracket,
    },
];

pub fn check_structure(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut depth = [0usize; 3];
    let mut starts = 0;
    let mut ends = 0;

    for tok in tokens {
        match tok.keyword() {
            Some(Keyword::Shuru) => {
                starts += 1;
                if starts > 1 {
                    out.push(
                        Diagnostic::error(
                            DiagnosticKind::DuplicateStart,
                            tok.line(),
                            tok.column(),
                            "Duplicate 'shuru'",
                        )
                        .fix("Keep a single 'shuru' on the first line"),
                    );
                }
            }
            Some(Keyword::Shesh) => {
                ends += 1;
                if ends > 1 {
                    out.push(
                        Diagnostic::error(
                            DiagnosticKind::DuplicateEnd,
                            tok.line(),
                            tok.column(),
                            "Duplicate 'shesh'",
                        )
                        .fix("Keep a single 'shesh' on the last line"),
                    );
                }
            }
            _ => {}
        }
        if tok.kind != TokenKind::Operator {
            continue;
        }
        for (pair, depth) in PAIRS.iter().zip(depth.iter_mut()) {
            if tok.lexeme == pair.open {
                *depth += 1;
            } else if tok.lexeme == pair.close {
                if *depth == 0 {
                    out.push(
                        Diagnostic::error(
                            pair.unmatched,
                            tok.line(),
                            tok.column(),
                            format!("Unmatched closing {} '{}'", pair.noun, pair.close),
                        )
                        .fix(format!("Remove it or add a matching '{}'", pair.open)),
                    );
                } else {
                    *depth -= 1;
                }
            }
        }
    }

    if starts == 0 {
        out.push(
            Diagnostic::error(DiagnosticKind::MissingStart, 1, 1, "Missing 'shuru'")
                .fix("Begin the program with 'shuru'"),
        );
    }
    let (last_line, last_col) = tokens
        .last()
        .map(|t| (t.line(), t.column()))
        .unwrap_or((1, 1));
    if ends == 0 {
        out.push(
            Diagnostic::error(DiagnosticKind::MissingEnd, last_line, 1, "Missing 'shesh'")
                .fix("End the program with 'shesh'"),
        );
    }
    for (pair, depth) in PAIRS.iter().zip(depth) {
        if depth > 0 {
            out.push(
                Diagnostic::error(
                    pair.unclosed,
                    last_line,
                    last_col,
                    format!("{} unclosed {}(s) '{}'", depth, pair.noun, pair.open),
                )
                .fix(format!("Add {} '{}'", depth, pair.close)),
            );
        }
    }
    out
}
