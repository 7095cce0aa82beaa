use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::frontend::diagnostic::{Diagnostic, DiagnosticKind};
use crate::frontend::lexer::is_reserved_word;
use crate::frontend::source::{
    is_program_marker, leading_keyword, leading_word, source_lines, strip_leading_closers,
};
use crate::frontend::suggest::keyword_hint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineShape {
    Declaration,
    Input,
    Output,
    If,
    IfInline,
    ElseIf,
    ElseIfInline,
    Else,
    ElseInline,
    Return,
    Loop,
    OpenBrace,
    CloseBrace,
    Assignment,
}

const DECL: &str = r"(?:purno[ \t]+sonkha|dosomik[ \t]+sonkha|lekha|akkhor|sotto-mittha)";
const INDEX: &str = r"(?:\[[^\]]*\])?";

impl LineShape {
    pub const ALL: [LineShape; 14] = [
        LineShape::Declaration,
        LineShape::Input,
        LineShape::Output,
        LineShape::If,
        LineShape::IfInline,
        LineShape::ElseIf,
        LineShape::ElseIfInline,
        LineShape::Else,
        LineShape::ElseInline,
        LineShape::Return,
        LineShape::Loop,
        LineShape::OpenBrace,
        LineShape::CloseBrace,
        LineShape::Assignment,
    ];

    /// Anchored pattern for a trimmed, comment-free line.
    pub fn pattern(self) -> String {
        match self {
            LineShape::Declaration => format!(r"^{DECL}[ \t]+\w[\w-]*\s*{INDEX}\s*(?:=.+)?;$"),
            LineShape::Input => format!(r"^poro\s*\(\s*\w+\s*{INDEX}\s*\)\s*;?$"),
            LineShape::Output => r"^dekhao\b\s*[^\s;].*$".to_string(),
            LineShape::If => r"^jodi\s*\(.*\)\s*\{?$".to_string(),
            LineShape::IfInline => r"^jodi\s*\(.*\)\s*(?:\{.*\}|[^{\s].*;)$".to_string(),
            LineShape::ElseIf => r"^nahoy[ \t]+jodi\s*\(.*\)\s*\{?$".to_string(),
            LineShape::ElseIfInline => {
                r"^nahoy[ \t]+jodi\s*\(.*\)\s*(?:\{.*\}|[^{\s].*;)$".to_string()
            }
            LineShape::Else => r"^nahoy\s*\{?$".to_string(),
            LineShape::ElseInline => r"^nahoy\s*(?:\{.*\}|\s[^{\s].*;)$".to_string(),
            LineShape::Return => r"^ferot[ \t]+dao\b(?:\s*[^\s;].*?)?\s*;?$".to_string(),
            LineShape::Loop => r"^loop\s*\(.*\)\s*\{?$".to_string(),
            LineShape::OpenBrace => r"^\{$".to_string(),
            LineShape::CloseBrace => r"^\}$".to_string(),
            LineShape::Assignment => format!(
                r"^(?:[A-Za-z_]\w*\s*{INDEX}\s*(?:[-+*/%]?=.+|\+\+|--)|(?:\+\+|--)\s*[A-Za-z_]\w*)\s*;?$"
            ),
        }
    }
}

static SHAPES: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(LineShape::ALL.iter().map(|shape| shape.pattern()))
        .expect("line shape patterns")
});

/// First shape in table order that accepts `line`. Assignments whose
/// target is a reserved word are rejected.
pub fn classify_line(line: &str) -> Option<LineShape> {
    let matches = SHAPES.matches(line);
    LineShape::ALL
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| matches.matched(*idx))
        .map(|(_, shape)| shape)
        .find(|shape| {
            *shape != LineShape::Assignment
                || !leading_word(line).is_some_and(is_reserved_word)
        })
}

pub fn check_lines(src: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for line in source_lines(src) {
        if line.text.is_empty() || is_program_marker(line.text) {
            continue;
        }
        let (_, rest) = strip_leading_closers(line.text);
        if rest.is_empty() || is_program_marker(rest) || classify_line(rest).is_some() {
            continue;
        }
        out.push(
            Diagnostic::error(
                DiagnosticKind::UnrecognizedLine,
                line.number,
                line.column,
                format!("Statement not recognized: {}", rest),
            )
            .fix(line_hint(rest)),
        );
    }
    out
}

fn line_hint(rest: &str) -> String {
    if let Some((kw, _)) = leading_keyword(rest) {
        return format!("Use: {}", kw.usage());
    }
    leading_word(rest)
        .and_then(keyword_hint)
        .unwrap_or_else(|| "End statements with ';' and open blocks with '{'".to_string())
}

#[cfg(test)]
mod tests {
    use super::{check_lines, classify_line, LineShape};
    use crate::frontend::diagnostic::DiagnosticKind;

    #[test]
    fn every_shape_has_a_representative_line() {
        let cases = [
            ("purno sonkha count = 10;", LineShape::Declaration),
            ("dosomik  sonkha ratio;", LineShape::Declaration),
            ("lekha names[5];", LineShape::Declaration),
            ("sotto-mittha my-flag = 1;", LineShape::Declaration),
            ("poro(count);", LineShape::Input),
            ("poro( names[2] );", LineShape::Input),
            ("dekhao \"hi {name}\";", LineShape::Output),
            ("dekhao(x + 1);", LineShape::Output),
            ("jodi (x > 1) {", LineShape::If),
            ("jodi(x)", LineShape::If),
            ("jodi (x) { dekhao x; }", LineShape::IfInline),
            ("jodi (x) dekhao x;", LineShape::IfInline),
            ("nahoy jodi (x == 2) {", LineShape::ElseIf),
            ("nahoy \t jodi (x) dekhao x;", LineShape::ElseIfInline),
            ("nahoy {", LineShape::Else),
            ("nahoy", LineShape::Else),
            ("nahoy dekhao x;", LineShape::ElseInline),
            ("ferot dao 0;", LineShape::Return),
            ("ferot dao;", LineShape::Return),
            ("loop (purno sonkha i = 0; i < 3; i++) {", LineShape::Loop),
            ("{", LineShape::OpenBrace),
            ("}", LineShape::CloseBrace),
            ("count = count + 1;", LineShape::Assignment),
            ("total += 2;", LineShape::Assignment),
            ("arr[1] = 3;", LineShape::Assignment),
            ("i++;", LineShape::Assignment),
            ("--i;", LineShape::Assignment),
            ("dekhao x", LineShape::Output),
            ("x++", LineShape::Assignment),
            ("count = 2", LineShape::Assignment),
            ("poro(x)", LineShape::Input),
            ("ferot dao 0", LineShape::Return),
        ];
        for (line, shape) in cases {
            assert_eq!(classify_line(line), Some(shape), "line {:?}", line);
        }
        for shape in LineShape::ALL {
            assert!(cases.iter().any(|(_, s)| *s == shape), "{:?} untested", shape);
        }
    }

    #[test]
    fn malformed_lines_are_not_recognized() {
        for line in [
            "purno sonkha x = 5",
            "dekhao;",
            "dekhaox y;",
            "poro x;",
            "jodi x > 1 {",
            "lekha = 1;",
            "x y z;",
            "ferot 1;",
            "purnosonkha x = 1;",
        ] {
            assert_eq!(classify_line(line), None, "line {:?}", line);
        }
    }

    #[test]
    fn terminator_is_optional_outside_declarations() {
        let src = "shuru\npurno sonkha x = 1;\ndekhao x\nx++\nporo(x)\nferot dao 0\nshesh\n";
        assert!(check_lines(src).is_empty());
        assert_eq!(check_lines("purno sonkha y = 2\n").len(), 1);
    }

    #[test]
    fn keyword_led_assignment_is_rejected() {
        assert_eq!(classify_line("lekha += 1;"), None);
        assert_eq!(classify_line("lekhak += 1;"), Some(LineShape::Assignment));
    }

    #[test]
    fn audit_strips_closers_comments_and_markers() {
        let src = "shuru\n  // note\n\n} nahoy {\n}}\nx = 1; // set\n  jodi x {\nshesh\n";
        let diags = check_lines(src);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnrecognizedLine);
        assert_eq!((diags[0].line, diags[0].column), (7, 3));
        assert_eq!(diags[0].fix, "Use: jodi (condition) { ... }");
    }

    #[test]
    fn misspelled_keyword_line_gets_hint() {
        let diags = check_lines("dekao x;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].fix, "did you mean 'dekhao'?");
    }
}
