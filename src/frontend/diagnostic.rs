use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    UnclosedString,
    InvalidKeyword,
    InvalidOperator,
    InvalidNumber,
    InvalidString,
    InvalidIdentifier,
    ReservedKeyword,
    NamingConvention,
    UnmatchedBrace,
    UnmatchedParen,
    UnmatchedBracket,
    UnclosedBrace,
    UnclosedParen,
    UnclosedBracket,
    DuplicateStart,
    DuplicateEnd,
    MissingStart,
    MissingEnd,
    Syntax,
    UnrecognizedLine,
}

impl DiagnosticKind {
    pub fn tag(self) -> &'static str {
        match self {
            DiagnosticKind::UnclosedString => "UNCLOSED_STRING",
            DiagnosticKind::InvalidKeyword => "INVALID_KEYWORD",
            DiagnosticKind::InvalidOperator => "INVALID_OPERATOR",
            DiagnosticKind::InvalidNumber => "INVALID_NUMBER",
            DiagnosticKind::InvalidString => "INVALID_STRING",
            DiagnosticKind::InvalidIdentifier => "INVALID_IDENTIFIER",
            DiagnosticKind::ReservedKeyword => "RESERVED_KEYWORD",
            DiagnosticKind::NamingConvention => "NAMING_CONVENTION",
            DiagnosticKind::UnmatchedBrace => "UNMATCHED_BRACE",
            DiagnosticKind::UnmatchedParen => "UNMATCHED_PAREN",
            DiagnosticKind::UnmatchedBracket => "UNMATCHED_BRACKET",
            DiagnosticKind::UnclosedBrace => "UNCLOSED_BRACE",
            DiagnosticKind::UnclosedParen => "UNCLOSED_PAREN",
            DiagnosticKind::UnclosedBracket => "UNCLOSED_BRACKET",
            DiagnosticKind::DuplicateStart => "DUPLICATE_SHURU",
            DiagnosticKind::DuplicateEnd => "DUPLICATE_SHESH",
            DiagnosticKind::MissingStart => "MISSING_SHURU",
            DiagnosticKind::MissingEnd => "MISSING_SHESH",
            DiagnosticKind::Syntax => "SYNTAX_ERROR",
            DiagnosticKind::UnrecognizedLine => "UNRECOGNIZED_LINE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub kind: DiagnosticKind,
    pub message: String,
    pub fix: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            kind,
            message: message.into(),
            fix: String::new(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        kind: DiagnosticKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, line, column, message)
        }
    }

    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = fix.into();
        self
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diag: Diagnostic) {
        self.items.push(diag);
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diags);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

pub fn format_diagnostic(diag: &Diagnostic, source: &str) -> String {
    let label = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let line_text = source
        .lines()
        .nth(diag.line.saturating_sub(1))
        .unwrap_or("");
    let mut out = format!(
        "{}[{}]:{}:{}: {}\n  {}\n  {}^",
        label,
        diag.kind.tag(),
        diag.line,
        diag.column,
        diag.message,
        line_text,
        " ".repeat(diag.column.saturating_sub(1))
    );
    if !diag.fix.is_empty() {
        out.push_str(&format!("\n  help: {}", diag.fix));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_diagnostic, Diagnostic, DiagnosticKind, Diagnostics, Severity};

    #[test]
    fn counts_split_by_severity() {
        let diags: Diagnostics = [
            Diagnostic::error(DiagnosticKind::Syntax, 1, 1, "a"),
            Diagnostic::warning(DiagnosticKind::NamingConvention, 2, 1, "b"),
            Diagnostic::error(DiagnosticKind::MissingEnd, 3, 1, "c"),
        ]
        .into_iter()
        .collect();
        assert_eq!(diags.error_count(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert!(diags.has_errors());
        assert_eq!(diags.items[1].severity, Severity::Warning);
    }

    #[test]
    fn format_points_at_column_and_prints_fix() {
        let diag = Diagnostic::error(DiagnosticKind::Syntax, 2, 5, "Expected '('")
            .fix("If syntax: jodi (condition) { ... }");
        let text = format_diagnostic(&diag, "shuru\njodi x > 1 {\nshesh\n");
        assert_eq!(
            text,
            "error[SYNTAX_ERROR]:2:5: Expected '('\n  jodi x > 1 {\n      ^\n  help: If syntax: jodi (condition) { ... }"
        );
    }
}
