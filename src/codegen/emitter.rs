use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::frontend::lexer::Keyword;
use crate::frontend::symbols::SymbolTable;

use super::classify::{base_name, Branch, Declaration, LineStmt, OutputForm, Segment};

static TYPE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(purno[ \t]+sonkha|dosomik[ \t]+sonkha|lekha|akkhor|sotto-mittha)\b")
        .expect("type keyword pattern")
});

pub fn render(stmt: &LineStmt, symbols: &SymbolTable) -> String {
    match stmt {
        LineStmt::Declaration(decl) => render_declaration(decl),
        LineStmt::Input(arg) => render_input(arg, symbols),
        LineStmt::Output(form) => render_output(form),
        LineStmt::Branch(branch, rest) => render_branch(*branch, rest),
        LineStmt::Return(expr) if expr.is_empty() => "return;".to_string(),
        LineStmt::Return(expr) => format!("return {};", expr),
        LineStmt::Loop { header, .. } => format!("for {}", substitute_types(header))
            .trim_end()
            .to_string(),
        LineStmt::Verbatim { line, .. } => line.to_string(),
    }
}

fn render_declaration(decl: &Declaration) -> String {
    match decl.init {
        Some(init) => format!("{} {} = {};", decl.ty, decl.name, init),
        None => format!("{} {};", decl.ty, decl.name),
    }
}

fn render_input(arg: &str, symbols: &SymbolTable) -> String {
    let is_text = symbols
        .get(base_name(arg))
        .is_some_and(|sym| sym.declared_type == "std::string");
    if is_text {
        format!("std::getline(std::cin >> std::ws, {});", arg)
    } else {
        format!("std::cin >> {};", arg)
    }
}

fn render_output(form: &OutputForm) -> String {
    match form {
        OutputForm::Newline => r"std::cout << '\n';".to_string(),
        OutputForm::Expr(expr) => format!("std::cout << ({});", expr),
        OutputForm::Segments(segments) if segments.is_empty() => {
            "std::cout << \"\";".to_string()
        }
        OutputForm::Segments(segments) => {
            let parts: Vec<String> = segments
                .iter()
                .map(|seg| match seg {
                    Segment::Literal(text) => format!("\"{}\"", text),
                    Segment::Expr(expr) => format!("({})", expr),
                })
                .collect();
            format!("std::cout << {};", parts.join(" << "))
        }
    }
}

fn render_branch(branch: Branch, rest: &str) -> String {
    let head = match branch {
        Branch::If => "if",
        Branch::ElseIf => "else if",
        Branch::Else => "else",
    };
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{} {}", head, rest)
    }
}

/// Rewrites declaration keywords anywhere in `text` to their C++ types.
pub fn substitute_types(text: &str) -> Cow<'_, str> {
    TYPE_WORDS.replace_all(text, |caps: &Captures| {
        let words: Vec<&str> = caps[1].split_whitespace().collect();
        Keyword::from_lexeme(&words.join(" "))
            .and_then(Keyword::value_type)
            .unwrap_or_default()
            .to_string()
    })
}

/// Net `{` minus `}` outside string and character literals.
pub fn brace_delta(line: &str) -> isize {
    let mut delta = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in line.chars() {
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
            '"' | '\'' => quote = Some(ch),
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::{brace_delta, render, substitute_types};
    use crate::codegen::classify::classify_line;
    use crate::frontend::symbols::SymbolTable;

    fn emit(line: &str, symbols: &SymbolTable) -> String {
        render(&classify_line(line), symbols)
    }

    #[test]
    fn statements_render_to_cpp() {
        let sym = SymbolTable::new();
        let cases = [
            ("purno sonkha n = 5;", "int n = 5;"),
            ("sotto-mittha ok;", "bool ok;"),
            ("akkhor grid[3];", "char grid[3];"),
            ("dekhao \"a{b}c\";", "std::cout << \"a\" << (b) << \"c\";"),
            ("dekhao \"\";", "std::cout << \"\";"),
            (r"dekhao \n;", r"std::cout << '\n';"),
            ("dekhao total;", "std::cout << (total);"),
            ("jodi (x > 1) {", "if (x > 1) {"),
            ("nahoy   jodi (x) {", "else if (x) {"),
            ("nahoy", "else"),
            ("ferot dao x + 1;", "return x + 1;"),
            ("ferot dao;", "return;"),
            ("x += 2;", "x += 2;"),
            ("poro x;", "poro x;"),
        ];
        for (src, want) in cases {
            assert_eq!(emit(src, &sym), want, "source {:?}", src);
        }
    }

    #[test]
    fn input_uses_getline_for_text() {
        let mut sym = SymbolTable::new();
        sym.declare("name", "std::string", 1);
        sym.declare("age", "int", 2);
        assert_eq!(emit("poro(name);", &sym), "std::getline(std::cin >> std::ws, name);");
        assert_eq!(emit("poro(age);", &sym), "std::cin >> age;");
        assert_eq!(emit("poro(ghost);", &sym), "std::cin >> ghost;");
    }

    #[test]
    fn loop_header_types_are_substituted_on_word_boundaries() {
        let sym = SymbolTable::new();
        assert_eq!(
            emit("loop (purno  sonkha i = 0; i < lekhaCount; i++) {", &sym),
            "for (int i = 0; i < lekhaCount; i++) {"
        );
        assert_eq!(substitute_types("dosomik sonkha d"), "double d");
    }

    #[test]
    fn brace_delta_ignores_literals() {
        assert_eq!(brace_delta("if (x) {"), 1);
        assert_eq!(brace_delta("std::cout << \"{\";"), 0);
        assert_eq!(brace_delta("char c = '}';"), 0);
        assert_eq!(brace_delta("} else {"), 0);
    }
}
