use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::codegen::generate;
use crate::frontend::diagnostic::{format_diagnostic, Diagnostics};
use crate::frontend::lexer::{Lexer, Token};
use crate::frontend::symbols::SymbolTable;
use crate::validate::check_all;

/// Everything one translation run produces.
pub struct Compilation {
    pub source: String,
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
    pub symbols: SymbolTable,
    pub generated: String,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn render_diagnostics(&self) -> String {
        render_diags(&self.diagnostics, &self.source)
    }
}

pub fn compile_source(source: &str) -> Compilation {
    let tokens = Lexer::new(source).lex_all();
    trace(&format!("lexed {} tokens", tokens.len()));
    let diagnostics = check_all(&tokens, source);
    trace(&format!(
        "diagnostics: {} error(s), {} warning(s)",
        diagnostics.error_count(),
        diagnostics.warning_count()
    ));
    let generated = generate(source);
    trace(&format!(
        "generated {} line(s), {} symbol(s)",
        generated.text.lines().count(),
        generated.symbols.len()
    ));
    Compilation {
        source: source.to_string(),
        tokens,
        diagnostics,
        symbols: generated.symbols,
        generated: generated.text,
    }
}

pub fn compile_file(path: &Path) -> Result<Compilation> {
    let source =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    trace(&format!("compiling {}", path.display()));
    Ok(compile_source(&source))
}

fn render_diags(diags: &Diagnostics, source: &str) -> String {
    let mut out = String::new();
    for diag in diags.iter() {
        out.push_str(&format_diagnostic(diag, source));
        out.push('\n');
    }
    out
}

pub fn trace_enabled() -> bool {
    std::env::var("BANGLISH_TRACE")
        .ok()
        .as_deref()
        .map(|v| v == "1")
        .unwrap_or(false)
}

pub fn trace(msg: &str) {
    if trace_enabled() {
        eprintln!("[banglish] {}", msg);
    }
}
