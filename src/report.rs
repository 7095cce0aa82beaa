// Purpose: Render translation artifacts into the plain-text and JSON report files.
// Inputs/Outputs: Takes a finished Compilation and writes fixed-name files into a directory.
// Invariants: Rendering is deterministic; identical input gives byte-identical reports.
// Gotchas: The token report omits EndOfInput; the symbol table hides the std:: prefix.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::compile::{trace, Compilation};
use crate::frontend::diagnostic::{Diagnostic, Diagnostics};
use crate::frontend::lexer::Token;
use crate::frontend::symbols::Symbol;

pub const TOKENS_FILE: &str = "output_tokens.txt";
pub const SYMBOLS_FILE: &str = "output_symbol_table.txt";
pub const ERROR_LOG_FILE: &str = "error_log.txt";
pub const DIAGNOSTICS_JSON_FILE: &str = "diagnostics.json";

pub fn write_reports(dir: &Path, unit: &Compilation) -> Result<()> {
    let reports = [
        (TOKENS_FILE, render_tokens(&unit.tokens)),
        (SYMBOLS_FILE, render_symbol_table(&unit.symbols.all())),
        (ERROR_LOG_FILE, render_error_log(&unit.diagnostics)),
        (DIAGNOSTICS_JSON_FILE, render_json(&unit.diagnostics)?),
    ];
    for (name, text) in reports {
        let path = dir.join(name);
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        trace(&format!("wrote {}", path.display()));
    }
    Ok(())
}

pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens.iter().filter(|t| !t.is_eof()) {
        out.push_str(&tok.lexeme);
        out.push('\n');
    }
    out
}

const SYMBOL_HEADERS: [&str; 4] = ["Name", "Type", "Line", "Init"];
const SYMBOL_MIN_WIDTHS: [usize; 4] = [12, 14, 8, 8];

pub fn render_symbol_table(symbols: &[Symbol]) -> String {
    let rows: Vec<[String; 4]> = symbols
        .iter()
        .map(|sym| {
            [
                sym.name.clone(),
                display_type(&sym.declared_type).to_string(),
                sym.line.to_string(),
                if sym.initialized { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let mut widths = SYMBOL_MIN_WIDTHS;
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .fold(String::from("+"), |acc, w| acc + &"-".repeat(w + 2) + "+");
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&table_row(&SYMBOL_HEADERS, &widths));
    out.push_str(&border);
    out.push('\n');
    for row in &rows {
        out.push_str(&table_row(row, &widths));
    }
    out.push_str(&border);
    out.push('\n');
    out
}

fn table_row<S: AsRef<str>>(cells: &[S], widths: &[usize; 4]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:<w$} |", cell.as_ref(), w = *width));
    }
    line.push('\n');
    line
}

fn display_type(ty: &str) -> &str {
    ty.strip_prefix("std::").unwrap_or(ty)
}

pub fn render_error_log(diags: &Diagnostics) -> String {
    let mut out = String::from("Banglish diagnostics\n====================\n\n");
    if diags.is_empty() {
        out.push_str("No errors or warnings found.\n");
        return out;
    }
    out.push_str(&format!("Errors ({}):\n", diags.error_count()));
    for diag in diags.errors() {
        push_entry(&mut out, diag);
    }
    out.push_str(&format!("\nImprovements ({}):\n", diags.warning_count()));
    for diag in diags.warnings() {
        push_entry(&mut out, diag);
    }
    out
}

fn push_entry(out: &mut String, diag: &Diagnostic) {
    out.push_str(&format!(
        "  [{}:{}] {}: {}\n",
        diag.line,
        diag.column,
        diag.kind.tag(),
        diag.message
    ));
    if !diag.fix.is_empty() {
        out.push_str(&format!("      fix: {}\n", diag.fix));
    }
}

pub fn render_json(diags: &Diagnostics) -> Result<String> {
    let mut text = serde_json::to_string_pretty(diags).context("serialize diagnostics")?;
    text.push('\n');
    Ok(text)
}
