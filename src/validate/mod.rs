// Purpose: Diagnostics engine; token, structure, statement and raw-line passes.
// Inputs/Outputs: Takes the lexed tokens plus raw source and returns ordered diagnostics.
// Invariants: Every pass is a pure function over its inputs; outputs are concatenated, never merged.
// Gotchas: The raw-line audit may disagree with the token-based passes and that is kept as is.

pub mod lines;
pub mod statements;
pub mod tokens;

use crate::frontend::diagnostic::Diagnostics;
use crate::frontend::lexer::Token;

pub use lines::{check_lines, classify_line, LineShape};

pub fn check_all(tokens: &[Token], src: &str) -> Diagnostics {
    let mut diags = Diagnostics::default();
    diags.extend(tokens::check_tokens(tokens));
    diags.extend(tokens::check_structure(tokens));
    diags.extend(statements::check_statements(tokens));
    diags.extend(check_lines(src));
    diags
}
