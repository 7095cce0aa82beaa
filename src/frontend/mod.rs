// Purpose: Frontend module hub for lexing, diagnostics model, symbols and source lines.
// Inputs/Outputs: Exposes components shared by the validation passes and the generator.
// Invariants: Token and diagnostic types are read-only once produced by a pipeline stage.
// Gotchas: Keyword tables live in lexer.rs; validation and codegen must not keep private copies.

pub mod diagnostic;
pub mod lexer;
pub mod source;
pub mod suggest;
pub mod symbols;
