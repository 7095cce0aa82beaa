// Purpose: Define crate-level module surface for the translator and its driver.
// Inputs/Outputs: Re-exports internal modules for the binary, tests and library callers.
// Invariants: Core modules (frontend, validate, codegen, compile) never touch the filesystem.
// Gotchas: Keep module wiring consistent with src/main.rs, which only calls cli::run_cli.

pub mod cli;
pub mod codegen;
pub mod compile;
pub mod config;
pub mod frontend;
pub mod report;
pub mod validate;
