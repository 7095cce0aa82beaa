// Purpose: Provide the binary entry for the translate-build-run driver.
// Inputs/Outputs: Works on fixed file names in the current directory and returns the driver's exit code.
// Invariants: Main must not bypass centralized CLI error and exit-code handling.
// Gotchas: The binary takes no arguments; configuration comes from banglish.toml and env vars.

fn main() {
    let code = banglish::cli::run_cli();
    std::process::exit(code);
}
