use crate::frontend::source::{is_program_marker, source_lines, strip_leading_closers, SourceLine};
use crate::frontend::symbols::SymbolTable;

pub mod classify;
mod emitter;

use self::classify::{classify_line, LineStmt};
use self::emitter::{brace_delta, render};

const PRELUDE: &[&str] = &[
    "#include <iostream>",
    "#include <string>",
    "#include <vector>",
    "using namespace std;",
    "",
    "int main() {",
];

const INDENT: &str = "    ";

pub struct Generated {
    pub text: String,
    pub symbols: SymbolTable,
}

/// Translates every line of `src`. Never fails: unknown lines pass through.
pub fn generate(src: &str) -> Generated {
    let mut codegen = Codegen::new();
    codegen.emit_prelude();
    for line in source_lines(src) {
        codegen.emit_line(line);
    }
    codegen.output.push_str("}\n");
    Generated {
        text: codegen.output,
        symbols: codegen.symbols,
    }
}

struct Codegen {
    output: String,
    symbols: SymbolTable,
    depth: usize,
}

impl Codegen {
    fn new() -> Self {
        Self {
            output: String::new(),
            symbols: SymbolTable::new(),
            depth: 0,
        }
    }

    fn emit_prelude(&mut self) {
        for line in PRELUDE {
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    fn emit_line(&mut self, line: SourceLine) {
        if line.text.is_empty() || is_program_marker(line.text) {
            return;
        }
        let (closers, rest) = strip_leading_closers(line.text);
        for _ in 0..closers {
            self.depth = self.depth.saturating_sub(1);
            self.push_body("}");
        }
        if rest.is_empty() || is_program_marker(rest) {
            return;
        }
        let stmt = classify_line(rest);
        self.register(&stmt, line.number);
        let text = render(&stmt, &self.symbols);
        let delta = brace_delta(&text);
        if delta < 0 {
            self.depth = self.depth.saturating_sub(delta.unsigned_abs());
        }
        self.push_body(&text);
        if delta > 0 {
            self.depth += delta.unsigned_abs();
        }
    }

    fn register(&mut self, stmt: &LineStmt, line: usize) {
        match stmt {
            LineStmt::Declaration(decl) => {
                let name = decl.base_name();
                self.symbols.declare(name, decl.ty, line);
                match decl.init {
                    Some(init) => self.symbols.initialize(name, init),
                    None if decl.is_array() => self.symbols.initialize(name, ""),
                    None => {}
                }
            }
            LineStmt::Input(arg) => self.symbols.initialize(classify::base_name(arg), ""),
            LineStmt::Loop {
                init: Some(init), ..
            } => {
                self.symbols.declare(init.name, init.ty, line);
                self.symbols.initialize(init.name, init.value.unwrap_or(""));
            }
            LineStmt::Verbatim {
                assigns: Some(assign),
                ..
            } => self.symbols.initialize(assign.target, &assign.value),
            _ => {}
        }
    }

    fn push_body(&mut self, text: &str) {
        for _ in 0..=self.depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::generate;

    #[test]
    fn hello_program_round_trips_into_main() {
        let src = "shuru\nlekha name = \"hi\";\ndekhao name;\nshesh\n";
        let out = generate(src);
        let expected = "#include <iostream>\n#include <string>\n#include <vector>\nusing namespace std;\n\nint main() {\n    std::string name = \"hi\";\n    std::cout << (name);\n}\n";
        assert_eq!(out.text, expected);
        let sym = out.symbols.get("name").expect("declared");
        assert!(sym.initialized);
        assert_eq!(sym.value, "\"hi\"");
    }

    #[test]
    fn blocks_are_indented_and_closers_split_out() {
        let src = "shuru\npurno sonkha x = 3;\njodi (x > 1) {\ndekhao \"big {x}\";\n} nahoy {\ndekhao \"small\";\n}\nshesh";
        let out = generate(src).text;
        let body: Vec<&str> = out.lines().skip(6).collect();
        assert_eq!(
            body,
            vec![
                "    int x = 3;",
                "    if (x > 1) {",
                "        std::cout << \"big \" << (x);",
                "    }",
                "    else {",
                "        std::cout << \"small\";",
                "    }",
                "}",
            ]
        );
    }

    #[test]
    fn loop_registers_its_variable_and_still_emits_for() {
        let src = "shuru\nloop (purno sonkha i = 0; i < 5) {\ndekhao i;\n}\nshesh";
        let out = generate(src);
        assert!(out.text.contains("    for (int i = 0; i < 5) {\n"));
        let sym = out.symbols.get("i").expect("loop var");
        assert_eq!(sym.declared_type, "int");
        assert_eq!(sym.value, "0");
    }

    #[test]
    fn loop_variable_without_value_is_still_initialized() {
        let out = generate("shuru\nloop (purno sonkha i; i < 3; i++) {\n}\nshesh");
        let sym = out.symbols.get("i").expect("loop var");
        assert_eq!(sym.declared_type, "int");
        assert!(sym.initialized);
        assert_eq!(sym.value, "");
    }

    #[test]
    fn assignments_and_input_mark_initialized() {
        let src = "purno sonkha a;\ndosomik sonkha b;\nlekha c[4];\na = 2;\nporo(b);\nb += 1; // bump\n";
        let out = generate(src);
        let all = out.symbols.all();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|s| s.initialized));
        assert_eq!(out.symbols.get("a").expect("a").value, "2");
        assert_eq!(out.symbols.get("b").expect("b").value, "+= 1");
        assert!(out.text.contains("    b += 1;\n"));
        assert!(!out.text.contains("bump"));
    }

    #[test]
    fn unknown_lines_pass_through_verbatim() {
        let out = generate("shuru\nwhatever @@\nshesh").text;
        assert!(out.contains("    whatever @@\n"));
        assert!(out.ends_with("}\n"));
    }
}
