use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub declared_type: String,
    pub line: usize,
    pub initialized: bool,
    /// Last assigned text, kept for display only.
    pub value: String,
}

/// Flat name registry: one record per name, insertion order preserved.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, declared_type: &str, line: usize) {
        let symbol = Symbol {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            line,
            initialized: false,
            value: String::new(),
        };
        if self.table.insert(name.to_string(), symbol).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn initialize(&mut self, name: &str, value: &str) {
        if let Some(symbol) = self.table.get_mut(name) {
            symbol.initialized = true;
            symbol.value = value.to_string();
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn all(&self) -> Vec<Symbol> {
        self.order
            .iter()
            .filter_map(|name| self.table.get(name).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolTable;

    #[test]
    fn redeclare_resets_initialized_and_keeps_position() {
        let mut sym = SymbolTable::new();
        sym.declare("x", "int", 2);
        sym.declare("y", "double", 3);
        sym.initialize("x", "5");
        assert!(sym.get("x").expect("x").initialized);

        sym.declare("x", "std::string", 7);
        let all = sym.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "x");
        assert_eq!(all[0].declared_type, "std::string");
        assert_eq!(all[0].line, 7);
        assert!(!all[0].initialized);
        assert!(all[0].value.is_empty());
        assert_eq!(all[1].name, "y");
    }

    #[test]
    fn initialize_unknown_name_is_a_no_op() {
        let mut sym = SymbolTable::new();
        sym.initialize("ghost", "1");
        assert!(sym.is_empty());
        assert!(!sym.contains("ghost"));
    }

    #[test]
    fn initialize_stores_display_value() {
        let mut sym = SymbolTable::new();
        sym.declare("name", "std::string", 1);
        sym.initialize("name", "\"hi\"");
        let s = sym.get("name").expect("name");
        assert!(s.initialized);
        assert_eq!(s.value, "\"hi\"");
        assert_eq!(sym.len(), 1);
    }
}
