use arch::inst::MAX_ADDR;
use arch::symbol::{PREDEFINED, VARIABLE_BASE};
use indexmap::IndexMap;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolKind {
    Predefined,
    Label,
    Variable,
}

/// Address table shared by every file of one program.
pub struct Symbols {
    table: IndexMap<String, (SymbolKind, u16)>,
    next_var: u16,
}

impl Symbols {
    pub fn new() -> Self {
        let table = PREDEFINED
            .iter()
            .map(|(name, addr)| (name.clone(), (SymbolKind::Predefined, *addr)))
            .collect();
        Symbols {
            table,
            next_var: VARIABLE_BASE,
        }
    }

    /// Bind a label; returns the previous binding if there was one.
    pub fn define_label(&mut self, name: &str, pc: u16) -> Option<(SymbolKind, u16)> {
        self.table.insert(name.to_string(), (SymbolKind::Label, pc))
    }

    /// Address of a symbol, allocating a new variable when it is unknown.
    pub fn resolve(&mut self, name: &str) -> Result<u16, Error> {
        if let Some((_, addr)) = self.table.get(name) {
            return Ok(*addr);
        }
        if self.next_var > MAX_ADDR {
            return Err(Error::VariableOverflow(name.to_string()));
        }
        let addr = self.next_var;
        self.table
            .insert(name.to_string(), (SymbolKind::Variable, addr));
        self.next_var += 1;
        Ok(addr)
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.table.get(name).map(|(_, addr)| *addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(SymbolKind, u16))> {
        self.table.iter()
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_from_sixteen() {
        let mut symbols = Symbols::new();
        assert_eq!(symbols.resolve("i").unwrap(), 16);
        assert_eq!(symbols.resolve("sum").unwrap(), 17);
        assert_eq!(symbols.resolve("i").unwrap(), 16);
        assert_eq!(symbols.resolve("SCREEN").unwrap(), 16384);
        assert_eq!(symbols.resolve("R13").unwrap(), 13);
        assert_eq!(symbols.resolve("x").unwrap(), 18);
    }

    #[test]
    fn labels_are_not_variables() {
        let mut symbols = Symbols::new();
        assert_eq!(symbols.define_label("LOOP", 4), None);
        assert_eq!(symbols.resolve("LOOP").unwrap(), 4);
        assert_eq!(symbols.resolve("n").unwrap(), 16);
        assert_eq!(
            symbols.define_label("LOOP", 9),
            Some((SymbolKind::Label, 4))
        );
        assert_eq!(symbols.get("LOOP"), Some(9));
    }
}
