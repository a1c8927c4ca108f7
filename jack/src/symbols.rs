use arch::vm::Segment;
use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Declaration category of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Argument => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

impl Variable {
    pub fn segment(&self) -> Segment {
        self.kind.segment()
    }
}

/// One scope of variables, indexed per kind in declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    table: IndexMap<String, Variable>,
    counts: IndexMap<Kind, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable::default();
        table.reset();
        table
    }

    /// Clear all entries and zero every kind counter.
    pub fn reset(&mut self) {
        self.table.clear();
        self.counts = Kind::iter().map(|kind| (kind, 0)).collect();
    }

    /// Define `name` with the next index of its kind. A redefinition replaces the entry.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) {
        let index = self.var_count(kind);
        self.counts.insert(kind, index + 1);
        self.table.insert(
            name.to_string(),
            Variable {
                ty: ty.to_string(),
                kind,
                index,
            },
        );
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.table.get(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.get(name).map(|v| v.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.get(name).map(|v| v.index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_per_kind() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field);
        table.define("count", "int", Kind::Static);
        table.define("y", "int", Kind::Field);
        table.define("p", "Point", Kind::Field);

        assert_eq!(table.var_count(Kind::Field), 3);
        assert_eq!(table.var_count(Kind::Static), 1);
        assert_eq!(table.var_count(Kind::Local), 0);
        assert_eq!(table.index_of("x"), Some(0));
        assert_eq!(table.index_of("y"), Some(1));
        assert_eq!(table.index_of("p"), Some(2));
        assert_eq!(table.index_of("count"), Some(0));
        assert_eq!(table.type_of("p"), Some("Point"));
        assert_eq!(table.kind_of("count"), Some(Kind::Static));
        assert_eq!(table.get("p").unwrap().segment(), Segment::This);
    }

    #[test]
    fn reset_clears_everything() {
        let mut table = SymbolTable::new();
        table.define("this", "Point", Kind::Argument);
        table.define("i", "int", Kind::Local);
        table.reset();
        assert!(!table.contains("this"));
        assert_eq!(table.kind_of("i"), None);
        assert_eq!(table.var_count(Kind::Argument), 0);
        table.define("a", "int", Kind::Argument);
        assert_eq!(table.index_of("a"), Some(0));
    }

    #[test]
    fn absent_names() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("nope"), None);
        assert_eq!(table.type_of("nope"), None);
        assert_eq!(table.index_of("nope"), None);
    }
}
