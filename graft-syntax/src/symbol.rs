//! Symbols and the symbol table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Location, Value};

/// Identity of a symbol within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Namespace,
    Type,
    Method,
    Field,
    Property,
}

/// A reference to a type by name.
///
/// `void` is represented by the absence of a return type on [`Symbol`], not
/// by a `TypeRef`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An annotation attached to a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// A declared parameter of a method symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Value used when no argument is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeRef::new(ty),
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A declared program entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Return type for methods; `None` means `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// The containing namespace or type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing: Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSymbol>,
}

impl Symbol {
    pub fn new(id: u32, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            id: SymbolId(id),
            name: name.into(),
            kind,
            is_static: false,
            is_abstract: false,
            return_type: None,
            attributes: Vec::new(),
            containing: None,
            location: None,
            parameters: Vec::new(),
        }
    }

    pub fn method(id: u32, name: impl Into<String>) -> Self {
        Self::new(id, name, SymbolKind::Method)
    }

    pub fn type_decl(id: u32, name: impl Into<String>) -> Self {
        Self::new(id, name, SymbolKind::Type)
    }

    pub fn in_container(mut self, containing: SymbolId) -> Self {
        self.containing = Some(containing);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn returning(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(TypeRef::new(ty));
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSymbol) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_none()
    }
}

/// All symbols of a compilation, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolTable {
    symbols: IndexMap<SymbolId, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, replacing any symbol with the same id in place.
    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.id, symbol);
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The type declaring the given symbol, if its container is a type.
    pub fn containing_type(&self, symbol: &Symbol) -> Option<&Symbol> {
        symbol
            .containing
            .and_then(|id| self.get(id))
            .filter(|parent| parent.kind == SymbolKind::Type)
    }

    /// Dot-separated name through all containers (e.g., "App.Program.Main").
    pub fn qualified_name(&self, symbol: &Symbol) -> String {
        let mut parts = vec![symbol.name.as_str()];
        let mut current = symbol.containing;
        // A malformed table could contain a cycle; bound the walk.
        let mut remaining = self.symbols.len();
        while let Some(id) = current {
            let Some(parent) = self.get(id) else { break };
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            parts.push(parent.name.as_str());
            current = parent.containing;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Symbols carrying the given attribute.
    pub fn with_attribute<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.iter().filter(move |s| s.has_attribute(name))
    }
}

impl From<Vec<Symbol>> for SymbolTable {
    fn from(symbols: Vec<Symbol>) -> Self {
        let mut table = SymbolTable::new();
        for symbol in symbols {
            table.insert(symbol);
        }
        table
    }
}

impl From<SymbolTable> for Vec<Symbol> {
    fn from(table: SymbolTable) -> Self {
        table.symbols.into_values().collect()
    }
}

impl FromIterator<Symbol> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> SymbolTable {
        SymbolTable::from(vec![
            Symbol::new(1, "App", SymbolKind::Namespace),
            Symbol::type_decl(2, "Program").in_container(SymbolId(1)),
            Symbol::method(3, "Main")
                .in_container(SymbolId(2))
                .with_static(true),
            Symbol::method(4, "Helper").in_container(SymbolId(1)),
        ])
    }

    #[test]
    fn test_qualified_name() {
        let table = sample_table();
        let main = table.get(SymbolId(3)).unwrap();
        assert_eq!(table.qualified_name(main), "App.Program.Main");
    }

    #[test]
    fn test_containing_type_requires_type_kind() {
        let table = sample_table();
        let main = table.get(SymbolId(3)).unwrap();
        let helper = table.get(SymbolId(4)).unwrap();
        assert_eq!(table.containing_type(main).map(|t| t.id), Some(SymbolId(2)));
        assert!(table.containing_type(helper).is_none());
    }

    #[test]
    fn test_qualified_name_cycle_terminates() {
        let table = SymbolTable::from(vec![
            Symbol::type_decl(1, "A").in_container(SymbolId(2)),
            Symbol::type_decl(2, "B").in_container(SymbolId(1)),
        ]);
        let a = table.get(SymbolId(1)).unwrap();
        assert!(table.qualified_name(a).ends_with("A"));
    }

    #[test]
    fn test_json_is_a_list() {
        let table = sample_table();
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        let back: SymbolTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }
}
