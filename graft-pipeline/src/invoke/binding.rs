//! Argument binding for compile-time routines.
//!
//! Each declared parameter is matched against the argument kinds in a fixed
//! order; the first kind whose accepted types include the parameter's
//! declared type, and which is available for the symbol, wins. Anything left
//! unmatched receives the parameter's default value.

use graft_syntax::{ParameterSymbol, Symbol, SymbolTable, TypeRef, Value};
use serde::Serialize;

/// The well-known values a routine can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgumentKind {
    /// The invoked method symbol.
    Symbol,
    /// The native handle of the invoked method.
    NativeHandle,
    /// The symbol of the type declaring the method.
    ContainingType,
    /// The native handle of the declaring type.
    DeclaringTypeHandle,
    /// The declaring type's type token.
    TypeToken,
}

impl ArgumentKind {
    /// Matching order.
    pub const ORDER: [ArgumentKind; 5] = [
        ArgumentKind::Symbol,
        ArgumentKind::NativeHandle,
        ArgumentKind::ContainingType,
        ArgumentKind::DeclaringTypeHandle,
        ArgumentKind::TypeToken,
    ];

    /// Declared parameter types this kind can be assigned to.
    pub fn accepts(self) -> &'static [&'static str] {
        match self {
            ArgumentKind::Symbol => &["MethodSymbol", "Symbol", "object"],
            ArgumentKind::NativeHandle => &["MethodHandle", "MemberHandle"],
            ArgumentKind::ContainingType => &["TypeSymbol", "NamespaceOrTypeSymbol"],
            ArgumentKind::DeclaringTypeHandle => &["TypeHandle"],
            ArgumentKind::TypeToken => &["TypeToken"],
        }
    }

    pub fn is_assignable_to(self, ty: &TypeRef) -> bool {
        self.accepts().contains(&ty.name())
    }
}

/// A value passed to a native routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Argument {
    Symbol(Symbol),
    /// Qualified name of the method.
    NativeHandle(String),
    ContainingType(Symbol),
    /// Qualified name of the declaring type.
    DeclaringTypeHandle(String),
    /// Simple name of the declaring type.
    TypeToken(String),
    /// The parameter's default (`Value::Null` when it declares none).
    Default(Value),
}

impl Argument {
    /// The bound kind, `None` for defaults.
    pub fn kind(&self) -> Option<ArgumentKind> {
        match self {
            Argument::Symbol(_) => Some(ArgumentKind::Symbol),
            Argument::NativeHandle(_) => Some(ArgumentKind::NativeHandle),
            Argument::ContainingType(_) => Some(ArgumentKind::ContainingType),
            Argument::DeclaringTypeHandle(_) => Some(ArgumentKind::DeclaringTypeHandle),
            Argument::TypeToken(_) => Some(ArgumentKind::TypeToken),
            Argument::Default(_) => None,
        }
    }
}

/// Bind every parameter of `method`, in declaration order.
pub fn bind(method: &Symbol, symbols: &SymbolTable) -> Vec<Argument> {
    method
        .parameters
        .iter()
        .map(|parameter| bind_parameter(method, parameter, symbols))
        .collect()
}

fn bind_parameter(method: &Symbol, parameter: &ParameterSymbol, symbols: &SymbolTable) -> Argument {
    ArgumentKind::ORDER
        .into_iter()
        .filter(|kind| kind.is_assignable_to(&parameter.ty))
        .find_map(|kind| argument_of(kind, method, symbols))
        .unwrap_or_else(|| Argument::Default(parameter.default.clone().unwrap_or(Value::Null)))
}

fn argument_of(kind: ArgumentKind, method: &Symbol, symbols: &SymbolTable) -> Option<Argument> {
    let declaring = symbols.containing_type(method);
    match kind {
        ArgumentKind::Symbol => Some(Argument::Symbol(method.clone())),
        ArgumentKind::NativeHandle => Some(Argument::NativeHandle(symbols.qualified_name(method))),
        ArgumentKind::ContainingType => declaring.cloned().map(Argument::ContainingType),
        ArgumentKind::DeclaringTypeHandle => {
            declaring.map(|ty| Argument::DeclaringTypeHandle(symbols.qualified_name(ty)))
        }
        ArgumentKind::TypeToken => declaring.map(|ty| Argument::TypeToken(ty.name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use graft_syntax::SymbolId;

    use super::*;

    fn table(method: Symbol) -> SymbolTable {
        SymbolTable::from(vec![
            Symbol::new(1, "App", graft_syntax::SymbolKind::Namespace),
            Symbol::type_decl(2, "Build").in_container(SymbolId(1)),
            method,
        ])
    }

    #[test]
    fn test_binding_by_declared_type() {
        let method = Symbol::method(3, "Generate")
            .in_container(SymbolId(2))
            .with_parameter(ParameterSymbol::new("token", "TypeToken"))
            .with_parameter(ParameterSymbol::new("count", "int").with_default(Value::Int(4)))
            .with_parameter(ParameterSymbol::new("self", "MethodSymbol"))
            .with_parameter(ParameterSymbol::new("handle", "MethodHandle"))
            .with_parameter(ParameterSymbol::new("owner", "TypeSymbol"))
            .with_parameter(ParameterSymbol::new("owner_handle", "TypeHandle"));
        let symbols = table(method.clone());

        let args = bind(&method, &symbols);
        assert_eq!(
            args,
            vec![
                Argument::TypeToken("Build".to_string()),
                Argument::Default(Value::Int(4)),
                Argument::Symbol(method.clone()),
                Argument::NativeHandle("App.Build.Generate".to_string()),
                Argument::ContainingType(symbols.get(SymbolId(2)).unwrap().clone()),
                Argument::DeclaringTypeHandle("App.Build".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_declaring_type_falls_back_to_default() {
        let method = Symbol::method(3, "Loose")
            .in_container(SymbolId(1))
            .with_parameter(ParameterSymbol::new("owner", "TypeSymbol"))
            .with_parameter(ParameterSymbol::new("anything", "object"));
        let symbols = table(method.clone());

        let kinds: Vec<Option<ArgumentKind>> =
            bind(&method, &symbols).iter().map(Argument::kind).collect();
        assert_eq!(kinds, vec![None, Some(ArgumentKind::Symbol)]);
    }

    #[test]
    fn test_binding_is_deterministic() {
        let method = Symbol::method(3, "Generate")
            .in_container(SymbolId(2))
            .with_parameter(ParameterSymbol::new("a", "MemberHandle"))
            .with_parameter(ParameterSymbol::new("b", "Symbol"));
        let symbols = table(method.clone());
        assert_eq!(bind(&method, &symbols), bind(&method, &symbols));
    }
}
