//! Named, typed extension points built on [`Chain`].

use std::{any::Any, marker::PhantomData};

use graft_syntax::{SyntaxNode, Value};
use indexmap::IndexMap;
use thiserror::Error;

use crate::Chain;

/// Decides how a constant value is emitted as a literal expression.
pub const EMIT_CONSTANT: ExtensionPoint<Value, SyntaxNode> = ExtensionPoint::new("emit-constant");

/// A typed handle to a named chain of shape `A -> R`.
pub struct ExtensionPoint<A, R> {
    name: &'static str,
    _shape: PhantomData<fn(A) -> R>,
}

impl<A, R> ExtensionPoint<A, R> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _shape: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<A, R> Clone for ExtensionPoint<A, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, R> Copy for ExtensionPoint<A, R> {}

impl<A, R> std::fmt::Debug for ExtensionPoint<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ExtensionPoint").field(&self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("unknown extension point '{0}'")]
    Unknown(String),

    #[error("extension point '{0}' is used with a different shape than it was declared with")]
    ShapeMismatch(String),

    #[error("extension point '{0}' is already declared")]
    Duplicate(String),
}

/// The extension point registry of one run.
#[derive(Default)]
pub struct ExtensionPoints {
    chains: IndexMap<&'static str, Box<dyn Any>>,
}

impl ExtensionPoints {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the well-known points with their base behavior.
    pub fn with_defaults() -> Self {
        let mut points = Self::new();
        points.chains.insert(
            EMIT_CONSTANT.name(),
            Box::new(Chain::new(|value: Value| SyntaxNode::literal(value.to_string()))),
        );
        points
    }

    /// Declare a new point with its base operation.
    pub fn declare<A: 'static, R: 'static>(
        &mut self,
        point: ExtensionPoint<A, R>,
        base: impl Fn(A) -> R + 'static,
    ) -> Result<(), ExtensionError> {
        if self.chains.contains_key(point.name()) {
            return Err(ExtensionError::Duplicate(point.name().to_string()));
        }
        self.chains.insert(point.name(), Box::new(Chain::new(base)));
        Ok(())
    }

    /// Wrap the chain behind `point` (see [`Chain::wrap`]).
    pub fn extend<A: 'static, R: 'static>(
        &mut self,
        point: ExtensionPoint<A, R>,
        wrapper: impl Fn(crate::Link<A, R>) -> crate::Link<A, R> + 'static,
    ) -> Result<(), ExtensionError> {
        self.chain_mut(point)?.wrap(wrapper);
        Ok(())
    }

    /// Wrap the chain behind `point` (see [`Chain::around`]).
    pub fn around<A: 'static, R: 'static>(
        &mut self,
        point: ExtensionPoint<A, R>,
        f: impl Fn(A, &dyn Fn(A) -> R) -> R + 'static,
    ) -> Result<(), ExtensionError> {
        self.chain_mut(point)?.around(f);
        Ok(())
    }

    pub fn get<A: 'static, R: 'static>(
        &self,
        point: ExtensionPoint<A, R>,
    ) -> Result<&Chain<A, R>, ExtensionError> {
        self.chains
            .get(point.name())
            .ok_or_else(|| ExtensionError::Unknown(point.name().to_string()))?
            .downcast_ref::<Chain<A, R>>()
            .ok_or_else(|| ExtensionError::ShapeMismatch(point.name().to_string()))
    }

    /// Build the chain behind `point` and call it.
    pub fn call<A: 'static, R: 'static>(
        &self,
        point: ExtensionPoint<A, R>,
        arg: A,
    ) -> Result<R, ExtensionError> {
        Ok(self.get(point)?.call(arg))
    }

    /// Declared point names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.chains.keys().copied()
    }

    fn chain_mut<A: 'static, R: 'static>(
        &mut self,
        point: ExtensionPoint<A, R>,
    ) -> Result<&mut Chain<A, R>, ExtensionError> {
        self.chains
            .get_mut(point.name())
            .ok_or_else(|| ExtensionError::Unknown(point.name().to_string()))?
            .downcast_mut::<Chain<A, R>>()
            .ok_or_else(|| ExtensionError::ShapeMismatch(point.name().to_string()))
    }
}

impl std::fmt::Debug for ExtensionPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.chains.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use graft_syntax::SyntaxKind;

    use super::*;

    const GREET: ExtensionPoint<String, String> = ExtensionPoint::new("greet");

    #[test]
    fn test_emit_constant_default() {
        let points = ExtensionPoints::with_defaults();
        let node = points
            .call(EMIT_CONSTANT, Value::Int(3))
            .expect("emit-constant is declared by default");
        assert_eq!(node.kind(), SyntaxKind::Literal);
        assert_eq!(node.text(), "3");
    }

    #[test]
    fn test_emit_constant_wrapped() {
        let mut points = ExtensionPoints::with_defaults();
        points
            .around(EMIT_CONSTANT, |value, next| match value {
                Value::Bool(b) => SyntaxNode::literal(if b { "1" } else { "0" }),
                other => next(other),
            })
            .unwrap();

        assert_eq!(points.call(EMIT_CONSTANT, Value::Bool(true)).unwrap().text(), "1");
        assert_eq!(points.call(EMIT_CONSTANT, Value::Int(5)).unwrap().text(), "5");
    }

    #[test]
    fn test_declare_and_extend() {
        let mut points = ExtensionPoints::new();
        points.declare(GREET, |name| format!("hello {}", name)).unwrap();
        points
            .around(GREET, |name, next| next(name.to_uppercase()))
            .unwrap();

        assert_eq!(points.call(GREET, "ada".to_string()).unwrap(), "hello ADA");
        assert_eq!(points.names().collect::<Vec<_>>(), vec!["greet"]);
    }

    #[test]
    fn test_registry_errors() {
        let mut points = ExtensionPoints::new();
        assert_eq!(
            points.call(GREET, String::new()).unwrap_err(),
            ExtensionError::Unknown("greet".to_string())
        );

        points.declare(GREET, |s| s).unwrap();
        assert_eq!(
            points.declare(GREET, |s| s).unwrap_err(),
            ExtensionError::Duplicate("greet".to_string())
        );

        const WRONG: ExtensionPoint<i32, i32> = ExtensionPoint::new("greet");
        assert_eq!(
            points.around(WRONG, |n, next| next(n)).unwrap_err(),
            ExtensionError::ShapeMismatch("greet".to_string())
        );
    }
}
