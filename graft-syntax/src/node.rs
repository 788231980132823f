//! Syntax nodes.
//!
//! Nodes form an owned, immutable-by-convention tree. Every node has a
//! [`SyntaxKind`] tag, an optional token text (declared name, identifier,
//! literal text), a source span, an optional bound symbol, and an ordered list
//! of children. Rewriters build new nodes with the `with_*` operations; the
//! generic [`SyntaxNode::with_children`] rebuild is the only structural
//! operation the pipeline needs, whatever the kind.

use serde::{Deserialize, Serialize};

use crate::{Span, SymbolId};

/// Coarse classification of syntax kinds.
///
/// Rewriters declare the classes they visit; the dispatcher looks rewriters
/// up by the class of each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeClass {
    /// Compilation units and namespaces.
    Unit,
    /// Type declarations.
    Type,
    /// Field declarations.
    Field,
    /// Method declarations.
    Method,
    /// Parameters.
    Parameter,
    /// Statements, including blocks.
    Statement,
    /// Expressions.
    Expression,
    /// Parameter and argument lists.
    List,
}

impl NodeClass {
    /// All classes in declaration order.
    pub const ALL: [NodeClass; 8] = [
        NodeClass::Unit,
        NodeClass::Type,
        NodeClass::Field,
        NodeClass::Method,
        NodeClass::Parameter,
        NodeClass::Statement,
        NodeClass::Expression,
        NodeClass::List,
    ];
}

/// The syntactic kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxKind {
    CompilationUnit,
    Namespace,
    Class,
    Field,
    Method,
    ParameterList,
    Parameter,
    Block,
    ExpressionStatement,
    LocalDeclaration,
    Return,
    If,
    Invocation,
    ArgumentList,
    Argument,
    MemberAccess,
    Binary,
    Identifier,
    Literal,
}

impl SyntaxKind {
    /// The class used for rewriter lookup.
    pub fn class(self) -> NodeClass {
        match self {
            SyntaxKind::CompilationUnit | SyntaxKind::Namespace => NodeClass::Unit,
            SyntaxKind::Class => NodeClass::Type,
            SyntaxKind::Field => NodeClass::Field,
            SyntaxKind::Method => NodeClass::Method,
            SyntaxKind::Parameter => NodeClass::Parameter,
            SyntaxKind::ParameterList | SyntaxKind::ArgumentList => NodeClass::List,
            SyntaxKind::Block
            | SyntaxKind::ExpressionStatement
            | SyntaxKind::LocalDeclaration
            | SyntaxKind::Return
            | SyntaxKind::If => NodeClass::Statement,
            SyntaxKind::Invocation
            | SyntaxKind::Argument
            | SyntaxKind::MemberAccess
            | SyntaxKind::Binary
            | SyntaxKind::Identifier
            | SyntaxKind::Literal => NodeClass::Expression,
        }
    }

    /// Minimum number of children a node of this kind needs to stay
    /// well-formed.
    ///
    /// When child removal drops a node below this count the node is removed
    /// from its own parent as well.
    pub fn min_children(self) -> usize {
        match self {
            SyntaxKind::ExpressionStatement | SyntaxKind::Argument => 1,
            SyntaxKind::Invocation
            | SyntaxKind::MemberAccess
            | SyntaxKind::Binary
            | SyntaxKind::If => 2,
            _ => 0,
        }
    }
}

/// A node in a syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    text: String,
    #[serde(default)]
    span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symbol: Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a node with no text and no children.
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            text: String::new(),
            span: Span::default(),
            symbol: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf node carrying token text.
    pub fn token(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self::new(kind).with_text(text)
    }

    pub fn compilation_unit(members: Vec<SyntaxNode>) -> Self {
        Self::new(SyntaxKind::CompilationUnit).with_children(members)
    }

    pub fn class(name: impl Into<String>, members: Vec<SyntaxNode>) -> Self {
        Self::token(SyntaxKind::Class, name).with_children(members)
    }

    /// A method declaration with a parameter list and a body block.
    pub fn method(
        name: impl Into<String>,
        parameters: Vec<SyntaxNode>,
        body: Vec<SyntaxNode>,
    ) -> Self {
        Self::token(SyntaxKind::Method, name).with_children(vec![
            Self::new(SyntaxKind::ParameterList).with_children(parameters),
            Self::block(body),
        ])
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self::token(SyntaxKind::Parameter, name)
    }

    pub fn block(statements: Vec<SyntaxNode>) -> Self {
        Self::new(SyntaxKind::Block).with_children(statements)
    }

    pub fn expression_statement(expression: SyntaxNode) -> Self {
        Self::new(SyntaxKind::ExpressionStatement).with_children(vec![expression])
    }

    /// A call expression: callee followed by an argument list.
    pub fn invocation(callee: SyntaxNode, arguments: Vec<SyntaxNode>) -> Self {
        let arguments = arguments
            .into_iter()
            .map(|arg| Self::new(SyntaxKind::Argument).with_children(vec![arg]))
            .collect();
        Self::new(SyntaxKind::Invocation).with_children(vec![
            callee,
            Self::new(SyntaxKind::ArgumentList).with_children(arguments),
        ])
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::token(SyntaxKind::Identifier, name)
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::token(SyntaxKind::Literal, text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Rebuild this node with the given children, keeping everything else.
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Split the node into a childless copy and its children.
    pub fn split_children(mut self) -> (SyntaxNode, Vec<SyntaxNode>) {
        let children = std::mem::take(&mut self.children);
        (self, children)
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn class_of(&self) -> NodeClass {
        self.kind.class()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// The symbol invoked by this node, if it is a call expression.
    ///
    /// The invocation node itself carries the bound target; when it does not,
    /// the callee expression is consulted.
    pub fn invoked_symbol(&self) -> Option<SymbolId> {
        if self.kind != SyntaxKind::Invocation {
            return None;
        }
        self.symbol
            .or_else(|| self.children.first().and_then(|callee| callee.symbol))
    }

    /// Number of nodes in this subtree, including this node.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }

    /// Pre-order iterator over this subtree.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_method() -> SyntaxNode {
        SyntaxNode::method(
            "Main",
            vec![SyntaxNode::parameter("args")],
            vec![SyntaxNode::expression_statement(SyntaxNode::invocation(
                SyntaxNode::identifier("Log"),
                vec![SyntaxNode::literal("\"hi\"")],
            ))],
        )
    }

    #[test]
    fn test_node_count() {
        // Method, ParameterList, Parameter, Block, ExpressionStatement,
        // Invocation, Identifier, ArgumentList, Argument, Literal
        assert_eq!(sample_method().node_count(), 10);
    }

    #[test]
    fn test_descendants_pre_order() {
        let kinds: Vec<SyntaxKind> = sample_method().descendants().map(|n| n.kind()).collect();
        assert_eq!(kinds[0], SyntaxKind::Method);
        assert_eq!(kinds[1], SyntaxKind::ParameterList);
        assert_eq!(kinds[2], SyntaxKind::Parameter);
        assert_eq!(kinds[3], SyntaxKind::Block);
        assert_eq!(kinds.len(), 10);
    }

    #[test]
    fn test_invoked_symbol_from_callee() {
        let call = SyntaxNode::invocation(
            SyntaxNode::identifier("Log").with_symbol(SymbolId(7)),
            vec![],
        );
        assert_eq!(call.invoked_symbol(), Some(SymbolId(7)));
        assert_eq!(SyntaxNode::identifier("x").invoked_symbol(), None);
    }

    #[test]
    fn test_split_children_round_trip() {
        let method = sample_method();
        let (head, children) = method.clone().split_children();
        assert!(head.children().is_empty());
        assert_eq!(head.with_children(children), method);
    }

    #[test]
    fn test_kind_classes() {
        assert_eq!(SyntaxKind::Block.class(), NodeClass::Statement);
        assert_eq!(SyntaxKind::ArgumentList.class(), NodeClass::List);
        assert_eq!(SyntaxKind::Class.class(), NodeClass::Type);
    }
}
