//! Host compilation model consumed by the graft edit pipeline.
//!
//! This crate provides the types a host compiler hands to the pipeline: an
//! immutable [`Compilation`] snapshot holding ordered [`SyntaxTree`]s, a
//! [`SymbolTable`], and compilation-wide [`CompilationOptions`].
//!
//! # Architecture
//!
//! ```text
//! host front end → graft-syntax (snapshot) → graft-pipeline (editors) → host back end
//! ```
//!
//! Every type here is a value: edits never mutate a snapshot in place, they
//! build a new one with the `with_*` operations. Trees and the symbol table
//! are reference counted so producing a new snapshot is cheap.

mod compilation;
mod location;
mod node;
mod symbol;
mod tree;
mod value;

pub use compilation::{Compilation, CompilationError, CompilationOptions};
pub use location::{Location, Span};
pub use node::{NodeClass, SyntaxKind, SyntaxNode};
pub use symbol::{Attribute, ParameterSymbol, Symbol, SymbolId, SymbolKind, SymbolTable, TypeRef};
pub use tree::{ParseOptions, SyntaxTree};
pub use value::Value;
