//! Pipeline manifest (`graft.toml`) parsing and validation.
//!
//! The manifest declares which editors a run uses, in which order, with which
//! options, and which features the host compiler offers:
//!
//! ```toml
//! [pipeline]
//! name = "demo"
//! host_features = ["extended-symbol-info"]
//!
//! [[editor]]
//! name = "defines"
//! kind = "define-constants"
//! order = -10
//! constants = ["FOO"]
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod editor;
mod error;
mod manifest;
mod validate;

pub use editor::EditorConfig;
pub use error::{Error, Result, SourceContext};
pub use manifest::{GraftToml, Manifest, PipelineConfig};
