//! cppuml - Turn C++ class declarations into class diagrams
//!
//! Reads one C++ source file, models its classes, structs, enums and class
//! templates, infers inheritance, aggregation and dependency relationships,
//! and writes a PlantUML (or Mermaid) class diagram.
//!
//! # Quick Start
//!
//! ```rust
//! use cppuml::{convert_source, Settings};
//!
//! let source = "class Point { double x; double y; };";
//! let diagram = convert_source(source, &Settings::default()).unwrap();
//! assert!(diagram.contains("class Point {"));
//! assert!(diagram.contains("\t- x: double"));
//! ```
//!
//! # Advanced Usage
//!
//! Each stage can be driven on its own:
//!
//! ```rust
//! use std::path::Path;
//! use cppuml::prelude::*;
//!
//! let source = "struct Shape {};\nstruct Circle : Shape { int r; };";
//! let path = Path::new("shapes.hpp");
//!
//! // Parse into a declaration tree
//! let root = TreeSitterFrontEnd::new().parse_source(source, path).unwrap();
//!
//! // Build the model and its relationships
//! let model = DeclarationExtractor::new(path).extract(&root);
//! let relations = RelationshipSynthesizer::new().synthesize(&model);
//! assert_eq!(model.len(), 2);
//! assert_eq!(relations.inheritance.len(), 1);
//!
//! // Render
//! let doc = PlantUmlWriter::new()
//!     .render(&model, &relations, &WriterConfig::default())
//!     .unwrap();
//! assert!(doc.contains("Shape <|.. Circle"));
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;
pub use plugins::orchestrator::{Converter, Settings};

use std::path::Path;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Cursor, CursorKind, DeclNode, DiagramWriter, EdgeKind, Entity, FrontEnd, MemberLayout,
        Model, Relationships, WriterConfig,
    };
    pub use crate::plugins::cpp::{
        DeclarationExtractor, RelationshipSynthesizer, TreeSitterFrontEnd, TypeReconstructor,
    };
    pub use crate::plugins::mermaid::MermaidWriter;
    pub use crate::plugins::orchestrator::{Converter, Settings};
    pub use crate::plugins::plantuml::PlantUmlWriter;
}

/// Convert a C++ source file to a PlantUML class diagram
///
/// # Example
/// ```rust,no_run
/// let diagram = cppuml::convert("shapes.hpp").unwrap();
/// println!("{}", diagram);
/// ```
pub fn convert(source: impl AsRef<Path>) -> anyhow::Result<String> {
    Converter::new(Settings::default()).convert(source.as_ref())
}

/// Convert C++ source text without touching the filesystem
///
/// Every top-level declaration in `source` is treated as belonging to the
/// converted file.
pub fn convert_source(source: &str, settings: &Settings) -> anyhow::Result<String> {
    let path = Path::new("<source>");
    let front_end = plugins::cpp::TreeSitterFrontEnd::with_sentinel(settings.sentinel.as_str());
    let root = front_end.parse_source(source, path)?;
    Converter::with_front_end(front_end, settings.clone()).convert_tree(&root, path)
}
