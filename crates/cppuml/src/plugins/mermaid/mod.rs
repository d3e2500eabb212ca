//! Mermaid `classDiagram` writer

mod writer;

pub use writer::MermaidWriter;
