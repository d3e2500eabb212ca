//! Core writer trait for diagram output
//!
//! A writer turns the model and its relationships into one target markup.
//! Implementations only provide the pieces (header, one entity, one edge
//! set, footer); the document skeleton is shared through [`DiagramWriter::render`].

use anyhow::Result;

use super::{EdgeSet, Entity, Model, Relationships, WriterConfig};

/// Core trait for diagram writers
///
/// # Example
/// ```
/// use cppuml::core::{DiagramWriter, Model, Relationships, WriterConfig};
/// use cppuml::plugins::plantuml::PlantUmlWriter;
///
/// let writer = PlantUmlWriter::new();
/// let doc = writer
///     .render(&Model::default(), &Relationships::default(), &WriterConfig::default())
///     .unwrap();
/// assert!(doc.starts_with("@startuml"));
/// ```
pub trait DiagramWriter: Send + Sync {
    /// Start marker, title and global directives, ending in a blank line
    fn header(&self, config: &WriterConfig) -> String;

    /// One entity block without a trailing newline
    fn write_entity(&self, entity: &Entity, config: &WriterConfig) -> String;

    /// One line per edge, each terminated by a newline
    fn write_edges(&self, edges: &EdgeSet) -> String;

    /// End marker
    fn footer(&self) -> String;

    /// Assemble the whole document
    fn render(
        &self,
        model: &Model,
        relations: &Relationships,
        config: &WriterConfig,
    ) -> Result<String> {
        let mut out = self.header(config);

        for entity in model.entities() {
            out.push_str(&self.write_entity(entity, config));
            out.push_str("\n\n");
        }

        for edges in relations.sections() {
            if !edges.is_empty() {
                out.push_str(&self.write_edges(edges));
                out.push('\n');
            }
        }

        out.push_str(&self.footer());
        Ok(out)
    }

    /// Get the name of this writer
    fn name(&self) -> &'static str;

    /// Conventional file extension for the output
    fn extension(&self) -> &'static str;
}
