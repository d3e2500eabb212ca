//! PlantUML class diagram writer

mod writer;

pub use writer::PlantUmlWriter;
