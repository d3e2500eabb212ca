//! Plugin implementations for the conversion pipeline
//!
//! `cpp` holds the C++ front-end and the model-building stages; each
//! writer module implements [`DiagramWriter`](crate::core::DiagramWriter)
//! for one target markup. The orchestrator wires them together.

pub mod cpp;
pub mod mermaid;
pub mod orchestrator;
pub mod plantuml;

pub use cpp::*;
pub use mermaid::*;
pub use orchestrator::*;
pub use plantuml::*;
