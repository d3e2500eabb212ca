//! Core abstractions for the C++ to class-diagram pipeline
//!
//! This module holds the model, the relationship types, the front-end and
//! writer traits, and the shared error and logging infrastructure. Concrete
//! front-ends, pipeline stages and writers live in [`crate::plugins`].

mod error;
pub mod logging;
mod model;
mod relations;
mod syntax;
mod types;
mod writer;

pub use error::*;
pub use logging::*;
pub use model::*;
pub use relations::*;
pub use syntax::*;
pub use types::*;
pub use writer::*;
