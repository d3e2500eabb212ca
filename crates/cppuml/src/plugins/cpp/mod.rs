//! C++ front-end, declaration extraction and relationship synthesis

mod extractor;
mod frontend;
mod reconstructor;
mod synthesizer;

pub use extractor::DeclarationExtractor;
pub use frontend::TreeSitterFrontEnd;
pub use reconstructor::{DeclarationRole, TypeReconstructor, DEFAULT_SENTINEL};
pub use synthesizer::RelationshipSynthesizer;
