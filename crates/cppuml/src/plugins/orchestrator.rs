//! Pipeline orchestrator
//!
//! The converter drives one source file through every stage:
//! FrontEnd → DeclarationExtractor → RelationshipSynthesizer → DiagramWriter

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info, span, Level};

use crate::core::{ConvertError, DiagramWriter, FrontEnd, MemberLayout, WriterConfig};
use crate::plugins::cpp::{
    DeclarationExtractor, RelationshipSynthesizer, TreeSitterFrontEnd, TypeReconstructor,
    DEFAULT_SENTINEL,
};
use crate::plugins::plantuml::PlantUmlWriter;

/// Language standard handed to the front-end when none is given
pub const DEFAULT_DIALECT: &str = "c++17";

/// Conversion settings shared by the front-end, extractor and writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub title: Option<String>,
    pub layout: MemberLayout,
    pub access_icons: bool,
    /// Language standard, e.g. `c++20`
    pub dialect: String,
    /// Spelling the front-end uses for types it could not resolve
    pub sentinel: String,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_layout(mut self, layout: MemberLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_access_icons(mut self, access_icons: bool) -> Self {
        self.access_icons = access_icons;
        self
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// The subset of settings the writer sees
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            title: self.title.clone(),
            layout: self.layout,
            access_icons: self.access_icons,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: None,
            layout: MemberLayout::default(),
            access_icons: false,
            dialect: DEFAULT_DIALECT.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

/// Refuse to clobber a directory, or an existing file without consent
pub fn check_output_target(output: &Path, overwrite: bool) -> Result<(), ConvertError> {
    if output.is_dir() {
        return Err(ConvertError::output_is_directory(output));
    }
    if output.is_file() && !overwrite {
        return Err(ConvertError::output_exists(output));
    }
    Ok(())
}

/// Runs the whole conversion pipeline for one source file
pub struct Converter<F: FrontEnd = TreeSitterFrontEnd> {
    front_end: F,
    writer: Box<dyn DiagramWriter>,
    settings: Settings,
}

impl Converter<TreeSitterFrontEnd> {
    /// Converter with the tree-sitter front-end and the PlantUML writer
    pub fn new(settings: Settings) -> Self {
        let front_end = TreeSitterFrontEnd::with_sentinel(settings.sentinel.as_str());
        Self::with_front_end(front_end, settings)
    }
}

impl Default for Converter<TreeSitterFrontEnd> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<F: FrontEnd> Converter<F> {
    pub fn with_front_end(front_end: F, settings: Settings) -> Self {
        Self {
            front_end,
            writer: Box::new(PlantUmlWriter::new()),
            settings,
        }
    }

    /// Replace the output writer
    pub fn with_writer(mut self, writer: Box<dyn DiagramWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn writer(&self) -> &dyn DiagramWriter {
        self.writer.as_ref()
    }

    /// Parse `source` and render its diagram
    pub fn convert(&self, source: &Path) -> Result<String> {
        let convert_span = span!(Level::INFO, "convert", source = %source.display());
        let _enter = convert_span.enter();

        if !source.is_file() {
            return Err(ConvertError::source_not_found(source).into());
        }

        info!(
            front_end = self.front_end.name(),
            writer = self.writer.name(),
            dialect = %self.settings.dialect,
            "Starting conversion pipeline"
        );

        let parse_span = span!(Level::DEBUG, "pipeline_parse");
        let parse_enter = parse_span.enter();
        let root = self.front_end.parse(source, &self.settings.dialect)?;
        drop(parse_enter);

        self.convert_tree(&root, source)
    }

    /// Run extraction, synthesis and rendering over an already parsed tree
    pub fn convert_tree(&self, root: &F::Cursor, source: &Path) -> Result<String> {
        let reconstructor = TypeReconstructor::with_sentinel(self.settings.sentinel.as_str());
        let model = DeclarationExtractor::with_reconstructor(source, reconstructor).extract(root);
        let relations = RelationshipSynthesizer::new().synthesize(&model);
        debug!(
            entities = model.len(),
            edges = relations.edge_count(),
            "Model and relationships ready"
        );

        let render_span = span!(Level::DEBUG, "pipeline_render", writer = self.writer.name());
        let _render_enter = render_span.enter();
        let document = self
            .writer
            .render(&model, &relations, &self.settings.writer_config())?;
        info!(bytes = document.len(), "Rendering completed");
        Ok(document)
    }

    /// Convert `source` and write the document to `output`
    pub fn translate(&self, source: &Path, output: &Path, overwrite: bool) -> Result<()> {
        check_output_target(output, overwrite)?;
        let document = self.convert(source)?;
        fs::write(output, document).map_err(ConvertError::from)?;
        info!(output = %output.display(), "Diagram written");
        Ok(())
    }
}
