//! Front-end abstraction over a parsed C++ declaration tree
//!
//! The pipeline never talks to a concrete parser. It sees declarations
//! through the [`Cursor`] trait, which exposes exactly the node facts the
//! extractor needs, and obtains a root cursor from a [`FrontEnd`].
//! [`DeclNode`] is an owned tree implementing [`Cursor`]; front-ends lower
//! into it and tests build it by hand.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Discriminated kind of a declaration node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    ClassDecl,
    StructDecl,
    ClassTemplate,
    EnumDecl,
    BaseSpecifier,
    FieldDecl,
    VarDecl,
    Method,
    Constructor,
    FunctionTemplate,
    FunctionDecl,
    Parameter,
    Other,
}

impl CursorKind {
    /// Class, struct, class template or enum
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            CursorKind::ClassDecl
                | CursorKind::StructDecl
                | CursorKind::ClassTemplate
                | CursorKind::EnumDecl
        )
    }

    /// Field or variable
    pub fn is_variable(self) -> bool {
        matches!(self, CursorKind::FieldDecl | CursorKind::VarDecl)
    }

    /// Anything that turns into a diagram method
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            CursorKind::Method
                | CursorKind::Constructor
                | CursorKind::FunctionTemplate
                | CursorKind::FunctionDecl
        )
    }
}

/// Access level as reported by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorAccess {
    Public,
    Protected,
    Private,
    #[default]
    Unspecified,
}

/// Read-only view of one node in the declaration tree
pub trait Cursor: Sized {
    fn kind(&self) -> CursorKind;

    /// True for a definition, false for a forward declaration
    fn is_definition(&self) -> bool;

    /// Name including template arguments, e.g. `Box<T>`
    fn display_name(&self) -> &str;

    /// Bare name without template arguments, e.g. `Box`
    fn spelling(&self) -> &str;

    /// File the declaration originates from
    fn file(&self) -> Option<&Path>;

    fn children(&self) -> &[Self];

    /// Raw token spellings covering the declaration
    fn tokens(&self) -> &[String];

    fn access(&self) -> CursorAccess;

    /// Declared type for variables, result type for callables
    fn type_spelling(&self) -> &str;

    /// Parameters of a callable, in order
    fn arguments(&self) -> &[Self];

    fn is_deleted(&self) -> bool;

    fn is_pure_virtual(&self) -> bool;

    fn is_static(&self) -> bool;
}

/// Trait for components that turn a source file into a declaration tree
pub trait FrontEnd: Send + Sync {
    type Cursor: Cursor;

    /// Parse `path` and return the root of its declaration tree
    ///
    /// `dialect` is a language-standard selector such as `c++17`; the
    /// pipeline passes it through untouched.
    fn parse(&self, path: &Path, dialect: &str) -> Result<Self::Cursor>;

    /// Get the name of this front-end
    fn name(&self) -> &'static str;
}

/// Owned declaration node
#[derive(Debug, Clone, PartialEq)]
pub struct DeclNode {
    pub kind: CursorKind,
    pub is_definition: bool,
    pub display_name: String,
    pub spelling: String,
    pub file: Option<PathBuf>,
    pub children: Vec<DeclNode>,
    pub tokens: Vec<String>,
    pub access: CursorAccess,
    pub type_spelling: String,
    pub arguments: Vec<DeclNode>,
    pub is_deleted: bool,
    pub is_pure_virtual: bool,
    pub is_static: bool,
}

impl DeclNode {
    pub fn new(kind: CursorKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            is_definition: true,
            display_name: name.clone(),
            spelling: name,
            file: None,
            children: Vec::new(),
            tokens: Vec::new(),
            access: CursorAccess::Unspecified,
            type_spelling: String::new(),
            arguments: Vec::new(),
            is_deleted: false,
            is_pure_virtual: false,
            is_static: false,
        }
    }

    /// Root of a translation unit
    pub fn root() -> Self {
        Self::new(CursorKind::Other, "")
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_child(mut self, child: DeclNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_argument(mut self, argument: DeclNode) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_access(mut self, access: CursorAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_type(mut self, type_spelling: impl Into<String>) -> Self {
        self.type_spelling = type_spelling.into();
        self
    }

    /// Set raw tokens from a whitespace-separated string
    pub fn with_tokens(mut self, tokens: &str) -> Self {
        self.tokens = tokens.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn declaration_only(mut self) -> Self {
        self.is_definition = false;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn pure_virtual(mut self) -> Self {
        self.is_pure_virtual = true;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl Cursor for DeclNode {
    fn kind(&self) -> CursorKind {
        self.kind
    }

    fn is_definition(&self) -> bool {
        self.is_definition
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn spelling(&self) -> &str {
        &self.spelling
    }

    fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn access(&self) -> CursorAccess {
        self.access
    }

    fn type_spelling(&self) -> &str {
        &self.type_spelling
    }

    fn arguments(&self) -> &[Self] {
        &self.arguments
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn is_pure_virtual(&self) -> bool {
        self.is_pure_virtual
    }

    fn is_static(&self) -> bool {
        self.is_static
    }
}
