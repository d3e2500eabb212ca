//! Structural model of the classes and enums found in one source file
//!
//! Entities are plain values. Derived classification (`is_abstract`,
//! `is_interface`, `pure_name`) is computed once when a [`Class`] is built,
//! which is why its fields are only reachable through getters.

use indexmap::IndexMap;
use std::fmt;

use super::syntax::CursorAccess;

/// Member access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSpecifier {
    Public,    // +
    Protected, // #
    Private,   // -
}

impl AccessSpecifier {
    /// Map the front-end's access value; unspecified access reads as public
    pub fn from_cursor(access: CursorAccess) -> Self {
        match access {
            CursorAccess::Public | CursorAccess::Unspecified => AccessSpecifier::Public,
            CursorAccess::Protected => AccessSpecifier::Protected,
            CursorAccess::Private => AccessSpecifier::Private,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            AccessSpecifier::Public => "public",
            AccessSpecifier::Protected => "protected",
            AccessSpecifier::Private => "private",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            AccessSpecifier::Public => '+',
            AccessSpecifier::Protected => '#',
            AccessSpecifier::Private => '-',
        }
    }
}

impl fmt::Display for AccessSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Name of a class without its template argument list
///
/// ```rust
/// use cppuml::core::pure_name;
///
/// assert_eq!(pure_name("Box<T>"), "Box");
/// assert_eq!(pure_name("Point"), "Point");
/// ```
pub fn pure_name(name: &str) -> &str {
    name.find('<').map_or(name, |i| &name[..i])
}

/// Drop scope qualifiers (`ns::`, `Outer<T>::`) that sit outside template
/// brackets, keeping cv-qualifiers and declarator punctuation intact.
///
/// ```rust
/// use cppuml::core::strip_scope;
///
/// assert_eq!(strip_scope("const std::string&"), "const string&");
/// assert_eq!(strip_scope("std::vector<std::string>"), "vector<std::string>");
/// ```
pub fn strip_scope(spelling: &str) -> String {
    let mut out = String::with_capacity(spelling.len());
    let mut depth = 0usize;
    let mut chars = spelling.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                depth += 1;
                out.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            ':' if depth == 0 && chars.peek() == Some(&':') => {
                chars.next();
                let start = qualifier_start(&out);
                out.truncate(start);
            }
            _ => out.push(c),
        }
    }

    out
}

/// Byte offset where the trailing `name` or `name<...>` segment of `text` begins
fn qualifier_start(text: &str) -> usize {
    let mut end = text.len();
    if text.ends_with('>') {
        let mut depth = 0i32;
        for (i, b) in text.bytes().enumerate().rev() {
            match b {
                b'>' => depth += 1,
                b'<' => {
                    depth -= 1;
                    if depth == 0 {
                        end = i;
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    text[..end]
        .trim_end_matches(|c: char| c.is_alphanumeric() || c == '_')
        .len()
}

/// An identifier with its reconstructed type spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub name: String,
    pub ty: String,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A data member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub var: Var,
    pub access: AccessSpecifier,
    pub is_static: bool,
}

impl Field {
    pub fn new(var: Var, access: AccessSpecifier) -> Self {
        Self {
            var,
            access,
            is_static: false,
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn name(&self) -> &str {
        &self.var.name
    }

    pub fn ty(&self) -> &str {
        &self.var.ty
    }
}

/// A member function, constructor or member template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub return_type: String,
    pub access: AccessSpecifier,
    pub args: Vec<Var>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_constructor: bool,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        access: AccessSpecifier,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            access,
            args: Vec::new(),
            is_static: false,
            is_abstract: false,
            is_constructor: false,
        }
    }

    pub fn with_arg(mut self, arg: Var) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_constructor(mut self, is_constructor: bool) -> Self {
        self.is_constructor = is_constructor;
        self
    }

    /// Return type followed by every argument type
    pub fn signature_types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.return_type.as_str()).chain(self.args.iter().map(|a| a.ty.as_str()))
    }
}

/// A class, struct or class template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    name: String,
    pure_name_len: usize,
    base_classes: Vec<String>,
    fields: Vec<Field>,
    methods: Vec<Method>,
    is_abstract: bool,
    is_interface: bool,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        base_classes: Vec<String>,
        fields: Vec<Field>,
        methods: Vec<Method>,
    ) -> Self {
        let name = name.into();
        let pure_name_len = pure_name(&name).len();
        let is_abstract = methods.iter().any(|m| m.is_abstract);
        let is_interface = fields.is_empty() && methods.iter().all(|m| m.is_abstract || m.is_static);
        Self {
            name,
            pure_name_len,
            base_classes,
            fields,
            methods,
            is_abstract,
            is_interface,
        }
    }

    /// A class with nothing in it
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pure_name(&self) -> &str {
        &self.name[..self.pure_name_len]
    }

    pub fn base_classes(&self) -> &[String] {
        &self.base_classes
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }
}

/// An enumeration; enumerators are not modelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    name: String,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pure_name(&self) -> &str {
        pure_name(&self.name)
    }
}

/// One diagram entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Class(Class),
    Enum(Enum),
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Entity::Class(class) => class.name(),
            Entity::Enum(en) => en.name(),
        }
    }

    pub fn pure_name(&self) -> &str {
        match self {
            Entity::Class(class) => class.pure_name(),
            Entity::Enum(en) => en.pure_name(),
        }
    }

    pub fn base_classes(&self) -> &[String] {
        match self {
            Entity::Class(class) => class.base_classes(),
            Entity::Enum(_) => &[],
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Entity::Class(class) => class.fields(),
            Entity::Enum(_) => &[],
        }
    }

    pub fn methods(&self) -> &[Method] {
        match self {
            Entity::Class(class) => class.methods(),
            Entity::Enum(_) => &[],
        }
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Entity::Class(class) if class.is_abstract())
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Entity::Class(class) if class.is_interface())
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Entity::Enum(_))
    }
}

impl From<Class> for Entity {
    fn from(class: Class) -> Self {
        Entity::Class(class)
    }
}

impl From<Enum> for Entity {
    fn from(en: Enum) -> Self {
        Entity::Enum(en)
    }
}

/// Insertion-ordered, read-only mapping of display name to entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    entities: IndexMap<String, Entity>,
}

impl Model {
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// First entity whose pure name matches
    pub fn find_by_pure_name(&self, pure: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.pure_name() == pure)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for Model {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut builder = ModelBuilder::new();
        for entity in iter {
            builder.insert(entity.name().to_string(), entity);
        }
        builder.build()
    }
}

/// Accumulates entities during extraction
///
/// A slot is reserved when a class is entered so that an outer class keeps
/// its position ahead of the nested classes discovered while walking it.
/// Reserving or inserting an existing key keeps its original position.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    slots: IndexMap<String, Option<Entity>>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, key: &str) {
        self.slots.insert(key.to_string(), None);
    }

    pub fn insert(&mut self, key: impl Into<String>, entity: Entity) {
        self.slots.insert(key.into(), Some(entity));
    }

    /// True if any reserved or filled key has this pure name
    pub fn contains_pure_name(&self, pure: &str) -> bool {
        self.slots.keys().any(|key| pure_name(key) == pure)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Freeze into a [`Model`], dropping slots that were never filled
    pub fn build(self) -> Model {
        Model {
            entities: self
                .slots
                .into_iter()
                .filter_map(|(key, entity)| entity.map(|e| (key, e)))
                .collect(),
        }
    }
}
