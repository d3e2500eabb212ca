//! Shared configuration types for diagram writers

use std::fmt;

use super::Var;

/// How a member's name and type are laid out
///
/// ```text
/// NameFirst:  - radius: double
/// TypeFirst:  - double radius
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MemberLayout {
    /// `name: type`, the UML convention
    #[default]
    NameFirst,
    /// `type name`, the C convention
    TypeFirst,
}

impl MemberLayout {
    /// Lay out one variable or argument
    pub fn var(self, var: &Var) -> String {
        match self {
            MemberLayout::NameFirst => format!("{}: {}", var.name, var.ty),
            MemberLayout::TypeFirst => format!("{} {}", var.ty, var.name),
        }
    }
}

impl fmt::Display for MemberLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberLayout::NameFirst => write!(f, "name-first"),
            MemberLayout::TypeFirst => write!(f, "type-first"),
        }
    }
}

/// Settings that shape the rendered document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterConfig {
    /// Optional diagram title
    pub title: Option<String>,
    /// Member layout for fields, methods and arguments
    pub layout: MemberLayout,
    /// Let the target tool draw access icons instead of `+ # -` characters
    pub access_icons: bool,
}

impl WriterConfig {
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
}
