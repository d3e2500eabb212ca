//! tree-sitter C++ front-end
//!
//! Parses a source file with `tree-sitter-cpp` and lowers the concrete
//! syntax tree into [`DeclNode`]s. Only the shapes the extractor cares
//! about are lowered: classes, structs, enums, class templates, base
//! clauses, fields, methods, constructors, member templates and their
//! parameters.
//!
//! There is no preprocessor. Conditional blocks are flattened by taking
//! their first branch, which makes include guards transparent. Types are
//! spelled as written; a type whose subtree contains a parse error is
//! reported with the sentinel spelling so the reconstructor can recover
//! it from the raw tokens.

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info, span, trace, Level};
use tree_sitter::{Node, Parser};

use super::reconstructor::DEFAULT_SENTINEL;
use crate::core::{ConvertError, CursorAccess, CursorKind, DeclNode, FrontEnd};

/// Leaves that are kept as a single token even though they have children
const ATOMIC_TOKENS: &[&str] = &["string_literal", "raw_string_literal", "char_literal"];

const RECORD_KINDS: &[&str] = &["class_specifier", "struct_specifier", "enum_specifier"];

/// Front-end backed by the tree-sitter C++ grammar
#[derive(Debug, Clone)]
pub struct TreeSitterFrontEnd {
    sentinel: String,
}

impl TreeSitterFrontEnd {
    pub fn new() -> Self {
        Self::with_sentinel(DEFAULT_SENTINEL)
    }

    /// Use `sentinel` as the spelling of types that failed to parse
    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// Parse `source` as the contents of `path`
    pub fn parse_source(&self, source: &str, path: &Path) -> Result<DeclNode> {
        let mut parser = Parser::new();
        parser
            .set_language(tree_sitter_cpp::language())
            .map_err(|e| ConvertError::front_end_error(format!("failed to load C++ grammar: {}", e)))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ConvertError::front_end_error("parser returned no syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            debug!("Syntax tree contains error nodes");
        }

        let lowering = Lowering {
            src: source.as_bytes(),
            file: path,
            sentinel: &self.sentinel,
        };
        let mut unit = DeclNode::root().with_file(path);
        lowering.lower_top_level(root, &mut unit.children);
        info!(declarations = unit.children.len(), "Lowered translation unit");
        Ok(unit)
    }
}

impl Default for TreeSitterFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontEnd for TreeSitterFrontEnd {
    type Cursor = DeclNode;

    fn parse(&self, path: &Path, dialect: &str) -> Result<DeclNode> {
        let parse_span = span!(Level::INFO, "front_end", path = %path.display(), dialect);
        let _enter = parse_span.enter();

        // The grammar accepts every standard revision; the dialect is informational.
        let source = std::fs::read_to_string(path).map_err(ConvertError::from)?;
        self.parse_source(&source, path)
    }

    fn name(&self) -> &'static str {
        "tree-sitter-cpp"
    }
}

/// Declarator facts collected while unwrapping towards the declared name
#[derive(Default)]
struct Declarator<'t> {
    name: Option<Node<'t>>,
    function: Option<Node<'t>>,
    modifiers: String,
    /// Pointer or reference wrapped around the name inside a function
    /// declarator, as in `void (*cb)(int)`
    indirection: String,
    array: String,
}

impl Declarator<'_> {
    /// Modifiers seen inside a function declarator bind to the name, not the return type
    fn modifier_slot(&mut self) -> &mut String {
        if self.function.is_some() {
            &mut self.indirection
        } else {
            &mut self.modifiers
        }
    }
}

struct Lowering<'a> {
    src: &'a [u8],
    file: &'a Path,
    sentinel: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn node(&self, kind: CursorKind, name: &str, access: CursorAccess) -> DeclNode {
        DeclNode::new(kind, name)
            .with_file(self.file)
            .with_access(access)
    }

    fn lower_top_level(&self, parent: Node, out: &mut Vec<DeclNode>) {
        let mut cursor = parent.walk();
        for child in parent.named_children(&mut cursor) {
            match child.kind() {
                "class_specifier" | "struct_specifier" | "enum_specifier" => {
                    out.extend(self.lower_record(child, None, CursorAccess::Unspecified));
                }
                "declaration" | "type_definition" => {
                    if let Some(ty) = child.child_by_field_name("type") {
                        if RECORD_KINDS.contains(&ty.kind()) {
                            out.extend(self.lower_record(ty, None, CursorAccess::Unspecified));
                        }
                    }
                }
                "template_declaration" => {
                    let params = child.child_by_field_name("parameters");
                    let mut inner = child.walk();
                    for item in child.named_children(&mut inner) {
                        if matches!(item.kind(), "class_specifier" | "struct_specifier") {
                            out.extend(self.lower_record(item, params, CursorAccess::Unspecified));
                        }
                    }
                }
                "preproc_if" | "preproc_ifdef" => self.lower_top_level(child, out),
                _ => {}
            }
        }
    }

    /// Lower a class, struct or enum specifier
    fn lower_record(
        &self,
        node: Node,
        template_params: Option<Node>,
        access: CursorAccess,
    ) -> Option<DeclNode> {
        let (spelling, display) = match node.child_by_field_name("name") {
            Some(name) => self.record_names(name),
            None => (String::new(), String::new()),
        };
        let body = node.child_by_field_name("body");

        let kind = match (node.kind(), template_params) {
            ("enum_specifier", _) => CursorKind::EnumDecl,
            (_, Some(params)) if params.named_child_count() > 0 => CursorKind::ClassTemplate,
            ("struct_specifier", _) => CursorKind::StructDecl,
            _ => CursorKind::ClassDecl,
        };

        let display = match template_params {
            Some(params) if kind == CursorKind::ClassTemplate && display == spelling => {
                format!("{}<{}>", spelling, self.template_parameter_names(params).join(", "))
            }
            _ => display,
        };

        let mut record = self.node(kind, &spelling, access).with_display_name(display);
        record.is_definition = body.is_some();
        trace!(name = %record.display_name, kind = ?kind, "Lowering record");

        if kind == CursorKind::EnumDecl {
            return Some(record);
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "base_class_clause" {
                self.lower_bases(child, &mut record.children);
            }
        }

        if let Some(body) = body {
            let mut section = if node.kind() == "class_specifier" {
                CursorAccess::Private
            } else {
                CursorAccess::Public
            };
            self.lower_members(body, &spelling, &mut section, &mut record.children);
        }

        Some(record)
    }

    /// Bare and display name of a record's `name` node
    fn record_names(&self, name: Node) -> (String, String) {
        match name.kind() {
            "template_type" => {
                let bare = name
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let args = name
                    .child_by_field_name("arguments")
                    .map(|list| {
                        let mut cursor = list.walk();
                        let parts: Vec<String> = list
                            .named_children(&mut cursor)
                            .map(|arg| normalize_spelling(self.text(arg)))
                            .collect();
                        parts.join(", ")
                    })
                    .unwrap_or_default();
                let display = format!("{}<{}>", bare, args);
                (bare, display)
            }
            "qualified_identifier" => match name.child_by_field_name("name") {
                Some(inner) => self.record_names(inner),
                None => {
                    let text = normalize_spelling(self.text(name));
                    (text.clone(), text)
                }
            },
            _ => {
                let text = normalize_spelling(self.text(name));
                (text.clone(), text)
            }
        }
    }

    fn template_parameter_names(&self, params: Node) -> Vec<String> {
        let mut cursor = params.walk();
        let names: Vec<String> = params
            .named_children(&mut cursor)
            .filter(|p| p.kind() != "comment")
            .map(|param| {
                let named = match param.kind() {
                    "optional_type_parameter_declaration" => param.child_by_field_name("name"),
                    "parameter_declaration"
                    | "optional_parameter_declaration"
                    | "variadic_parameter_declaration" => param
                        .child_by_field_name("declarator")
                        .and_then(|d| self.unwrap_declarator(d).name),
                    _ => {
                        let mut inner = param.walk();
                        let found = param
                            .named_children(&mut inner)
                            .filter(|c| c.kind() == "type_identifier")
                            .last();
                        found
                    }
                };
                named
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_else(|| normalize_spelling(self.text(param)))
            })
            .collect();
        names
    }

    fn lower_bases(&self, clause: Node, out: &mut Vec<DeclNode>) {
        let mut cursor = clause.walk();
        for child in clause.named_children(&mut cursor) {
            if matches!(
                child.kind(),
                "type_identifier" | "qualified_identifier" | "scoped_type_identifier" | "template_type"
            ) {
                let name = normalize_spelling(self.text(child));
                out.push(self.node(CursorKind::BaseSpecifier, &name, CursorAccess::Unspecified));
            }
        }
    }

    fn lower_members(
        &self,
        body: Node,
        record: &str,
        access: &mut CursorAccess,
        out: &mut Vec<DeclNode>,
    ) {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "access_specifier" => *access = parse_access(self.text(child)),
                "field_declaration" => self.lower_field_declaration(child, record, *access, out),
                "function_definition" | "declaration" => {
                    if let Some(declarator) = child.child_by_field_name("declarator") {
                        out.extend(self.lower_function(child, declarator, record, *access, false));
                    }
                }
                "template_declaration" => self.lower_member_template(child, record, *access, out),
                "preproc_if" | "preproc_ifdef" => self.lower_members(child, record, access, out),
                _ => {}
            }
        }
    }

    fn lower_member_template(
        &self,
        node: Node,
        record: &str,
        access: CursorAccess,
        out: &mut Vec<DeclNode>,
    ) {
        let params = node.child_by_field_name("parameters");
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" | "declaration" | "field_declaration" => {
                    if let Some(declarator) = child.child_by_field_name("declarator") {
                        out.extend(self.lower_function(child, declarator, record, access, true));
                    }
                }
                "class_specifier" | "struct_specifier" => {
                    out.extend(self.lower_record(child, params, access));
                }
                "template_declaration" => self.lower_member_template(child, record, access, out),
                _ => {}
            }
        }
    }

    fn lower_field_declaration(
        &self,
        node: Node,
        record: &str,
        access: CursorAccess,
        out: &mut Vec<DeclNode>,
    ) {
        let ty = node.child_by_field_name("type");
        if let Some(ty) = ty {
            if RECORD_KINDS.contains(&ty.kind()) && ty.child_by_field_name("body").is_some() {
                out.extend(self.lower_record(ty, None, access));
            }
        }

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        for declarator in declarators {
            let parts = self.unwrap_declarator(declarator);
            if parts.function.is_some() && parts.indirection.is_empty() {
                out.extend(self.lower_function(node, declarator, record, access, false));
                continue;
            }
            let Some(name) = parts.name else { continue };
            let name = self.text(name);
            let is_static = self.has_storage(node, "static");
            let kind = if is_static {
                CursorKind::VarDecl
            } else {
                CursorKind::FieldDecl
            };

            let mut field = self
                .node(kind, name, access)
                .with_type(self.declared_type(node, ty, &parts));
            field.tokens = self.tokens(node, None);
            field.is_static = is_static;
            trace!(name, ty = %field.type_spelling, "Lowered field");
            out.push(field);
        }
    }

    /// Lower a method, constructor or member template
    fn lower_function(
        &self,
        node: Node,
        declarator: Node,
        record: &str,
        access: CursorAccess,
        is_template: bool,
    ) -> Option<DeclNode> {
        let parts = self.unwrap_declarator(declarator);
        let function = parts.function?;
        let name_node = parts.name?;

        let name = match name_node.kind() {
            "destructor_name" => return None,
            "qualified_identifier" => self.record_names(name_node).0,
            _ => normalize_spelling(self.text(name_node)),
        };

        let ty = node.child_by_field_name("type");
        let kind = match ty {
            None if name == record => CursorKind::Constructor,
            // Without a return type this is a macro invocation, not a method
            None => return None,
            Some(_) if is_template => CursorKind::FunctionTemplate,
            Some(_) => CursorKind::Method,
        };

        let return_type = match ty {
            Some(_) => self.type_spelling(node, ty, &parts),
            None => "void".to_string(),
        };

        let default_value = node
            .child_by_field_name("default_value")
            .map(|v| self.text(v).trim());

        let mut method = self.node(kind, &name, access).with_type(return_type);
        method.tokens = self.tokens(node, node.child_by_field_name("body"));
        method.is_static = self.has_storage(node, "static");
        method.is_pure_virtual =
            default_value == Some("0") || self.has_child(node, "pure_virtual_clause");
        method.is_deleted = default_value == Some("delete") || self.has_child(node, "delete_method_clause");

        if let Some(params) = function.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if matches!(
                    param.kind(),
                    "parameter_declaration"
                        | "optional_parameter_declaration"
                        | "variadic_parameter_declaration"
                ) {
                    method.arguments.push(self.lower_parameter(param));
                }
            }
        }

        trace!(name = %name, kind = ?kind, args = method.arguments.len(), "Lowered method");
        Some(method)
    }

    fn lower_parameter(&self, param: Node) -> DeclNode {
        let parts = param
            .child_by_field_name("declarator")
            .map(|d| self.unwrap_declarator(d))
            .unwrap_or_default();
        let name = parts.name.map(|n| self.text(n)).unwrap_or("");
        let ty = param.child_by_field_name("type");

        let mut node = self
            .node(CursorKind::Parameter, name, CursorAccess::Unspecified)
            .with_type(self.declared_type(param, ty, &parts));
        node.tokens = self.tokens(param, None);
        node
    }

    /// Walk a declarator chain down to the declared name
    fn unwrap_declarator<'t>(&self, declarator: Node<'t>) -> Declarator<'t> {
        let mut parts = Declarator::default();
        let mut node = declarator;

        loop {
            match node.kind() {
                "pointer_declarator" | "abstract_pointer_declarator" => {
                    parts.modifier_slot().push('*');
                }
                "reference_declarator" | "abstract_reference_declarator" => {
                    let op = node.child(0).map(|c| self.text(c)).unwrap_or("&");
                    parts.modifier_slot().push_str(op);
                }
                "array_declarator" | "abstract_array_declarator" => {
                    let size = node
                        .child_by_field_name("size")
                        .map(|s| self.text(s))
                        .unwrap_or("");
                    parts.array.push_str(&format!("[{}]", size));
                }
                "variadic_declarator" => parts.modifiers.push_str("..."),
                "function_declarator" | "abstract_function_declarator" => {
                    if parts.function.is_none() {
                        parts.function = Some(node);
                    }
                }
                "parenthesized_declarator"
                | "abstract_parenthesized_declarator"
                | "attributed_declarator"
                | "init_declarator" => {}
                _ => {
                    parts.name = Some(node);
                    break;
                }
            }

            match inner_declarator(node) {
                Some(inner) => node = inner,
                None => break,
            }
        }

        parts
    }

    /// Type of a variable, spelling pointers to functions as `ret(*)(args)`
    fn declared_type(&self, decl: Node, ty: Option<Node>, parts: &Declarator) -> String {
        let Some(function) = parts.function.filter(|_| !parts.indirection.is_empty()) else {
            return self.type_spelling(decl, ty, parts);
        };

        let mut args = Vec::new();
        if let Some(params) = function.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if matches!(
                    param.kind(),
                    "parameter_declaration" | "optional_parameter_declaration"
                ) {
                    args.push(self.lower_parameter(param).type_spelling);
                } else if param.kind() == "variadic_parameter_declaration" {
                    args.push("...".to_string());
                }
            }
        }
        format!(
            "{}({})({})",
            self.type_spelling(decl, ty, parts),
            parts.indirection,
            args.join(", ")
        )
    }

    /// Written type of a declaration: qualifiers, type specifier, declarator modifiers
    fn type_spelling(&self, decl: Node, ty: Option<Node>, parts: &Declarator) -> String {
        let Some(ty) = ty else {
            return self.sentinel.to_string();
        };
        if ty.has_error() {
            return self.sentinel.to_string();
        }

        let mut spelling = String::new();
        let mut cursor = decl.walk();
        for child in decl.named_children(&mut cursor) {
            if child.kind() == "type_qualifier" {
                spelling.push_str(self.text(child));
                spelling.push(' ');
            }
        }
        spelling.push_str(&normalize_spelling(self.text(ty)));
        spelling.push_str(&parts.modifiers);
        spelling.push_str(&parts.array);
        spelling
    }

    fn has_storage(&self, node: Node, keyword: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .any(|c| c.kind() == "storage_class_specifier" && self.text(c) == keyword);
        found
    }

    fn has_child(&self, node: Node, kind: &str) -> bool {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).any(|c| c.kind() == kind);
        found
    }

    /// Leaf token spellings under `node`, skipping comments and `skip`
    fn tokens(&self, node: Node, skip: Option<Node>) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tokens(node, skip.map(|n| n.id()), &mut out);
        out
    }

    fn collect_tokens(&self, node: Node, skip: Option<usize>, out: &mut Vec<String>) {
        if Some(node.id()) == skip || node.kind() == "comment" {
            return;
        }
        if node.child_count() == 0 || ATOMIC_TOKENS.contains(&node.kind()) {
            let text = self.text(node);
            if !text.is_empty() {
                out.push(text.to_string());
            }
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_tokens(child, skip, out);
        }
    }
}

fn inner_declarator(node: Node) -> Option<Node> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    match node.kind() {
        "reference_declarator"
        | "abstract_reference_declarator"
        | "parenthesized_declarator"
        | "abstract_parenthesized_declarator"
        | "attributed_declarator"
        | "variadic_declarator" => {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .find(|c| !matches!(c.kind(), "attribute_declaration" | "type_qualifier"));
            found
        }
        _ => None,
    }
}

fn parse_access(text: &str) -> CursorAccess {
    let keyword = text.trim().trim_end_matches(':').trim();
    match keyword {
        "public" => CursorAccess::Public,
        "protected" => CursorAccess::Protected,
        "private" => CursorAccess::Private,
        _ => CursorAccess::Unspecified,
    }
}

/// Collapse whitespace and tidy spacing around template brackets and commas
fn normalize_spelling(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();
    let mut out = String::with_capacity(collapsed.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            if matches!(prev, Some('<') | Some('(') | Some(' '))
                || matches!(next, Some('>') | Some(',') | Some(')'))
            {
                continue;
            }
        }
        out.push(c);
        if c == ',' && chars.get(i + 1) != Some(&' ') {
            out.push(' ');
        }
    }

    out
}
