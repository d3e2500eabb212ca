//! Declaration extractor
//!
//! Walks a declaration tree and builds the [`Model`]. Nested classes are
//! flattened into siblings of their enclosing class; the model is filled
//! through a [`ModelBuilder`] handed down the recursion.

use std::path::{Path, PathBuf};
use tracing::{debug, info, span, trace, Level};

use super::reconstructor::TypeReconstructor;
use crate::core::{
    strip_scope, AccessSpecifier, Class, Cursor, CursorKind, Enum, Field, Method, Model,
    ModelBuilder, Var,
};

/// Builds a [`Model`] from the declarations of one source file
#[derive(Debug, Clone)]
pub struct DeclarationExtractor {
    source: PathBuf,
    reconstructor: TypeReconstructor,
}

impl DeclarationExtractor {
    /// Extract declarations that originate from `source`
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self::with_reconstructor(source, TypeReconstructor::new())
    }

    pub fn with_reconstructor(source: impl Into<PathBuf>, reconstructor: TypeReconstructor) -> Self {
        Self {
            source: source.into(),
            reconstructor,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Walk the direct children of `root` and build the model
    pub fn extract<C: Cursor>(&self, root: &C) -> Model {
        let extract_span = span!(Level::INFO, "extract", source = %self.source.display());
        let _enter = extract_span.enter();

        let mut builder = ModelBuilder::new();
        for node in root.children() {
            if node.file() != Some(self.source.as_path()) {
                trace!(name = node.display_name(), "Skipping declaration from another file");
                continue;
            }
            if node.kind().is_class_like() && node.is_definition() {
                self.parse_class(node, &mut builder);
            }
        }

        let model = builder.build();
        info!(entities = model.len(), "Extraction completed");
        model
    }

    fn parse_class<C: Cursor>(&self, cursor: &C, builder: &mut ModelBuilder) {
        let name = cursor.display_name();
        if name.is_empty() {
            debug!("Skipping anonymous class");
            return;
        }
        if name != cursor.spelling() && builder.contains_pure_name(cursor.spelling()) {
            debug!(name, "Skipping specialization of an already modelled template");
            return;
        }

        if cursor.kind() == CursorKind::EnumDecl {
            trace!(name, "Parsed enum");
            builder.insert(name, Enum::new(name).into());
            return;
        }

        builder.reserve(name);

        let mut base_classes = Vec::new();
        let mut fields = Vec::new();
        let mut methods = Vec::new();

        for node in cursor.children() {
            let kind = node.kind();
            if kind.is_class_like() {
                self.parse_class(node, builder);
            } else if kind == CursorKind::BaseSpecifier {
                base_classes.push(strip_scope(node.spelling()));
            } else if kind.is_variable() {
                fields.push(self.parse_field(node));
            } else if kind.is_callable() {
                if node.is_deleted() {
                    trace!(method = node.spelling(), "Skipping deleted method");
                    continue;
                }
                methods.push(self.parse_method(node));
            }
        }

        debug!(
            name,
            bases = base_classes.len(),
            fields = fields.len(),
            methods = methods.len(),
            "Parsed class"
        );
        builder.insert(name, Class::new(name, base_classes, fields, methods).into());
    }

    fn parse_field<C: Cursor>(&self, cursor: &C) -> Field {
        let var = Var::new(cursor.display_name(), self.reconstructor.reconstruct(cursor));
        Field::new(var, AccessSpecifier::from_cursor(cursor.access())).with_static(cursor.is_static())
    }

    fn parse_method<C: Cursor>(&self, cursor: &C) -> Method {
        let mut method = Method::new(
            cursor.spelling(),
            self.reconstructor.reconstruct(cursor),
            AccessSpecifier::from_cursor(cursor.access()),
        )
        .with_abstract(cursor.is_pure_virtual())
        .with_static(cursor.is_static())
        .with_constructor(cursor.kind() == CursorKind::Constructor);

        for arg in cursor.arguments() {
            method = method.with_arg(Var::new(arg.spelling(), self.reconstructor.reconstruct(arg)));
        }
        method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CursorAccess, DeclNode, Entity};

    const FILE: &str = "shapes.hpp";

    fn class(kind: CursorKind, name: &str) -> DeclNode {
        DeclNode::new(kind, name).with_file(FILE)
    }

    fn field(name: &str, ty: &str) -> DeclNode {
        DeclNode::new(CursorKind::FieldDecl, name)
            .with_type(ty)
            .with_tokens(&format!("{} {}", ty, name))
            .with_access(CursorAccess::Private)
    }

    fn extract(root: &DeclNode) -> Model {
        DeclarationExtractor::new(FILE).extract(root)
    }

    fn as_class(entity: &Entity) -> &Class {
        match entity {
            Entity::Class(class) => class,
            Entity::Enum(_) => panic!("expected a class"),
        }
    }

    #[test]
    fn test_fields_and_methods() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Circle")
                .with_child(field("radius", "double"))
                .with_child(
                    DeclNode::new(CursorKind::Method, "scale")
                        .with_type("void")
                        .with_access(CursorAccess::Public)
                        .with_argument(
                            DeclNode::new(CursorKind::Parameter, "factor").with_type("double"),
                        ),
                ),
        );

        let model = extract(&root);
        let circle = as_class(model.get("Circle").unwrap());
        assert_eq!(circle.fields()[0].var, Var::new("radius", "double"));
        assert_eq!(circle.fields()[0].access, AccessSpecifier::Private);
        let scale = &circle.methods()[0];
        assert_eq!(scale.name, "scale");
        assert_eq!(scale.return_type, "void");
        assert_eq!(scale.access, AccessSpecifier::Public);
        assert_eq!(scale.args, vec![Var::new("factor", "double")]);
    }

    #[test]
    fn test_foreign_and_forward_declarations_are_ignored() {
        let root = DeclNode::root()
            .with_child(DeclNode::new(CursorKind::ClassDecl, "FromHeader").with_file("other.hpp"))
            .with_child(class(CursorKind::ClassDecl, "Forward").declaration_only())
            .with_child(class(CursorKind::FunctionDecl, "helper"))
            .with_child(class(CursorKind::StructDecl, "Kept"));

        let model = extract(&root);
        assert_eq!(model.names().collect::<Vec<_>>(), ["Kept"]);
    }

    #[test]
    fn test_nested_classes_are_flattened_after_parent() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Outer")
                .with_child(DeclNode::new(CursorKind::StructDecl, "Inner"))
                .with_child(DeclNode::new(CursorKind::EnumDecl, "Mode")),
        );

        let model = extract(&root);
        assert_eq!(model.names().collect::<Vec<_>>(), ["Outer", "Inner", "Mode"]);
        assert!(model.get("Mode").unwrap().is_enum());
    }

    #[test]
    fn test_base_specifiers_are_unqualified() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Circle")
                .with_child(DeclNode::new(CursorKind::BaseSpecifier, "geo::Shape"))
                .with_child(DeclNode::new(CursorKind::BaseSpecifier, "Named<Circle>")),
        );

        let model = extract(&root);
        assert_eq!(model.get("Circle").unwrap().base_classes(), ["Shape", "Named<Circle>"]);
    }

    #[test]
    fn test_deleted_methods_are_skipped() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Handle")
                .with_child(DeclNode::new(CursorKind::Constructor, "Handle").with_type("void"))
                .with_child(
                    DeclNode::new(CursorKind::Method, "operator=")
                        .with_type("Handle &")
                        .deleted(),
                ),
        );

        let model = extract(&root);
        let methods = model.get("Handle").unwrap().methods();
        assert_eq!(methods.len(), 1);
        assert!(methods[0].is_constructor);
    }

    #[test]
    fn test_specialization_of_known_template_is_skipped() {
        let root = DeclNode::root()
            .with_child(class(CursorKind::ClassTemplate, "Box").with_display_name("Box<T>"))
            .with_child(class(CursorKind::StructDecl, "Box").with_display_name("Box<int>"))
            .with_child(class(CursorKind::StructDecl, "Crate").with_display_name("Crate<int>"));

        let model = extract(&root);
        assert_eq!(model.names().collect::<Vec<_>>(), ["Box<T>", "Crate<int>"]);
    }

    #[test]
    fn test_abstract_and_static_flags() {
        let root = DeclNode::root().with_child(
            class(CursorKind::StructDecl, "Drawable")
                .with_child(
                    DeclNode::new(CursorKind::Method, "draw")
                        .with_type("void")
                        .pure_virtual(),
                )
                .with_child(
                    DeclNode::new(CursorKind::Method, "count")
                        .with_type("int")
                        .static_member(),
                ),
        );

        let model = extract(&root);
        let drawable = model.get("Drawable").unwrap();
        assert!(drawable.is_abstract());
        assert!(drawable.is_interface());
        assert!(drawable.methods()[1].is_static);
    }

    #[test]
    fn test_sentinel_field_type_is_reconstructed() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Scene").with_child(
                DeclNode::new(CursorKind::FieldDecl, "shapes")
                    .with_type("int")
                    .with_tokens("std :: vector < Shape * > shapes"),
            ),
        );

        let model = extract(&root);
        assert_eq!(model.get("Scene").unwrap().fields()[0].ty(), "vector<Shape*>");
    }

    #[test]
    fn test_static_variable_member() {
        let root = DeclNode::root().with_child(
            class(CursorKind::ClassDecl, "Registry").with_child(
                DeclNode::new(CursorKind::VarDecl, "instances")
                    .with_type("int")
                    .with_tokens("static int instances")
                    .static_member(),
            ),
        );

        let model = extract(&root);
        let field = &model.get("Registry").unwrap().fields()[0];
        assert!(field.is_static);
        assert_eq!(field.ty(), "int");
    }

    #[test]
    fn test_anonymous_class_is_skipped() {
        let root = DeclNode::root().with_child(class(CursorKind::StructDecl, ""));
        assert!(extract(&root).is_empty());
    }
}
