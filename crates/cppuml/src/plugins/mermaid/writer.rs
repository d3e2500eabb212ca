//! Mermaid writer
//!
//! Mermaid spells template arguments with `~` and puts classifiers after
//! the member (`$` static, `*` abstract). Interfaces, abstract classes and
//! enums are marked with annotations inside the class block.

use tracing::trace;

use crate::core::{
    DiagramWriter, EdgeKind, EdgeSet, Entity, Field, MemberLayout, Method, Var, WriterConfig,
};

const INDENT: &str = "    ";

/// Mermaid `classDiagram` writer
#[derive(Debug, Default, Clone, Copy)]
pub struct MermaidWriter;

impl MermaidWriter {
    pub fn new() -> Self {
        Self
    }

    fn arrow(kind: EdgeKind) -> &'static str {
        match kind {
            EdgeKind::Inheritance {
                is_realization: false,
            } => "<|--",
            EdgeKind::Inheritance {
                is_realization: true,
            } => "<|..",
            EdgeKind::Aggregation => "*--",
            EdgeKind::Dependency => "<..",
        }
    }

    fn annotation(entity: &Entity) -> Option<&'static str> {
        if entity.is_enum() {
            Some("<<enumeration>>")
        } else if entity.is_interface() {
            Some("<<interface>>")
        } else if entity.is_abstract() {
            Some("<<abstract>>")
        } else {
            None
        }
    }

    fn var(var: &Var, layout: MemberLayout) -> String {
        generics(&layout.var(var))
    }

    fn field_line(field: &Field, layout: MemberLayout) -> String {
        let classifier = if field.is_static { "$" } else { "" };
        format!(
            "{INDENT}{INDENT}{}{}{}\n",
            field.access.symbol(),
            Self::var(&field.var, layout),
            classifier
        )
    }

    fn method_line(method: &Method, layout: MemberLayout) -> String {
        let classifier = match (method.is_static, method.is_abstract) {
            (true, _) => "$",
            (false, true) => "*",
            (false, false) => "",
        };
        let args = method
            .args
            .iter()
            .map(|arg| Self::var(arg, layout))
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = generics(&method.return_type);

        let signature = match (layout, method.is_constructor) {
            (_, true) => format!("{}({})", method.name, args),
            (MemberLayout::NameFirst, false) => {
                format!("{}({}) {}", method.name, args, return_type)
            }
            (MemberLayout::TypeFirst, false) => {
                format!("{} {}({})", return_type, method.name, args)
            }
        };

        format!(
            "{INDENT}{INDENT}{}{}{}\n",
            method.access.symbol(),
            signature,
            classifier
        )
    }
}

/// Mermaid spells `Box<T>` as `Box~T~`
fn generics(spelling: &str) -> String {
    spelling.replace(['<', '>'], "~")
}

impl DiagramWriter for MermaidWriter {
    fn header(&self, config: &WriterConfig) -> String {
        let mut out = String::new();
        if let Some(title) = &config.title {
            out.push_str(&format!("---\ntitle: {}\n---\n", title));
        }
        out.push_str("classDiagram\n\n");
        out
    }

    fn write_entity(&self, entity: &Entity, config: &WriterConfig) -> String {
        trace!(entity = entity.name(), "Writing Mermaid block");

        let mut out = format!("{INDENT}class {} {{\n", generics(entity.name()));
        if let Some(annotation) = Self::annotation(entity) {
            out.push_str(&format!("{INDENT}{INDENT}{}\n", annotation));
        }
        for field in entity.fields() {
            out.push_str(&Self::field_line(field, config.layout));
        }
        for method in entity.methods() {
            out.push_str(&Self::method_line(method, config.layout));
        }
        out.push_str(INDENT);
        out.push('}');
        out
    }

    fn write_edges(&self, edges: &EdgeSet) -> String {
        edges
            .iter()
            .map(|edge| {
                format!(
                    "{INDENT}{} {} {}\n",
                    edge.target,
                    Self::arrow(edge.kind),
                    edge.source
                )
            })
            .collect()
    }

    fn footer(&self) -> String {
        String::new()
    }

    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn extension(&self) -> &'static str {
        "mmd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessSpecifier, Class, Edge, Enum, Model, Relationships};

    #[test]
    fn test_generics() {
        assert_eq!(generics("map<string, vector<int>>"), "map~string, vector~int~~");
        assert_eq!(generics("Point"), "Point");
    }

    #[test]
    fn test_header() {
        let writer = MermaidWriter::new();
        assert_eq!(writer.header(&WriterConfig::default()), "classDiagram\n\n");
        assert_eq!(
            writer.header(&WriterConfig::new().with_title("Shapes")),
            "---\ntitle: Shapes\n---\nclassDiagram\n\n"
        );
    }

    #[test]
    fn test_class_block() {
        let entity: Entity = Class::new(
            "Box<T>",
            vec![],
            vec![
                Field::new(Var::new("value", "T"), AccessSpecifier::Private),
                Field::new(Var::new("count", "int"), AccessSpecifier::Public).with_static(true),
            ],
            vec![
                Method::new("Box", "void", AccessSpecifier::Public).with_constructor(true),
                Method::new("get", "const T&", AccessSpecifier::Public),
            ],
        )
        .into();

        let block = MermaidWriter::new().write_entity(&entity, &WriterConfig::default());
        assert_eq!(
            block,
            "    class Box~T~ {\n\
             \x20       -value: T\n\
             \x20       +count: int$\n\
             \x20       +Box()\n\
             \x20       +get() const T&\n\
             \x20   }"
        );
    }

    #[test]
    fn test_annotations() {
        let writer = MermaidWriter::new();
        let config = WriterConfig::new().with_layout(MemberLayout::TypeFirst);

        let drawable: Entity = Class::new(
            "Drawable",
            vec![],
            vec![],
            vec![Method::new("draw", "void", AccessSpecifier::Public).with_abstract(true)],
        )
        .into();
        let block = writer.write_entity(&drawable, &config);
        assert!(block.contains("<<interface>>"));
        assert!(block.contains("+void draw()*"));

        let color: Entity = Enum::new("Color").into();
        assert!(writer.write_entity(&color, &config).contains("<<enumeration>>"));
    }

    #[test]
    fn test_render_document() {
        let model: Model = vec![Class::empty("Shape").into(), Class::empty("Circle").into()]
            .into_iter()
            .collect();
        let mut relations = Relationships::default();
        relations
            .inheritance
            .insert(Edge::new("Circle", "Shape", EdgeKind::GENERALIZATION));

        let doc = MermaidWriter::new()
            .render(&model, &relations, &WriterConfig::default())
            .unwrap();
        assert!(doc.starts_with("classDiagram\n\n    class Shape {\n"));
        assert!(doc.ends_with("    Shape <|-- Circle\n\n"));
    }
}
