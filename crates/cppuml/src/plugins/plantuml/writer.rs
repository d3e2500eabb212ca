//! PlantUML writer
//!
//! Emits one `class`, `abstract class`, `interface` or `enum` block per
//! entity followed by the relationship sections, wrapped in
//! `@startuml`/`@enduml`.

use tracing::trace;

use crate::core::{
    DiagramWriter, EdgeKind, EdgeSet, Entity, Field, MemberLayout, Method, WriterConfig,
};

/// PlantUML class diagram writer
#[derive(Debug, Default, Clone, Copy)]
pub struct PlantUmlWriter;

impl PlantUmlWriter {
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

    fn field_line(field: &Field, layout: MemberLayout) -> String {
        let static_marker = if field.is_static { "{static} " } else { "" };
        format!(
            "\t{} {}{}\n",
            field.access.symbol(),
            static_marker,
            layout.var(&field.var)
        )
    }

    fn method_line(method: &Method, layout: MemberLayout) -> String {
        let static_marker = if method.is_static { "{static} " } else { "" };
        let abstract_marker = if method.is_abstract { "{abstract} " } else { "" };
        let args = method
            .args
            .iter()
            .map(|arg| layout.var(arg))
            .collect::<Vec<_>>()
            .join(", ");

        let signature = match (layout, method.is_constructor) {
            (_, true) => format!("{}({})", method.name, args),
            (MemberLayout::NameFirst, false) => {
                format!("{}({}): {}", method.name, args, method.return_type)
            }
            (MemberLayout::TypeFirst, false) => {
                format!("{} {}({})", method.return_type, method.name, args)
            }
        };

        format!(
            "\t{} {}{}{}\n",
            method.access.symbol(),
            static_marker,
            abstract_marker,
            signature
        )
    }
}

impl DiagramWriter for PlantUmlWriter {
    fn header(&self, config: &WriterConfig) -> String {
        let mut out = String::from("@startuml\n\n");
        if let Some(title) = &config.title {
            out.push_str(&format!("title {}\n\n", title));
        }
        if !config.access_icons {
            out.push_str("skinparam classAttributeIconSize 0\n\n");
        }
        out
    }

    fn write_entity(&self, entity: &Entity, config: &WriterConfig) -> String {
        trace!(entity = entity.name(), "Writing PlantUML block");

        let mut out = if entity.is_enum() {
            format!("enum {} {{\n", entity.name())
        } else if entity.is_interface() {
            format!("interface {} {{\n", entity.name())
        } else if entity.is_abstract() {
            format!("abstract class {} {{\n", entity.name())
        } else {
            format!("class {} {{\n", entity.name())
        };

        let fields = entity.fields();
        let methods = entity.methods();

        for field in fields {
            out.push_str(&Self::field_line(field, config.layout));
        }
        if !fields.is_empty() && !methods.is_empty() {
            out.push('\n');
        }
        for method in methods {
            out.push_str(&Self::method_line(method, config.layout));
        }
        if fields.is_empty() && methods.is_empty() {
            out.push('\n');
        }

        out.push('}');
        out
    }

    fn write_edges(&self, edges: &EdgeSet) -> String {
        edges
            .iter()
            .map(|edge| format!("{} {} {}\n", edge.target, Self::arrow(edge.kind), edge.source))
            .collect()
    }

    fn footer(&self) -> String {
        "@enduml\n".to_string()
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn extension(&self) -> &'static str {
        "puml"
    }
}
