//! Property tests for naming helpers, reconstruction and relationship synthesis

use cppuml::core::{
    pure_name, strip_scope, AccessSpecifier, Class, DiagramWriter, Entity, Field, Method, Model,
    Var, WriterConfig,
};
use cppuml::plugins::cpp::{DeclarationRole, RelationshipSynthesizer, TypeReconstructor};
use cppuml::plugins::plantuml::PlantUmlWriter;
use proptest::prelude::*;

const NAMES: &[&str] = &["Alpha", "Beta", "Gamma", "Delta"];

fn type_spelling() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(NAMES).prop_map(str::to_string),
        prop::sample::select(NAMES).prop_map(|n| format!("{}*", n)),
        prop::sample::select(NAMES).prop_map(|n| format!("vector<{}>", n)),
        Just("double".to_string()),
        Just("AlphaBeta".to_string()),
    ]
}

fn method() -> impl Strategy<Value = Method> {
    (
        "[a-z]{1,6}",
        type_spelling(),
        prop::collection::vec(type_spelling(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(name, ret, args, is_abstract)| {
            let mut method = Method::new(name, ret, AccessSpecifier::Public).with_abstract(is_abstract);
            for (i, ty) in args.into_iter().enumerate() {
                method = method.with_arg(Var::new(format!("a{}", i), ty));
            }
            method
        })
}

fn class(name: &'static str) -> impl Strategy<Value = Entity> {
    (
        prop::collection::vec(prop::sample::select(NAMES), 0..2),
        prop::collection::vec(type_spelling(), 0..3),
        prop::collection::vec(method(), 0..3),
    )
        .prop_map(move |(bases, field_types, methods)| {
            let fields = field_types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| Field::new(Var::new(format!("f{}", i), ty), AccessSpecifier::Private))
                .collect();
            // A base may name the class itself, as a sibling specialization would
            let bases = bases
                .into_iter()
                .map(|b| if b == name { format!("{}<void>", b) } else { b.to_string() })
                .collect();
            Class::new(name, bases, fields, methods).into()
        })
}

fn model() -> impl Strategy<Value = Model> {
    (class(NAMES[0]), class(NAMES[1]), class(NAMES[2]), class(NAMES[3]))
        .prop_map(|(a, b, c, d)| vec![a, b, c, d].into_iter().collect())
}

proptest! {
    #[test]
    fn pure_name_truncates_at_first_angle(base in "[A-Za-z_][A-Za-z0-9_]{0,12}", args in "[A-Za-z0-9_, <>*]{0,12}") {
        prop_assert_eq!(pure_name(&base), base.as_str());
        let templated = format!("{}<{}>", base, args);
        prop_assert_eq!(pure_name(&templated), base.as_str());
    }

    #[test]
    fn strip_scope_removes_namespace_prefixes(
        scopes in prop::collection::vec("[a-z_][a-z0-9_]{0,6}", 0..4),
        base in "[A-Z][A-Za-z0-9_]{0,8}",
    ) {
        let mut qualified = String::new();
        for scope in &scopes {
            qualified.push_str(scope);
            qualified.push_str("::");
        }
        qualified.push_str(&base);
        prop_assert_eq!(strip_scope(&qualified), base);
    }

    #[test]
    fn resolved_types_are_kept_verbatim(
        scope in "[a-z]{1,6}",
        base in "[A-Z][A-Za-z0-9]{0,8}",
        name in "[a-z][a-z0-9_]{0,6}",
    ) {
        let reported = format!("{}::{}", scope, base);
        let tokens: Vec<String> = vec!["junk".into(), name.clone()];
        let spelling = TypeReconstructor::new()
            .reconstruct_spelling(&reported, &name, &tokens, DeclarationRole::Variable);
        prop_assert_eq!(spelling, base);
    }

    #[test]
    fn synthesized_edges_respect_invariants(model in model()) {
        let relations = RelationshipSynthesizer::new().synthesize(&model);

        for edge in relations.aggregation.iter().chain(relations.dependency.iter()) {
            prop_assert_ne!(&edge.source, &edge.target);
        }
        for edge in relations.dependency.iter() {
            prop_assert!(!relations.aggregation.contains_pair(&edge.source, &edge.target));
        }
        for edge in relations.inheritance.iter() {
            prop_assert_ne!(&edge.source, &edge.target);
            prop_assert!(model.find_by_pure_name(&edge.source).is_some());
        }
    }

    #[test]
    fn subclasses_do_not_repeat_earlier_base_dependencies(model in model()) {
        let relations = RelationshipSynthesizer::new().synthesize(&model);
        let names: Vec<&str> = model.entities().map(|e| e.pure_name()).collect();

        for edge in relations.dependency.iter() {
            let user = model.find_by_pure_name(&edge.source).unwrap();
            let user_index = names.iter().position(|n| *n == edge.source).unwrap();
            for base in user.base_classes() {
                let Some(base_index) = names.iter().position(|n| *n == base.as_str()) else { continue };
                if base_index < user_index {
                    prop_assert!(!relations.dependency.contains_pair(base, &edge.target));
                }
            }
        }
    }

    #[test]
    fn rendering_is_deterministic(model in model()) {
        let writer = PlantUmlWriter::new();
        let config = WriterConfig::default();
        let first = writer
            .render(&model, &RelationshipSynthesizer::new().synthesize(&model), &config)
            .unwrap();
        let second = writer
            .render(&model, &RelationshipSynthesizer::new().synthesize(&model), &config)
            .unwrap();
        prop_assert_eq!(first, second);
    }
}
