//! Relationship synthesis
//!
//! Derives the inheritance, aggregation and dependency edge sets from a
//! finished model. The sets are computed in that order because each later
//! set leaves out pairs an earlier one already explains.
//!
//! Dependency suppression for subclasses only consults edges recorded
//! earlier in the same pass. A subclass declared before its base therefore
//! keeps its own edge, and in deeper hierarchies only direct bases are
//! checked. Output for such inputs depends on declaration order.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, span, trace, Level};

use crate::core::{pure_name, Edge, EdgeKind, EdgeSet, Entity, Model, Relationships};

/// Derives relationship edges from a read-only model
#[derive(Debug, Default, Clone, Copy)]
pub struct RelationshipSynthesizer;

impl RelationshipSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Compute all three edge sets
    pub fn synthesize(&self, model: &Model) -> Relationships {
        let synth_span = span!(Level::INFO, "synthesize", entities = model.len());
        let _enter = synth_span.enter();

        let entities: Vec<&Entity> = model.entities().collect();
        let matchers = entities
            .iter()
            .map(|e| word_matcher(e.pure_name()))
            .collect::<Vec<_>>();

        let inheritance = self.inheritance(model);
        let aggregation = self.aggregation(&entities, &matchers);
        let dependency = self.dependency(&entities, &matchers, &aggregation);

        let relations = Relationships {
            inheritance,
            aggregation,
            dependency,
        };
        info!(edges = relations.edge_count(), "Synthesis completed");
        relations
    }

    fn inheritance(&self, model: &Model) -> EdgeSet {
        let mut edges = EdgeSet::new();
        for entity in model.entities() {
            for base in entity.base_classes() {
                let base = pure_name(base);
                if base == entity.pure_name() {
                    trace!(entity = base, "Skipping inheritance from own template");
                    continue;
                }
                let is_realization = model
                    .find_by_pure_name(base)
                    .is_some_and(Entity::is_interface);
                edges.insert(Edge::new(
                    entity.pure_name(),
                    base,
                    EdgeKind::Inheritance { is_realization },
                ));
            }
        }
        debug!(count = edges.len(), "Inheritance edges");
        edges
    }

    fn aggregation(&self, entities: &[&Entity], matchers: &[Option<Regex>]) -> EdgeSet {
        let mut edges = EdgeSet::new();
        for owner in entities {
            for (other, matcher) in entities.iter().zip(matchers) {
                if owner.pure_name() == other.pure_name() {
                    continue;
                }
                let Some(matcher) = matcher else { continue };
                if owner.fields().iter().any(|f| matcher.is_match(f.ty())) {
                    trace!(owner = owner.pure_name(), other = other.pure_name(), "Aggregation");
                    edges.insert(Edge::new(
                        owner.pure_name(),
                        other.pure_name(),
                        EdgeKind::Aggregation,
                    ));
                }
            }
        }
        debug!(count = edges.len(), "Aggregation edges");
        edges
    }

    fn dependency(
        &self,
        entities: &[&Entity],
        matchers: &[Option<Regex>],
        aggregation: &EdgeSet,
    ) -> EdgeSet {
        let mut edges = EdgeSet::new();
        let mut recorded: HashMap<&str, HashSet<&str>> = HashMap::new();

        for user in entities {
            let user_name = user.pure_name();
            let bases: Vec<&str> = user.base_classes().iter().map(|b| pure_name(b)).collect();

            for (other, matcher) in entities.iter().zip(matchers) {
                let other_name = other.pure_name();
                if user_name == other_name
                    || aggregation.contains_pair(user_name, other_name)
                    || bases.contains(&other_name)
                {
                    continue;
                }
                let Some(matcher) = matcher else { continue };

                let used = user
                    .methods()
                    .iter()
                    .any(|m| m.signature_types().any(|ty| matcher.is_match(ty)));
                if !used {
                    continue;
                }

                let inherited = bases
                    .iter()
                    .any(|base| recorded.get(base).is_some_and(|t| t.contains(other_name)));
                if inherited {
                    trace!(user = user_name, other = other_name, "Dependency inherited from base");
                    continue;
                }

                recorded.entry(user_name).or_default().insert(other_name);
                edges.insert(Edge::new(user_name, other_name, EdgeKind::Dependency));
            }
        }
        debug!(count = edges.len(), "Dependency edges");
        edges
    }
}

/// Whole-word matcher for a pure name; `None` for an empty name
fn word_matcher(name: &str) -> Option<Regex> {
    if name.is_empty() {
        return None;
    }
    Regex::new(&format!(r"\b{}\b", regex::escape(name))).ok()
}
