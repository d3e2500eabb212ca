//! Relationship edges between model entities

use indexmap::IndexSet;
use std::fmt;

/// Kind of relationship between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Source derives from target; a realization when target is an interface
    Inheritance { is_realization: bool },
    /// Target appears in a field type of source
    Aggregation,
    /// Target appears only in method signatures of source
    Dependency,
}

impl EdgeKind {
    pub const GENERALIZATION: EdgeKind = EdgeKind::Inheritance {
        is_realization: false,
    };
    pub const REALIZATION: EdgeKind = EdgeKind::Inheritance {
        is_realization: true,
    };
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Inheritance {
                is_realization: false,
            } => write!(f, "generalization"),
            EdgeKind::Inheritance {
                is_realization: true,
            } => write!(f, "realization"),
            EdgeKind::Aggregation => write!(f, "aggregation"),
            EdgeKind::Dependency => write!(f, "dependency"),
        }
    }
}

/// A directed edge between two pure names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Deduplicated edges of one kind, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    edges: IndexSet<Edge>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge; returns false if it was already present
    pub fn insert(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    pub fn contains_pair(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = indexmap::set::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// The three edge sets derived from a model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    pub inheritance: EdgeSet,
    pub aggregation: EdgeSet,
    pub dependency: EdgeSet,
}

impl Relationships {
    /// Edge sets in output order
    pub fn sections(&self) -> [&EdgeSet; 3] {
        [&self.inheritance, &self.aggregation, &self.dependency]
    }

    pub fn edge_count(&self) -> usize {
        self.sections().iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }
}
