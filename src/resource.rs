//! Resource descriptors and identifier kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Describes one data-backed resource type for which routes are generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Natural collection name; used as the URL segment unless the api config overrides it.
    pub collection_name: String,
    /// One-to-many relation names, in the order their routes should be emitted.
    #[serde(default)]
    pub one_to_many_relations: Vec<String>,
}

impl ResourceDescriptor {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            one_to_many_relations: Vec::new(),
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.one_to_many_relations.push(relation.into());
        self
    }

    /// Copy with the collection name replaced, keeping relations.
    pub fn renamed(&self, collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            one_to_many_relations: self.one_to_many_relations.clone(),
        }
    }

    /// `/` + collection name.
    pub fn collection_path(&self) -> String {
        format!("/{}", self.collection_name)
    }

    /// Relations with repeats dropped, first occurrence wins.
    pub fn distinct_relations(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.one_to_many_relations.len());
        for r in &self.one_to_many_relations {
            if !seen.contains(&r.as_str()) {
                seen.push(r.as_str());
            }
        }
        seen
    }
}

/// Which identifier converter, if any, a route pattern binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentifierKind {
    None,
    Int,
    String,
}

impl IdentifierKind {
    /// Kinds that address a single instance, in emission order.
    pub const INSTANCE: [IdentifierKind; 2] = [IdentifierKind::Int, IdentifierKind::String];

    pub fn converter(&self) -> Option<&'static str> {
        match self {
            IdentifierKind::None => None,
            IdentifierKind::Int => Some("int"),
            IdentifierKind::String => Some("string"),
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.converter().unwrap_or("none"))
    }
}

/// Identifier parsed from a matched instance segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum InstanceId {
    Int(i64),
    Str(String),
}

impl InstanceId {
    /// Integer first, string otherwise.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => InstanceId::Int(n),
            Err(_) => InstanceId::Str(raw.to_string()),
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            InstanceId::Int(_) => IdentifierKind::Int,
            InstanceId::Str(_) => IdentifierKind::String,
        }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceId::Int(n) => write!(f, "{}", n),
            InstanceId::Str(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_relations_keep_declared_order() {
        let d = ResourceDescriptor::new("person")
            .with_relation("computers")
            .with_relation("articles")
            .with_relation("computers");
        assert_eq!(d.distinct_relations(), vec!["computers", "articles"]);
    }

    #[test]
    fn instance_id_prefers_int() {
        assert_eq!(InstanceId::parse("42"), InstanceId::Int(42));
        assert_eq!(InstanceId::parse("-3"), InstanceId::Int(-3));
        assert_eq!(InstanceId::parse("ab12"), InstanceId::Str("ab12".into()));
        assert_eq!(InstanceId::parse("ab12").kind(), IdentifierKind::String);
    }

    #[test]
    fn descriptor_deserializes_without_relations() {
        let d: ResourceDescriptor = serde_json::from_str(r#"{"collection_name":"person"}"#).unwrap();
        assert!(d.one_to_many_relations.is_empty());
        assert_eq!(d.collection_path(), "/person");
    }
}
