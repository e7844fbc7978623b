//! Route entries and named route groups.

use crate::handlers::{CrudHandler, FunctionEvalHandler};
use crate::resource::IdentifierKind;
use crate::verbs::{Verb, VerbSet};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Placeholder text for the identifier segment in a path pattern.
pub const ID_PLACEHOLDER: &str = "<id>";

/// Tagged handler capability a route entry dispatches to.
#[derive(Clone)]
pub enum HandlerRef {
    Crud(Arc<dyn CrudHandler>),
    /// Sub-collection `relation` of the instance named by the id segment.
    Relation {
        handler: Arc<dyn CrudHandler>,
        relation: String,
    },
    FunctionEval(Arc<dyn FunctionEvalHandler>),
}

impl HandlerRef {
    pub fn label(&self) -> String {
        match self {
            HandlerRef::Crud(_) => "crud".to_string(),
            HandlerRef::Relation { relation, .. } => format!("relation:{}", relation),
            HandlerRef::FunctionEval(_) => "function_eval".to_string(),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Whether a route addresses the collection, one instance, or either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arity {
    Collection,
    /// Collection path; identifier defaults to absent.
    Optional,
    Instance,
}

#[derive(Clone, Debug)]
pub struct RouteEntry {
    /// Path relative to the group's url prefix, e.g. `/person/<id>`.
    pub path_pattern: String,
    pub verbs: VerbSet,
    pub handler: HandlerRef,
    pub identifier_kind: IdentifierKind,
    pub arity: Arity,
}

impl RouteEntry {
    /// Pattern with the converter spelled out, e.g. `/person/<int:id>`.
    pub fn typed_pattern(&self) -> String {
        match self.identifier_kind.converter() {
            Some(conv) => self.path_pattern.replace(ID_PLACEHOLDER, &format!("<{}:id>", conv)),
            None => self.path_pattern.clone(),
        }
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{:?}] -> {}",
            self.verbs,
            self.typed_pattern(),
            self.arity,
            self.handler.label()
        )
    }
}

/// Named bundle of routes produced by one registration.
#[derive(Clone, Debug)]
pub struct RouteGroup {
    pub name: String,
    pub url_prefix: String,
    pub entries: Vec<RouteEntry>,
}

impl RouteGroup {
    pub fn qualified_pattern(&self, entry: &RouteEntry) -> String {
        format!("{}{}", self.url_prefix, entry.path_pattern)
    }

    /// Verbs bound anywhere in the group.
    pub fn verbs(&self) -> VerbSet {
        self.entries.iter().fold(VerbSet::new(), |acc, e| acc.union(&e.verbs))
    }

    /// `(pattern, kind, verb)` triples bound by more than one entry. Empty for a valid group.
    pub fn duplicate_bindings(&self) -> Vec<(String, IdentifierKind, Verb)> {
        let mut seen: BTreeMap<(&str, IdentifierKind, Verb), usize> = BTreeMap::new();
        for e in &self.entries {
            for v in e.verbs.iter() {
                *seen.entry((e.path_pattern.as_str(), e.identifier_kind, v)).or_default() += 1;
            }
        }
        seen.into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|((p, k, v), _)| (p.to_string(), k, v))
            .collect()
    }
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.url_prefix)?;
        for e in &self.entries {
            writeln!(f, "  {}", e)?;
        }
        Ok(())
    }
}
