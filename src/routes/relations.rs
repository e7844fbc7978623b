//! Secondary routes for one-to-many relations.

use crate::handlers::CrudHandler;
use crate::resource::{IdentifierKind, ResourceDescriptor};
use crate::routes::{Arity, HandlerRef, RouteEntry, ID_PLACEHOLDER};
use crate::verbs::VerbSet;
use std::sync::Arc;

/// `<collection>/<id>/<relation>/` for every relation and identifier kind, GET only.
pub fn expand_relations(descriptor: &ResourceDescriptor, handler: &Arc<dyn CrudHandler>) -> Vec<RouteEntry> {
    let collection_path = descriptor.collection_path();
    let mut out = Vec::new();
    for relation in descriptor.distinct_relations() {
        for kind in IdentifierKind::INSTANCE {
            out.push(RouteEntry {
                path_pattern: format!("{}/{}/{}/", collection_path, ID_PLACEHOLDER, relation),
                verbs: VerbSet::read_only(),
                handler: HandlerRef::Relation {
                    handler: handler.clone(),
                    relation: relation.to_string(),
                },
                identifier_kind: kind,
                arity: Arity::Instance,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::NullHandlers;

    #[test]
    fn no_relations_no_entries() {
        let handler = NullHandlers::crud();
        assert!(expand_relations(&ResourceDescriptor::new("person"), &handler).is_empty());
    }

    #[test]
    fn one_relation_yields_int_and_string_routes() {
        let handler = NullHandlers::crud();
        let d = ResourceDescriptor::new("person").with_relation("articles");
        let entries = expand_relations(&d, &handler);
        assert_eq!(entries.len(), 2);
        for (entry, kind) in entries.iter().zip(IdentifierKind::INSTANCE) {
            assert_eq!(entry.path_pattern, "/person/<id>/articles/");
            assert_eq!(entry.identifier_kind, kind);
            assert_eq!(entry.verbs, VerbSet::read_only());
            assert!(matches!(&entry.handler, HandlerRef::Relation { relation, .. } if relation == "articles"));
        }
        assert_eq!(entries[0].typed_pattern(), "/person/<int:id>/articles/");
        assert_eq!(entries[1].typed_pattern(), "/person/<string:id>/articles/");
    }

    #[test]
    fn relations_follow_declared_order() {
        let handler = NullHandlers::crud();
        let d = ResourceDescriptor::new("person")
            .with_relation("computers")
            .with_relation("articles")
            .with_relation("computers");
        let patterns: Vec<String> = expand_relations(&d, &handler).iter().map(|e| e.typed_pattern()).collect();
        assert_eq!(
            patterns,
            vec![
                "/person/<int:id>/computers/",
                "/person/<string:id>/computers/",
                "/person/<int:id>/articles/",
                "/person/<string:id>/articles/",
            ]
        );
    }
}
