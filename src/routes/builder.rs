//! Assembles the route table for one resource.

use crate::handlers::{bind_crud, HandlerFactory, HandlerOptions};
use crate::resource::{IdentifierKind, ResourceDescriptor};
use crate::routes::{expand_relations, Arity, HandlerRef, RouteEntry, ID_PLACEHOLDER};
use crate::verbs::{VerbConfig, VerbPartition, VerbSet};

/// Prefix segment of the function-evaluation route.
pub const EVAL_SEGMENT: &str = "eval";

pub struct RouteTableBuilder<'a> {
    descriptor: &'a ResourceDescriptor,
    verbs: &'a VerbConfig,
}

impl<'a> RouteTableBuilder<'a> {
    pub fn new(descriptor: &'a ResourceDescriptor, verbs: &'a VerbConfig) -> Self {
        Self { descriptor, verbs }
    }

    /// Unnamed entries in emission order: collection-only, mixed-arity,
    /// instance (int, string), relations, function evaluation.
    pub fn build(&self, factory: &dyn HandlerFactory, options: &HandlerOptions) -> Vec<RouteEntry> {
        let partition = VerbPartition::from_config(self.verbs);
        let collection_path = self.descriptor.collection_path();
        let crud = bind_crud(factory, self.descriptor, options);
        let mut entries = Vec::new();

        let mut push = |path: String, verbs: VerbSet, kind: IdentifierKind, arity: Arity, handler: HandlerRef| {
            if !verbs.is_empty() {
                entries.push(RouteEntry {
                    path_pattern: path,
                    verbs,
                    handler,
                    identifier_kind: kind,
                    arity,
                });
            }
        };

        push(
            collection_path.clone(),
            partition.collection_only,
            IdentifierKind::None,
            Arity::Collection,
            HandlerRef::Crud(crud.clone()),
        );
        push(
            collection_path.clone(),
            partition.mixed_arity,
            IdentifierKind::None,
            Arity::Optional,
            HandlerRef::Crud(crud.clone()),
        );
        for kind in IdentifierKind::INSTANCE {
            push(
                format!("{}/{}", collection_path, ID_PLACEHOLDER),
                partition.instance_only.clone(),
                kind,
                Arity::Instance,
                HandlerRef::Crud(crud.clone()),
            );
        }

        entries.extend(expand_relations(self.descriptor, &crud));

        if self.verbs.allow_function_eval {
            entries.push(RouteEntry {
                path_pattern: format!("/{}{}", EVAL_SEGMENT, collection_path),
                verbs: VerbSet::read_only(),
                handler: HandlerRef::FunctionEval(factory.function_eval_handler(self.descriptor)),
                identifier_kind: IdentifierKind::None,
                arity: Arity::Collection,
            });
        }
        entries
    }
}
