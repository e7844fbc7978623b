//! Route table synthesis: entries, relation expansion, and the per-resource builder.

mod builder;
mod entry;
mod relations;
#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{RouteTableBuilder, EVAL_SEGMENT};
pub use entry::{Arity, HandlerRef, RouteEntry, RouteGroup, ID_PLACEHOLDER};
pub use relations::expand_relations;
