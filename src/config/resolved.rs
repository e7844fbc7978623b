//! Resolved api config: validated and normalized for one registration.

use crate::handlers::HandlerOptions;
use crate::resource::ResourceDescriptor;
use crate::verbs::VerbConfig;

#[derive(Clone, Debug)]
pub struct ResolvedApi {
    /// Descriptor with the effective collection name applied.
    pub descriptor: ResourceDescriptor,
    /// Empty or `/`-led, no trailing slash.
    pub url_prefix: String,
    pub verbs: VerbConfig,
    pub options: HandlerOptions,
}

impl ResolvedApi {
    pub fn collection_name(&self) -> &str {
        &self.descriptor.collection_name
    }
}
