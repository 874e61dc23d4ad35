// Sat Aug 22 2026 - Alex

use crate::config::ExplorerConfig;
use crate::decode::{DecodedValue, TagTable, ValueDecoder};
use crate::memory::Address;
use crate::probe::OffsetProber;
use crate::reflect::{FieldDescriptor, ReflectionSource, TypeDescriptor};
use crate::walker::{ExpandedObject, GraphWalker};
use anyhow::Context;
use std::sync::Arc;

/// Front door of the crate. Owns one reflection source, one offset
/// cache, and one tag table, all shared by the walker underneath.
pub struct ObjectExplorer {
    source: Arc<dyn ReflectionSource>,
    prober: Arc<OffsetProber>,
    decoder: ValueDecoder,
    walker: GraphWalker,
}

impl ObjectExplorer {
    pub fn new(source: Arc<dyn ReflectionSource>, config: ExplorerConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid explorer configuration")?;

        let tags = Arc::new(TagTable::from_config(&config));
        let prober = Arc::new(OffsetProber::new(source.clone(), tags.clone(), &config));
        let decoder = ValueDecoder::new(source.clone(), tags);
        let walker =
            GraphWalker::new(source.clone(), prober.clone(), decoder.clone(), config);

        Ok(Self { source, prober, decoder, walker })
    }

    /// Attach to the current process's managed runtime. Installs the
    /// fault handlers and scans the host module for recovery signatures.
    #[cfg(unix)]
    pub fn attach(config: ExplorerConfig) -> anyhow::Result<Self> {
        let runtime = Arc::new(crate::host::InProcessRuntime::new(&config));
        Self::new(runtime, config)
    }

    /// Whether the host considers `addr` a live managed object right now.
    pub fn classify(&self, addr: Address) -> bool {
        self.walker.classify(addr)
    }

    pub fn type_of(&self, addr: Address) -> Option<Arc<TypeDescriptor>> {
        self.source.type_of(addr)
    }

    /// One level of the object tree; `None` when `addr` does not classify.
    pub fn expand(&self, addr: Address) -> Option<ExpandedObject> {
        self.walker.expand(addr)
    }

    /// Cached per-descriptor offset discovery. 0 means not found.
    pub fn resolve_offset(&self, object: Address, field: &FieldDescriptor) -> u32 {
        self.prober.resolve_offset(object, field)
    }

    pub fn decode(&self, object: Address, field: &FieldDescriptor) -> DecodedValue {
        self.decoder.decode(object, field)
    }

    pub fn hierarchy_of(&self, addr: Address) -> Vec<String> {
        self.walker.hierarchy_of(addr)
    }
}
