// Fri Aug 21 2026 - Alex

use crate::config::ExplorerConfig;
use crate::decode::{TagTable, VALUE_BUFFER_SIZE};
use crate::memory::{Address, ObjectSnapshot};
use crate::reflect::{FieldDescriptor, ReflectionSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cached outcome meaning "offset unknown". Not an error: callers omit the
/// offset annotation and carry on.
pub const OFFSET_NOT_FOUND: u32 = 0;

/// Reverse-engineers a field's byte offset from accessor behavior alone.
///
/// The accessor API never exposes where a field's backing storage lives,
/// so the engine experiments: copy the object, point the accessor at the
/// copy, and find the lowest byte whose changes the returned value tracks.
pub struct OffsetProber {
    source: Arc<dyn ReflectionSource>,
    tags: Arc<TagTable>,
    cache: RwLock<HashMap<u64, u32, ahash::RandomState>>,
    header_size: usize,
    max_probe_span: Option<usize>,
}

impl OffsetProber {
    pub fn new(
        source: Arc<dyn ReflectionSource>,
        tags: Arc<TagTable>,
        config: &ExplorerConfig,
    ) -> Self {
        Self {
            source,
            tags,
            cache: RwLock::new(HashMap::default()),
            header_size: config.header_size,
            max_probe_span: config.max_probe_span,
        }
    }

    /// Byte offset of `field`'s backing storage inside `object`, or
    /// `OFFSET_NOT_FOUND`. Every outcome is cached per descriptor for the
    /// process lifetime; field layout is stable while the host runs.
    ///
    /// Faults raised by candidate accessor calls are absorbed here and
    /// never reach the caller.
    pub fn resolve_offset(&self, object: Address, field: &FieldDescriptor) -> u32 {
        if let Some(&cached) = self.cache.read().get(&field.key) {
            return cached;
        }

        let offset = self.probe(object, field);
        // Lookup and insert are separate read/write sections; concurrent
        // callers may probe the same descriptor twice and the last write
        // wins with an identical value.
        self.cache.write().insert(field.key, offset);
        offset
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    fn probe(&self, object: Address, field: &FieldDescriptor) -> u32 {
        let Some(type_name) = field.type_name.as_deref() else {
            return OFFSET_NOT_FOUND;
        };
        let Some(accessor) = field.accessor.as_ref() else {
            return OFFSET_NOT_FOUND;
        };
        // These accessors mutate object state rather than read it; probing
        // them risks corrupting the live object.
        if self.tags.is_state_mutating(type_name) {
            return OFFSET_NOT_FOUND;
        }

        let Some(instance_size) = self.source.instance_size(object) else {
            return OFFSET_NOT_FOUND;
        };
        if instance_size <= self.header_size {
            return OFFSET_NOT_FOUND;
        }

        let mut snapshot = match ObjectSnapshot::capture(&*self.source, object, instance_size) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!(
                    "snapshot of 0x{:x} failed, skipping probe of {}: {}",
                    object.as_u64(),
                    field.display_name(),
                    e
                );
                return OFFSET_NOT_FOUND;
            }
        };
        let base = snapshot.base();

        let span = match self.max_probe_span {
            Some(bound) => instance_size.min(self.header_size + bound),
            None => instance_size,
        };

        // Lowest matching candidate wins. Trial one checks the accessor's
        // output against the untouched byte; trial two flips one bit and
        // checks the output follows. The flip lands on the private copy
        // only and is restored by the guard whatever happens.
        let mut candidate = self.header_size;
        while candidate + 1 <= span {
            let mut accepted = true;
            {
                let mut guard = snapshot.flip_guard(candidate);
                for trial in 0..2 {
                    let mut buf = [0u8; VALUE_BUFFER_SIZE];
                    match accessor.read_into(base, &mut buf) {
                        Ok(()) => {
                            if !guard.value_matches(&buf) {
                                accepted = false;
                                break;
                            }
                        }
                        Err(_) => {
                            // Accessor faulted against the copy; treat the
                            // candidate as failed and keep scanning.
                            accepted = false;
                            break;
                        }
                    }
                    if trial == 0 {
                        guard.flip();
                    }
                }
            }

            if accepted {
                log::debug!(
                    "field {} of 0x{:x} resolved to offset 0x{:x}",
                    field.display_name(),
                    object.as_u64(),
                    candidate
                );
                return candidate as u32;
            }
            candidate += 1;
        }

        OFFSET_NOT_FOUND
    }
}
