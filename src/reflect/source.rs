// Thu Aug 20 2026 - Alex

use crate::memory::{Address, MemoryReader};
use crate::reflect::TypeDescriptor;
use std::sync::Arc;

/// The seam between the core and the live host runtime. `classify` is the
/// host's validity oracle: whether an address currently denotes a live,
/// correctly-typed instance. Nested pointers are never trusted, so callers
/// re-check it at every recursion step.
pub trait ReflectionSource: MemoryReader {
    fn classify(&self, addr: Address) -> bool;

    /// Most-derived type descriptor of the object at `addr`, or None when
    /// the address does not denote an object.
    fn type_of(&self, addr: Address) -> Option<Arc<TypeDescriptor>>;

    /// Measured instance size of the most-derived level. May legitimately
    /// differ from ancestor descriptors' declared sizes.
    fn instance_size(&self, addr: Address) -> Option<usize>;
}
