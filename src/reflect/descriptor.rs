// Thu Aug 20 2026 - Alex

use crate::memory::Address;
use crate::probe::InvokeFault;
use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u32 {
        const KIND_MASK = 0x1F;
    }
}

/// Low five bits that mark pointer-shaped backing storage.
pub const FIELD_KIND_POINTER: u32 = 0x10;
/// Low five bits of the boolean-shaped subcategory used by the
/// unrecognized-tag fallback.
pub const FIELD_KIND_BOOL: u32 = 0x01;

impl FieldFlags {
    pub fn kind(&self) -> u32 {
        self.bits() & Self::KIND_MASK.bits()
    }

    pub fn is_pointer_shaped(&self) -> bool {
        self.kind() == FIELD_KIND_POINTER
    }

    pub fn is_bool_shaped(&self) -> bool {
        self.kind() == FIELD_KIND_BOOL
    }
}

/// The only sanctioned way to read a field's current value: copy it into a
/// caller buffer. The production implementation wraps the host's raw
/// `(descriptor, instance, buffer)` getter inside the fault boundary; test
/// implementations are plain closures.
pub trait FieldAccessor: Send + Sync {
    fn read_into(&self, object: Address, out: &mut [u8]) -> Result<(), InvokeFault>;
}

/// One declared field of a reflected type. Identity is the descriptor's
/// host address (`key`); descriptors are immutable for the process
/// lifetime.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: u64,
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub flags: FieldFlags,
    pub variable_type: i32,
    pub static_slot: Option<i32>,
    pub accessor: Option<Arc<dyn FieldAccessor>>,
    /// Host address of the raw getter, for display only.
    pub accessor_address: Address,
}

impl FieldDescriptor {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &format_args!("0x{:x}", self.key))
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("flags", &self.flags)
            .field("static_slot", &self.static_slot)
            .finish()
    }
}

/// One level of a reflected type chain. `fields` holds only the fields
/// declared at this level; inherited fields live on the ancestor
/// descriptors.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub key: u64,
    pub name: Option<String>,
    pub size: u32,
    pub super_type: Option<Arc<TypeDescriptor>>,
    pub fields: Vec<Arc<FieldDescriptor>>,
}

impl TypeDescriptor {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}
