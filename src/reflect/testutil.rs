// Thu Aug 20 2026 - Alex
//
// Synthetic host for tests: heap-backed object images with real addresses,
// so probing and decoding exercise genuine memory instead of stubs.

use crate::memory::{Address, MemoryError, MemoryReader};
use crate::probe::{FaultGuard, InvokeFault, PanicGuard};
use crate::reflect::{
    FieldAccessor, FieldDescriptor, FieldFlags, ReflectionSource, TypeDescriptor,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One live "object": a pinned byte region plus its most-derived type.
pub struct SyntheticObject {
    bytes: Box<[u8]>,
    ty: Arc<TypeDescriptor>,
}

impl SyntheticObject {
    pub fn new(ty: Arc<TypeDescriptor>, bytes: Vec<u8>) -> Self {
        Self { bytes: bytes.into_boxed_slice(), ty }
    }

    pub fn addr(&self) -> Address {
        Address::from_ptr(self.bytes.as_ptr())
    }

    pub fn ty(&self) -> Arc<TypeDescriptor> {
        self.ty.clone()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_u64(&mut self, offset: usize, value: u64) {
        self.bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, offset: usize, value: f32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Registry-backed `ReflectionSource`: classify is plain membership, reads
/// go straight to process memory (tests only hand it addresses inside
/// live allocations).
#[derive(Default)]
pub struct FakeSource {
    objects: RwLock<HashMap<u64, (Arc<TypeDescriptor>, usize)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, object: &SyntheticObject) {
        self.objects
            .write()
            .insert(object.addr().as_u64(), (object.ty(), object.size()));
    }
}

impl MemoryReader for FakeSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if addr.is_null() {
            return Err(MemoryError::InvalidAddress(0));
        }
        let slice = unsafe { std::slice::from_raw_parts(addr.as_ptr(), len) };
        Ok(slice.to_vec())
    }
}

impl ReflectionSource for FakeSource {
    fn classify(&self, addr: Address) -> bool {
        self.objects.read().contains_key(&addr.as_u64())
    }

    fn type_of(&self, addr: Address) -> Option<Arc<TypeDescriptor>> {
        self.objects.read().get(&addr.as_u64()).map(|(ty, _)| ty.clone())
    }

    fn instance_size(&self, addr: Address) -> Option<usize> {
        self.objects.read().get(&addr.as_u64()).map(|(_, size)| *size)
    }
}

/// Accessor that reads `width` bytes at a fixed offset from whatever
/// instance address it is handed, counting every invocation.
pub struct SlotAccessor {
    offset: usize,
    width: usize,
    calls: AtomicUsize,
}

impl SlotAccessor {
    pub fn new(offset: usize, width: usize) -> Arc<Self> {
        Arc::new(Self { offset, width, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FieldAccessor for SlotAccessor {
    fn read_into(&self, object: Address, out: &mut [u8]) -> Result<(), InvokeFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let src = unsafe {
            std::slice::from_raw_parts(object.as_ptr().add(self.offset), self.width)
        };
        out[..self.width].copy_from_slice(src);
        Ok(())
    }
}

/// Accessor that faults on every call.
pub struct FaultingAccessor {
    calls: AtomicUsize,
}

impl FaultingAccessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FieldAccessor for FaultingAccessor {
    fn read_into(&self, _object: Address, _out: &mut [u8]) -> Result<(), InvokeFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InvokeFault::AccessViolation)
    }
}

/// Accessor backed by a plain closure, run through the panic boundary the
/// way a misbehaving host callback would be: an unwind becomes a fault of
/// that one call.
pub struct ClosureAccessor {
    body: Box<dyn Fn(Address, &mut [u8]) + Send + Sync>,
    guard: PanicGuard,
}

impl ClosureAccessor {
    pub fn new(body: impl Fn(Address, &mut [u8]) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self { body: Box::new(body), guard: PanicGuard })
    }
}

impl FieldAccessor for ClosureAccessor {
    fn read_into(&self, object: Address, out: &mut [u8]) -> Result<(), InvokeFault> {
        self.guard.try_invoke(&mut || (self.body)(object, out))
    }
}

/// Accessor that writes the same bytes no matter the instance; probing can
/// never correlate it with any offset.
pub struct FixedAccessor {
    bytes: Vec<u8>,
}

impl FixedAccessor {
    pub fn new(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self { bytes })
    }
}

impl FieldAccessor for FixedAccessor {
    fn read_into(&self, _object: Address, out: &mut [u8]) -> Result<(), InvokeFault> {
        out[..self.bytes.len()].copy_from_slice(&self.bytes);
        Ok(())
    }
}

static NEXT_KEY: AtomicUsize = AtomicUsize::new(1);

pub fn next_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::SeqCst) as u64
}

pub fn make_field(
    name: &str,
    type_name: Option<&str>,
    flags: u32,
    accessor: Option<Arc<dyn FieldAccessor>>,
) -> Arc<FieldDescriptor> {
    Arc::new(FieldDescriptor {
        key: next_key(),
        name: Some(name.to_string()),
        type_name: type_name.map(|s| s.to_string()),
        flags: FieldFlags::from_bits_retain(flags),
        variable_type: 0,
        static_slot: None,
        accessor,
        accessor_address: Address::zero(),
    })
}

/// Field whose name was stripped from the metadata.
pub fn make_anonymous_field(
    type_name: Option<&str>,
    flags: u32,
    accessor: Option<Arc<dyn FieldAccessor>>,
) -> Arc<FieldDescriptor> {
    Arc::new(FieldDescriptor {
        key: next_key(),
        name: None,
        type_name: type_name.map(|s| s.to_string()),
        flags: FieldFlags::from_bits_retain(flags),
        variable_type: 0,
        static_slot: None,
        accessor,
        accessor_address: Address::zero(),
    })
}

pub fn make_type(
    name: &str,
    size: u32,
    super_type: Option<Arc<TypeDescriptor>>,
    fields: Vec<Arc<FieldDescriptor>>,
) -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor {
        key: next_key(),
        name: Some(name.to_string()),
        size,
        super_type,
        fields,
    })
}
