// Sat Aug 22 2026 - Alex

use crate::config::ExplorerConfig;
use crate::host::abi::{self, RawFieldDescriptor, RawGetterFn, RawTypeInfo};
use crate::host::module::ModuleRange;
use crate::host::recovery::ContextRecovery;
use crate::memory::{Address, MemoryError, MemoryReader};
use crate::probe::{FaultGuard, InvokeFault, SignalGuard};
use crate::reflect::{
    FieldAccessor, FieldDescriptor, FieldFlags, ReflectionSource, TypeDescriptor,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::mem::offset_of;
use std::os::raw::c_void;
use std::sync::Arc;

const MAX_TYPE_DEPTH: usize = 128;
const MAX_FIELD_COUNT: u32 = 4096;

/// `ReflectionSource` over the live host process. Every raw read and every
/// getter call runs inside the signal fault boundary, so a stale or
/// hostile pointer costs one failed call instead of the process.
pub struct InProcessRuntime {
    guard: Arc<SignalGuard>,
    recovery: Arc<ContextRecovery>,
    type_cache: RwLock<HashMap<u64, Arc<TypeDescriptor>, ahash::RandomState>>,
}

impl InProcessRuntime {
    pub fn new(config: &ExplorerConfig) -> Self {
        let module = match ModuleRange::find(config.module_name.as_deref()) {
            Ok(module) => {
                log::info!("host module {} at 0x{:x}", module.path, module.start);
                Some(module)
            }
            Err(e) => {
                log::warn!("host module not located, fault recovery degraded: {}", e);
                None
            }
        };

        Self {
            guard: Arc::new(SignalGuard::new()),
            recovery: Arc::new(ContextRecovery::new(module)),
            type_cache: RwLock::new(HashMap::default()),
        }
    }

    fn read_ptr_guarded(&self, addr: Address) -> Option<Address> {
        self.read_ptr(addr).ok()
    }

    /// Most-derived raw type-info pointer for an object address, with the
    /// same plausibility checks `classify` applies.
    fn raw_type_of(&self, addr: Address) -> Option<Address> {
        if addr.is_null() || !addr.is_aligned(abi::POINTER_SIZE) {
            return None;
        }
        let info = self.read_ptr_guarded(addr)?;
        if info.is_null() || !info.is_aligned(abi::POINTER_SIZE) {
            return None;
        }
        let class_info = self.read_ptr_guarded(info)?;
        if class_info.is_null() || !class_info.is_aligned(abi::POINTER_SIZE) {
            return None;
        }
        let type_info = self.read_ptr_guarded(class_info)?;
        if type_info.is_null() || !type_info.is_aligned(abi::POINTER_SIZE) {
            return None;
        }

        let name = self.read_ptr_guarded(type_info + offset_of!(RawTypeInfo, name) as u64)?;
        if name.is_null() {
            return None;
        }
        let size = self.read_u32(type_info + offset_of!(RawTypeInfo, size) as u64).ok()?;
        if !(abi::MIN_INSTANCE_SIZE..=abi::MAX_INSTANCE_SIZE).contains(&size) {
            return None;
        }

        Some(type_info)
    }

    fn load_type(&self, raw: Address, depth: usize) -> Option<Arc<TypeDescriptor>> {
        if raw.is_null() || depth >= MAX_TYPE_DEPTH {
            return None;
        }
        if let Some(cached) = self.type_cache.read().get(&raw.as_u64()) {
            return Some(cached.clone());
        }

        let name_ptr = self.read_ptr_guarded(raw + offset_of!(RawTypeInfo, name) as u64)?;
        let name = if name_ptr.is_null() {
            None
        } else {
            self.read_c_string(name_ptr).ok()
        };
        let size = self.read_u32(raw + offset_of!(RawTypeInfo, size) as u64).ok()?;
        let super_ptr = self.read_ptr_guarded(raw + offset_of!(RawTypeInfo, super_type) as u64)?;
        let super_type = if super_ptr.is_null() {
            None
        } else {
            self.load_type(super_ptr, depth + 1)
        };
        let fields_ptr = self.read_ptr_guarded(raw + offset_of!(RawTypeInfo, fields) as u64)?;
        let fields = self.load_fields(fields_ptr);

        let descriptor = Arc::new(TypeDescriptor {
            key: raw.as_u64(),
            name,
            size,
            super_type,
            fields,
        });
        self.type_cache.write().insert(raw.as_u64(), descriptor.clone());
        Some(descriptor)
    }

    fn load_fields(&self, container: Address) -> Vec<Arc<FieldDescriptor>> {
        if container.is_null() {
            return Vec::new();
        }
        let Some(variables) = self.read_ptr_guarded(container) else {
            return Vec::new();
        };
        if variables.is_null() {
            return Vec::new();
        }

        let Some(data) = self.read_ptr_guarded(variables) else {
            return Vec::new();
        };
        let Ok(num) = self.read_u32(variables + abi::POINTER_SIZE as u64) else {
            return Vec::new();
        };
        if data.is_null() || num == 0 {
            return Vec::new();
        }
        if num > MAX_FIELD_COUNT {
            log::warn!("implausible field count {} at 0x{:x}, skipping", num, variables.as_u64());
            return Vec::new();
        }
        let Some(descriptors) = self.read_ptr_guarded(data) else {
            return Vec::new();
        };
        if descriptors.is_null() {
            return Vec::new();
        }

        let mut fields = Vec::with_capacity(num as usize);
        for i in 0..num as u64 {
            let Some(descriptor) = self.read_ptr_guarded(descriptors + i * abi::POINTER_SIZE as u64)
            else {
                continue;
            };
            if descriptor.is_null() {
                continue;
            }
            if let Some(field) = self.load_field(descriptor) {
                fields.push(field);
            }
        }
        fields
    }

    fn load_field(&self, raw: Address) -> Option<Arc<FieldDescriptor>> {
        let flags = self.read_u32(raw + offset_of!(RawFieldDescriptor, flags) as u64).ok()?;
        let variable_type =
            self.read_u32(raw + offset_of!(RawFieldDescriptor, variable_type) as u64).ok()? as i32;
        let name_ptr = self.read_ptr_guarded(raw + offset_of!(RawFieldDescriptor, name) as u64)?;
        let name = if name_ptr.is_null() { None } else { self.read_c_string(name_ptr).ok() };
        let type_name_ptr =
            self.read_ptr_guarded(raw + offset_of!(RawFieldDescriptor, type_name) as u64)?;
        let type_name = if type_name_ptr.is_null() {
            None
        } else {
            self.read_c_string(type_name_ptr).ok()
        };
        let function =
            self.read_ptr_guarded(raw + offset_of!(RawFieldDescriptor, function) as u64)?;
        let static_data =
            self.read_ptr_guarded(raw + offset_of!(RawFieldDescriptor, static_data) as u64)?;
        let static_slot = if static_data.is_null() {
            None
        } else {
            self.read_u32(static_data).ok().map(|v| v as i32)
        };

        let accessor: Option<Arc<dyn FieldAccessor>> = if function.is_null() {
            None
        } else {
            Some(Arc::new(RawAccessor {
                descriptor: raw.as_ptr() as *const RawFieldDescriptor,
                getter: unsafe { std::mem::transmute::<u64, RawGetterFn>(function.as_u64()) },
                guard: self.guard.clone(),
                recovery: self.recovery.clone(),
            }))
        };

        Some(Arc::new(FieldDescriptor {
            key: raw.as_u64(),
            name,
            type_name,
            flags: FieldFlags::from_bits_retain(flags),
            variable_type,
            static_slot,
            accessor,
            accessor_address: function,
        }))
    }

}

impl MemoryReader for InProcessRuntime {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if addr.is_null() {
            return Err(MemoryError::InvalidAddress(0));
        }
        let mut out = vec![0u8; len];
        self.guard
            .try_invoke(&mut || unsafe {
                std::ptr::copy_nonoverlapping(addr.as_ptr(), out.as_mut_ptr(), len);
            })
            .map_err(|_| MemoryError::ReadFailed(addr.as_u64(), len))?;
        Ok(out)
    }
}

impl ReflectionSource for InProcessRuntime {
    fn classify(&self, addr: Address) -> bool {
        self.raw_type_of(addr).is_some()
    }

    fn type_of(&self, addr: Address) -> Option<Arc<TypeDescriptor>> {
        let raw = self.raw_type_of(addr)?;
        self.load_type(raw, 0)
    }

    fn instance_size(&self, addr: Address) -> Option<usize> {
        let raw = self.raw_type_of(addr)?;
        let size = self.read_u32(raw + offset_of!(RawTypeInfo, size) as u64).ok()?;
        Some((size as usize).max(abi::OBJECT_HEADER_SIZE))
    }
}

/// The host's raw field getter behind the `FieldAccessor` seam. A fault
/// during the call lands back here, where the recovery protocol settles
/// the runtime's bookkeeping before the failure is surfaced.
pub struct RawAccessor {
    descriptor: *const RawFieldDescriptor,
    getter: RawGetterFn,
    guard: Arc<SignalGuard>,
    recovery: Arc<ContextRecovery>,
}

unsafe impl Send for RawAccessor {}
unsafe impl Sync for RawAccessor {}

impl FieldAccessor for RawAccessor {
    fn read_into(&self, object: Address, out: &mut [u8]) -> Result<(), InvokeFault> {
        let result = self.guard.try_invoke(&mut || unsafe {
            (self.getter)(
                self.descriptor,
                object.as_mut_ptr() as *mut c_void,
                out.as_mut_ptr() as *mut c_void,
            );
        });
        if let Err(fault) = result {
            self.recovery.recover();
            return Err(fault);
        }
        Ok(())
    }
}
