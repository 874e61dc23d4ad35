// Sat Aug 22 2026 - Alex
//
// Stable ABI of the host runtime's managed objects: raw structure mirrors,
// the fixed offsets of the two special object categories, and the byte
// signatures used to locate the runtime's bookkeeping internals. All
// values are per host build and live here so nothing else hard-codes them.

use std::os::raw::{c_char, c_void};

pub const POINTER_SIZE: usize = 8;

/// Fixed object header: type-info pointer plus reference count word.
pub const OBJECT_HEADER_SIZE: usize = 0x10;

/// Plausibility bounds for a declared instance size.
pub const MIN_INSTANCE_SIZE: u32 = OBJECT_HEADER_SIZE as u32;
pub const MAX_INSTANCE_SIZE: u32 = 0x10_0000;

// Container category ("via.GameObject"): name handle plus the two fixed
// navigation edges.
pub const CONTAINER_NAME_OFFSET: u32 = 0x18;
pub const CONTAINER_FOLDER_OFFSET: u32 = 0x38;
pub const CONTAINER_TRANSFORM_OFFSET: u32 = 0x40;

// Attachment category ("via.Component"): owner plus the sibling chain and
// child edge.
pub const ATTACHMENT_OWNER_OFFSET: u32 = 0x18;
pub const ATTACHMENT_CHILD_OFFSET: u32 = 0x20;
pub const ATTACHMENT_PREV_OFFSET: u32 = 0x28;
pub const ATTACHMENT_NEXT_OFFSET: u32 = 0x30;

// Runtime small-string handle: UTF-16, inline chars below the capacity
// threshold, heap pointer at +0 above it.
pub const STRING_HANDLE_SIZE: usize = 0x18;
pub const STRING_LENGTH_OFFSET: usize = 0x10;
pub const STRING_CAPACITY_OFFSET: usize = 0x14;
pub const STRING_INLINE_CAPACITY: usize = 8;
pub const STRING_MAX_LENGTH: usize = 0x1000;

// Per-thread implicit context, as left behind by an interrupted getter.
pub const CONTEXT_REFCOUNT_OFFSET: usize = 0x78;
pub const CONTEXT_PENDING_OFFSET: usize = 0x50;
pub const PENDING_FLAG_OFFSET: usize = 0x18;

/// `mov rcx, [rip+ctx]; mov edx, -1; call get_thread_context; mov rbx, rax`
/// — resolves the context global at +3 and the getter at +13.
pub const THREAD_CONTEXT_SIG: &str = "48 8B 0D ? ? ? ? BA FF FF FF FF E8 ? ? ? ? 48 89 C3";
pub const THREAD_CONTEXT_GLOBAL_DISP: usize = 3;
pub const THREAD_CONTEXT_GETTER_DISP: usize = 13;

/// Finalization tail shared by completed getter calls — resolves the three
/// cleanup routines at +11, +19 and +27.
pub const CLEANUP_SIG: &str = "48 83 78 18 00 74 ? 48 89 D9 E8 ? ? ? ? 48 89 D9 E8 ? ? ? ?";
pub const CLEANUP_FUNC_DISPS: [usize; 3] = [11, 19, 27];

/// The field getter: `(descriptor, instance, out buffer) -> value`.
pub type RawGetterFn =
    unsafe extern "C" fn(*const RawFieldDescriptor, *mut c_void, *mut c_void) -> *mut c_void;

pub type RawThreadContextFn = unsafe extern "C" fn(*mut c_void, i32) -> *mut u8;
pub type RawCleanupFn = unsafe extern "C" fn(*mut c_void) -> *mut c_void;

#[repr(C)]
pub struct RawObjectHeader {
    pub info: *const RawObjectInfo,
    pub ref_count: i32,
    pub _pad: u32,
}

#[repr(C)]
pub struct RawObjectInfo {
    pub class_info: *const RawClassInfo,
}

#[repr(C)]
pub struct RawClassInfo {
    pub type_info: *const RawTypeInfo,
}

#[repr(C)]
pub struct RawTypeInfo {
    pub name: *const c_char,
    pub super_type: *const RawTypeInfo,
    pub fields: *const RawFieldContainer,
    pub size: u32,
    pub _pad: u32,
}

#[repr(C)]
pub struct RawFieldContainer {
    pub variables: *const RawVariableList,
}

#[repr(C)]
pub struct RawVariableList {
    pub data: *const RawVariableData,
    pub num: u32,
    pub _pad: u32,
}

#[repr(C)]
pub struct RawVariableData {
    pub descriptors: *const *const RawFieldDescriptor,
}

#[repr(C)]
pub struct RawFieldDescriptor {
    pub flags: u32,
    pub variable_type: i32,
    pub name: *const c_char,
    pub type_name: *const c_char,
    pub function: *const c_void,
    pub static_data: *const RawStaticData,
}

#[repr(C)]
pub struct RawStaticData {
    pub variable_index: i32,
}
