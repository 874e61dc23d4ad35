// Sat Aug 22 2026 - Alex
//
// Recovery protocol for accessor calls interrupted by a fault. The
// getter registers itself with the runtime's per-thread implicit context
// and bumps a reference count on some pending object; an interrupted call
// leaves that bookkeeping half-finished and the process dies later,
// asynchronously. Before a fault is surfaced as an ordinary failure, the
// pending operation is driven to a consistent completed state: drop the
// reference count and run the matching finalization routines.

use crate::host::abi::{self, RawCleanupFn, RawThreadContextFn};
use crate::host::module::ModuleRange;
use crate::pattern::Pattern;
use once_cell::sync::OnceCell;
use std::os::raw::c_void;

struct RecoveryPointers {
    context_global: *mut *mut c_void,
    get_thread_context: RawThreadContextFn,
    cleanup: [RawCleanupFn; 3],
}

unsafe impl Send for RecoveryPointers {}
unsafe impl Sync for RecoveryPointers {}

/// Locates the runtime's internal pointers by signature scan, once, and
/// applies the recovery protocol on demand. Every step is best-effort:
/// when the internals cannot be found we log and proceed, accepting
/// residual crash risk rather than hanging.
pub struct ContextRecovery {
    module: Option<ModuleRange>,
    pointers: OnceCell<Option<RecoveryPointers>>,
}

impl ContextRecovery {
    pub fn new(module: Option<ModuleRange>) -> Self {
        Self { module, pointers: OnceCell::new() }
    }

    pub fn recover(&self) {
        log::info!("attempting to recover interrupted accessor bookkeeping");

        let Some(pointers) = self.pointers.get_or_init(|| self.locate()).as_ref() else {
            log::warn!("recovery pointers unavailable, continuing with residual crash risk");
            return;
        };

        unsafe {
            let context = (pointers.get_thread_context)(*pointers.context_global, -1);
            if context.is_null() {
                log::info!("thread context was null, a crash may occur");
                return;
            }

            let ref_count = context.add(abi::CONTEXT_REFCOUNT_OFFSET) as *mut i32;
            log::debug!("implicit context reference count: {}", *ref_count);
            if *ref_count <= 0 {
                log::info!("reference count was 0");
                return;
            }
            *ref_count -= 1;

            // First routine only runs when the pending object carries its
            // completion flag, matching the uninterrupted code path.
            let pending = *(context.add(abi::CONTEXT_PENDING_OFFSET) as *const *const u8);
            if !pending.is_null()
                && !(*(pending.add(abi::PENDING_FLAG_OFFSET) as *const *const u8)).is_null()
            {
                (pointers.cleanup[0])(context as *mut c_void);
            }
            (pointers.cleanup[1])(context as *mut c_void);
            (pointers.cleanup[2])(context as *mut c_void);
        }
    }

    fn locate(&self) -> Option<RecoveryPointers> {
        let Some(module) = self.module.as_ref() else {
            log::warn!("no host module range, recovery disabled");
            return None;
        };
        let bytes = module.bytes();

        let context_sig = Pattern::from_ida_pattern(abi::THREAD_CONTEXT_SIG);
        let Some(hit) = context_sig.find_in(bytes) else {
            log::warn!("thread context signature not found in {}", module.path);
            return None;
        };
        let hit = module.start + hit;
        let context_global =
            calculate_absolute(hit + abi::THREAD_CONTEXT_GLOBAL_DISP) as *mut *mut c_void;
        let getter_addr = calculate_absolute(hit + abi::THREAD_CONTEXT_GETTER_DISP);
        log::info!("implicit context global: 0x{:x}", context_global as usize);
        log::info!("thread context getter: 0x{:x}", getter_addr);

        let cleanup_sig = Pattern::from_ida_pattern(abi::CLEANUP_SIG);
        let Some(hit) = cleanup_sig.find_in(bytes) else {
            log::warn!("cleanup signature not found in {}", module.path);
            return None;
        };
        let hit = module.start + hit;
        let mut cleanup = [0usize; 3];
        for (slot, disp) in cleanup.iter_mut().zip(abi::CLEANUP_FUNC_DISPS) {
            *slot = calculate_absolute(hit + disp);
            log::info!("cleanup routine: 0x{:x}", *slot);
        }

        unsafe {
            Some(RecoveryPointers {
                context_global,
                get_thread_context: std::mem::transmute::<usize, RawThreadContextFn>(getter_addr),
                cleanup: [
                    std::mem::transmute::<usize, RawCleanupFn>(cleanup[0]),
                    std::mem::transmute::<usize, RawCleanupFn>(cleanup[1]),
                    std::mem::transmute::<usize, RawCleanupFn>(cleanup[2]),
                ],
            })
        }
    }
}

/// Resolve a rip-relative 32-bit displacement to an absolute address.
fn calculate_absolute(addr: usize) -> usize {
    let displacement = unsafe { std::ptr::read_unaligned(addr as *const i32) };
    (addr as i64 + 4 + displacement as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_absolute_resolves_displacement() {
        let code: [u8; 8] = [0x10, 0x00, 0x00, 0x00, 0, 0, 0, 0];
        let base = code.as_ptr() as usize;
        assert_eq!(calculate_absolute(base), base + 4 + 0x10);
    }

    #[test]
    fn test_recover_without_module_is_noop() {
        let recovery = ContextRecovery::new(None);
        recovery.recover();
        recovery.recover();
    }
}
