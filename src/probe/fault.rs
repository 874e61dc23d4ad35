// Thu Aug 20 2026 - Alex
//
// Fault boundary: an illegal memory access during a bounded, externally-
// owned call becomes a recoverable failure of that call, never a
// process-ending condition. Platform specifics stay behind `FaultGuard`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeFault {
    #[error("access violation during accessor call")]
    AccessViolation,
    #[error("accessor call panicked: {0}")]
    Panicked(String),
    #[error("field has no accessor")]
    Unavailable,
}

pub trait FaultGuard: Send + Sync {
    fn try_invoke(&self, f: &mut dyn FnMut()) -> Result<(), InvokeFault>;
}

/// Boundary for closure-backed accessors: converts an unwind into a
/// failure of the single call.
pub struct PanicGuard;

impl FaultGuard for PanicGuard {
    fn try_invoke(&self, f: &mut dyn FnMut()) -> Result<(), InvokeFault> {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f())).map_err(|payload| {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            InvokeFault::Panicked(message)
        })
    }
}

#[cfg(unix)]
pub use unix::SignalGuard;

#[cfg(unix)]
mod unix {
    use super::{FaultGuard, InvokeFault};
    use libc::{c_int, c_void, siginfo_t};
    use std::cell::UnsafeCell;
    use std::sync::Once;

    // Large enough for any libc's sigjmp_buf.
    #[repr(C, align(16))]
    struct SigJmpBuf([u8; 512]);

    // glibc only exports the setjmp family under its internal name; libc
    // does not bind it at all.
    #[cfg(target_env = "gnu")]
    extern "C" {
        #[link_name = "__sigsetjmp"]
        fn sigsetjmp(env: *mut SigJmpBuf, savemask: c_int) -> c_int;
    }
    #[cfg(not(target_env = "gnu"))]
    extern "C" {
        fn sigsetjmp(env: *mut SigJmpBuf, savemask: c_int) -> c_int;
    }
    extern "C" {
        fn siglongjmp(env: *mut SigJmpBuf, val: c_int) -> !;
    }

    struct GuardState {
        active: bool,
        env: SigJmpBuf,
    }

    thread_local! {
        static GUARD_STATE: UnsafeCell<GuardState> = UnsafeCell::new(GuardState {
            active: false,
            env: SigJmpBuf([0; 512]),
        });
    }

    static INSTALL: Once = Once::new();
    static mut OLD_SEGV: libc::sigaction = unsafe { std::mem::zeroed() };
    static mut OLD_BUS: libc::sigaction = unsafe { std::mem::zeroed() };

    unsafe extern "C" fn fault_handler(sig: c_int, info: *mut siginfo_t, ctx: *mut c_void) {
        let state = GUARD_STATE.with(|s| s.get());
        if (*state).active {
            (*state).active = false;
            siglongjmp(&mut (*state).env, 1);
        }

        // Fault outside a guarded window: hand it back to whoever was
        // installed before us, or the default disposition.
        let old = if sig == libc::SIGSEGV { std::ptr::addr_of!(OLD_SEGV) } else { std::ptr::addr_of!(OLD_BUS) };
        let old = &*old;
        if old.sa_flags & libc::SA_SIGINFO != 0 {
            let handler: unsafe extern "C" fn(c_int, *mut siginfo_t, *mut c_void) =
                std::mem::transmute(old.sa_sigaction);
            handler(sig, info, ctx);
            return;
        }
        match old.sa_sigaction {
            libc::SIG_IGN => {}
            libc::SIG_DFL => {
                libc::signal(sig, libc::SIG_DFL);
                libc::raise(sig);
            }
            handler => {
                let handler: unsafe extern "C" fn(c_int) = std::mem::transmute(handler);
                handler(sig);
            }
        }
    }

    fn install_handlers() {
        INSTALL.call_once(|| unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = fault_handler as usize;
            action.sa_flags = libc::SA_SIGINFO | libc::SA_NODEFER;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(libc::SIGSEGV, &action, std::ptr::addr_of_mut!(OLD_SEGV));
            libc::sigaction(libc::SIGBUS, &action, std::ptr::addr_of_mut!(OLD_BUS));
        });
    }

    /// Converts SIGSEGV/SIGBUS raised inside the guarded window into an
    /// `InvokeFault` via a per-thread landing pad. Faults on unguarded
    /// threads chain to the previously installed handlers.
    pub struct SignalGuard;

    impl SignalGuard {
        pub fn new() -> Self {
            install_handlers();
            // Touch the thread-local now so the signal handler never has
            // to initialize it.
            GUARD_STATE.with(|s| s.get());
            Self
        }
    }

    impl Default for SignalGuard {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FaultGuard for SignalGuard {
        fn try_invoke(&self, f: &mut dyn FnMut()) -> Result<(), InvokeFault> {
            let state = GUARD_STATE.with(|s| s.get());
            unsafe {
                if sigsetjmp(&mut (*state).env, 1) != 0 {
                    (*state).active = false;
                    return Err(InvokeFault::AccessViolation);
                }
                (*state).active = true;
            }
            f();
            unsafe {
                (*state).active = false;
            }
            Ok(())
        }
    }
}
