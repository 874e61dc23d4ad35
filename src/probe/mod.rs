// Thu Aug 20 2026 - Alex

pub mod engine;
pub mod fault;

pub use engine::{OffsetProber, OFFSET_NOT_FOUND};
pub use fault::{FaultGuard, InvokeFault, PanicGuard};

#[cfg(unix)]
pub use fault::SignalGuard;
