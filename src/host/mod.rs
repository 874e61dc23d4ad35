// Sat Aug 22 2026 - Alex

pub mod abi;
pub mod module;

#[cfg(unix)]
pub mod recovery;
#[cfg(unix)]
pub mod runtime;

pub use module::ModuleRange;

#[cfg(unix)]
pub use recovery::ContextRecovery;
#[cfg(unix)]
pub use runtime::{InProcessRuntime, RawAccessor};
