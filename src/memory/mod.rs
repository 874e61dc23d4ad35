// Wed Aug 19 2026 - Alex

pub mod address;
pub mod error;
pub mod traits;
pub mod snapshot;

pub use address::Address;
pub use error::MemoryError;
pub use traits::MemoryReader;
pub use snapshot::{ByteFlipGuard, ObjectSnapshot};
