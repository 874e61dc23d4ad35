// Wed Aug 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid address: 0x{0:x}")]
    InvalidAddress(u64),
    #[error("Read failed at address 0x{0:x} (size: {1})")]
    ReadFailed(u64, usize),
    #[error("Out of bounds: address 0x{0:x} not in readable range")]
    OutOfBounds(u64),
    #[error("String decode failed at address 0x{0:x}")]
    StringDecode(u64),
    #[error("String too long at address 0x{0:x}")]
    StringTooLong(u64),
    #[error("Module not found: {0}")]
    ModuleNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
