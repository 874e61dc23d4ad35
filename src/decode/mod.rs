// Fri Aug 21 2026 - Alex

pub mod decoder;
pub mod tags;
pub mod value;

pub use decoder::{read_runtime_string, ValueDecoder, VALUE_BUFFER_SIZE};
pub use tags::{TagSpec, TagTable, TypeTag};
pub use value::DecodedValue;
