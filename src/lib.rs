// Wed Aug 19 2026 - Alex

pub mod config;
pub mod memory;
pub mod pattern;
pub mod reflect;
pub mod probe;
pub mod decode;
pub mod walker;
pub mod host;
pub mod output;
pub mod explorer;
pub mod utils;

pub use config::ExplorerConfig;
pub use memory::{Address, MemoryError, MemoryReader};
pub use reflect::{FieldAccessor, FieldDescriptor, ReflectionSource, TypeDescriptor, TypeModel};
pub use probe::{FaultGuard, InvokeFault, OffsetProber, OFFSET_NOT_FOUND};
pub use decode::{DecodedValue, TagTable, ValueDecoder};
pub use walker::{ExpandedObject, GraphWalker};
pub use output::{render_json, render_text};
pub use utils::parse_address;
pub use explorer::ObjectExplorer;
